//! Payload templates for each preset.
//!
//! Every field is trimmed first. A preset whose required field ends up empty
//! produces no payload at all.

use qrpro_types::PresetForm;

use crate::error::GenerateError;

pub fn build_payload(form: &PresetForm) -> Result<String, GenerateError> {
    match form {
        PresetForm::Text { text } => {
            let text = required(text, "text")?;
            Ok(text.to_string())
        }
        PresetForm::Wifi {
            ssid,
            password,
            security,
        } => {
            let ssid = required(ssid, "ssid")?;
            Ok(format!(
                "WIFI:T:{};S:{};P:{};;",
                security.as_str(),
                ssid,
                password.trim()
            ))
        }
        PresetForm::Vcard {
            name,
            phone,
            email,
            org,
        } => {
            let name = required(name, "name")?;
            Ok(format!(
                "BEGIN:VCARD\nVERSION:3.0\nFN:{}\nTEL:{}\nEMAIL:{}\nORG:{}\nEND:VCARD",
                name,
                phone.trim(),
                email.trim(),
                org.trim()
            ))
        }
        PresetForm::Email { to, subject, body } => {
            let to = required(to, "to")?;
            Ok(format!(
                "mailto:{}?subject={}&body={}",
                to,
                encode_uri_component(subject.trim()),
                encode_uri_component(body.trim())
            ))
        }
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, GenerateError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GenerateError::MissingRequired(field));
    }
    Ok(value)
}

/// Percent-encode everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
