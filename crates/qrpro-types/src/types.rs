use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages exchanged between the UI loop, the event loop and the capture task
#[derive(Debug, Clone)]
pub enum AppEvent {
    // UI -> app
    Generate(PresetForm),
    Navigate(Page),
    ToggleTheme,
    SetTheme(Theme),
    ReportTheme,
    StartCamera,
    StopCamera,
    ScanFile(PathBuf),
    ScanClipboard,
    LoadHistory,
    DeleteHistory {
        category: HistoryCategory,
        index: usize,
    },
    DeleteHistoryById {
        category: HistoryCategory,
        id: Uuid,
    },
    ClearHistory(HistoryCategory),
    CopyHistory {
        category: HistoryCategory,
        index: usize,
    },
    RegenerateFromHistory(usize),
    /// Render a "generated" record as the current code without recording it
    RecallFromHistory(usize),
    CopyResult,
    OpenResult,
    Download,
    Share,
    Shutdown,

    // capture task -> app, tagged with the session epoch
    FrameDecoded {
        epoch: u64,
        data: String,
    },
    CaptureFailed {
        epoch: u64,
        reason: String,
    },

    // app -> UI
    ShowCode(ShownCode),
    ShowScanResult {
        data: String,
        openable: bool,
    },
    ShowHistory {
        generated: Vec<HistoryRecord>,
        scanned: Vec<HistoryRecord>,
    },
    ScanStatus {
        status: String,
        capturing: bool,
    },
    Notify(String),
    Alert(String),
    PageChanged(Page),
    ThemeChanged(Theme),
    OperationComplete,
}

impl AppEvent {
    /// Sent by the UI and answered with exactly one `OperationComplete`
    pub fn is_request(&self) -> bool {
        !matches!(
            self,
            AppEvent::FrameDecoded { .. }
                | AppEvent::CaptureFailed { .. }
                | AppEvent::ShowCode(_)
                | AppEvent::ShowScanResult { .. }
                | AppEvent::ShowHistory { .. }
                | AppEvent::ScanStatus { .. }
                | AppEvent::Notify(_)
                | AppEvent::Alert(_)
                | AppEvent::PageChanged(_)
                | AppEvent::ThemeChanged(_)
                | AppEvent::OperationComplete
        )
    }
}

/// A freshly generated code as presented to the UI
#[derive(Debug, Clone)]
pub struct ShownCode {
    pub preset: Preset,
    pub payload: String,
    /// Terminal rendering of the code
    pub preview: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Text,
    Wifi,
    Vcard,
    Email,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Text => "text",
            Preset::Wifi => "wifi",
            Preset::Vcard => "vcard",
            Preset::Email => "email",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Preset::Text),
            "wifi" => Ok(Preset::Wifi),
            "vcard" => Ok(Preset::Vcard),
            "email" => Ok(Preset::Email),
            other => Err(format!("unknown preset '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WifiSecurity {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    NoPass,
}

impl WifiSecurity {
    pub fn as_str(&self) -> &'static str {
        match self {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::NoPass => "nopass",
        }
    }
}

impl fmt::Display for WifiSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WifiSecurity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wpa" | "wpa2" => Ok(WifiSecurity::Wpa),
            "wep" => Ok(WifiSecurity::Wep),
            "nopass" | "none" | "open" => Ok(WifiSecurity::NoPass),
            other => Err(format!("unknown security mode '{other}'")),
        }
    }
}

/// Raw form fields for the selected preset, untrimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetForm {
    Text {
        text: String,
    },
    Wifi {
        ssid: String,
        password: String,
        security: WifiSecurity,
    },
    Vcard {
        name: String,
        phone: String,
        email: String,
        org: String,
    },
    Email {
        to: String,
        subject: String,
        body: String,
    },
}

impl PresetForm {
    pub fn preset(&self) -> Preset {
        match self {
            PresetForm::Text { .. } => Preset::Text,
            PresetForm::Wifi { .. } => Preset::Wifi,
            PresetForm::Vcard { .. } => Preset::Vcard,
            PresetForm::Email { .. } => Preset::Email,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryCategory {
    Generated,
    Scanned,
}

impl HistoryCategory {
    /// Key the category is persisted under
    pub fn storage_key(&self) -> &'static str {
        match self {
            HistoryCategory::Generated => "qr-history-generated",
            HistoryCategory::Scanned => "qr-history-scanned",
        }
    }
}

impl fmt::Display for HistoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryCategory::Generated => f.write_str("generated"),
            HistoryCategory::Scanned => f.write_str("scanned"),
        }
    }
}

impl FromStr for HistoryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generated" | "gen" => Ok(HistoryCategory::Generated),
            "scanned" | "scan" => Ok(HistoryCategory::Scanned),
            other => Err(format!("unknown history category '{other}'")),
        }
    }
}

/// One past generate or scan action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Nil for records stored before ids existed
    #[serde(default)]
    pub id: Uuid,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Preset>,
    pub data: String,
    pub timestamp: i64,
}

impl HistoryRecord {
    pub fn generated(preset: Preset, data: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: Some(preset),
            data: data.into(),
            timestamp,
        }
    }

    pub fn scanned(data: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: None,
            data: data.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Generator,
    Scanner,
    History,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Generator => f.write_str("generator"),
            Page::Scanner => f.write_str("scanner"),
            Page::History => f.write_str("history"),
        }
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generator" | "generate" => Ok(Page::Generator),
            "scanner" | "scan" => Ok(Page::Scanner),
            "history" => Ok(Page::History),
            other => Err(format!("unknown page '{other}'")),
        }
    }
}

/// Requested camera orientation, negotiated by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear-facing
    #[default]
    Environment,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EcLevel {
    L,
    M,
    Q,
    #[default]
    H,
}

/// RGBA8 pixel buffer at native resolution
#[derive(Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], 255]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ui_requests_expect_completion() {
        assert!(AppEvent::StartCamera.is_request());
        assert!(AppEvent::Shutdown.is_request());
        assert!(AppEvent::ScanFile("code.png".into()).is_request());
        assert!(
            !AppEvent::FrameDecoded {
                epoch: 1,
                data: "x".into()
            }
            .is_request()
        );
        assert!(!AppEvent::OperationComplete.is_request());
        assert!(!AppEvent::Alert("x".into()).is_request());
    }

    #[test]
    fn generated_record_serializes_type_field() {
        let record = HistoryRecord::generated(Preset::Wifi, "WIFI:T:WPA;S:x;P:;;", 42);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "wifi");
        assert_eq!(json["timestamp"], 42);
    }

    #[test]
    fn scanned_record_omits_type_field() {
        let record = HistoryRecord::scanned("hello", 7);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("type").is_none());
    }

    #[test]
    fn record_without_id_reads_as_nil() {
        let record: HistoryRecord =
            serde_json::from_str(r#"{"type":"text","data":"hello","timestamp":1}"#).unwrap();
        assert_eq!(record.kind, Some(Preset::Text));
        assert!(record.id.is_nil());
    }

    #[test]
    fn color_parses_hex() {
        assert_eq!(Color::from_hex("#1e293b"), Some(Color([0x1e, 0x29, 0x3b])));
        assert_eq!(Color::from_hex("ffffff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
