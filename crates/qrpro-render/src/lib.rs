//! Encode adapter over the `qrcode` crate.

use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use qrcode::render::unicode;
use qrcode::QrCode;
use qrpro_core::{Encoder, RenderError, RenderOptions, RenderedCode};
use qrpro_types::EcLevel;

/// Modules of background kept around the symbol
const QUIET_ZONE: u32 = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct QrEncoder;

impl QrEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for QrEncoder {
    fn render(&self, payload: &str, options: &RenderOptions) -> Result<RenderedCode, RenderError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ec_level(options.ec_level))
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        let modules = code.width() as u32;
        let span = modules + 2 * QUIET_ZONE;
        let scale = (options.width.min(options.height) / span).max(1);

        // Never clip the symbol when the requested size is too small for it
        let width = options.width.max(span * scale);
        let height = options.height.max(span * scale);
        let left = (width - modules * scale) / 2;
        let top = (height - modules * scale) / 2;

        let mut image = RgbaImage::from_pixel(width, height, Rgba(options.background.rgba()));
        let dark = Rgba(options.foreground.rgba());

        for (i, color) in code.to_colors().iter().enumerate() {
            if !matches!(color, qrcode::Color::Dark) {
                continue;
            }
            let mx = i as u32 % modules;
            let my = i as u32 / modules;
            for dy in 0..scale {
                for dx in 0..scale {
                    image.put_pixel(left + mx * scale + dx, top + my * scale + dy, dark);
                }
            }
        }

        tracing::debug!(
            "Rendered {} byte payload as {modules}x{modules} modules at {width}x{height}",
            payload.len()
        );

        Ok(RenderedCode {
            width,
            height,
            pixels: image.into_raw(),
            preview: terminal_preview(&code),
        })
    }
}

fn ec_level(level: EcLevel) -> qrcode::EcLevel {
    match level {
        EcLevel::L => qrcode::EcLevel::L,
        EcLevel::M => qrcode::EcLevel::M,
        EcLevel::Q => qrcode::EcLevel::Q,
        EcLevel::H => qrcode::EcLevel::H,
    }
}

/// Two modules per character cell, light-on-dark so it scans from a terminal
fn terminal_preview(code: &QrCode) -> String {
    code.render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build()
}

/// PNG bytes of a rendered code
pub fn encode_png(code: &RenderedCode) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(&code.pixels, code.width, code.height, ExtendedColorType::Rgba8)
        .map_err(|e| RenderError::Image(e.to_string()))?;
    Ok(buffer)
}
