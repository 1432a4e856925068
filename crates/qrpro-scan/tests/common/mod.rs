use std::path::Path;

use image::{GrayImage, Luma};
use qrcode::QrCode;

/// Writes `payload` as a black-on-white PNG with a quiet zone
pub fn write_qr_png(path: &Path, payload: &str) {
    let code = QrCode::new(payload.as_bytes()).expect("payload fits");
    let modules = code.width() as u32;
    let scale = 6;
    let quiet = 4;
    let size = (modules + 2 * quiet) * scale;

    let mut image = GrayImage::from_pixel(size, size, Luma([255]));
    for (i, color) in code.to_colors().iter().enumerate() {
        if matches!(color, qrcode::Color::Dark) {
            let x = (i as u32 % modules + quiet) * scale;
            let y = (i as u32 / modules + quiet) * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    image.put_pixel(x + dx, y + dy, Luma([0]));
                }
            }
        }
    }
    image.save(path).expect("write fixture");
}

pub fn write_blank_png(path: &Path) {
    GrayImage::from_pixel(120, 120, Luma([255]))
        .save(path)
        .expect("write fixture");
}
