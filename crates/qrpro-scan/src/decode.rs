use image::DynamicImage;
use qrpro_core::Decoder;
use qrpro_types::Frame;

/// Decode adapter over `rqrr`
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RqrrDecoder {
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String> {
        let (w, h) = (width as usize, height as usize);
        if w == 0 || h == 0 || pixels.len() < w * h * 4 {
            tracing::warn!(
                "Pixel buffer too small: {} bytes for {width}x{height}",
                pixels.len()
            );
            return None;
        }

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| {
            let i = (y * w + x) * 4;
            luma(pixels[i], pixels[i + 1], pixels[i + 2])
        });

        let grids = prepared.detect_grids();
        tracing::trace!("Detected {} candidate grid(s)", grids.len());

        grids.into_iter().find_map(|grid| match grid.decode() {
            Ok((_, content)) => Some(content),
            Err(e) => {
                tracing::debug!("Grid rejected: {e}");
                None
            }
        })
    }
}

/// Rec. 601 luma, integer form
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Rasterize a decoded image at its native dimensions
pub fn frame_from_image(image: DynamicImage) -> Frame {
    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();
    Frame::new(rgba.into_raw(), width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_buffer_is_no_match() {
        assert_eq!(RqrrDecoder::new().decode(&[0; 12], 4, 4), None);
    }

    #[test]
    fn blank_frame_is_no_match() {
        let pixels = vec![255u8; 64 * 64 * 4];
        assert_eq!(RqrrDecoder::new().decode(&pixels, 64, 64), None);
    }

    #[test]
    fn luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
    }
}
