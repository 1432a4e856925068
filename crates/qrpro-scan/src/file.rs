//! Single-shot decoding of still images.

use std::fs;
use std::path::Path;

use qrpro_core::Decoder;
use qrpro_types::Frame;

use crate::decode::frame_from_image;
use crate::error::ScanError;

/// Decode the first code in an image file
pub fn scan_file(path: &Path, decoder: &dyn Decoder) -> Result<String, ScanError> {
    let bytes = fs::read(path)?;
    tracing::debug!("Scanning {} ({} bytes)", path.display(), bytes.len());
    scan_bytes(&bytes, decoder)
}

/// Decode the first code in encoded image bytes (PNG, JPEG, ...)
pub fn scan_bytes(bytes: &[u8], decoder: &dyn Decoder) -> Result<String, ScanError> {
    // Sniff before decoding so non-images never reach the decoder
    let format = image::guess_format(bytes).map_err(|e| ScanError::NotAnImage(e.to_string()))?;
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ScanError::NotAnImage(e.to_string()))?;

    scan_frame(&frame_from_image(image), decoder)
}

/// One decode attempt, no retry
pub fn scan_frame(frame: &Frame, decoder: &dyn Decoder) -> Result<String, ScanError> {
    decoder
        .decode(&frame.data, frame.width, frame.height)
        .ok_or(ScanError::NotFound)
}
