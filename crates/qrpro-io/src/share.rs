use qrpro_types::Preset;

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Sharing is not supported on this platform")]
    Unsupported,
}

/// There is no share sheet on desktop targets. Callers report the error and
/// do not fall back to a download.
pub fn share_png(preset: Preset, _png: &[u8]) -> Result<(), ShareError> {
    tracing::warn!("Share requested for {preset} code, no share target available");
    Err(ShareError::Unsupported)
}
