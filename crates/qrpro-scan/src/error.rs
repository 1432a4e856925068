#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("Camera access denied: {0}")]
    Denied(String),

    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Camera is already in use")]
    Busy,

    #[error("Frame read failed: {0}")]
    Frame(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("No QR code found in image")]
    NotFound,

    #[error("Not an image: {0}")]
    NotAnImage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
