mod capture;
mod decode;
mod error;
mod file;
mod source;

pub use capture::{
    CameraProvider, CameraStream, CaptureController, CaptureSession, CaptureState, FrameRead,
    Sample, TickOutcome,
};
pub use decode::{RqrrDecoder, frame_from_image};
pub use error::{CaptureError, ScanError};
pub use file::{scan_bytes, scan_file, scan_frame};
pub use source::FrameDirProvider;
#[cfg(feature = "screen")]
pub use source::ScreenProvider;
