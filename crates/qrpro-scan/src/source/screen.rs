use qrpro_types::{FacingMode, Frame};
use xcap::Monitor;

use crate::capture::{CameraProvider, CameraStream, FrameRead};
use crate::error::CaptureError;

/// Treats the primary monitor as a camera
#[derive(Debug, Default)]
pub struct ScreenProvider;

impl ScreenProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CameraProvider for ScreenProvider {
    fn acquire(&self, _facing: FacingMode) -> Result<Box<dyn CameraStream>, CaptureError> {
        let monitors =
            Monitor::all().map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;
        let monitor = monitors
            .into_iter()
            .next()
            .ok_or_else(|| CaptureError::DeviceUnavailable("No monitor found".to_string()))?;

        Ok(Box::new(ScreenStream {
            monitor: Some(monitor),
        }))
    }
}

struct ScreenStream {
    monitor: Option<Monitor>,
}

impl CameraStream for ScreenStream {
    fn read_frame(&mut self) -> Result<FrameRead, CaptureError> {
        let monitor = self
            .monitor
            .as_ref()
            .ok_or_else(|| CaptureError::Frame("stream stopped".to_string()))?;

        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::Frame(format!("Failed to capture screen: {e}")))?;

        let (width, height) = (image.width(), image.height());
        Ok(FrameRead::Ready(Frame::new(image.into_raw(), width, height)))
    }

    fn stop(&mut self) {
        self.monitor = None;
    }
}
