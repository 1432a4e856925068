use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use qrpro_types::FacingMode;

use crate::capture::{CameraProvider, CameraStream, FrameRead};
use crate::decode::frame_from_image;
use crate::error::CaptureError;

const FRAME_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Replays the images of a directory, in name order, as a looping feed
pub struct FrameDirProvider {
    dir: PathBuf,
    warmup_frames: u32,
    in_use: Arc<AtomicBool>,
}

impl FrameDirProvider {
    pub fn new(dir: impl Into<PathBuf>, warmup_frames: u32) -> Self {
        Self {
            dir: dir.into(),
            warmup_frames,
            in_use: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a stream from this provider is currently open
    pub fn in_use(&self) -> bool {
        self.in_use.load(Ordering::SeqCst)
    }

    fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, CaptureError> {
        let entries = fs::read_dir(dir).map_err(|e| {
            CaptureError::DeviceUnavailable(format!("{}: {e}", dir.display()))
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(CaptureError::DeviceUnavailable(format!(
                "no frames in {}",
                dir.display()
            )));
        }
        Ok(files)
    }
}

impl CameraProvider for FrameDirProvider {
    fn acquire(&self, facing: FacingMode) -> Result<Box<dyn CameraStream>, CaptureError> {
        if self.in_use.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::Busy);
        }

        let files = match Self::list_frames(&self.dir) {
            Ok(files) => files,
            Err(e) => {
                self.in_use.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        tracing::debug!(
            "Opened frame feed {} ({} frames, facing {:?} ignored)",
            self.dir.display(),
            files.len(),
            facing
        );

        Ok(Box::new(FrameDirStream {
            files,
            next: 0,
            warmup: self.warmup_frames,
            in_use: self.in_use.clone(),
            stopped: false,
        }))
    }
}

struct FrameDirStream {
    files: Vec<PathBuf>,
    next: usize,
    warmup: u32,
    in_use: Arc<AtomicBool>,
    stopped: bool,
}

impl CameraStream for FrameDirStream {
    fn read_frame(&mut self) -> Result<FrameRead, CaptureError> {
        if self.stopped {
            return Err(CaptureError::Frame("stream stopped".to_string()));
        }
        if self.warmup > 0 {
            self.warmup -= 1;
            return Ok(FrameRead::Pending);
        }

        let path = &self.files[self.next % self.files.len()];
        self.next += 1;

        let image = image::open(path)
            .map_err(|e| CaptureError::Frame(format!("{}: {e}", path.display())))?;
        Ok(FrameRead::Ready(frame_from_image(image)))
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.in_use.store(false, Ordering::SeqCst);
        }
    }
}

impl Drop for FrameDirStream {
    fn drop(&mut self) {
        self.stop();
    }
}
