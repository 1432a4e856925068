use std::sync::Mutex;

use anyhow::{Context, anyhow};
use arboard::Clipboard;
use qrpro_types::Frame;

pub trait ClipboardProvider: Send + Sync {
    fn set_text(&self, text: &str) -> anyhow::Result<()>;

    /// Current clipboard image as RGBA
    fn get_image(&self) -> anyhow::Result<Frame>;
}

/// The OS clipboard. A fresh handle is opened per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&self, text: &str) -> anyhow::Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to open clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("Failed to write clipboard")?;
        tracing::debug!("Copied {} chars to clipboard", text.chars().count());
        Ok(())
    }

    fn get_image(&self) -> anyhow::Result<Frame> {
        let mut clipboard = Clipboard::new().context("Failed to open clipboard")?;
        let image = clipboard
            .get_image()
            .context("Clipboard does not hold an image")?;

        Ok(Frame::new(
            image.bytes.into_owned(),
            image.width as u32,
            image.height as u32,
        ))
    }
}

/// In-process clipboard for headless runs
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
    image: Mutex<Option<Frame>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<String> {
        self.text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn put_image(&self, frame: Frame) {
        *self
            .image
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(frame);
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn set_text(&self, text: &str) -> anyhow::Result<()> {
        *self
            .text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());
        Ok(())
    }

    fn get_image(&self) -> anyhow::Result<Frame> {
        self.image
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or_else(|| anyhow!("Clipboard does not hold an image"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trips_text() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.text(), None);
        clipboard.set_text("WIFI:T:WPA;S:Home;P:pw123;;").unwrap();
        assert_eq!(clipboard.text().as_deref(), Some("WIFI:T:WPA;S:Home;P:pw123;;"));
    }

    #[test]
    fn empty_memory_clipboard_has_no_image() {
        let clipboard = MemoryClipboard::new();
        assert!(clipboard.get_image().is_err());

        clipboard.put_image(Frame::new(vec![0; 4], 1, 1));
        assert_eq!(clipboard.get_image().unwrap().width, 1);
    }
}
