use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use image::{GrayImage, Luma};
use kanal::{AsyncReceiver, AsyncSender};
use qrcode::QrCode;
use qrpro_config::Config;
use qrpro_core::{JsonFileStore, KeyValueStore};
use qrpro_io::MemoryClipboard;
use qrpro_scan::FrameDirProvider;
use qrpro_types::AppEvent;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::events::event_loop;
use crate::state::AppState;

mod scan_tests;

const WAIT: Duration = Duration::from_secs(5);

/// An event loop over temp storage, a frame-folder camera and an in-memory clipboard
pub struct Harness {
    pub state: Arc<AppState>,
    pub store: Arc<dyn KeyValueStore>,
    pub clipboard: Arc<MemoryClipboard>,
    pub camera: Arc<FrameDirProvider>,
    pub dir: TempDir,
    tx: AsyncSender<AppEvent>,
    rx: AsyncReceiver<AppEvent>,
    _cancel: DropGuard,
    _task: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("storage.json")).unwrap();
        Self::with_store(dir, Arc::new(store))
    }

    pub fn with_store(dir: TempDir, store: Arc<dyn KeyValueStore>) -> Self {
        let mut config = Config::default();
        config.capture.tick_ms = 5;
        config.ui.export_dir = dir.path().join("exports").display().to_string();
        config.render.terminal_preview = false;

        let camera = Arc::new(FrameDirProvider::new(dir.path().join("frames"), 1));
        let clipboard = Arc::new(MemoryClipboard::new());
        let state = Arc::new(AppState::new(
            config,
            store.clone(),
            camera.clone(),
            clipboard.clone(),
        ));

        let (ui_to_app_tx, ui_to_app_rx) = kanal::bounded_async(64);
        let (app_to_ui_tx, app_to_ui_rx) = kanal::bounded_async(256);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(event_loop(
            state.clone(),
            ui_to_app_rx,
            ui_to_app_tx.clone(),
            app_to_ui_tx,
            cancel.clone(),
        ));

        Self {
            state,
            store,
            clipboard,
            camera,
            dir,
            tx: ui_to_app_tx,
            rx: app_to_ui_rx,
            _cancel: cancel.drop_guard(),
            _task: task,
        }
    }

    pub fn frames_dir(&self) -> std::path::PathBuf {
        let frames = self.dir.path().join("frames");
        std::fs::create_dir_all(&frames).unwrap();
        frames
    }

    pub fn export_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("exports")
    }

    pub async fn send(&self, event: AppEvent) {
        self.tx.send(event).await.unwrap();
    }

    /// Everything emitted up to the `count`-th completion
    pub async fn collect(&self, count: usize) -> Vec<AppEvent> {
        let mut events = Vec::new();
        let mut completed = 0;
        while completed < count {
            let event = timeout(WAIT, self.rx.recv())
                .await
                .expect("timed out waiting for completion")
                .unwrap();
            if matches!(event, AppEvent::OperationComplete) {
                completed += 1;
            } else {
                events.push(event);
            }
        }
        events
    }

    pub async fn request(&self, event: AppEvent) -> Vec<AppEvent> {
        self.send(event).await;
        self.collect(1).await
    }
}

pub fn alerts(events: &[AppEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Alert(message) => Some(message.as_str()),
            _ => None,
        })
        .collect()
}

pub fn notices(events: &[AppEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Notify(message) => Some(message.as_str()),
            _ => None,
        })
        .collect()
}

pub fn write_qr_png(path: &Path, payload: &str) {
    let code = QrCode::new(payload.as_bytes()).unwrap();
    let modules = code.width() as u32;
    let (scale, quiet) = (6, 4);
    let size = (modules + 2 * quiet) * scale;

    let mut image = GrayImage::from_pixel(size, size, Luma([255]));
    for (i, color) in code.to_colors().iter().enumerate() {
        if matches!(color, qrcode::Color::Dark) {
            let (x, y) = (i as u32 % modules + quiet, i as u32 / modules + quiet);
            for dy in 0..scale {
                for dx in 0..scale {
                    image.put_pixel(x * scale + dx, y * scale + dy, Luma([0]));
                }
            }
        }
    }
    image.save(path).unwrap();
}

pub fn write_blank_png(path: &Path) {
    GrayImage::from_pixel(120, 120, Luma([255])).save(path).unwrap();
}
