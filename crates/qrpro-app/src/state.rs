use std::path::PathBuf;
use std::sync::Arc;

use qrpro_config::Config;
use qrpro_config::capture::CaptureSource;
use qrpro_core::theme::ThemeStore;
use qrpro_core::{Decoder, Encoder, HistoryStore, KeyValueStore};
use qrpro_io::ClipboardProvider;
use qrpro_render::QrEncoder;
use qrpro_scan::{CameraProvider, FrameDirProvider, RqrrDecoder};
use tokio::sync::RwLock;

/// Long-lived collaborators shared by the event loop
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub history: HistoryStore,
    pub themes: ThemeStore,
    pub encoder: Arc<dyn Encoder>,
    pub decoder: Arc<dyn Decoder>,
    pub clipboard: Arc<dyn ClipboardProvider>,
    pub camera: Arc<dyn CameraProvider>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        camera: Arc<dyn CameraProvider>,
        clipboard: Arc<dyn ClipboardProvider>,
    ) -> Self {
        let history = HistoryStore::with_limit(store.clone(), config.history.limit);

        Self {
            config: Arc::new(RwLock::new(config)),
            history,
            themes: ThemeStore::new(store),
            encoder: Arc::new(QrEncoder::new()),
            decoder: Arc::new(RqrrDecoder::new()),
            clipboard,
            camera,
        }
    }
}

/// Build the frame source selected in the config
pub fn camera_from_config(
    config: &Config,
    data_dir: PathBuf,
) -> anyhow::Result<Arc<dyn CameraProvider>> {
    let capture = &config.capture;
    match capture.source {
        CaptureSource::Frames => {
            let dir = capture
                .frames_dir
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("frames"));
            tracing::debug!("Camera frames from {}", dir.display());
            Ok(Arc::new(FrameDirProvider::new(dir, capture.warmup_frames)))
        }
        #[cfg(feature = "screen")]
        CaptureSource::Screen => Ok(Arc::new(qrpro_scan::ScreenProvider::new())),
        #[cfg(not(feature = "screen"))]
        CaptureSource::Screen => {
            anyhow::bail!("qrpro was built without the `screen` feature")
        }
    }
}
