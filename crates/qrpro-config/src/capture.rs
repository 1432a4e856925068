use qrpro_types::FacingMode;
use serde::{Deserialize, Serialize};

fn default_tick_ms() -> u64 {
    16
}

/// Where live frames come from
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    /// Image files replayed from `frames_dir`
    #[default]
    Frames,
    /// Primary monitor
    Screen,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CaptureConfig {
    /// Polling interval between frame samples
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    pub facing: FacingMode,
    pub source: CaptureSource,
    pub frames_dir: Option<String>,
    /// Reads reported as not ready after the stream opens
    pub warmup_frames: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            facing: FacingMode::Environment,
            source: CaptureSource::Frames,
            frames_dir: None,
            warmup_frames: 0,
        }
    }
}
