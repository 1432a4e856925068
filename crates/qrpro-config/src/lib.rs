use std::env;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::history::HistoryConfig;
use self::render::RenderConfig;
use self::ui::UiConfig;

pub mod capture;
pub mod history;
pub mod render;
pub mod ui;

#[derive(Serialize, Deserialize, Clone, Default, Debug)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub capture: CaptureConfig,
    pub history: HistoryConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Override fields from `QRPRO_*` environment variables
    pub fn apply_env(&mut self) {
        if let Some(tick_ms) = env::var("QRPRO_TICK_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.capture.tick_ms = tick_ms;
        }

        if let Ok(dir) = env::var("QRPRO_FRAMES_DIR") {
            self.capture.frames_dir = Some(dir);
        }

        if let Ok(dir) = env::var("QRPRO_DATA_DIR") {
            self.history.data_dir = Some(dir);
        }

        if let Ok(dir) = env::var("QRPRO_EXPORT_DIR") {
            self.ui.export_dir = dir;
        }

        if let Ok(theme) = env::var("QRPRO_THEME") {
            match theme.parse() {
                Ok(theme) => self.ui.default_theme = theme,
                Err(e) => tracing::warn!("Ignoring QRPRO_THEME: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"capture": {"tick_ms": 40}}"#).unwrap();
        assert_eq!(config.capture.tick_ms, 40);
        assert_eq!(config.render.size, 280);
        assert_eq!(config.history.limit, 50);
    }

    #[test]
    fn env_overrides_loaded_profile() {
        // Only this test touches QRPRO_TICK_MS
        unsafe { env::set_var("QRPRO_TICK_MS", "33") };
        let mut config: Config =
            serde_json::from_str(r#"{"capture": {"tick_ms": 40}}"#).unwrap();
        config.apply_env();
        unsafe { env::remove_var("QRPRO_TICK_MS") };

        assert_eq!(config.capture.tick_ms, 33);
    }

    #[test]
    fn empty_json_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.render.dark.background, "#1e293b");
        assert_eq!(config.capture.tick_ms, 16);
    }
}
