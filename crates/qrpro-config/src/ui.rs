use qrpro_types::Theme;
use serde::{Deserialize, Serialize};

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_truncate() -> usize {
    100
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiConfig {
    /// Used when no theme has been stored yet
    pub default_theme: Theme,
    /// Where downloaded codes are written
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// History entries longer than this are cut with `...`
    #[serde(default = "default_truncate")]
    pub history_truncate: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_theme: Theme::Light,
            export_dir: default_export_dir(),
            history_truncate: default_truncate(),
        }
    }
}
