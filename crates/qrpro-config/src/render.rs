use qrpro_types::EcLevel;
use serde::{Deserialize, Serialize};

fn default_size() -> u32 {
    280
}

fn default_light() -> ThemeColors {
    ThemeColors {
        foreground: "#000000".to_string(),
        background: "#ffffff".to_string(),
    }
}

fn default_dark() -> ThemeColors {
    ThemeColors {
        foreground: "#ffffff".to_string(),
        background: "#1e293b".to_string(),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ThemeColors {
    pub foreground: String,
    pub background: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RenderConfig {
    /// Width and height of the rendered code in pixels
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_light")]
    pub light: ThemeColors,
    #[serde(default = "default_dark")]
    pub dark: ThemeColors,
    #[serde(default)]
    pub ec_level: EcLevel,
    /// Print the code to the terminal after generating
    pub terminal_preview: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            light: default_light(),
            dark: default_dark(),
            ec_level: EcLevel::H,
            terminal_preview: true,
        }
    }
}
