use serde::{Deserialize, Serialize};

fn default_limit() -> usize {
    50
}

fn default_file_name() -> String {
    "storage.json".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct HistoryConfig {
    /// Records kept per category, at most 50
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Overrides the platform data directory
    pub data_dir: Option<String>,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            data_dir: None,
            file_name: default_file_name(),
        }
    }
}
