use qrpro_types::{Preset, Theme};

use crate::codec::RenderedCode;
use crate::router::ViewRouter;

/// The last code shown in the generator
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub preset: Preset,
    pub payload: String,
    pub code: RenderedCode,
}

/// View state owned by the event loop
#[derive(Debug, Default)]
pub struct UiState {
    pub theme: Theme,
    pub router: ViewRouter,
    pub last_code: Option<GeneratedCode>,
    pub last_result: Option<String>,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }
}
