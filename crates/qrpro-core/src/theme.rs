use std::sync::Arc;

use qrpro_types::Theme;

use crate::error::StoreError;
use crate::store::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Clone)]
pub struct ThemeStore {
    store: Arc<dyn KeyValueStore>,
}

impl ThemeStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored theme, or `fallback` when nothing valid is stored
    pub fn load(&self, fallback: Theme) -> Result<Theme, StoreError> {
        let theme = match self.store.get(THEME_KEY)? {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("Stored theme unreadable ({e}), using {fallback}");
                fallback
            }),
            None => fallback,
        };
        Ok(theme)
    }

    pub fn save(&self, theme: Theme) -> Result<(), StoreError> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn defaults_then_persists() {
        let themes = ThemeStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(themes.load(Theme::Light).unwrap(), Theme::Light);

        themes.save(Theme::Dark).unwrap();
        assert_eq!(themes.load(Theme::Light).unwrap(), Theme::Dark);
    }

    #[test]
    fn garbage_falls_back() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(THEME_KEY, "sepia").unwrap();
        let themes = ThemeStore::new(kv);
        assert_eq!(themes.load(Theme::Dark).unwrap(), Theme::Dark);
    }
}
