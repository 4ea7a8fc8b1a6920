//! Dark-mode flag, persisted as `"true"` / `"false"`.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::chat::storage::kv::KeyValueStore;

/// Theme flag store.
pub struct ThemeStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    is_dark: bool,
}

impl ThemeStore {
    /// Restore the flag from slot `key`; anything unreadable means light mode.
    #[must_use]
    pub fn open(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let is_dark = match kv.get_item(&key) {
            Ok(Some(text)) => serde_json::from_str::<bool>(&text).unwrap_or_else(|err| {
                warn!(key = %key, %err, "Discarding unreadable theme flag");
                false
            }),
            Ok(None) => false,
            Err(err) => {
                error!(key = %key, %err, "Failed to read theme flag");
                false
            }
        };

        Self { kv, key, is_dark }
    }

    /// Whether dark mode is on.
    #[must_use]
    pub const fn is_dark(&self) -> bool {
        self.is_dark
    }

    /// Flip the flag and persist it. Returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.is_dark = !self.is_dark;
        debug!(is_dark = self.is_dark, "Theme toggled");

        let text = if self.is_dark { "true" } else { "false" };
        if let Err(err) = self.kv.set_item(&self.key, text) {
            error!(key = %self.key, %err, "Failed to persist theme flag");
        }
        self.is_dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::chat::storage::kv::MemoryKeyValueStore;

    const KEY: &str = "theme-isDark";

    #[test]
    fn test_defaults_to_light() {
        let theme = ThemeStore::open(Arc::new(MemoryKeyValueStore::new()), KEY);
        assert!(!theme.is_dark());
    }

    #[test]
    fn test_toggle_persists_text_flag() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let mut theme = ThemeStore::open(kv.clone(), KEY);

        assert!(theme.toggle());
        assert_eq!(kv.get_item(KEY).unwrap().as_deref(), Some("true"));
        assert!(ThemeStore::open(kv.clone(), KEY).is_dark());

        assert!(!theme.toggle());
        assert_eq!(kv.get_item(KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_garbage_means_light() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set_item(KEY, "dark please").unwrap();
        assert!(!ThemeStore::open(kv, KEY).is_dark());
    }
}
