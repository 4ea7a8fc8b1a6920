//! Configuration for the chat subsystem.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chat::core::errors::{ChatError, ChatResult};

/// Environment variable overriding the `SQLite` path.
pub const ENV_DB_PATH: &str = "CHATROOM_DB_PATH";
/// Environment variable overriding the minimum reply delay.
pub const ENV_MIN_DELAY_MS: &str = "CHATROOM_MIN_DELAY_MS";
/// Environment variable overriding the maximum reply delay.
pub const ENV_MAX_DELAY_MS: &str = "CHATROOM_MAX_DELAY_MS";
/// Environment variable overriding the message page size.
pub const ENV_PAGE_SIZE: &str = "CHATROOM_PAGE_SIZE";

/// Top-level configuration for the chat application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Key-value storage settings.
    pub storage: StorageConfig,
    /// Simulated responder settings.
    pub responder: ResponderConfig,
    /// Message paging settings.
    pub pagination: PaginationConfig,
    /// Room input limits.
    pub rooms: RoomConfig,
}

impl ChatConfig {
    /// Build a config from defaults plus process environment overrides.
    ///
    /// # Errors
    /// Returns an error if an override is not a valid number.
    pub fn from_env() -> ChatResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from defaults plus overrides served by `lookup`.
    ///
    /// # Errors
    /// Returns an error if an override is not a valid number.
    pub fn from_lookup<F>(lookup: F) -> ChatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH) {
            config.storage.sqlite_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_MIN_DELAY_MS) {
            config.responder.min_delay_ms = parse_number(ENV_MIN_DELAY_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_DELAY_MS) {
            config.responder.max_delay_ms = parse_number(ENV_MAX_DELAY_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            config.pagination.page_size = parse_number(ENV_PAGE_SIZE, &raw)?;
        }

        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        validate_table_name(&self.storage.table)?;

        for (name, key) in [
            ("chat_key", &self.storage.chat_key),
            ("session_key", &self.storage.session_key),
            ("theme_key", &self.storage.theme_key),
        ] {
            if key.is_empty() {
                return Err(ChatError::InvalidConfig(format!(
                    "storage.{name} must not be empty"
                )));
            }
        }

        if self.responder.min_delay_ms > self.responder.max_delay_ms {
            return Err(ChatError::InvalidConfig(
                "responder.min_delay_ms must be <= responder.max_delay_ms".to_string(),
            ));
        }

        if self.pagination.page_size == 0 {
            return Err(ChatError::InvalidConfig(
                "pagination.page_size must be > 0".to_string(),
            ));
        }

        if self.rooms.max_title_chars == 0 {
            return Err(ChatError::InvalidConfig(
                "rooms.max_title_chars must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Check that `table` is safe to splice into SQL as an identifier.
///
/// # Errors
/// Returns an error unless `table` is non-empty `[A-Za-z0-9_]`.
pub fn validate_table_name(table: &str) -> ChatResult<()> {
    if table.is_empty() {
        return Err(ChatError::InvalidConfig(
            "storage.table must not be empty".to_string(),
        ));
    }

    if !table
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err(ChatError::InvalidConfig(format!(
            "storage.table contains invalid characters: {table:?}"
        )));
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> ChatResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| ChatError::InvalidConfig(format!("{key} is not a valid number: {raw:?}")))
}

/// Storage configuration for persisted slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` database path.
    pub sqlite_path: PathBuf,
    /// Key-value table name.
    pub table: String,
    /// Slot holding rooms and messages.
    pub chat_key: String,
    /// Slot holding the authenticated user.
    pub session_key: String,
    /// Slot holding the dark-mode flag.
    pub theme_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("chatroom.sqlite"),
            table: "kv_slots".to_string(),
            chat_key: "chat-storage".to_string(),
            session_key: "auth-user".to_string(),
            theme_key: "theme-isDark".to_string(),
        }
    }
}

/// Simulated responder settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Lower bound of the artificial reply delay.
    pub min_delay_ms: u64,
    /// Upper bound (inclusive) of the artificial reply delay.
    pub max_delay_ms: u64,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
        }
    }
}

/// Message paging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Messages revealed per page.
    pub page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

/// Limits applied when creating rooms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Maximum title length in characters.
    pub max_title_chars: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_title_chars: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChatConfig::default();
        config.validate().unwrap();
        assert_eq!(config.storage.chat_key, "chat-storage");
        assert_eq!(config.responder.min_delay_ms, 1000);
        assert_eq!(config.responder.max_delay_ms, 3000);
        assert_eq!(config.pagination.page_size, 20);
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DB_PATH, "/tmp/chat.sqlite"),
            (ENV_MIN_DELAY_MS, "10"),
            (ENV_MAX_DELAY_MS, " 20 "),
            (ENV_PAGE_SIZE, "5"),
        ]
        .into_iter()
        .collect();

        let config =
            ChatConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
        assert_eq!(config.storage.sqlite_path, PathBuf::from("/tmp/chat.sqlite"));
        assert_eq!(config.responder.min_delay_ms, 10);
        assert_eq!(config.responder.max_delay_ms, 20);
        assert_eq!(config.pagination.page_size, 5);
    }

    #[test]
    fn test_lookup_rejects_bad_numbers() {
        let result = ChatConfig::from_lookup(|key| {
            (key == ENV_PAGE_SIZE).then(|| "twenty".to_string())
        });
        assert!(matches!(result, Err(ChatError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_delays() {
        let mut config = ChatConfig::default();
        config.responder.min_delay_ms = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = ChatConfig::default();
        config.pagination.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unsafe_table_name() {
        let mut config = ChatConfig::default();
        config.storage.table = "slots; DROP TABLE x".to_string();
        assert!(config.validate().is_err());

        config.storage.table = "   ".to_string();
        assert!(config.validate().is_err());
        assert!(validate_table_name("kv_slots_2").is_ok());
    }
}
