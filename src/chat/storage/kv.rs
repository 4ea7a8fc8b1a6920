//! Key-value slots backing every persisted store.
//!
//! A slot is a named text value, read and written whole. Backends:
//! - [`MemoryKeyValueStore`]: process-local map with an optional byte quota.
//! - [`SqliteKeyValueStore`]: one `SQLite` table, one row per slot.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use dashmap::DashMap;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::chat::core::config::{StorageConfig, validate_table_name};
use crate::chat::core::errors::{ChatError, ChatResult};

/// Text slot storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn get_item(&self, key: &str) -> ChatResult<Option<String>>;

    /// Write a slot, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if storage access fails or the quota is exceeded.
    fn set_item(&self, key: &str, value: &str) -> ChatResult<()>;

    /// Delete a slot. Deleting a missing slot is not an error.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn remove_item(&self, key: &str) -> ChatResult<()>;
}

/// In-memory slot storage.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: DashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    /// Create an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once keys plus values exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: DashMap::new(),
            quota_bytes: Some(bytes),
        }
    }

    /// Number of slots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no slot is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.key() != key)
            .map(|entry| entry.key().len() + entry.value().len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> ChatResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> ChatResult<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > quota {
                return Err(ChatError::Storage(format!(
                    "quota exceeded writing {key:?}: {needed} > {quota} bytes"
                )));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> ChatResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// `SQLite` slot storage.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteKeyValueStore {
    /// Table name used when none is configured.
    pub const DEFAULT_TABLE: &'static str = "kv_slots";

    /// Open (or create) the database configured in `config`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open(config: &StorageConfig) -> ChatResult<Self> {
        Self::open_path(&config.sqlite_path, &config.table)
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if `table` is not a plain identifier or the database
    /// cannot be opened.
    pub fn open_path(path: &Path, table: &str) -> ChatResult<Self> {
        validate_table_name(table)?;
        debug!(path = %path.display(), table, "Opening sqlite slot store");
        Self::with_connection(Connection::open(path)?, table)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns an error if `table` is not a plain identifier or the table
    /// cannot be created.
    pub fn open_in_memory(table: &str) -> ChatResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, table)
    }

    fn with_connection(conn: Connection, table: &str) -> ChatResult<Self> {
        validate_table_name(table)?;
        let table = table.to_string();
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )"
        ))?;

        Ok(Self {
            conn: Mutex::new(conn),
            table,
        })
    }

    fn lock(&self) -> ChatResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ChatError::Storage("sqlite connection lock poisoned".to_string()))
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get_item(&self, key: &str) -> ChatResult<Option<String>> {
        let value = self
            .lock()?
            .query_row(
                &format!("SELECT value FROM {} WHERE key = ?1", self.table),
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> ChatResult<()> {
        self.lock()?.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (key, value, updated_at) VALUES (?1, ?2, ?3)",
                self.table
            ),
            rusqlite::params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> ChatResult<()> {
        self.lock()?.execute(
            &format!("DELETE FROM {} WHERE key = ?1", self.table),
            rusqlite::params![key],
        )?;
        Ok(())
    }
}
