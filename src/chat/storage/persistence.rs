//! Load/save of the chat slot.
//!
//! Nothing here fails outward: a missing or unreadable slot loads as the
//! empty snapshot, and a failed write is logged and dropped. The in-memory
//! state stays authoritative either way.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::chat::core::errors::ChatResult;
use crate::chat::storage::codec::{self, ChatSnapshot};
use crate::chat::storage::kv::KeyValueStore;

/// The chat slot of a key-value store.
#[derive(Clone)]
pub struct ChatPersistence {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl ChatPersistence {
    /// Bind to slot `key` of `kv`.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// Slot name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the slot, falling back to the empty snapshot.
    #[must_use]
    pub fn load(&self) -> ChatSnapshot {
        let text = match self.kv.get_item(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(key = %self.key, "No persisted chat state");
                return ChatSnapshot::default();
            }
            Err(err) => {
                error!(key = %self.key, %err, "Failed to read chat state");
                return ChatSnapshot::default();
            }
        };

        codec::decode(&text)
            .inspect(|snapshot| {
                debug!(
                    key = %self.key,
                    rooms = snapshot.chat_rooms.len(),
                    messages = snapshot.messages.len(),
                    "Loaded chat state"
                );
            })
            .unwrap_or_else(|err| {
                warn!(key = %self.key, %err, "Discarding unreadable chat state");
                ChatSnapshot::default()
            })
    }

    /// Write the slot.
    ///
    /// # Errors
    /// Returns an error if encoding or the backend write fails.
    pub fn try_save(&self, snapshot: &ChatSnapshot) -> ChatResult<()> {
        let text = codec::encode(snapshot)?;
        self.kv.set_item(&self.key, &text)
    }

    /// Write the slot, logging instead of returning failures.
    pub fn save(&self, snapshot: &ChatSnapshot) {
        if let Err(err) = self.try_save(snapshot) {
            error!(key = %self.key, %err, "Failed to persist chat state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::chat::core::ids::RoomId;
    use crate::chat::core::room::ChatRoom;
    use crate::chat::core::timestamp::now_millis;
    use crate::chat::storage::kv::MemoryKeyValueStore;

    fn snapshot_with_room() -> ChatSnapshot {
        ChatSnapshot {
            chat_rooms: vec![ChatRoom::new(RoomId::new("r1"), "Test", now_millis())],
            messages: Vec::new(),
        }
    }

    #[test]
    fn test_missing_slot_loads_empty() {
        let persistence = ChatPersistence::new(Arc::new(MemoryKeyValueStore::new()), "chat");
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let persistence = ChatPersistence::new(Arc::new(MemoryKeyValueStore::new()), "chat");
        let snapshot = snapshot_with_room();

        persistence.save(&snapshot);
        assert_eq!(persistence.load(), snapshot);
    }

    #[test]
    fn test_garbage_slot_loads_empty() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set_item("chat", "{ definitely not json").unwrap();

        let persistence = ChatPersistence::new(kv, "chat");
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_failed_save_is_swallowed() {
        let kv = Arc::new(MemoryKeyValueStore::with_quota(8));
        let persistence = ChatPersistence::new(kv.clone(), "chat");

        assert!(persistence.try_save(&snapshot_with_room()).is_err());
        persistence.save(&snapshot_with_room());
        assert!(kv.is_empty());
    }
}
