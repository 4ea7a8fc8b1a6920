//! Persistent storage for chat state.

pub mod codec;
pub mod kv;
pub mod persistence;

pub use codec::ChatSnapshot;
pub use kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use persistence::ChatPersistence;
