//! Chat subsystem.
//!
//! - `core`: configuration, errors, ids, timestamps and the domain types
//! - `storage`: key-value slots, the envelope codec and chat persistence
//! - `state`: the chat, session and theme stores plus derived views
//! - `responder`: reply generation and delayed, cancellable delivery
//! - `app`: the application object tying it all together

pub mod app;
pub mod core;
pub mod responder;
pub mod state;
pub mod storage;

pub use app::ChatApp;
pub use self::core::{
    ChatConfig, ChatError, ChatResult, ChatRoom, Message, MessageId, PaginationConfig,
    ResponderConfig, RoomConfig, RoomId, StorageConfig, User, UserId,
};
pub use responder::{CannedResponder, ReplyRequest, ReplyScheduler, ResponseGenerator};
pub use state::{ChatStore, MessagePage, SessionStore, SharedChatStore, ThemeStore};
pub use storage::{
    ChatPersistence, ChatSnapshot, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore,
};
