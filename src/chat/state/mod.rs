//! In-memory stores and derived views.

pub mod chat_store;
pub mod demo;
pub mod session;
pub mod theme;
pub mod views;

pub use chat_store::{ChatStore, SharedChatStore};
pub use demo::demo_snapshot;
pub use session::SessionStore;
pub use theme::ThemeStore;
pub use views::{MessagePage, needs_date_separator};
