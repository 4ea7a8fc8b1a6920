//! Core chat types and identifiers.

pub mod config;
pub mod errors;
pub mod ids;
pub mod message;
pub mod room;
pub mod timestamp;
pub mod user;

pub use config::{ChatConfig, PaginationConfig, ResponderConfig, RoomConfig, StorageConfig};
pub use errors::{ChatError, ChatResult};
pub use ids::{MessageId, RoomId, UserId};
pub use message::{Message, SHARED_IMAGE_CONTENT};
pub use room::ChatRoom;
pub use timestamp::Tagged;
pub use user::User;
