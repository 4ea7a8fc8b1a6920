//! Chat room model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::core::ids::RoomId;
use crate::chat::core::message::Message;
use crate::chat::core::timestamp;

/// A named conversation thread.
///
/// `last_message` and `last_message_time` cache the most recent message
/// appended through the store; they are a preview, not the source of truth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    /// Unique identifier.
    pub id: RoomId,
    /// Display title.
    pub title: String,
    /// Preview of the latest message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    /// Timestamp of the latest message.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub last_message_time: Option<DateTime<Utc>>,
    /// Creation timestamp.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ChatRoom {
    /// Build a room with no messages yet.
    #[must_use]
    pub fn new(id: RoomId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            last_message: None,
            last_message_time: None,
            created_at,
        }
    }

    /// Build a room with a fresh random id, created now.
    #[must_use]
    pub fn create(title: impl Into<String>) -> Self {
        Self::new(RoomId::generate(), title, timestamp::now_millis())
    }

    /// Refresh the cached preview from `message`.
    pub fn record_message(&mut self, message: &Message) {
        self.last_message = Some(message.content.clone());
        self.last_message_time = Some(message.timestamp);
    }

    /// Case-insensitive substring match against the title.
    #[must_use]
    pub fn title_matches(&self, query: &str) -> bool {
        query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase())
    }
}
