//! Message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::core::ids::{MessageId, RoomId};
use crate::chat::core::timestamp;

/// Content recorded for a message that only carries an image.
pub const SHARED_IMAGE_CONTENT: &str = "Shared an image";

/// One turn in a room's conversation.
///
/// Messages are append-only; they disappear only when their room is deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier.
    pub id: MessageId,
    /// Text content.
    pub content: String,
    /// Whether the end user wrote it.
    pub is_user: bool,
    /// Creation timestamp.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Inline-encoded image payload (typically a data URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Owning room.
    pub chat_room_id: RoomId,
}

impl Message {
    /// Build a user-authored message stamped now.
    #[must_use]
    pub fn user(room_id: RoomId, content: impl Into<String>) -> Self {
        Self::build(room_id, content.into(), true)
    }

    /// Build a counterpart reply stamped now.
    #[must_use]
    pub fn reply(room_id: RoomId, content: impl Into<String>) -> Self {
        Self::build(room_id, content.into(), false)
    }

    /// Build a user message that shares an image.
    #[must_use]
    pub fn image(room_id: RoomId, image: impl Into<String>) -> Self {
        Self::user(room_id, SHARED_IMAGE_CONTENT).with_image(image)
    }

    fn build(room_id: RoomId, content: String, is_user: bool) -> Self {
        Self {
            id: MessageId::generate(),
            content,
            is_user,
            timestamp: timestamp::now_millis(),
            image: None,
            chat_room_id: room_id,
        }
    }

    /// Override the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<MessageId>) -> Self {
        self.id = id.into();
        self
    }

    /// Override the timestamp.
    #[must_use]
    pub const fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach an image payload.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Whether an image is attached.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
