//! Envelope codec for the chat slot.
//!
//! The slot holds `{"state": {"chatRooms": [...], "messages": [...]}}` with
//! every date wrapped by [`crate::chat::core::timestamp`].

use serde::{Deserialize, Serialize};

use crate::chat::core::errors::ChatResult;
use crate::chat::core::message::Message;
use crate::chat::core::room::ChatRoom;

/// The persisted part of the chat state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    /// Rooms, newest first.
    #[serde(default)]
    pub chat_rooms: Vec<ChatRoom>,
    /// Messages in append order.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl ChatSnapshot {
    /// Whether there is nothing to restore.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.chat_rooms.is_empty() && self.messages.is_empty()
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a ChatSnapshot,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    state: Option<ChatSnapshot>,
}

/// Serialize a snapshot into slot text.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn encode(snapshot: &ChatSnapshot) -> ChatResult<String> {
    Ok(serde_json::to_string(&EnvelopeRef { state: snapshot })?)
}

/// Parse slot text back into a snapshot.
///
/// A document without a `state` member decodes as the empty snapshot.
///
/// # Errors
/// Returns an error if the text is not a valid envelope.
pub fn decode(text: &str) -> ChatResult<ChatSnapshot> {
    let envelope: Envelope = serde_json::from_str(text)?;
    Ok(envelope.state.unwrap_or_default())
}
