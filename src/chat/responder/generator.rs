//! Reply generation behind a swappable trait.
//!
//! [`CannedResponder`] stands in for a real model: it picks one of a fixed
//! set of replies at random. A networked client implements the same trait.

use std::future::Future;
use std::pin::Pin;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::chat::core::errors::{ChatError, ChatResult};
use crate::chat::core::ids::RoomId;

/// Boxed future type for generator operations.
pub type ResponseFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Replies used when no custom list is given.
pub const CANNED_RESPONSES: [&str; 8] = [
    "That's an interesting perspective! Let me help you explore this further.",
    "I understand what you're asking. Here's my take on this topic.",
    "Great question! This touches on several important concepts.",
    "I appreciate you sharing that with me. Let me provide some insights.",
    "This is a fascinating subject. There are multiple angles to consider here.",
    "Thank you for the details. I can help you think through this systematically.",
    "That's a complex topic that deserves a thoughtful response.",
    "I see what you're getting at. Let me break this down for you.",
];

const IMAGE_PREFIX: &str = "I can see the image you've shared. ";
const IMAGE_SUFFIX: &str =
    " Based on what I observe in the image, there are several interesting elements to discuss.";

/// What a reply is produced for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyRequest {
    /// Room the reply lands in.
    pub room_id: RoomId,
    /// The user's message text.
    pub prompt: String,
    /// Image payload the user attached, if any.
    pub image: Option<String>,
}

impl ReplyRequest {
    /// Request a reply to a text message.
    #[must_use]
    pub fn text(room_id: RoomId, prompt: impl Into<String>) -> Self {
        Self {
            room_id,
            prompt: prompt.into(),
            image: None,
        }
    }

    /// Attach the image the user shared.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Trait abstraction over reply sources.
pub trait ResponseGenerator: Send + Sync {
    /// Produce the reply text for `request`.
    ///
    /// # Errors
    /// Returns an error if no reply can be produced.
    fn generate(&self, request: &ReplyRequest) -> ResponseFuture<'_, ChatResult<String>>;
}

/// Random pick from a fixed reply list.
#[derive(Clone, Debug)]
pub struct CannedResponder {
    responses: Vec<String>,
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self {
            responses: CANNED_RESPONSES.into_iter().map(String::from).collect(),
        }
    }
}

impl CannedResponder {
    /// Use the built-in replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom reply list.
    ///
    /// # Errors
    /// Returns an error if `responses` is empty.
    pub fn with_responses(responses: Vec<String>) -> ChatResult<Self> {
        if responses.is_empty() {
            return Err(ChatError::InvalidConfig(
                "canned responder needs at least one response".to_string(),
            ));
        }
        Ok(Self { responses })
    }

    /// Pick a reply for `request` using `rng`.
    #[must_use]
    pub fn pick<R: Rng + ?Sized>(&self, request: &ReplyRequest, rng: &mut R) -> String {
        let base = self
            .responses
            .choose(rng)
            .map_or(CANNED_RESPONSES[0], String::as_str);

        if request.image.is_some() {
            with_image_clause(base)
        } else {
            base.to_string()
        }
    }
}

impl ResponseGenerator for CannedResponder {
    fn generate(&self, request: &ReplyRequest) -> ResponseFuture<'_, ChatResult<String>> {
        // Pick before boxing: the thread-local RNG must not cross an await.
        let reply = self.pick(request, &mut rand::thread_rng());
        Box::pin(async move { Ok(reply) })
    }
}

/// Wrap a reply with the image acknowledgement.
#[must_use]
pub fn with_image_clause(base: &str) -> String {
    format!("{IMAGE_PREFIX}{base}{IMAGE_SUFFIX}")
}
