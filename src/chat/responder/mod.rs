//! Simulated counterpart replies.

pub mod generator;
pub mod scheduler;

pub use generator::{
    CANNED_RESPONSES, CannedResponder, ReplyRequest, ResponseFuture, ResponseGenerator,
    with_image_clause,
};
pub use scheduler::{ReplyScheduler, ReplyTicket};
