//! Delayed replies with per-room cancellation.
//!
//! Each scheduled reply is a tokio task that sleeps for a random delay,
//! asks the generator for text, then appends one counterpart message.
//! At most one reply is pending per room: scheduling again, or calling
//! [`ReplyScheduler::cancel`], aborts the earlier task. A task only writes
//! if it still holds the newest ticket for its room, which also covers a
//! task already running on another worker when its abort is requested.
//!
//! The store's typing flag is true exactly while some reply is pending.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::chat::core::config::ResponderConfig;
use crate::chat::core::errors::{ChatError, ChatResult};
use crate::chat::core::ids::RoomId;
use crate::chat::core::message::Message;
use crate::chat::responder::generator::{ReplyRequest, ResponseGenerator};
use crate::chat::state::chat_store::{ChatStore, SharedChatStore};

/// Handle to a scheduled reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplyTicket(u64);

impl ReplyTicket {
    /// Sequence number, increasing per scheduler.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

struct PendingReply {
    ticket: ReplyTicket,
    handle: JoinHandle<()>,
}

/// Schedules simulated replies against a shared chat store.
pub struct ReplyScheduler {
    store: SharedChatStore,
    generator: Arc<dyn ResponseGenerator>,
    config: ResponderConfig,
    pending: Arc<DashMap<RoomId, PendingReply>>,
    next_ticket: AtomicU64,
}

impl ReplyScheduler {
    /// Create a scheduler writing into `store`.
    ///
    /// # Errors
    /// Returns an error if the delay range in `config` is inverted.
    pub fn new(
        store: SharedChatStore,
        generator: Arc<dyn ResponseGenerator>,
        config: ResponderConfig,
    ) -> ChatResult<Self> {
        if config.min_delay_ms > config.max_delay_ms {
            return Err(ChatError::InvalidConfig(format!(
                "reply delay range is inverted: {}..={} ms",
                config.min_delay_ms, config.max_delay_ms
            )));
        }

        Ok(Self {
            store,
            generator,
            config,
            pending: Arc::new(DashMap::new()),
            next_ticket: AtomicU64::new(1),
        })
    }

    /// Schedule a reply after a random delay within the configured range.
    pub async fn schedule(&self, request: ReplyRequest) -> ReplyTicket {
        let delay = self.pick_delay();
        self.schedule_after(request, delay).await
    }

    /// Schedule a reply after exactly `delay`.
    ///
    /// Any reply still pending for the same room is cancelled first.
    pub async fn schedule_after(&self, request: ReplyRequest, delay: Duration) -> ReplyTicket {
        let ticket = ReplyTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed));
        let room_id = request.room_id.clone();

        // Held until the entry is registered so the task cannot finish first.
        let mut store = self.store.lock().await;

        self.abort_pending(&room_id);
        store.set_typing(true);

        let handle = tokio::spawn(run_reply(
            Arc::clone(&self.store),
            Arc::clone(&self.generator),
            Arc::clone(&self.pending),
            request,
            ticket,
            delay,
        ));
        self.pending.insert(room_id.clone(), PendingReply { ticket, handle });
        drop(store);

        debug!(
            room = %room_id,
            ticket = ticket.value(),
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Scheduled reply"
        );
        ticket
    }

    /// Abort the reply pending for `room_id`. Returns whether one was pending.
    pub async fn cancel(&self, room_id: &RoomId) -> bool {
        let mut store = self.store.lock().await;
        self.cancel_locked(&mut store, room_id)
    }

    /// Like [`ReplyScheduler::cancel`], for callers already holding the store lock.
    pub fn cancel_locked(&self, store: &mut ChatStore, room_id: &RoomId) -> bool {
        let cancelled = self.abort_pending(room_id);
        store.set_typing(!self.pending.is_empty());
        cancelled
    }

    /// Abort every pending reply.
    pub async fn cancel_all(&self) {
        let mut store = self.store.lock().await;
        let rooms: Vec<RoomId> = self.pending.iter().map(|entry| entry.key().clone()).collect();
        for room_id in rooms {
            self.abort_pending(&room_id);
        }
        store.set_typing(false);
    }

    /// Whether a reply is pending for `room_id`.
    #[must_use]
    pub fn is_pending(&self, room_id: &RoomId) -> bool {
        self.pending.contains_key(room_id)
    }

    /// Number of pending replies.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn abort_pending(&self, room_id: &RoomId) -> bool {
        self.pending
            .remove(room_id)
            .map(|(_, pending)| {
                pending.handle.abort();
                debug!(room = %room_id, ticket = pending.ticket.value(), "Cancelled pending reply");
            })
            .is_some()
    }

    fn pick_delay(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.config.min_delay_ms..=self.config.max_delay_ms);
        Duration::from_millis(ms)
    }
}

async fn run_reply(
    store: SharedChatStore,
    generator: Arc<dyn ResponseGenerator>,
    pending: Arc<DashMap<RoomId, PendingReply>>,
    request: ReplyRequest,
    ticket: ReplyTicket,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;

    let reply = generator.generate(&request).await;

    let mut store = store.lock().await;
    let current = pending
        .remove_if(&request.room_id, |_, entry| entry.ticket == ticket)
        .is_some();

    match reply {
        Ok(text) if current => {
            debug!(room = %request.room_id, ticket = ticket.value(), "Delivering reply");
            store.append_message(Message::reply(request.room_id, text));
        }
        Ok(_) => {
            debug!(room = %request.room_id, ticket = ticket.value(), "Dropping superseded reply");
        }
        Err(err) => {
            warn!(room = %request.room_id, %err, "Reply generation failed");
        }
    }

    store.set_typing(!pending.is_empty());
}
