//! Authoritative chat state: rooms, messages and the current selection.
//!
//! `ChatStore` is the only mutator of rooms and messages. Each mutating
//! operation writes the whole `{chatRooms, messages}` snapshot to the chat
//! slot before returning. Selection, typing flag and search query are
//! session-only and never persisted. Every operation bumps a revision
//! counter that views can watch through [`ChatStore::subscribe`].

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tracing::debug;

use crate::chat::core::config::PaginationConfig;
use crate::chat::core::ids::RoomId;
use crate::chat::core::message::Message;
use crate::chat::core::room::ChatRoom;
use crate::chat::state::demo::demo_snapshot;
use crate::chat::state::views::{MessagePage, paginate};
use crate::chat::storage::codec::ChatSnapshot;
use crate::chat::storage::persistence::ChatPersistence;

/// Chat store shared between the app and pending reply tasks.
pub type SharedChatStore = Arc<Mutex<ChatStore>>;

/// In-memory chat state backed by a persisted slot.
pub struct ChatStore {
    persistence: ChatPersistence,
    chat_rooms: Vec<ChatRoom>,
    messages: Vec<Message>,
    current_room: Option<RoomId>,
    is_typing: bool,
    search_query: String,
    page_size: usize,
    revision: watch::Sender<u64>,
}

impl ChatStore {
    /// Restore state from `persistence`, seeding demo data if no room is stored.
    ///
    /// Seeded data is written back only by the first mutation.
    #[must_use]
    pub fn open(persistence: ChatPersistence, pagination: &PaginationConfig) -> Self {
        let mut snapshot = persistence.load();
        if snapshot.chat_rooms.is_empty() {
            debug!(
                orphaned_messages = snapshot.messages.len(),
                "No persisted rooms, seeding demo data"
            );
            snapshot = demo_snapshot(Utc::now());
        }

        let (revision, _) = watch::channel(0);
        Self {
            persistence,
            chat_rooms: snapshot.chat_rooms,
            messages: snapshot.messages,
            current_room: None,
            is_typing: false,
            search_query: String::new(),
            page_size: pagination.page_size.max(1),
            revision,
        }
    }

    /// Wrap into the shared handle used by the app.
    #[must_use]
    pub fn into_shared(self) -> SharedChatStore {
        Arc::new(Mutex::new(self))
    }

    /// Watch the revision counter; it changes after every operation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    // ===== Mutations ========================================================

    /// Insert `room` at the front of the room list.
    ///
    /// Ids are not checked for duplicates; callers generate fresh ones.
    pub fn add_room(&mut self, room: ChatRoom) {
        debug!(room = %room.id, title = %room.title, "Adding chat room");
        self.chat_rooms.insert(0, room);
        self.persist();
    }

    /// Remove a room, its messages and any selection pointing at it.
    ///
    /// Unknown ids leave rooms and messages untouched.
    pub fn delete_room(&mut self, id: &RoomId) {
        let rooms_before = self.chat_rooms.len();
        let messages_before = self.messages.len();

        self.chat_rooms.retain(|room| &room.id != id);
        self.messages.retain(|message| &message.chat_room_id != id);
        if self.current_room.as_ref() == Some(id) {
            self.current_room = None;
        }

        debug!(
            room = %id,
            rooms_removed = rooms_before - self.chat_rooms.len(),
            messages_removed = messages_before - self.messages.len(),
            "Deleted chat room"
        );
        self.persist();
    }

    /// Append `message` and refresh its room's preview.
    ///
    /// Messages for unknown rooms are kept; no room preview changes.
    pub fn append_message(&mut self, message: Message) {
        let known_room = self
            .chat_rooms
            .iter_mut()
            .find(|room| room.id == message.chat_room_id)
            .map(|room| room.record_message(&message))
            .is_some();
        if !known_room {
            debug!(
                room = %message.chat_room_id,
                message = %message.id,
                "Appending message for unknown room"
            );
        }

        self.messages.push(message);
        self.persist();
    }

    /// Select a room, or clear the selection.
    pub fn set_current_room(&mut self, id: Option<RoomId>) {
        self.current_room = id;
        self.bump();
    }

    /// Set the "counterpart is typing" flag.
    pub fn set_typing(&mut self, typing: bool) {
        if self.is_typing != typing {
            self.is_typing = typing;
            self.bump();
        }
    }

    /// Set the dashboard search query.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.bump();
    }

    // ===== Queries ==========================================================

    /// All rooms, newest first.
    #[must_use]
    pub fn rooms(&self) -> &[ChatRoom] {
        &self.chat_rooms
    }

    /// All messages in append order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of rooms.
    #[must_use]
    pub const fn room_count(&self) -> usize {
        self.chat_rooms.len()
    }

    /// Look up a room.
    #[must_use]
    pub fn room(&self, id: &RoomId) -> Option<&ChatRoom> {
        self.chat_rooms.iter().find(|room| &room.id == id)
    }

    /// Selected room id.
    #[must_use]
    pub const fn current_room_id(&self) -> Option<&RoomId> {
        self.current_room.as_ref()
    }

    /// Selected room, if it still exists.
    #[must_use]
    pub fn current_room(&self) -> Option<&ChatRoom> {
        self.current_room.as_ref().and_then(|id| self.room(id))
    }

    /// Whether a reply is being produced.
    #[must_use]
    pub const fn is_typing(&self) -> bool {
        self.is_typing
    }

    /// Dashboard search query.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Rooms whose title contains `query`, ignoring case, in store order.
    #[must_use]
    pub fn filtered_rooms(&self, query: &str) -> Vec<&ChatRoom> {
        self.chat_rooms
            .iter()
            .filter(|room| room.title_matches(query))
            .collect()
    }

    /// Rooms matching the store's own search query.
    #[must_use]
    pub fn visible_rooms(&self) -> Vec<&ChatRoom> {
        self.filtered_rooms(&self.search_query)
    }

    /// A room's messages sorted by timestamp, ties in append order.
    #[must_use]
    pub fn room_messages(&self, id: &RoomId) -> Vec<&Message> {
        let mut messages: Vec<&Message> = self
            .messages
            .iter()
            .filter(|message| &message.chat_room_id == id)
            .collect();
        messages.sort_by_key(|message| message.timestamp);
        messages
    }

    /// The first `page` pages of a room's sorted messages.
    #[must_use]
    pub fn message_page(&self, id: &RoomId, page: usize) -> MessagePage<'_> {
        paginate(self.room_messages(id), page, self.page_size)
    }

    /// Copy of the persisted part of the state.
    #[must_use]
    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            chat_rooms: self.chat_rooms.clone(),
            messages: self.messages.clone(),
        }
    }

    fn persist(&self) {
        self.persistence.save(&self.snapshot());
        self.bump();
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}
