//! Application object wiring stores, persistence and the responder.
//!
//! `ChatApp` is built once at startup and handed to whatever drives the
//! UI. It is the only place user actions enter the system: input is
//! validated here, then forwarded to the stores and the reply scheduler.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::chat::core::config::ChatConfig;
use crate::chat::core::errors::{ChatError, ChatResult};
use crate::chat::core::ids::RoomId;
use crate::chat::core::message::Message;
use crate::chat::core::room::ChatRoom;
use crate::chat::responder::generator::{CannedResponder, ReplyRequest, ResponseGenerator};
use crate::chat::responder::scheduler::ReplyScheduler;
use crate::chat::state::chat_store::{ChatStore, SharedChatStore};
use crate::chat::state::session::SessionStore;
use crate::chat::state::theme::ThemeStore;
use crate::chat::storage::kv::{KeyValueStore, SqliteKeyValueStore};
use crate::chat::storage::persistence::ChatPersistence;

/// The chat application.
pub struct ChatApp {
    config: ChatConfig,
    chat: SharedChatStore,
    session: Mutex<SessionStore>,
    theme: Mutex<ThemeStore>,
    scheduler: ReplyScheduler,
}

impl ChatApp {
    /// Build the app over `kv`, replying through `generator`.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: ChatConfig,
        kv: Arc<dyn KeyValueStore>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> ChatResult<Self> {
        config.validate()?;

        let persistence = ChatPersistence::new(Arc::clone(&kv), config.storage.chat_key.clone());
        let chat = ChatStore::open(persistence, &config.pagination).into_shared();
        let session = SessionStore::open(Arc::clone(&kv), config.storage.session_key.clone());
        let theme = ThemeStore::open(kv, config.storage.theme_key.clone());
        let scheduler =
            ReplyScheduler::new(Arc::clone(&chat), generator, config.responder.clone())?;

        Ok(Self {
            config,
            chat,
            session: Mutex::new(session),
            theme: Mutex::new(theme),
            scheduler,
        })
    }

    /// Build the app over the configured `SQLite` database with canned replies.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the database
    /// cannot be opened.
    pub fn open(config: ChatConfig) -> ChatResult<Self> {
        config.validate()?;
        let kv = Arc::new(SqliteKeyValueStore::open(&config.storage)?);
        info!(path = %config.storage.sqlite_path.display(), "Opened chat storage");
        Self::new(config, kv, Arc::new(CannedResponder::new()))
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Shared chat store.
    #[must_use]
    pub fn chat(&self) -> SharedChatStore {
        Arc::clone(&self.chat)
    }

    /// Session store.
    #[must_use]
    pub const fn session(&self) -> &Mutex<SessionStore> {
        &self.session
    }

    /// Theme store.
    #[must_use]
    pub const fn theme(&self) -> &Mutex<ThemeStore> {
        &self.theme
    }

    /// Reply scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &ReplyScheduler {
        &self.scheduler
    }

    /// Create a room from a user-supplied title.
    ///
    /// # Errors
    /// Returns an error if the trimmed title is empty or too long.
    pub async fn create_room(&self, title: &str) -> ChatResult<ChatRoom> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ChatError::InvalidRoom("title is required".to_string()));
        }
        let max = self.config.rooms.max_title_chars;
        if title.chars().count() > max {
            return Err(ChatError::InvalidRoom(format!(
                "title must be at most {max} characters"
            )));
        }

        let room = ChatRoom::create(title);
        self.chat.lock().await.add_room(room.clone());
        info!(room = %room.id, title = %room.title, "Created chat room");
        Ok(room)
    }

    /// Delete a room, cancelling any reply pending for it.
    pub async fn delete_room(&self, id: &RoomId) {
        let mut chat = self.chat.lock().await;
        self.scheduler.cancel_locked(&mut chat, id);
        chat.delete_room(id);
        drop(chat);
        info!(room = %id, "Deleted chat room");
    }

    /// Enter a room. Returns `false` if no such room exists.
    pub async fn open_room(&self, id: &RoomId) -> bool {
        let mut chat = self.chat.lock().await;
        if chat.room(id).is_none() {
            debug!(room = %id, "Ignoring open of unknown room");
            return false;
        }
        chat.set_current_room(Some(id.clone()));
        true
    }

    /// Leave the current room, cancelling its pending reply.
    pub async fn close_room(&self) {
        let mut chat = self.chat.lock().await;
        if let Some(id) = chat.current_room_id().cloned() {
            self.scheduler.cancel_locked(&mut chat, &id);
        }
        chat.set_current_room(None);
    }

    /// Send a text message and schedule the counterpart's reply.
    ///
    /// Whitespace-only text is ignored and yields `Ok(None)`.
    ///
    /// # Errors
    /// Currently infallible for text; kept fallible for parity with
    /// [`ChatApp::send_image`].
    pub async fn send_message(&self, room_id: &RoomId, text: &str) -> ChatResult<Option<Message>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let message = Message::user(room_id.clone(), text);
        self.chat.lock().await.append_message(message.clone());
        self.scheduler
            .schedule(ReplyRequest::text(room_id.clone(), text))
            .await;
        Ok(Some(message))
    }

    /// Share an image and schedule an image-aware reply.
    ///
    /// # Errors
    /// Returns an error if `image` is empty.
    pub async fn send_image(&self, room_id: &RoomId, image: &str) -> ChatResult<Message> {
        if image.is_empty() {
            return Err(ChatError::InvalidMessage("image payload is empty".to_string()));
        }

        let message = Message::image(room_id.clone(), image);
        self.chat.lock().await.append_message(message.clone());
        self.scheduler
            .schedule(ReplyRequest::text(room_id.clone(), message.content.clone()).with_image(image))
            .await;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::chat::core::config::ResponderConfig;
    use crate::chat::core::message::SHARED_IMAGE_CONTENT;
    use crate::chat::responder::generator::CANNED_RESPONSES;
    use crate::chat::storage::kv::MemoryKeyValueStore;

    fn app_with(kv: Arc<MemoryKeyValueStore>) -> ChatApp {
        let config = ChatConfig {
            responder: ResponderConfig {
                min_delay_ms: 100,
                max_delay_ms: 100,
            },
            ..ChatConfig::default()
        };
        ChatApp::new(config, kv, Arc::new(CannedResponder::new())).unwrap()
    }

    fn app() -> ChatApp {
        app_with(Arc::new(MemoryKeyValueStore::new()))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_with_demo_rooms() {
        let app = app();
        assert_eq!(app.chat().lock().await.room_count(), 3);
        assert!(!app.session().lock().await.is_authenticated());
        assert!(!app.theme().lock().await.is_dark());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_room_validates_title() {
        let app = app();

        assert!(matches!(
            app.create_room("   ").await,
            Err(ChatError::InvalidRoom(_))
        ));
        assert!(app.create_room(&"x".repeat(51)).await.is_err());

        let room = app.create_room("  Weekend plans ").await.unwrap();
        assert_eq!(room.title, "Weekend plans");
        assert_eq!(app.chat().lock().await.rooms()[0].id, room.id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_message_gets_one_reply() {
        let app = app();
        let room = RoomId::new("demo-1");
        assert!(app.open_room(&room).await);

        let sent = app.send_message(&room, "hi").await.unwrap().unwrap();
        assert!(app.chat().lock().await.is_typing());

        settle().await;

        let chat = app.chat();
        let chat = chat.lock().await;
        let thread = chat.room_messages(&room);
        let n = thread.len();
        assert_eq!(thread[n - 2].id, sent.id);
        assert!(!thread[n - 1].is_user);
        assert!(CANNED_RESPONSES.contains(&thread[n - 1].content.as_str()));
        assert!(!chat.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_message_is_ignored() {
        let app = app();
        let room = RoomId::new("demo-1");
        let before = app.chat().lock().await.messages().len();

        assert!(app.send_message(&room, " \n ").await.unwrap().is_none());
        assert_eq!(app.chat().lock().await.messages().len(), before);
        assert_eq!(app.scheduler().pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_image_reply_mentions_image() {
        let app = app();
        let room = RoomId::new("demo-2");

        let sent = app.send_image(&room, "data:image/png;base64,AAAA").await.unwrap();
        assert_eq!(sent.content, SHARED_IMAGE_CONTENT);
        assert!(app.send_image(&room, "").await.is_err());

        settle().await;

        let chat = app.chat();
        let chat = chat.lock().await;
        let reply = chat.room_messages(&room).last().copied().unwrap().clone();
        assert!(reply.content.starts_with("I can see the image you've shared. "));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_room_cancels_reply() {
        let app = app();
        let room = RoomId::new("demo-3");
        app.open_room(&room).await;
        app.send_message(&room, "plan my week").await.unwrap();

        app.close_room().await;
        settle().await;

        let chat = app.chat();
        let chat = chat.lock().await;
        assert!(chat.current_room_id().is_none());
        assert!(chat.room_messages(&room).last().unwrap().is_user);
        assert!(!chat.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_room_only_cancels_current_room() {
        let app = app();
        let open = RoomId::new("demo-1");
        let other = RoomId::new("demo-2");
        app.send_message(&other, "still waiting").await.unwrap();
        app.open_room(&open).await;
        app.send_message(&open, "never mind").await.unwrap();

        app.close_room().await;

        assert!(!app.scheduler().is_pending(&open));
        assert!(app.scheduler().is_pending(&other));
        assert!(app.chat().lock().await.is_typing());

        settle().await;

        let chat = app.chat();
        let chat = chat.lock().await;
        assert!(chat.current_room_id().is_none());
        assert!(chat.room_messages(&open).last().unwrap().is_user);
        assert!(!chat.room_messages(&other).last().unwrap().is_user);
        assert!(!chat.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_room_cancels_and_cascades() {
        let app = app();
        let room = RoomId::new("demo-1");
        app.send_message(&room, "hello").await.unwrap();

        app.delete_room(&room).await;
        settle().await;

        let chat = app.chat();
        let chat = chat.lock().await;
        assert!(chat.room(&room).is_none());
        assert!(chat.room_messages(&room).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_unknown_room() {
        let app = app();
        assert!(!app.open_room(&RoomId::new("nope")).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_survives_restart() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let room = {
            let app = app_with(kv.clone());
            let room = app.create_room("Persisted").await.unwrap();
            app.send_message(&room.id, "remember me").await.unwrap();
            settle().await;
            app.theme().lock().await.toggle();
            room
        };

        let app = app_with(kv);
        let chat = app.chat();
        let chat = chat.lock().await;
        assert_eq!(chat.rooms()[0].id, room.id);
        assert_eq!(chat.room_messages(&room.id).len(), 2);
        assert!(app.theme().lock().await.is_dark());
    }

    #[test]
    fn test_inverted_delay_range_is_rejected() {
        let config = ChatConfig {
            responder: ResponderConfig {
                min_delay_ms: 3000,
                max_delay_ms: 1000,
            },
            ..ChatConfig::default()
        };
        let result = ChatApp::new(
            config,
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(CannedResponder::new()),
        );
        assert!(matches!(result, Err(ChatError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ChatConfig::default();
        config.pagination.page_size = 0;
        let result = ChatApp::new(
            config,
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(CannedResponder::new()),
        );
        assert!(matches!(result, Err(ChatError::InvalidConfig(_))));
    }
}
