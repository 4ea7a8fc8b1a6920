//! Signed-in user, persisted verbatim in the session slot.
//!
//! An absent slot means logged out. So does an unreadable one.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chat::core::errors::ChatResult;
use crate::chat::core::user::User;
use crate::chat::storage::kv::KeyValueStore;

/// Session flag store.
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    user: Option<User>,
    is_loading: bool,
}

impl SessionStore {
    /// Restore the session from slot `key`.
    #[must_use]
    pub fn open(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let user = match kv.get_item(&key) {
            Ok(Some(text)) => serde_json::from_str::<Option<User>>(&text).unwrap_or_else(|err| {
                warn!(key = %key, %err, "Discarding unreadable session");
                None
            }),
            Ok(None) => None,
            Err(err) => {
                error!(key = %key, %err, "Failed to read session");
                None
            }
        };

        Self {
            kv,
            key,
            user,
            is_loading: false,
        }
    }

    /// Signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a user is signed in and finished authenticating.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_authenticated)
    }

    /// Replace the user; `None` clears the slot.
    pub fn set_user(&mut self, user: Option<User>) {
        if let Err(err) = self.write(user.as_ref()) {
            error!(key = %self.key, %err, "Failed to persist session");
        }
        if let Some(user) = &user {
            info!(user = %user.id, "Signed in");
        }
        self.user = user;
    }

    /// Sign out.
    pub fn logout(&mut self) {
        if self.user.is_some() {
            info!("Signed out");
        }
        self.set_user(None);
    }

    /// Whether a login step is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Mark a login step as in flight or done.
    pub const fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn write(&self, user: Option<&User>) -> ChatResult<()> {
        match user {
            Some(user) => self.kv.set_item(&self.key, &serde_json::to_string(user)?),
            None => self.kv.remove_item(&self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::chat::storage::kv::MemoryKeyValueStore;

    const KEY: &str = "auth-user";

    #[test]
    fn test_absent_slot_is_logged_out() {
        let session = SessionStore::open(Arc::new(MemoryKeyValueStore::new()), KEY);
        assert!(session.user().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_sign_in_survives_reopen() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let user = User::authenticated("5551234", "+1");

        let mut session = SessionStore::open(kv.clone(), KEY);
        session.set_user(Some(user.clone()));

        let reopened = SessionStore::open(kv.clone(), KEY);
        assert_eq!(reopened.user(), Some(&user));
        assert!(reopened.is_authenticated());

        let raw = kv.get_item(KEY).unwrap().unwrap();
        assert!(raw.contains("\"countryCode\":\"+1\""));
    }

    #[test]
    fn test_logout_clears_slot() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let mut session = SessionStore::open(kv.clone(), KEY);
        session.set_user(Some(User::authenticated("5551234", "+1")));

        session.logout();

        assert!(session.user().is_none());
        assert!(kv.get_item(KEY).unwrap().is_none());
    }

    #[test]
    fn test_garbage_slot_is_logged_out() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set_item(KEY, "{\"phone\":").unwrap();

        let session = SessionStore::open(kv, KEY);
        assert!(session.user().is_none());
    }

    #[test]
    fn test_null_slot_is_logged_out() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set_item(KEY, "null").unwrap();

        assert!(SessionStore::open(kv, KEY).user().is_none());
    }

    #[test]
    fn test_loading_flag() {
        let mut session = SessionStore::open(Arc::new(MemoryKeyValueStore::new()), KEY);
        session.set_loading(true);
        assert!(session.is_loading());
    }
}
