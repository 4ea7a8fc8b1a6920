//! Authenticated user record.

use serde::{Deserialize, Serialize};

use crate::chat::core::ids::UserId;

/// The signed-in user, stored verbatim in the session slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Phone number without the calling code.
    pub phone: String,
    /// Calling-code prefix, e.g. `+91`.
    pub country_code: String,
    /// Whether the login flow completed.
    pub is_authenticated: bool,
}

impl User {
    /// Build an authenticated user with a fresh id.
    #[must_use]
    pub fn authenticated(phone: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            phone: phone.into(),
            country_code: country_code.into(),
            is_authenticated: true,
        }
    }
}
