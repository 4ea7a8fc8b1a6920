//! Timestamp encoding for text-only storage.
//!
//! Every instant at rest is wrapped in a tagged object,
//! `{"__type": "Date", "value": "2024-05-01T12:30:00.000Z"}`, so a generic
//! JSON round trip can tell dates apart from ordinary strings. Values carry
//! millisecond precision; [`now_millis`] produces instants that survive the
//! round trip unchanged.
//!
//! The module doubles as a `#[serde(with = "...")]` adapter for
//! `DateTime<Utc>` fields, and [`option`] covers `Option<DateTime<Utc>>`.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chat::core::errors::{ChatError, ChatResult};

/// Tag value used for dates at rest.
pub const DATE_TAG: &str = "Date";

/// A tagged value as it appears in stored JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__type")]
pub enum Tagged {
    /// An instant encoded as RFC 3339 with millisecond precision.
    Date {
        /// ISO-8601 text, always UTC with a `Z` suffix.
        value: String,
    },
}

/// Anything a date slot may hold when read back.
///
/// Older writers stored bare ISO strings; both forms decode to the same instant.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDate {
    Tagged(Tagged),
    Plain(String),
}

impl StoredDate {
    fn into_datetime(self) -> ChatResult<DateTime<Utc>> {
        match self {
            Self::Tagged(tagged) => decode(&tagged),
            Self::Plain(text) => parse_iso(&text),
        }
    }
}

/// Wrap an instant in its tagged form.
#[must_use]
pub fn encode(ts: &DateTime<Utc>) -> Tagged {
    Tagged::Date {
        value: ts.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Reconstitute an instant from its tagged form.
///
/// # Errors
/// Returns an error if the tagged text is not valid RFC 3339.
pub fn decode(tagged: &Tagged) -> ChatResult<DateTime<Utc>> {
    match tagged {
        Tagged::Date { value } => parse_iso(value),
    }
}

/// Parse an RFC 3339 string into a UTC instant.
///
/// # Errors
/// Returns an error if `text` is not valid RFC 3339.
pub fn parse_iso(text: &str) -> ChatResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| ChatError::Timestamp(format!("{text:?}: {err}")))
}

/// Drop sub-millisecond precision.
#[must_use]
pub fn truncate_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ts.timestamp_millis())
        .single()
        .unwrap_or(ts)
}

/// Current instant at millisecond precision.
#[must_use]
pub fn now_millis() -> DateTime<Utc> {
    truncate_millis(Utc::now())
}

/// Serde adapter: serialize as a tagged date.
///
/// # Errors
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    encode(ts).serialize(serializer)
}

/// Serde adapter: accept a tagged date or a bare ISO string.
///
/// # Errors
/// Returns a deserializer error if the value is neither form.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    StoredDate::deserialize(deserializer)?
        .into_datetime()
        .map_err(D::Error::custom)
}

/// Serde adapter for optional timestamps.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{StoredDate, encode};

    /// Serialize `Some` as a tagged date and `None` as `null`.
    ///
    /// # Errors
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)] // signature fixed by `#[serde(with)]`
    pub fn serialize<S: Serializer>(
        ts: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        ts.as_ref().map(encode).serialize(serializer)
    }

    /// Deserialize `null`, a tagged date, or a bare ISO string.
    ///
    /// # Errors
    /// Returns a deserializer error if a present value is not a date.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<StoredDate>::deserialize(deserializer)?
            .map(StoredDate::into_datetime)
            .transpose()
            .map_err(D::Error::custom)
    }
}
