//! Derived, read-only views over store contents.

use crate::chat::core::message::Message;

/// A window over a room's messages, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagePage<'a> {
    /// Revealed messages.
    pub messages: Vec<&'a Message>,
    /// 1-based page number this window covers.
    pub page: usize,
    /// Messages in the room.
    pub total: usize,
}

impl MessagePage<'_> {
    /// Whether more messages remain past this window.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.messages.len() < self.total
    }

    /// Page number to request for the next window.
    #[must_use]
    pub const fn next_page(&self) -> usize {
        self.page + 1
    }
}

/// Reveal the first `page * page_size` of `messages`.
///
/// Page numbers start at 1; page 0 is treated as page 1.
#[must_use]
pub fn paginate(messages: Vec<&Message>, page: usize, page_size: usize) -> MessagePage<'_> {
    let page = page.max(1);
    let total = messages.len();
    let visible = page.saturating_mul(page_size).min(total);

    let mut messages = messages;
    messages.truncate(visible);

    MessagePage {
        messages,
        page,
        total,
    }
}

/// Whether a day separator belongs before `current`.
#[must_use]
pub fn needs_date_separator(current: &Message, previous: Option<&Message>) -> bool {
    previous.is_none_or(|prev| prev.timestamp.date_naive() != current.timestamp.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone, Utc};

    use crate::chat::core::ids::RoomId;

    fn thread(count: usize) -> Vec<Message> {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let offset = Duration::minutes(i64::try_from(i).unwrap());
                Message::user(RoomId::new("r1"), format!("m{i}")).at(start + offset)
            })
            .collect()
    }

    #[test]
    fn test_first_page() {
        let messages = thread(45);
        let page = paginate(messages.iter().collect(), 1, 20);
        assert_eq!(page.messages.len(), 20);
        assert_eq!(page.messages[0].content, "m0");
        assert!(page.has_more());
        assert_eq!(page.next_page(), 2);
    }

    #[test]
    fn test_last_page_reveals_everything() {
        let messages = thread(45);
        let page = paginate(messages.iter().collect(), 3, 20);
        assert_eq!(page.messages.len(), 45);
        assert!(!page.has_more());
    }

    #[test]
    fn test_page_zero_is_page_one() {
        let messages = thread(5);
        let page = paginate(messages.iter().collect(), 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.messages.len(), 2);
    }

    #[test]
    fn test_date_separator() {
        let day_one = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap();
        let first = Message::user(RoomId::new("r1"), "late").at(day_one);
        let same_day = Message::user(RoomId::new("r1"), "later").at(day_one + Duration::seconds(30));
        let next_day = Message::user(RoomId::new("r1"), "morning").at(day_one + Duration::minutes(2));

        assert!(needs_date_separator(&first, None));
        assert!(!needs_date_separator(&same_day, Some(&first)));
        assert!(needs_date_separator(&next_day, Some(&same_day)));
    }
}
