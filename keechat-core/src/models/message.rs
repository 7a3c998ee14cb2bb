use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One transcript entry, either user-authored or bot-authored.
///
/// Ids are server-assigned for fetched history and client-generated for
/// optimistic/synthetic entries. The transcript never holds two entries
/// with the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub is_bot: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            is_bot: false,
            created_at: Utc::now(),
        }
    }

    pub fn bot(id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            is_bot: true,
            created_at: Utc::now(),
        }
    }

    /// Hour:minute stamp shown next to a chat bubble.
    pub fn format_time(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}

/// Source of client-generated message ids.
///
/// Seeded from the current epoch milliseconds and incremented per id, so
/// ids are unique within a session and stay clear of the small integer
/// ids the backend assigns to stored history.
#[derive(Debug)]
pub struct MessageIdGen {
    next: AtomicI64,
}

impl MessageIdGen {
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    pub fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for MessageIdGen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = Message::user(1, "hello");
        assert_eq!(user.id, 1);
        assert!(!user.is_bot);

        let bot = Message::bot(2, "hi there");
        assert_eq!(bot.id, 2);
        assert!(bot.is_bot);
        assert_eq!(bot.content, "hi there");
    }

    #[test]
    fn test_id_gen_monotonic_and_unique() {
        let gen = MessageIdGen::new();
        let ids: Vec<i64> = (0..100).map(|_| gen.next_id()).collect();

        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_message_deserializes_wire_shape() {
        let raw = r#"{
            "id": 7,
            "content": "Welcome!",
            "is_bot": true,
            "created_at": "2025-03-14T09:26:53Z"
        }"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.id, 7);
        assert!(msg.is_bot);
        assert_eq!(msg.format_time(), "09:26");
    }
}
