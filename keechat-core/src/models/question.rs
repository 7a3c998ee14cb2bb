use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student question the admins have not answered yet.
///
/// Server-owned; the client only reads it, and answering removes it from
/// the unanswered set on the next refetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub user_id: i64,
    pub question: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn format_created_at(&self) -> String {
        format_timestamp(&self.created_at)
    }
}

/// An answered entry in the Q&A knowledge base. Append-only from the
/// client's point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaEntry {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

impl QaEntry {
    pub fn format_created_at(&self) -> String {
        format_timestamp(&self.created_at)
    }
}

// Fixed locale-style format: month abbreviation, day, year, hour:minute.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y, %I:%M %p").to_string()
}
