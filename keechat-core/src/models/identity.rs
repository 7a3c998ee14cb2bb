use serde::{Deserialize, Serialize};

/// Identity record issued by the student registration endpoint.
///
/// Immutable once stored; read on every start to decide whether the chat
/// flow resumes or onboards. Never expires client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatIdentity {
    pub unique_identifier: String,
    pub username: String,
}

/// Admin session issued by the login endpoint.
///
/// Only the token is interpreted; everything else the server returns is
/// carried through opaquely so the stored record round-trips intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub token: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AdminSession {
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}
