use thiserror::Error;

/// Unified error type for keechat operations.
#[derive(Debug, Error)]
pub enum KeechatError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the backend. `message` is the body's
    /// `detail` field when present, otherwise the raw body.
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// 401 from an authenticated endpoint. The stored admin session is
    /// no longer valid and must be cleared.
    #[error("unauthorized")]
    Unauthorized,

    /// 400 from the student registration endpoint.
    #[error("username already exists")]
    DuplicateUsername,

    #[error("session store error: {0}")]
    Store(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type KeechatResult<T> = Result<T, KeechatError>;

impl KeechatError {
    /// True when the error should force an admin logout.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, KeechatError::Unauthorized)
    }
}
