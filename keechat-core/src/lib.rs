//! Core library for keechat: the flows, API client, session store, and
//! configuration behind the terminal client for the Kee campus chatbot.

pub mod admin;
pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use admin::{AdminFlow, AnswerDraft, DashboardTab, FetchOutcome, LoginFlow};
pub use api::{AdminApi, ApiClient, ChatApi};
pub use chat::{merge_history, ChatFlow, ChatStep, LoadState, FALLBACK_REPLY};
pub use config::{get_config_dir, ApiConfig, KeechatConfig, LoggingConfig};
pub use error::{KeechatError, KeechatResult};
pub use models::{AdminSession, ChatIdentity, Message, MessageIdGen, QaEntry, Question};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
