use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::ChatApi;
use crate::error::KeechatError;
use crate::models::{Message, MessageIdGen};
use crate::session::SessionStore;

/// Shown in place of a bot reply when the messaging call fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble responding right now. Please try again.";

const DUPLICATE_USERNAME_ALERT: &str =
    "Username already exists. Please choose a different one.";
const HISTORY_ERROR: &str = "Error loading chat history";

/// Where the visitor is in the onboarding-and-chat state machine.
///
/// `Onboarding → SelectingType → Chatting`; a returning visitor with a
/// stored identity enters `Chatting` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStep {
    Onboarding,
    SelectingType,
    Chatting,
}

/// History-load status for the transcript area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Controller for the public chat flow.
///
/// All mutation happens through the operation methods; the UI reads the
/// public fields after each operation settles. Network failures never
/// escape: every operation resolves to a user-visible state.
pub struct ChatFlow {
    api: Arc<dyn ChatApi>,
    store: Arc<dyn SessionStore>,
    ids: MessageIdGen,
    pub step: ChatStep,
    pub username: String,
    pub identifier: Option<String>,
    pub messages: Vec<Message>,
    pub is_typing: bool,
    pub history: LoadState,
    pub alert: Option<String>,
}

impl ChatFlow {
    pub fn new(api: Arc<dyn ChatApi>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            ids: MessageIdGen::new(),
            step: ChatStep::Onboarding,
            username: String::new(),
            identifier: None,
            messages: Vec::new(),
            is_typing: false,
            history: LoadState::Idle,
            alert: None,
        }
    }

    /// Resume a stored identity or start onboarding fresh.
    pub async fn activate(&mut self) {
        match self.store.load_chat_identity() {
            Ok(Some(identity)) => {
                info!(username = %identity.username, "resuming stored chat identity");
                self.username = identity.username;
                self.identifier = Some(identity.unique_identifier);
                self.step = ChatStep::Chatting;
                self.load_history().await;
            }
            Ok(None) => {
                self.step = ChatStep::Onboarding;
            }
            Err(e) => {
                warn!("failed to read chat identity, onboarding fresh: {e}");
                self.step = ChatStep::Onboarding;
            }
        }
    }

    /// Identifier used for history and messaging calls: the stored
    /// unique identifier when registered, else the raw username.
    pub fn resolved_identifier(&self) -> String {
        self.identifier
            .clone()
            .unwrap_or_else(|| self.username.clone())
    }

    /// Accept a username and move to role selection. Empty or
    /// whitespace-only input is ignored.
    pub fn submit_username(&mut self, raw: &str) {
        let name = raw.trim();
        if name.is_empty() {
            return;
        }
        self.username = name.to_string();
        self.alert = None;
        self.step = ChatStep::SelectingType;
        self.messages = vec![Message::bot(self.ids.next_id(), greeting(name))];
    }

    /// Register the visitor as a new or existing student.
    ///
    /// Success stores the identity and enters `Chatting`; a duplicate
    /// username alerts and falls back to `Onboarding`; anything else is
    /// logged and leaves the flow where it is.
    pub async fn select_student_type(&mut self, is_existing: bool) {
        let result = self
            .api
            .register_student(&self.username.to_lowercase(), is_existing)
            .await;

        match result {
            Ok(identity) => {
                self.identifier = Some(identity.unique_identifier.clone());
                if let Err(e) = self.store.store_chat_identity(&identity) {
                    warn!("failed to persist chat identity: {e}");
                }
                let welcome = welcome_message(&self.username, is_existing);
                self.messages.push(Message::bot(self.ids.next_id(), welcome));
                self.step = ChatStep::Chatting;
            }
            Err(KeechatError::DuplicateUsername) => {
                self.alert = Some(DUPLICATE_USERNAME_ALERT.to_string());
                self.step = ChatStep::Onboarding;
            }
            Err(e) => {
                error!("student registration failed: {e}");
            }
        }
    }

    /// Fetch server history and merge it into the transcript.
    ///
    /// Merging is idempotent: already-displayed messages win over
    /// fetched ones with the same id, and the result is re-sorted by
    /// creation time. A failure leaves a persistent error; there is no
    /// retry.
    pub async fn load_history(&mut self) {
        self.history = LoadState::Loading;
        match self.api.message_history(&self.resolved_identifier()).await {
            Ok(fetched) => {
                self.messages = merge_history(&self.messages, fetched);
                self.history = LoadState::Idle;
            }
            Err(e) => {
                warn!("failed to load chat history: {e}");
                self.history = LoadState::Failed(HISTORY_ERROR.to_string());
            }
        }
    }

    /// Send a message, optimistically appending the user entry first.
    ///
    /// Ignored while empty or while a send is in flight (the typing flag
    /// is a cooperative advisory, checked at entry). A failed send is
    /// masked by a fixed bot-style apology rather than an error.
    /// Returns true when a request was issued.
    pub async fn send_message(&mut self, draft: &str) -> bool {
        let text = draft.trim().to_string();
        if text.is_empty() || self.is_typing {
            return false;
        }

        self.messages
            .push(Message::user(self.ids.next_id(), text.clone()));
        self.is_typing = true;

        let result = self
            .api
            .send_message(&text, &self.resolved_identifier())
            .await;

        match result {
            Ok(reply) => {
                self.messages.push(Message::bot(self.ids.next_id(), reply));
            }
            Err(e) => {
                warn!("message send failed: {e}");
                self.messages
                    .push(Message::bot(self.ids.next_id(), FALLBACK_REPLY));
            }
        }
        self.is_typing = false;
        true
    }
}

/// Merge fetched history into the displayed transcript.
///
/// Fetched messages whose id is already displayed are dropped; the rest
/// are concatenated ahead of the existing entries and the whole list is
/// re-sorted ascending by creation time.
pub fn merge_history(existing: &[Message], fetched: Vec<Message>) -> Vec<Message> {
    let shown: HashSet<i64> = existing.iter().map(|m| m.id).collect();
    let mut merged: Vec<Message> = fetched
        .into_iter()
        .filter(|m| !shown.contains(&m.id))
        .collect();
    merged.extend_from_slice(existing);
    merged.sort_by_key(|m| m.created_at);
    merged
}

fn greeting(username: &str) -> String {
    format!("Hi {username}! Are you a new or existing student?")
}

fn welcome_message(username: &str, is_existing: bool) -> String {
    if is_existing {
        format!(
            "Welcome, {username}. I'm Kee, I'm here to help answer any questions \
             you might have. How can I help you today?"
        )
    } else {
        format!(
            "Welcome to our university, {username}! I'm Kee, I'm here to help \
             answer any questions you might have. What would you like to know?"
        )
    }
}
