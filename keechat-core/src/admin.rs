use std::sync::Arc;

use tracing::{error, warn};

use crate::api::AdminApi;
use crate::error::KeechatError;
use crate::models::{QaEntry, Question};
use crate::session::SessionStore;

const ANSWER_ERROR_ALERT: &str = "Error answering question. Please try again.";
const LOGIN_FALLBACK_ERROR: &str = "An error occurred";

/// Which dashboard list is on screen. Purely local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Unanswered,
    Qa,
}

impl DashboardTab {
    pub fn toggle(self) -> Self {
        match self {
            DashboardTab::Unanswered => DashboardTab::Qa,
            DashboardTab::Qa => DashboardTab::Unanswered,
        }
    }
}

/// Result of an authenticated dashboard operation: either the view can
/// stay, or the session was rejected and the router must go to login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Ok,
    Unauthorized,
}

/// In-progress answer composition. At most one question is in answering
/// mode at a time.
#[derive(Debug, Clone)]
pub struct AnswerDraft {
    pub question_id: i64,
    pub text: String,
}

/// Controller for the admin login screen.
pub struct LoginFlow {
    api: Arc<dyn AdminApi>,
    store: Arc<dyn SessionStore>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl LoginFlow {
    pub fn new(api: Arc<dyn AdminApi>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            is_loading: false,
            error: None,
        }
    }

    /// Attempt a login; returns true when a session was stored and the
    /// router should move to the dashboard. The server's `detail` string
    /// is surfaced when present, a generic line otherwise.
    pub async fn submit(&mut self, email: &str, password: &str) -> bool {
        if self.is_loading {
            return false;
        }
        self.is_loading = true;
        self.error = None;

        let result = self.api.admin_login(email, password).await;
        self.is_loading = false;

        match result {
            Ok(session) => {
                if let Err(e) = self.store.store_admin_session(&session) {
                    warn!("failed to persist admin session: {e}");
                }
                true
            }
            Err(KeechatError::Api { message, .. }) if !message.is_empty() => {
                self.error = Some(message);
                false
            }
            Err(e) => {
                warn!("admin login failed: {e}");
                self.error = Some(LOGIN_FALLBACK_ERROR.to_string());
                false
            }
        }
    }
}

/// Controller for the admin dashboard.
///
/// Both lists are fetched concurrently and joined before the loading
/// flag clears. A 401 from either fetch clears the stored session and
/// reports `Unauthorized`; other failures are logged and the view keeps
/// whatever data it has.
pub struct AdminFlow {
    api: Arc<dyn AdminApi>,
    store: Arc<dyn SessionStore>,
    pub tab: DashboardTab,
    pub questions: Vec<Question>,
    pub qa_entries: Vec<QaEntry>,
    pub is_loading: bool,
    pub answering: Option<AnswerDraft>,
    pub alert: Option<String>,
}

impl AdminFlow {
    pub fn new(api: Arc<dyn AdminApi>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            tab: DashboardTab::Unanswered,
            questions: Vec::new(),
            qa_entries: Vec::new(),
            is_loading: false,
            answering: None,
            alert: None,
        }
    }

    /// Token from the stored session, if one with a non-empty token
    /// exists. Presence only; validity is discovered lazily via 401.
    pub fn stored_token(&self) -> Option<String> {
        match self.store.load_admin_session() {
            Ok(Some(session)) if session.has_token() => Some(session.token),
            _ => None,
        }
    }

    pub async fn fetch_data(&mut self) -> FetchOutcome {
        let Some(token) = self.stored_token() else {
            return self.force_logout();
        };

        self.is_loading = true;
        let (questions, entries) = tokio::join!(
            self.api.unanswered_questions(&token),
            self.api.qa_entries(&token),
        );
        self.is_loading = false;

        let mut unauthorized = false;
        match questions {
            Ok(list) => self.questions = list,
            Err(KeechatError::Unauthorized) => unauthorized = true,
            Err(e) => error!("failed to fetch unanswered questions: {e}"),
        }
        match entries {
            Ok(list) => self.qa_entries = list,
            Err(KeechatError::Unauthorized) => unauthorized = true,
            Err(e) => error!("failed to fetch qa entries: {e}"),
        }

        if unauthorized {
            self.force_logout()
        } else {
            FetchOutcome::Ok
        }
    }

    fn force_logout(&mut self) -> FetchOutcome {
        if let Err(e) = self.store.clear_admin_session() {
            warn!("failed to clear admin session: {e}");
        }
        FetchOutcome::Unauthorized
    }

    /// Open the inline answer editor for a question, replacing any
    /// editor already open on another question.
    pub fn begin_answer(&mut self, question_id: i64) {
        self.answering = Some(AnswerDraft {
            question_id,
            text: String::new(),
        });
    }

    pub fn cancel_answer(&mut self) {
        self.answering = None;
    }

    /// Post the composed answer. Empty text is ignored. Success clears
    /// the composition state and refetches both lists; failure alerts
    /// and keeps the draft for retry.
    pub async fn submit_answer(&mut self) -> FetchOutcome {
        let Some(draft) = self.answering.clone() else {
            return FetchOutcome::Ok;
        };
        let text = draft.text.trim().to_string();
        if text.is_empty() {
            return FetchOutcome::Ok;
        }
        let Some(token) = self.stored_token() else {
            return self.force_logout();
        };

        match self
            .api
            .answer_question(&token, draft.question_id, &text)
            .await
        {
            Ok(()) => {
                self.answering = None;
                self.fetch_data().await
            }
            Err(e) => {
                error!("failed to submit answer: {e}");
                self.alert = Some(ANSWER_ERROR_ALERT.to_string());
                FetchOutcome::Ok
            }
        }
    }
}
