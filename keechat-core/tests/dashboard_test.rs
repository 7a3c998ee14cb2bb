//! Scenario tests for the admin login and dashboard flows.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use keechat_core::{
    AdminApi, AdminFlow, AdminSession, DashboardTab, FetchOutcome, KeechatError, KeechatResult,
    LoginFlow, MemorySessionStore, QaEntry, Question, SessionStore,
};

#[derive(Clone, Copy)]
enum ListBehavior {
    Succeed,
    Unauthorized,
    Fail,
}

#[derive(Clone, Copy)]
enum LoginBehavior {
    Succeed,
    Reject,
    Fail,
}

struct FakeAdminApi {
    login: LoginBehavior,
    questions: ListBehavior,
    entries: ListBehavior,
    answer_fails: bool,
    question_fetches: AtomicUsize,
    entry_fetches: AtomicUsize,
    answer_calls: Mutex<Vec<(String, i64, String)>>,
}

impl FakeAdminApi {
    fn new() -> Self {
        Self {
            login: LoginBehavior::Succeed,
            questions: ListBehavior::Succeed,
            entries: ListBehavior::Succeed,
            answer_fails: false,
            question_fetches: AtomicUsize::new(0),
            entry_fetches: AtomicUsize::new(0),
            answer_calls: Mutex::new(Vec::new()),
        }
    }

    fn with_login(mut self, behavior: LoginBehavior) -> Self {
        self.login = behavior;
        self
    }

    fn with_questions(mut self, behavior: ListBehavior) -> Self {
        self.questions = behavior;
        self
    }

    fn with_entries(mut self, behavior: ListBehavior) -> Self {
        self.entries = behavior;
        self
    }

    fn with_failing_answer(mut self) -> Self {
        self.answer_fails = true;
        self
    }

    fn sample_question(id: i64) -> Question {
        Question {
            id,
            user_id: 7,
            question: format!("question #{id}"),
            created_at: Utc::now() - Duration::hours(id),
        }
    }

    fn sample_entry(id: i64) -> QaEntry {
        QaEntry {
            id,
            question: format!("question #{id}"),
            answer: format!("answer #{id}"),
            created_at: Utc::now() - Duration::hours(id),
        }
    }

    fn server_error() -> KeechatError {
        KeechatError::Api {
            status: 500,
            message: "boom".to_string(),
        }
    }
}

#[async_trait]
impl AdminApi for FakeAdminApi {
    async fn admin_login(&self, _email: &str, _password: &str) -> KeechatResult<AdminSession> {
        match self.login {
            LoginBehavior::Succeed => {
                Ok(serde_json::from_str(r#"{"token": "tok-1", "email": "a@b.c"}"#).unwrap())
            }
            LoginBehavior::Reject => Err(KeechatError::Api {
                status: 403,
                message: "Invalid credentials".to_string(),
            }),
            LoginBehavior::Fail => Err(KeechatError::Store("connection refused".to_string())),
        }
    }

    async fn unanswered_questions(&self, _token: &str) -> KeechatResult<Vec<Question>> {
        self.question_fetches.fetch_add(1, Ordering::SeqCst);
        match self.questions {
            ListBehavior::Succeed => Ok(vec![Self::sample_question(42), Self::sample_question(43)]),
            ListBehavior::Unauthorized => Err(KeechatError::Unauthorized),
            ListBehavior::Fail => Err(Self::server_error()),
        }
    }

    async fn qa_entries(&self, _token: &str) -> KeechatResult<Vec<QaEntry>> {
        self.entry_fetches.fetch_add(1, Ordering::SeqCst);
        match self.entries {
            ListBehavior::Succeed => Ok(vec![Self::sample_entry(1)]),
            ListBehavior::Unauthorized => Err(KeechatError::Unauthorized),
            ListBehavior::Fail => Err(Self::server_error()),
        }
    }

    async fn answer_question(
        &self,
        token: &str,
        question_id: i64,
        answer: &str,
    ) -> KeechatResult<()> {
        self.answer_calls
            .lock()
            .unwrap()
            .push((token.to_string(), question_id, answer.to_string()));
        if self.answer_fails {
            Err(Self::server_error())
        } else {
            Ok(())
        }
    }
}

fn store_with_session() -> Arc<MemorySessionStore> {
    let store = Arc::new(MemorySessionStore::new());
    let session: AdminSession = serde_json::from_str(r#"{"token": "tok-1"}"#).unwrap();
    store.store_admin_session(&session).unwrap();
    store
}

#[tokio::test]
async fn fetch_populates_both_lists() {
    let api = Arc::new(FakeAdminApi::new());
    let mut flow = AdminFlow::new(api.clone(), store_with_session());

    let outcome = flow.fetch_data().await;

    assert_eq!(outcome, FetchOutcome::Ok);
    assert!(!flow.is_loading);
    assert_eq!(flow.questions.len(), 2);
    assert_eq!(flow.qa_entries.len(), 1);
    assert_eq!(api.question_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(api.entry_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unauthorized_questions_fetch_forces_logout() {
    let api = Arc::new(FakeAdminApi::new().with_questions(ListBehavior::Unauthorized));
    let store = store_with_session();
    let mut flow = AdminFlow::new(api, store.clone());

    let outcome = flow.fetch_data().await;

    assert_eq!(outcome, FetchOutcome::Unauthorized);
    assert!(store.load_admin_session().unwrap().is_none());
}

#[tokio::test]
async fn unauthorized_entries_fetch_forces_logout_too() {
    let api = Arc::new(FakeAdminApi::new().with_entries(ListBehavior::Unauthorized));
    let store = store_with_session();
    let mut flow = AdminFlow::new(api, store.clone());

    let outcome = flow.fetch_data().await;

    assert_eq!(outcome, FetchOutcome::Unauthorized);
    assert!(store.load_admin_session().unwrap().is_none());
}

#[tokio::test]
async fn non_auth_failure_keeps_partial_data_and_session() {
    let api = Arc::new(FakeAdminApi::new().with_entries(ListBehavior::Fail));
    let store = store_with_session();
    let mut flow = AdminFlow::new(api, store.clone());

    let outcome = flow.fetch_data().await;

    assert_eq!(outcome, FetchOutcome::Ok);
    assert_eq!(flow.questions.len(), 2);
    assert!(flow.qa_entries.is_empty());
    assert!(store.load_admin_session().unwrap().is_some());
}

#[tokio::test]
async fn missing_session_counts_as_unauthorized() {
    let api = Arc::new(FakeAdminApi::new());
    let mut flow = AdminFlow::new(api, Arc::new(MemorySessionStore::new()));

    assert_eq!(flow.fetch_data().await, FetchOutcome::Unauthorized);
}

#[tokio::test]
async fn empty_token_fails_the_guard() {
    let api = Arc::new(FakeAdminApi::new());
    let store = Arc::new(MemorySessionStore::new());
    let session: AdminSession = serde_json::from_str(r#"{"token": ""}"#).unwrap();
    store.store_admin_session(&session).unwrap();

    let flow = AdminFlow::new(api, store);
    assert!(flow.stored_token().is_none());
}

#[tokio::test]
async fn answering_holds_at_most_one_question() {
    let api = Arc::new(FakeAdminApi::new());
    let mut flow = AdminFlow::new(api, store_with_session());

    flow.begin_answer(42);
    assert_eq!(flow.answering.as_ref().unwrap().question_id, 42);

    // selecting another question replaces the open editor
    flow.begin_answer(43);
    assert_eq!(flow.answering.as_ref().unwrap().question_id, 43);
    assert!(flow.answering.as_ref().unwrap().text.is_empty());

    flow.cancel_answer();
    assert!(flow.answering.is_none());
}

#[tokio::test]
async fn empty_answer_is_ignored() {
    let api = Arc::new(FakeAdminApi::new());
    let mut flow = AdminFlow::new(api.clone(), store_with_session());

    flow.begin_answer(42);
    flow.answering.as_mut().unwrap().text = "   ".to_string();

    assert_eq!(flow.submit_answer().await, FetchOutcome::Ok);
    assert!(api.answer_calls.lock().unwrap().is_empty());
    assert!(flow.answering.is_some());
}

#[tokio::test]
async fn submitted_answer_posts_once_then_refetches_both_lists() {
    let api = Arc::new(FakeAdminApi::new());
    let mut flow = AdminFlow::new(api.clone(), store_with_session());
    flow.fetch_data().await;

    flow.begin_answer(42);
    flow.answering.as_mut().unwrap().text = "See the syllabus".to_string();
    let outcome = flow.submit_answer().await;

    assert_eq!(outcome, FetchOutcome::Ok);
    assert_eq!(
        api.answer_calls.lock().unwrap().as_slice(),
        [("tok-1".to_string(), 42, "See the syllabus".to_string())]
    );
    // one initial fetch plus the post-answer refetch, for each list
    assert_eq!(api.question_fetches.load(Ordering::SeqCst), 2);
    assert_eq!(api.entry_fetches.load(Ordering::SeqCst), 2);
    assert!(flow.answering.is_none());
}

#[tokio::test]
async fn failed_answer_keeps_draft_for_retry() {
    let api = Arc::new(FakeAdminApi::new().with_failing_answer());
    let mut flow = AdminFlow::new(api.clone(), store_with_session());

    flow.begin_answer(42);
    flow.answering.as_mut().unwrap().text = "See the syllabus".to_string();
    let outcome = flow.submit_answer().await;

    assert_eq!(outcome, FetchOutcome::Ok);
    assert_eq!(
        flow.alert.as_deref(),
        Some("Error answering question. Please try again.")
    );
    let draft = flow.answering.as_ref().unwrap();
    assert_eq!(draft.question_id, 42);
    assert_eq!(draft.text, "See the syllabus");
    // no refetch on failure
    assert_eq!(api.question_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn tab_toggle_is_purely_local() {
    let api = Arc::new(FakeAdminApi::new());
    let mut flow = AdminFlow::new(api.clone(), store_with_session());

    assert_eq!(flow.tab, DashboardTab::Unanswered);
    flow.tab = flow.tab.toggle();
    assert_eq!(flow.tab, DashboardTab::Qa);
    assert_eq!(api.question_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn login_success_stores_the_session() {
    let api = Arc::new(FakeAdminApi::new());
    let store = Arc::new(MemorySessionStore::new());
    let mut login = LoginFlow::new(api, store.clone());

    assert!(login.submit("admin@example.edu", "hunter2").await);
    assert!(login.error.is_none());

    let session = store.load_admin_session().unwrap().unwrap();
    assert_eq!(session.token, "tok-1");
    assert_eq!(session.extra["email"], "a@b.c");
}

#[tokio::test]
async fn login_rejection_surfaces_server_detail() {
    let api = Arc::new(FakeAdminApi::new().with_login(LoginBehavior::Reject));
    let store = Arc::new(MemorySessionStore::new());
    let mut login = LoginFlow::new(api, store.clone());

    assert!(!login.submit("admin@example.edu", "wrong").await);
    assert_eq!(login.error.as_deref(), Some("Invalid credentials"));
    assert!(store.load_admin_session().unwrap().is_none());
}

#[tokio::test]
async fn login_transport_failure_shows_generic_error() {
    let api = Arc::new(FakeAdminApi::new().with_login(LoginBehavior::Fail));
    let mut login = LoginFlow::new(api, Arc::new(MemorySessionStore::new()));

    assert!(!login.submit("admin@example.edu", "hunter2").await);
    assert_eq!(login.error.as_deref(), Some("An error occurred"));
}
