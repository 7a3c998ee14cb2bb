use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use keechat_core::{
    AdminFlow, ApiClient, ChatFlow, ChatStep, DashboardTab, FetchOutcome, FileSessionStore,
    KeechatConfig, KeechatResult, LoginFlow, SessionStore,
};

use crate::event::{AppEvent, EventReader};
use crate::ui;

/// The three routed screens: chat at the root, then the guarded admin
/// area behind its login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Chat,
    AdminLogin,
    AdminDashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

impl LoginField {
    pub fn toggle(self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        }
    }
}

pub struct App {
    pub running: bool,
    pub route: Route,
    pub chat: ChatFlow,
    pub login: LoginFlow,
    pub dashboard: AdminFlow,
    pub chat_input: String,
    pub login_email: String,
    pub login_password: String,
    pub login_field: LoginField,
    pub selected_question: usize,
    pub tick: u64,
    chat_started: bool,
    start_admin: bool,
}

impl App {
    pub fn new(config: &KeechatConfig, start_admin: bool) -> KeechatResult<Self> {
        let api = Arc::new(ApiClient::new(&config.api)?);
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new()?);

        Ok(Self {
            running: true,
            route: Route::Chat,
            chat: ChatFlow::new(api.clone(), store.clone()),
            login: LoginFlow::new(api.clone(), store.clone()),
            dashboard: AdminFlow::new(api, store),
            chat_input: String::new(),
            login_email: String::new(),
            login_password: String::new(),
            login_field: LoginField::Email,
            selected_question: 0,
            tick: 0,
            chat_started: false,
            start_admin,
        })
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &EventReader,
    ) -> Result<()> {
        if self.start_admin {
            self.enter_admin().await;
        } else {
            self.enter_chat().await;
        }

        loop {
            terminal.draw(|f| ui::render(f, self))?;
            if !self.running {
                break;
            }
            match events.next()? {
                AppEvent::Key(key) => self.handle_key(key).await,
                AppEvent::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                }
            }
        }
        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }
        match self.route {
            Route::Chat => self.handle_chat_key(key).await,
            Route::AdminLogin => self.handle_login_key(key).await,
            Route::AdminDashboard => self.handle_dashboard_key(key).await,
        }
    }

    async fn handle_chat_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('a') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.enter_admin().await;
            return;
        }

        match self.chat.step {
            ChatStep::Onboarding => match key.code {
                KeyCode::Enter => {
                    let name = self.chat_input.clone();
                    self.chat.submit_username(&name);
                    if self.chat.step != ChatStep::Onboarding {
                        self.chat_input.clear();
                    }
                }
                KeyCode::Backspace => {
                    self.chat_input.pop();
                }
                KeyCode::Esc => self.running = false,
                KeyCode::Char(c) => self.chat_input.push(c),
                _ => {}
            },
            ChatStep::SelectingType => match key.code {
                KeyCode::Char('n') | KeyCode::Char('N') => self.select_student_type(false).await,
                KeyCode::Char('e') | KeyCode::Char('E') => self.select_student_type(true).await,
                KeyCode::Esc => self.running = false,
                _ => {}
            },
            ChatStep::Chatting => match key.code {
                KeyCode::Enter => {
                    let draft = self.chat_input.clone();
                    if self.chat.send_message(&draft).await {
                        self.chat_input.clear();
                    }
                }
                KeyCode::Backspace => {
                    self.chat_input.pop();
                }
                KeyCode::Esc => self.running = false,
                KeyCode::Char(c) => self.chat_input.push(c),
                _ => {}
            },
        }
    }

    async fn select_student_type(&mut self, is_existing: bool) {
        self.chat.select_student_type(is_existing).await;
        if self.chat.step == ChatStep::Onboarding {
            // duplicate username: back on the form with the old name editable
            self.chat_input = self.chat.username.clone();
        }
    }

    async fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.enter_chat().await,
            KeyCode::Tab | KeyCode::BackTab => self.login_field = self.login_field.toggle(),
            KeyCode::Enter => {
                let email = self.login_email.clone();
                let password = self.login_password.clone();
                if self.login.submit(&email, &password).await {
                    self.login_password.clear();
                    self.route = Route::AdminDashboard;
                    self.refresh_dashboard().await;
                }
            }
            KeyCode::Backspace => {
                match self.login_field {
                    LoginField::Email => self.login_email.pop(),
                    LoginField::Password => self.login_password.pop(),
                };
            }
            KeyCode::Char(c) => match self.login_field {
                LoginField::Email => self.login_email.push(c),
                LoginField::Password => self.login_password.push(c),
            },
            _ => {}
        }
    }

    async fn handle_dashboard_key(&mut self, key: KeyEvent) {
        self.dashboard.alert = None;

        if self.dashboard.answering.is_some() {
            match key.code {
                KeyCode::Esc => self.dashboard.cancel_answer(),
                KeyCode::Enter => {
                    if self.dashboard.submit_answer().await == FetchOutcome::Unauthorized {
                        self.go_to_login();
                    }
                    self.clamp_selection();
                }
                KeyCode::Backspace => {
                    if let Some(draft) = self.dashboard.answering.as_mut() {
                        draft.text.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(draft) = self.dashboard.answering.as_mut() {
                        draft.text.push(c);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Esc => self.enter_chat().await,
            KeyCode::Tab | KeyCode::BackTab => {
                self.dashboard.tab = self.dashboard.tab.toggle();
                self.selected_question = 0;
            }
            KeyCode::Char('1') => self.dashboard.tab = DashboardTab::Unanswered,
            KeyCode::Char('2') => self.dashboard.tab = DashboardTab::Qa,
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected_question = self.selected_question.saturating_add(1);
                self.clamp_selection();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_question = self.selected_question.saturating_sub(1);
            }
            KeyCode::Char('r') => self.refresh_dashboard().await,
            KeyCode::Enter => {
                if self.dashboard.tab == DashboardTab::Unanswered {
                    if let Some(question) = self.dashboard.questions.get(self.selected_question) {
                        self.dashboard.begin_answer(question.id);
                    }
                }
            }
            _ => {}
        }
    }

    async fn enter_chat(&mut self) {
        self.route = Route::Chat;
        if !self.chat_started {
            self.chat_started = true;
            self.chat.activate().await;
        }
    }

    /// Dashboard guard: a stored session with a non-empty token goes
    /// straight in, anything else lands on the login form.
    async fn enter_admin(&mut self) {
        if self.dashboard.stored_token().is_some() {
            debug!("admin session present, entering dashboard");
            self.route = Route::AdminDashboard;
            self.refresh_dashboard().await;
        } else {
            self.go_to_login();
        }
    }

    async fn refresh_dashboard(&mut self) {
        if self.dashboard.fetch_data().await == FetchOutcome::Unauthorized {
            self.go_to_login();
        }
        self.clamp_selection();
    }

    fn go_to_login(&mut self) {
        debug!("redirecting to admin login");
        self.route = Route::AdminLogin;
        self.login.error = None;
    }

    fn clamp_selection(&mut self) {
        let len = match self.dashboard.tab {
            DashboardTab::Unanswered => self.dashboard.questions.len(),
            DashboardTab::Qa => self.dashboard.qa_entries.len(),
        };
        if len > 0 && self.selected_question >= len {
            self.selected_question = len - 1;
        }
        if len == 0 {
            self.selected_question = 0;
        }
    }
}
