use ratatui::prelude::*;
use ratatui::widgets::*;

use keechat_core::ChatStep;

use crate::app::{App, Route};
use crate::theme::THEME;
use crate::views;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    match app.route {
        Route::Chat => views::chat::render(f, app, chunks[1]),
        Route::AdminLogin => views::login::render(f, app, chunks[1]),
        Route::AdminDashboard => views::dashboard::render(f, app, chunks[1]),
    }

    render_status_bar(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.route {
        Route::Chat => "MIT Smart Chatbot Assistant",
        Route::AdminLogin => "Admin Login",
        Route::AdminDashboard => "Admin Dashboard",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let heading = Paragraph::new(Span::styled(
        title,
        Style::default()
            .fg(THEME.accent)
            .add_modifier(Modifier::BOLD),
    ));
    f.render_widget(heading, inner);

    if app.route == Route::Chat && app.chat.step == ChatStep::Chatting && !app.chat.username.is_empty()
    {
        let user_info = Paragraph::new(Span::styled(
            format!("Hello, {}!", app.chat.username.to_uppercase()),
            Style::default().fg(THEME.success),
        ))
        .alignment(Alignment::Right);
        f.render_widget(user_info, inner);
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let hints = match app.route {
        Route::Chat => match app.chat.step {
            ChatStep::Onboarding => "Enter:Continue  Ctrl+A:Admin  Esc:Quit",
            ChatStep::SelectingType => "N:New student  E:Existing student  Esc:Quit",
            ChatStep::Chatting => "Enter:Send  Ctrl+A:Admin  Esc:Quit",
        },
        Route::AdminLogin => "Enter:Login  Tab:Switch field  Esc:Back to chat",
        Route::AdminDashboard => {
            if app.dashboard.answering.is_some() {
                "Enter:Submit answer  Esc:Cancel"
            } else {
                "Tab:Switch list  j/k:Select  Enter:Answer  r:Refresh  Esc:Chat  q:Quit"
            }
        }
    };

    let bar = Paragraph::new(Span::styled(hints, Style::default().fg(THEME.muted)));
    f.render_widget(bar, area);
}

pub fn spinner_frame(tick: u64) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    FRAMES[(tick as usize) % FRAMES.len()]
}

/// Fixed-size rect centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Greedy word wrap; words wider than the viewport are hard-split.
/// Scroll offsets are computed from the wrapped line count.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
            while current.chars().count() > width {
                let head: String = current.chars().take(width).collect();
                current = current.chars().skip(width).collect();
                lines.push(head);
            }
        }
        lines.push(current);
    }
    lines
}
