use ratatui::prelude::*;
use ratatui::widgets::*;

use keechat_core::{ChatStep, Message};

use crate::app::App;
use crate::theme::THEME;
use crate::ui::{centered_rect, spinner_frame, wrap_text};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    match app.chat.step {
        ChatStep::Onboarding => render_onboarding(f, app, area),
        ChatStep::SelectingType => render_role_selection(f, app, area),
        ChatStep::Chatting => render_conversation(f, app, area),
    }
}

fn render_onboarding(f: &mut Frame, app: &App, area: Rect) {
    let form = centered_rect(48, 9, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border))
        .title(Span::styled(
            " Welcome! Let's get started ",
            Style::default().fg(THEME.accent),
        ));
    let inner = block.inner(form);
    f.render_widget(block, form);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let prompt = Paragraph::new("What should Kee call you?")
        .style(Style::default().fg(THEME.fg));
    f.render_widget(prompt, rows[0]);

    let input = Paragraph::new(format!("{}█", app.chat_input)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(THEME.accent))
            .title(" Username "),
    );
    f.render_widget(input, rows[1]);

    if let Some(alert) = &app.chat.alert {
        let warning = Paragraph::new(alert.as_str()).style(Style::default().fg(THEME.error));
        f.render_widget(warning, rows[2]);
    }
}

fn render_role_selection(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    render_transcript(f, app, chunks[0]);

    let buttons = Line::from(vec![
        Span::styled(
            "[N] New Student",
            Style::default()
                .fg(THEME.warning)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("     "),
        Span::styled(
            "[E] Existing Student",
            Style::default()
                .fg(THEME.success)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    let bar = Paragraph::new(buttons)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(THEME.border)),
        );
    f.render_widget(bar, chunks[1]);
}

fn render_conversation(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    render_transcript(f, app, chunks[0]);

    let input_style = if app.chat.is_typing {
        Style::default().fg(THEME.muted)
    } else {
        Style::default().fg(THEME.fg)
    };
    let input = Paragraph::new(format!("{}█", app.chat_input))
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(THEME.border))
                .title(" Message "),
        );
    f.render_widget(input, chunks[1]);
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border))
        .title(" Conversation ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.chat.history.is_loading() {
        let loading = Paragraph::new(format!(
            "{} Loading chat history...",
            spinner_frame(app.tick)
        ))
        .style(Style::default().fg(THEME.muted))
        .alignment(Alignment::Center);
        f.render_widget(loading, centered_rect(inner.width, 1, inner));
        return;
    }

    if let Some(err) = app.chat.history.error() {
        let error = Paragraph::new(err)
            .style(Style::default().fg(THEME.error))
            .alignment(Alignment::Center);
        f.render_widget(error, centered_rect(inner.width, 1, inner));
        return;
    }

    let lines = transcript_lines(app, inner.width as usize);
    // pinned to the newest message
    let scroll = lines.len().saturating_sub(inner.height as usize) as u16;
    let transcript = Paragraph::new(Text::from(lines)).scroll((scroll, 0));
    f.render_widget(transcript, inner);
}

fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in &app.chat.messages {
        lines.push(speaker_line(message, &app.chat.username));
        for row in wrap_text(&message.content, width) {
            lines.push(Line::from(Span::styled(
                row,
                Style::default().fg(THEME.fg),
            )));
        }
        lines.push(Line::default());
    }
    if app.chat.is_typing {
        lines.push(Line::from(Span::styled(
            format!("Kee is typing {}", spinner_frame(app.tick)),
            Style::default().fg(THEME.muted),
        )));
    }
    lines
}

fn speaker_line(message: &Message, username: &str) -> Line<'static> {
    let (name, color) = if message.is_bot {
        ("Kee".to_string(), THEME.accent)
    } else {
        (username.to_string(), THEME.success)
    };
    Line::from(vec![
        Span::styled(
            name,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", message.format_time()),
            Style::default().fg(THEME.muted),
        ),
    ])
}
