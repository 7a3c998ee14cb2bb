use ratatui::prelude::*;
use ratatui::widgets::*;

use keechat_core::DashboardTab;

use crate::app::App;
use crate::theme::THEME;
use crate::ui::{centered_rect, spinner_frame, wrap_text};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(f, app, chunks[0]);

    if app.dashboard.is_loading {
        let loading = Paragraph::new(format!("{} Loading questions...", spinner_frame(app.tick)))
            .style(Style::default().fg(THEME.muted))
            .alignment(Alignment::Center);
        f.render_widget(loading, centered_rect(chunks[1].width, 1, chunks[1]));
    } else {
        match app.dashboard.tab {
            DashboardTab::Unanswered => render_unanswered(f, app, chunks[1]),
            DashboardTab::Qa => render_qa(f, app, chunks[1]),
        }
    }

    if let Some(alert) = &app.dashboard.alert {
        let line = Paragraph::new(alert.as_str()).style(Style::default().fg(THEME.error));
        f.render_widget(line, chunks[2]);
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles = vec![
        format!("Unanswered Questions ({})", app.dashboard.questions.len()),
        format!("Q&A Database ({})", app.dashboard.qa_entries.len()),
    ];
    let selected = match app.dashboard.tab {
        DashboardTab::Unanswered => 0,
        DashboardTab::Qa => 1,
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(THEME.fg))
        .highlight_style(
            Style::default()
                .fg(THEME.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(THEME.border)),
        );
    f.render_widget(tabs, area);
}

fn render_unanswered(f: &mut Frame, app: &App, area: Rect) {
    if app.dashboard.questions.is_empty() {
        empty_state(
            f,
            area,
            "📝",
            "No unanswered questions",
            "All student questions have been answered!",
        );
        return;
    }

    let (list_area, editor_area) = if app.dashboard.answering.is_some() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(6)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    let width = list_area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .dashboard
        .questions
        .iter()
        .map(|q| {
            let mut lines = vec![Line::from(vec![
                Span::styled(q.format_created_at(), Style::default().fg(THEME.muted)),
                Span::raw("  "),
                Span::styled(
                    format!("User #{}", q.user_id),
                    Style::default().fg(THEME.accent),
                ),
            ])];
            for row in wrap_text(&q.question, width) {
                lines.push(Line::from(Span::styled(row, Style::default().fg(THEME.fg))));
            }
            lines.push(Line::default());
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(THEME.border))
                .title(" Questions "),
        )
        .highlight_style(Style::default().bg(THEME.highlight));
    let mut state = ListState::default();
    state.select(Some(app.selected_question));
    f.render_stateful_widget(list, list_area, &mut state);

    if let (Some(editor), Some(draft)) = (editor_area, app.dashboard.answering.as_ref()) {
        let input = Paragraph::new(format!("{}█", draft.text))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(THEME.accent))
                    .title(format!(" Answer question #{} ", draft.question_id)),
            );
        f.render_widget(input, editor);
    }
}

fn render_qa(f: &mut Frame, app: &App, area: Rect) {
    if app.dashboard.qa_entries.is_empty() {
        empty_state(
            f,
            area,
            "💡",
            "No Q&A entries yet",
            "Start answering student questions to build the knowledge base!",
        );
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .dashboard
        .qa_entries
        .iter()
        .map(|entry| {
            let mut lines = vec![Line::from(Span::styled(
                "Q:",
                Style::default()
                    .fg(THEME.accent)
                    .add_modifier(Modifier::BOLD),
            ))];
            for row in wrap_text(&entry.question, width) {
                lines.push(Line::from(Span::styled(row, Style::default().fg(THEME.fg))));
            }
            lines.push(Line::from(Span::styled(
                "A:",
                Style::default()
                    .fg(THEME.success)
                    .add_modifier(Modifier::BOLD),
            )));
            for row in wrap_text(&entry.answer, width) {
                lines.push(Line::from(Span::styled(row, Style::default().fg(THEME.fg))));
            }
            lines.push(Line::from(Span::styled(
                format!("Added: {}", entry.format_created_at()),
                Style::default().fg(THEME.muted),
            )));
            lines.push(Line::default());
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(THEME.border))
                .title(" Knowledge base "),
        )
        .highlight_style(Style::default().bg(THEME.highlight));
    let mut state = ListState::default();
    state.select(Some(app.selected_question));
    f.render_stateful_widget(list, area, &mut state);
}

fn empty_state(f: &mut Frame, area: Rect, icon: &str, title: &str, copy: &str) {
    let text = Text::from(vec![
        Line::from(icon.to_string()),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(THEME.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            copy.to_string(),
            Style::default().fg(THEME.muted),
        )),
    ]);
    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    f.render_widget(paragraph, centered_rect(area.width, 3, area));
}
