use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, LoginField};
use crate::theme::THEME;
use crate::ui::centered_rect;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let form = centered_rect(44, 12, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border))
        .title(Span::styled(
            " Admin Login ",
            Style::default().fg(THEME.accent),
        ));
    let inner = block.inner(form);
    f.render_widget(block, form);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    render_field(
        f,
        rows[0],
        " Email ",
        &app.login_email,
        app.login_field == LoginField::Email,
        false,
    );
    render_field(
        f,
        rows[1],
        " Password ",
        &app.login_password,
        app.login_field == LoginField::Password,
        true,
    );

    if let Some(error) = &app.login.error {
        let line = Paragraph::new(error.as_str()).style(Style::default().fg(THEME.error));
        f.render_widget(line, rows[2]);
    }

    if app.login.is_loading {
        let line = Paragraph::new("Loading...").style(Style::default().fg(THEME.muted));
        f.render_widget(line, rows[3]);
    }
}

fn render_field(f: &mut Frame, area: Rect, title: &str, value: &str, active: bool, masked: bool) {
    let border = if active { THEME.accent } else { THEME.border };
    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if active { "█" } else { "" };
    let field = Paragraph::new(format!("{shown}{cursor}")).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title.to_string()),
    );
    f.render_widget(field, area);
}
