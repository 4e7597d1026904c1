//! Login screen and the auth-gate placeholder.

use crate::state::App;
use crate::views::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Shown while the gate validates the stored key. Nothing protected renders.
pub fn render_checking(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(40, 20, f.size());
    let paragraph = Paragraph::new("Checking session…")
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.text_dim))
        .block(Block::default().borders(Borders::ALL).title("Rediver Admin"));
    f.render_widget(paragraph, area);
}

pub fn render(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(60, 40, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focus))
        .title(Span::styled(
            "Rediver Admin · Sign in",
            Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new("Enter your admin API key.")
            .style(Style::default().fg(app.theme.text_dim)),
        rows[0],
    );

    let input = Paragraph::new(app.login.input.display())
        .style(Style::default().fg(app.theme.text))
        .block(Block::default().borders(Borders::ALL).title("API key"));
    f.render_widget(input, rows[1]);

    let status = if app.login.submitting {
        Line::from(Span::styled(
            "Validating…",
            Style::default().fg(app.theme.info),
        ))
    } else if let Some(error) = &app.login.error {
        Line::from(Span::styled(error.as_str(), Style::default().fg(app.theme.error)))
    } else {
        Line::from(Span::styled(
            "Enter sign in • Esc quit",
            Style::default().fg(app.theme.text_muted),
        ))
    };
    f.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), rows[2]);
}
