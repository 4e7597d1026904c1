//! View rendering dispatch.

pub mod admins;
pub mod agents;
pub mod audit_logs;
pub mod dashboard;
pub mod helpers;
pub mod jobs;
pub mod login;
pub mod mappings;
pub mod modal;
pub mod tokens;

pub use helpers::centered_rect;

use crate::nav::View;
use crate::state::{App, Screen};
use crate::theme::notification_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    match app.screen {
        Screen::Checking => login::render_checking(f, app),
        Screen::Login => login::render(f, app),
        Screen::Console => render_console(f, app),
    }
}

fn render_console(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.view {
        View::Dashboard => dashboard::render(f, app, layout[1]),
        View::Agents => agents::render(f, app, layout[1]),
        View::AgentDetail => agents::render_detail(f, app, layout[1]),
        View::Jobs => jobs::render(f, app, layout[1]),
        View::JobDetail => jobs::render_detail(f, app, layout[1]),
        View::Tokens => tokens::render(f, app, layout[1]),
        View::Admins => admins::render(f, app, layout[1]),
        View::AuditLogs => audit_logs::render(f, app, layout[1]),
        View::TargetMappings => mappings::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if let Some(modal) = &app.modal {
        modal::render(f, app, modal);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let who = match app.principal() {
        Some(principal) => format!("{} ({})", principal.name, principal.role.label()),
        None => "signed out".to_string(),
    };
    let titles: Vec<Line> = View::all()
        .iter()
        .enumerate()
        .map(|(index, view)| Line::from(format!("{} {}", index + 1, view.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.view.index())
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border))
                .title(Span::styled(
                    format!("REDIVER ADMIN | {who}"),
                    Style::default().fg(app.theme.primary),
                )),
        );
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = match app.view {
        View::Agents => "Enter open • D drain • u uncordon • d delete • f filter • ? help • q quit",
        View::AgentDetail => "Esc back • D drain • u uncordon • d delete • r refresh",
        View::Jobs => "Enter open • c cancel • R retry • f filter • ? help • q quit",
        View::JobDetail => "Esc back • c cancel • R retry • r refresh",
        View::Tokens => "n new • d revoke • f filter • ? help • q quit",
        View::Admins => "n new • a toggle active • K rotate key • d delete • ? help",
        View::AuditLogs => "Enter details • f filter • F next filter • ? help • q quit",
        View::TargetMappings => "n new • e edit • d delete • x export • f filter • ? help",
        View::Dashboard => "Tab switch view • r refresh • L log out • ? help • q quit",
    };
    let (text, style) = match app.notifications.latest() {
        Some(note) => (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::TOP))
        .style(style);
    f.render_widget(footer, area);
}
