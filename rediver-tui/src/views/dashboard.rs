//! Dashboard: platform totals plus the most recent agents and jobs.

use crate::state::App;
use crate::theme::{agent_health_color, agent_status_color, job_status_color};
use crate::views::helpers::format_optional_time;
use crate::widgets::StatCard;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    render_stats(f, app, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_recent_agents(f, app, columns[0]);
    render_recent_jobs(f, app, columns[1]);
}

fn render_stats(f: &mut Frame<'_>, app: &App, area: Rect) {
    let stats = &app.dashboard.snapshot.stats;
    let theme = &app.theme;
    let placeholder = app.dashboard.loading && !app.dashboard.loaded;
    let value = |n: u64| if placeholder { "…".to_string() } else { n.to_string() };

    let cards = [
        StatCard {
            title: "Agents".to_string(),
            value: value(stats.agents.total),
            caption: format!("{} disabled", stats.agents.disabled),
            style: Style::default().fg(theme.primary),
            caption_style: Style::default().fg(theme.text_dim),
        },
        StatCard {
            title: "Online".to_string(),
            value: value(stats.agents.online),
            caption: format!("{} offline", stats.agents.offline),
            style: Style::default().fg(theme.success),
            caption_style: Style::default().fg(theme.text_dim),
        },
        StatCard {
            title: "Queued".to_string(),
            value: value(stats.jobs.queued),
            caption: format!("{} running", stats.jobs.running),
            style: Style::default().fg(theme.tertiary),
            caption_style: Style::default().fg(theme.text_dim),
        },
        StatCard {
            title: "Completed".to_string(),
            value: value(stats.jobs.completed),
            caption: format!("{} failed", stats.jobs.failed),
            style: Style::default().fg(theme.success),
            caption_style: Style::default().fg(theme.error),
        },
    ];

    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    for (card, slot) in cards.iter().zip(slots.iter()) {
        card.render(f, *slot);
    }
}

fn render_recent_agents(f: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let items: Vec<ListItem> = app
        .dashboard
        .snapshot
        .recent_agents
        .iter()
        .map(|agent| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<9}", agent.status.as_str()),
                    Style::default().fg(agent_status_color(agent.status, theme)),
                ),
                Span::styled(
                    format!("{:<8}", agent.health.as_str()),
                    Style::default().fg(agent_health_color(agent.health, theme)),
                ),
                Span::raw(agent.name.clone()),
                Span::styled(
                    format!(
                        "  {}",
                        format_optional_time(agent.last_heartbeat_at.as_ref(), "no heartbeat")
                    ),
                    Style::default().fg(theme.text_muted),
                ),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(if app.dashboard.refreshing { "Recent agents (refreshing…)" } else { "Recent agents" })
            .borders(Borders::ALL),
    );
    f.render_widget(list, area);
}

fn render_recent_jobs(f: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let items: Vec<ListItem> = app
        .dashboard
        .snapshot
        .recent_jobs
        .iter()
        .map(|job| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", job.status.as_str()),
                    Style::default().fg(job_status_color(job.status, theme)),
                ),
                Span::raw(format!("{} ", job.job_type.as_str())),
                Span::raw(job.target.clone()),
            ]))
        })
        .collect();
    let list = List::new(items).block(Block::default().title("Recent jobs").borders(Borders::ALL));
    f.render_widget(list, area);
}
