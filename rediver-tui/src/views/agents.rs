//! Agent list and agent detail.

use crate::state::App;
use crate::theme::{agent_health_color, agent_status_color, utilization_color};
use crate::views::helpers::{
    format_optional_time, format_time, list_layout, render_filters, render_pagination, render_table,
};
use crate::widgets::{DetailField, DetailPanel, UsageGauge};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Row},
    Frame,
};
use rediver_core::Agent;

const HEADER: &[&str] = &["Name", "Status", "Health", "Region", "Jobs", "Last heartbeat"];

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let page = &app.agents;
    let theme = &app.theme;
    let (filter_area, table_area, footer_area) = list_layout(area);

    render_filters(f, filter_area, &page.filter_fields(), page.filter_focus(), theme);

    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|agent| {
            Row::new(vec![
                Cell::from(agent.name.clone()),
                Cell::from(Span::styled(
                    agent.status.as_str(),
                    Style::default().fg(agent_status_color(agent.status, theme)),
                )),
                Cell::from(Span::styled(
                    agent.health.as_str(),
                    Style::default().fg(agent_health_color(agent.health, theme)),
                )),
                Cell::from(agent.region.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format!("{}/{}", agent.current_jobs, agent.max_concurrent_jobs)),
                Cell::from(format_optional_time(agent.last_heartbeat_at.as_ref(), "never")),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(26),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(7),
        Constraint::Min(16),
    ];
    render_table(f, table_area, page, HEADER, &widths, rows, theme);
    render_pagination(f, footer_area, &page.pagination, page.items.len(), theme);
}

pub fn render_detail(f: &mut Frame<'_>, app: &App, area: Rect) {
    let detail = &app.agent_detail;
    let Some(agent) = &detail.item else {
        let message = if detail.loading {
            "Loading agent…"
        } else {
            detail.error.as_deref().unwrap_or("Agent not found")
        };
        DetailPanel {
            title: "Agent",
            fields: Vec::new(),
            label_style: Style::default().fg(app.theme.text_dim),
            border_style: Style::default().fg(app.theme.border),
            empty_message: message,
        }
        .render(f, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_fields(f, app, agent, detail.refreshing, columns[0]);
    render_usage(f, app, agent, columns[1]);
}

fn render_fields(f: &mut Frame<'_>, app: &App, agent: &Agent, refreshing: bool, area: Rect) {
    let theme = &app.theme;
    let mut fields = vec![
        DetailField::new("ID", agent.id.to_string()),
        DetailField::new("Name", agent.name.clone()),
        DetailField::new("Type", agent.agent_type.clone()),
        DetailField::styled(
            "Status",
            agent.status.as_str(),
            Style::default().fg(agent_status_color(agent.status, theme)),
        ),
        DetailField::styled(
            "Health",
            agent.health.as_str(),
            Style::default().fg(agent_health_color(agent.health, theme)),
        ),
    ];
    if let Some(description) = &agent.description {
        fields.push(DetailField::new("Description", description.clone()));
    }
    fields.push(DetailField::new(
        "Region",
        agent.region.clone().unwrap_or_else(|| "-".to_string()),
    ));
    fields.push(DetailField::new(
        "Version",
        agent.version.clone().unwrap_or_else(|| "-".to_string()),
    ));
    if !agent.capabilities.is_empty() {
        fields.push(DetailField::new("Capabilities", agent.capabilities.join(", ")));
    }
    if !agent.tools.is_empty() {
        fields.push(DetailField::new("Tools", agent.tools.join(", ")));
    }
    fields.push(DetailField::new(
        "Completed",
        agent.total_jobs_completed.to_string(),
    ));
    fields.push(DetailField::new("Failed", agent.total_jobs_failed.to_string()));
    fields.push(DetailField::new(
        "Last heartbeat",
        format_optional_time(agent.last_heartbeat_at.as_ref(), "never"),
    ));
    fields.push(DetailField::new("Created", format_time(&agent.created_at)));

    DetailPanel {
        title: if refreshing { "Agent (refreshing…)" } else { "Agent" },
        fields,
        label_style: Style::default().fg(theme.secondary),
        border_style: Style::default().fg(theme.border_focus),
        empty_message: "",
    }
    .render(f, area);
}

fn render_usage(f: &mut Frame<'_>, app: &App, agent: &Agent, area: Rect) {
    let theme = &app.theme;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let load = agent.job_load();
    let gauges = [
        UsageGauge {
            title: "Job slots".to_string(),
            used: f64::from(agent.current_jobs),
            capacity: f64::from(agent.max_concurrent_jobs),
            label: Some(format!("{}/{}", agent.current_jobs, agent.max_concurrent_jobs)),
            style: Style::default().fg(utilization_color((load * 100.0) as f32, theme)),
        },
        UsageGauge {
            title: "CPU".to_string(),
            used: agent.cpu_percent,
            capacity: 100.0,
            label: None,
            style: Style::default().fg(utilization_color(agent.cpu_percent as f32, theme)),
        },
        UsageGauge {
            title: "Memory".to_string(),
            used: agent.memory_percent,
            capacity: 100.0,
            label: None,
            style: Style::default().fg(utilization_color(agent.memory_percent as f32, theme)),
        },
    ];
    for (gauge, slot) in gauges.iter().zip(rows.iter()) {
        gauge.render(f, *slot);
    }
}
