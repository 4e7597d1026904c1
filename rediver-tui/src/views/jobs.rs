//! Job list and job detail.

use crate::poller::JOB_DETAIL_POLL_INTERVAL;
use crate::state::App;
use crate::theme::job_status_color;
use crate::views::helpers::{
    format_duration, format_optional_time, format_time, list_layout, render_filters,
    render_pagination, render_table,
};
use crate::widgets::{DetailField, DetailPanel, UsageGauge};
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Row},
    Frame,
};

const HEADER: &[&str] = &["Status", "Type", "Target", "Agent", "Progress", "Created"];

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let page = &app.jobs;
    let theme = &app.theme;
    let (filter_area, table_area, footer_area) = list_layout(area);

    render_filters(f, filter_area, &page.filter_fields(), page.filter_focus(), theme);

    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|job| {
            Row::new(vec![
                Cell::from(Span::styled(
                    job.status.as_str(),
                    Style::default().fg(job_status_color(job.status, theme)),
                )),
                Cell::from(job.job_type.as_str()),
                Cell::from(job.target.clone()),
                Cell::from(job.agent_name.clone().unwrap_or_else(|| "unassigned".to_string())),
                Cell::from(format!("{}%", job.progress)),
                Cell::from(format_time(&job.created_at)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(13),
        Constraint::Percentage(35),
        Constraint::Percentage(20),
        Constraint::Length(9),
        Constraint::Min(16),
    ];
    render_table(f, table_area, page, HEADER, &widths, rows, theme);
    render_pagination(f, footer_area, &page.pagination, page.items.len(), theme);
}

pub fn render_detail(f: &mut Frame<'_>, app: &App, area: Rect) {
    let detail = &app.job_detail;
    let theme = &app.theme;
    let Some(job) = &detail.item else {
        let message = if detail.loading {
            "Loading job…"
        } else {
            detail.error.as_deref().unwrap_or("Job not found")
        };
        DetailPanel {
            title: "Job",
            fields: Vec::new(),
            label_style: Style::default().fg(theme.text_dim),
            border_style: Style::default().fg(theme.border),
            empty_message: message,
        }
        .render(f, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let live = job.is_live();
    UsageGauge {
        title: if live {
            format!(
                "Progress · auto-refresh every {}s",
                JOB_DETAIL_POLL_INTERVAL.as_secs()
            )
        } else {
            "Progress".to_string()
        },
        used: f64::from(job.progress),
        capacity: 100.0,
        label: None,
        style: Style::default().fg(job_status_color(job.status, theme)),
    }
    .render(f, rows[0]);

    let mut fields = vec![
        DetailField::new("ID", job.id.to_string()),
        DetailField::styled(
            "Status",
            job.status.as_str(),
            Style::default().fg(job_status_color(job.status, theme)),
        ),
        DetailField::new("Type", job.job_type.as_str()),
        DetailField::new("Scanner", job.scanner_name.clone()),
        DetailField::new("Target", job.target.clone()),
        DetailField::new(
            "Tenant",
            job.tenant_name.clone().unwrap_or_else(|| job.tenant_id.to_string()),
        ),
        DetailField::new(
            "Agent",
            job.agent_name
                .clone()
                .or_else(|| job.agent_id.map(|id| id.to_string()))
                .unwrap_or_else(|| "unassigned".to_string()),
        ),
        DetailField::new("Priority", job.priority.to_string()),
    ];
    if let Some(position) = job.queue_position {
        fields.push(DetailField::new("Queue position", position.to_string()));
    }
    fields.push(DetailField::new("Timeout", format!("{}s", job.timeout_seconds)));
    fields.push(DetailField::new("Created", format_time(&job.created_at)));
    fields.push(DetailField::new(
        "Started",
        format_optional_time(job.started_at.as_ref(), "-"),
    ));
    fields.push(DetailField::new(
        "Completed",
        format_optional_time(job.completed_at.as_ref(), "-"),
    ));
    if let Some(elapsed) = job.elapsed(Utc::now()) {
        fields.push(DetailField::new("Elapsed", format_duration(elapsed)));
    }
    if let Some(error) = &job.error_message {
        fields.push(DetailField::styled(
            "Error",
            error.clone(),
            Style::default().fg(theme.error),
        ));
    }

    DetailPanel {
        title: if detail.refreshing { "Job (refreshing…)" } else { "Job" },
        fields,
        label_style: Style::default().fg(theme.secondary),
        border_style: Style::default().fg(theme.border_focus),
        empty_message: "",
    }
    .render(f, rows[1]);
}
