//! Audit log list.

use crate::state::App;
use crate::views::helpers::{format_time, list_layout, render_filters, render_pagination, render_table};
use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Cell, Row},
    Frame,
};

const HEADER: &[&str] = &["Time", "Action", "Actor", "Resource", "IP"];

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let page = &app.audit_logs;
    let theme = &app.theme;
    let (filter_area, table_area, footer_area) = list_layout(area);

    render_filters(f, filter_area, &page.filter_fields(), page.filter_focus(), theme);

    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|log| {
            let resource = match (&log.resource_name, &log.resource_id) {
                (Some(name), _) => format!("{} {}", log.resource_type, name),
                (None, Some(id)) => format!("{} {}", log.resource_type, id),
                (None, None) => log.resource_type.clone(),
            };
            Row::new(vec![
                Cell::from(format_time(&log.created_at)),
                Cell::from(log.action.clone()),
                Cell::from(log.actor_label()),
                Cell::from(resource),
                Cell::from(log.ip_address.clone().unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(17),
        Constraint::Length(20),
        Constraint::Percentage(20),
        Constraint::Percentage(35),
        Constraint::Min(12),
    ];
    render_table(f, table_area, page, HEADER, &widths, rows, theme);
    render_pagination(f, footer_area, &page.pagination, page.items.len(), theme);
}
