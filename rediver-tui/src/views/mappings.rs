//! Target/asset type mapping list.

use crate::state::App;
use crate::views::helpers::{list_layout, render_filters, render_pagination, render_table};
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Row},
    Frame,
};

const HEADER: &[&str] = &["Target type", "Asset type", "Priority", "Primary", "Active", "Description"];

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let page = &app.mappings;
    let theme = &app.theme;
    let (filter_area, table_area, footer_area) = list_layout(area);

    render_filters(f, filter_area, &page.filter_fields(), page.filter_focus(), theme);

    let flag = |on: bool| {
        if on {
            Span::styled("yes", Style::default().fg(theme.success))
        } else {
            Span::styled("no", Style::default().fg(theme.text_muted))
        }
    };

    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|mapping| {
            Row::new(vec![
                Cell::from(mapping.target_type.clone()),
                Cell::from(mapping.asset_type.clone()),
                Cell::from(
                    mapping
                        .priority
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(flag(mapping.is_primary)),
                Cell::from(flag(mapping.is_active)),
                Cell::from(mapping.description.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Min(10),
    ];
    render_table(f, table_area, page, HEADER, &widths, rows, theme);
    render_pagination(f, footer_area, &page.pagination, page.items.len(), theme);
}
