//! Bootstrap token list.

use crate::state::App;
use crate::theme::token_status_color;
use crate::views::helpers::{format_time, list_layout, render_filters, render_pagination, render_table};
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Row},
    Frame,
};

const HEADER: &[&str] = &["Prefix", "Description", "Status", "Uses", "Expires", "Created by"];

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let page = &app.tokens;
    let theme = &app.theme;
    let (filter_area, table_area, footer_area) = list_layout(area);

    render_filters(f, filter_area, &page.filter_fields(), page.filter_focus(), theme);

    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|token| {
            let status = token.status();
            Row::new(vec![
                Cell::from(format!("{}…", token.token_prefix)),
                Cell::from(token.description.clone()),
                Cell::from(Span::styled(
                    status.as_str(),
                    Style::default().fg(token_status_color(status, theme)),
                )),
                Cell::from(format!("{}/{}", token.current_uses, token.max_uses)),
                Cell::from(format_time(&token.expires_at)),
                Cell::from(token.created_by_name.clone().unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Percentage(30),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(17),
        Constraint::Min(10),
    ];
    render_table(f, table_area, page, HEADER, &widths, rows, theme);
    render_pagination(f, footer_area, &page.pagination, page.items.len(), theme);
}
