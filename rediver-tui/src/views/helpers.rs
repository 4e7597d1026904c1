//! Common view rendering helpers.

use crate::list::{FilterField, ListPage, ListResource};
use crate::theme::ConsoleTheme;
use crate::widgets::FilterBar;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
    Frame,
};
use rediver_core::Pagination;

/// Filter bar, table, pagination line.
pub fn list_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

pub fn render_filters(
    f: &mut Frame<'_>,
    area: Rect,
    filters: &[FilterField],
    focus: usize,
    theme: &ConsoleTheme,
) {
    let bar = FilterBar {
        title: "Filters [f change · F next · C clear]",
        filters,
        focus,
        active_style: Style::default().fg(theme.bg).bg(theme.primary),
        inactive_style: Style::default().fg(theme.text_dim),
        focus_style: Style::default().add_modifier(Modifier::UNDERLINED),
    };
    bar.render(f, area);
}

/// Render `rows` as a table with the selected row highlighted.
pub fn render_table<'a, R: ListResource>(
    f: &mut Frame<'_>,
    area: Rect,
    page: &ListPage<R>,
    header: &'a [&'a str],
    widths: &[Constraint],
    rows: Vec<Row<'a>>,
    theme: &ConsoleTheme,
) {
    let title = match (page.loading, page.refreshing) {
        (true, _) => format!("{} (loading…)", capitalize(page.label())),
        (_, true) => format!("{} (refreshing…)", capitalize(page.label())),
        _ => capitalize(page.label()),
    };

    let empty = rows.is_empty();
    let header = Row::new(header.iter().copied())
        .style(Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD));
    let table = Table::new(rows, widths.to_vec())
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .highlight_style(Style::default().bg(theme.bg_highlight).fg(theme.primary));

    if empty && !page.loading {
        let message = if page.last_error.is_some() {
            format!("Could not load {}", page.label())
        } else {
            format!("No {} found", page.label())
        };
        let inner = Block::default().borders(Borders::ALL).inner(area);
        f.render_widget(table, area);
        // Row 0 of the inner area holds the header.
        if inner.height > 1 {
            let notice = Rect {
                y: inner.y + 1,
                height: 1,
                ..inner
            };
            f.render_widget(
                Paragraph::new(message).style(Style::default().fg(theme.text_muted)),
                notice,
            );
        }
        return;
    }

    let mut state = TableState::default();
    state.select(page.selected_index());
    f.render_stateful_widget(table, area, &mut state);
}

/// "Page 2 of 3 · 21-40 of 45 · [h] prev [l] next" with unavailable
/// directions dimmed.
pub fn render_pagination(
    f: &mut Frame<'_>,
    area: Rect,
    pagination: &Pagination,
    shown: usize,
    theme: &ConsoleTheme,
) {
    let pages = pagination.total_pages().max(1);
    let range = match pagination.visible_range(shown) {
        Some((start, end)) => format!("{start}-{end} of {}", pagination.total()),
        None => format!("0 of {}", pagination.total()),
    };
    let enabled = Style::default().fg(theme.text);
    let disabled = Style::default().fg(theme.text_muted);

    let line = Line::from(vec![
        Span::styled(
            format!(" Page {} of {pages} · {range} · ", pagination.page()),
            Style::default().fg(theme.text_dim),
        ),
        Span::styled(
            "[h] prev",
            if pagination.has_prev() { enabled } else { disabled },
        ),
        Span::raw(" "),
        Span::styled(
            "[l] next",
            if pagination.has_next() { enabled } else { disabled },
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_optional_time(at: Option<&DateTime<Utc>>, missing: &str) -> String {
    at.map(format_time).unwrap_or_else(|| missing.to_string())
}

/// Elapsed time as "2h 05m", "4m 10s" or "12s".
pub fn format_duration(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
