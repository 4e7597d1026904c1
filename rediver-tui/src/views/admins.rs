//! Admin list.

use crate::state::App;
use crate::theme::admin_role_color;
use crate::views::helpers::{format_optional_time, list_layout, render_pagination, render_table};
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row},
    Frame,
};

const HEADER: &[&str] = &["Name", "Email", "Role", "Active", "Last login"];

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let page = &app.admins;
    let theme = &app.theme;
    let (banner_area, table_area, footer_area) = list_layout(area);

    let me = app.principal();
    let banner = match &me {
        Some(principal) if principal.is_super_admin() => Line::from(Span::styled(
            " Signed in as super admin: create, delete and key rotation available",
            Style::default().fg(theme.text_dim),
        )),
        _ => Line::from(Span::styled(
            " Create, delete and key rotation require the super admin role",
            Style::default().fg(theme.warning),
        )),
    };
    f.render_widget(Paragraph::new(banner), banner_area);

    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|admin| {
            let name = if me.as_ref().is_some_and(|p| p.id == admin.id) {
                format!("{} (you)", admin.name)
            } else {
                admin.name.clone()
            };
            let (active, active_style) = if admin.is_active {
                ("yes", Style::default().fg(theme.success))
            } else {
                ("no", Style::default().fg(theme.text_muted))
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(admin.email.clone()),
                Cell::from(Span::styled(
                    admin.role.label(),
                    Style::default().fg(admin_role_color(admin.role, theme)),
                )),
                Cell::from(Span::styled(active, active_style)),
                Cell::from(format_optional_time(admin.last_login_at.as_ref(), "never")),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(30),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Min(16),
    ];
    render_table(f, table_area, page, HEADER, &widths, rows, theme);
    render_pagination(f, footer_area, &page.pagination, page.items.len(), theme);
}
