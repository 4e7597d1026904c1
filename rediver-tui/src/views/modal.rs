//! Modal overlays: help, confirmation, forms, secret reveal, audit details
//! and the text filter prompt.

use crate::forms::Form;
use crate::keys::HELP_LINES;
use crate::state::{App, Modal};
use crate::views::centered_rect;
use crate::views::helpers::format_time;
use crate::widgets::{DetailField, DetailPanel};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use rediver_core::AuditLog;

pub fn render(f: &mut Frame<'_>, app: &App, modal: &Modal) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::Confirm { prompt, .. } => render_confirm(f, app, prompt),
        Modal::Form(form) => render_form(f, app, form),
        Modal::Secret(reveal) => render_secret(f, app, &reveal.title, reveal.secret.expose()),
        Modal::AuditDetail(log) => render_audit(f, app, log),
        Modal::FilterInput { label, input } => {
            let area = fixed_height(centered_rect(50, 20, f.size()), 3, f.size());
            f.render_widget(Clear, area);
            let prompt = Paragraph::new(input.display()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border_focus))
                    .title(format!("{label} · Enter apply · empty clears · Esc cancel")),
            );
            f.render_widget(prompt, area);
        }
    }
}

fn frame_block<'a>(app: &App, title: impl Into<Line<'a>>) -> Block<'a> {
    let title: Line<'a> = title.into();
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focus))
        .style(Style::default().bg(app.theme.bg_secondary))
        .title(title)
}

fn render_help(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(format!("{keys:<12}"), Style::default().fg(app.theme.primary)),
                Span::raw(*description),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(frame_block(app, "Keybindings · Esc close")),
        area,
    );
}

fn render_confirm(f: &mut Frame<'_>, app: &App, prompt: &str) {
    let area = fixed_height(centered_rect(50, 30, f.size()), 6, f.size());
    f.render_widget(Clear, area);
    let text = Text::from(vec![
        Line::from(prompt.to_string()),
        Line::default(),
        Line::from(Span::styled(
            "Enter/y confirm · Esc/n cancel",
            Style::default().fg(app.theme.text_dim),
        )),
    ]);
    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(frame_block(app, Span::styled("Confirm", Style::default().fg(app.theme.warning)))),
        area,
    );
}

fn render_form(f: &mut Frame<'_>, app: &App, form: &Form) {
    let height = form.fields.len() as u16 + 4;
    let area = fixed_height(centered_rect(60, 60, f.size()), height, f.size());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let focused = index == form.focus;
            let marker = if focused { "› " } else { "  " };
            let value_style = if focused {
                Style::default()
                    .fg(app.theme.text)
                    .add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(app.theme.text)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(app.theme.primary)),
                Span::styled(
                    format!("{:<34}", field.label),
                    Style::default().fg(app.theme.text_dim),
                ),
                Span::styled(field.display(), value_style),
            ])
        })
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Tab next · ←/→ change choice · Enter submit · Esc cancel",
        Style::default().fg(app.theme.text_muted),
    )));

    f.render_widget(Paragraph::new(lines).block(frame_block(app, form.title())), area);
}

fn render_secret(f: &mut Frame<'_>, app: &App, title: &str, secret: &str) {
    let area = fixed_height(centered_rect(70, 40, f.size()), 8, f.size());
    f.render_widget(Clear, area);
    let text = Text::from(vec![
        Line::from(Span::styled(
            secret.to_string(),
            Style::default()
                .fg(app.theme.tertiary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Copy this value now. It cannot be retrieved again.",
            Style::default().fg(app.theme.warning),
        )),
        Line::from(Span::styled(
            "Enter/Esc close",
            Style::default().fg(app.theme.text_dim),
        )),
    ]);
    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(frame_block(app, title.to_string())),
        area,
    );
}

fn render_audit(f: &mut Frame<'_>, app: &App, log: &AuditLog) {
    let area = centered_rect(70, 70, f.size());
    f.render_widget(Clear, area);

    let mut fields = vec![
        DetailField::new("ID", log.id.to_string()),
        DetailField::new("Time", format_time(&log.created_at)),
        DetailField::new("Action", log.action.clone()),
        DetailField::new("Actor type", log.actor_type.as_str()),
        DetailField::new("Actor", log.actor_label()),
        DetailField::new("Resource type", log.resource_type.clone()),
    ];
    if let Some(id) = &log.resource_id {
        fields.push(DetailField::new("Resource ID", id.clone()));
    }
    if let Some(name) = &log.resource_name {
        fields.push(DetailField::new("Resource", name.clone()));
    }
    if let Some(ip) = &log.ip_address {
        fields.push(DetailField::new("IP address", ip.clone()));
    }
    if let Some(agent) = &log.user_agent {
        fields.push(DetailField::new("User agent", agent.clone()));
    }
    if let Some(details) = &log.details {
        fields.push(DetailField::new("Details", details.to_string()));
    }

    DetailPanel {
        title: "Audit entry · Esc close",
        fields,
        label_style: Style::default().fg(app.theme.secondary),
        border_style: Style::default().fg(app.theme.border_focus),
        empty_message: "",
    }
    .render(f, area);
}

/// Keep the columns of `area` but give it `height` rows, centred in `bounds`.
fn fixed_height(area: Rect, height: u16, bounds: Rect) -> Rect {
    let height = height.min(bounds.height);
    let y = bounds.y + (bounds.height - height) / 2;
    Rect { y, height, ..area }
}
