//! Detail panel widget for showing field/value pairs.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// One labelled row. `style` colors the value; `None` renders it plain.
pub struct DetailField<'a> {
    pub label: &'a str,
    pub value: String,
    pub style: Option<Style>,
}

impl<'a> DetailField<'a> {
    pub fn new(label: &'a str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            style: None,
        }
    }

    pub fn styled(label: &'a str, value: impl Into<String>, style: Style) -> Self {
        Self {
            label,
            value: value.into(),
            style: Some(style),
        }
    }
}

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<DetailField<'a>>,
    pub label_style: Style,
    pub border_style: Style,
    /// Shown instead of the fields when there are none.
    pub empty_message: &'a str,
}

impl<'a> DetailPanel<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let width = self
            .fields
            .iter()
            .map(|field| field.label.chars().count())
            .max()
            .unwrap_or(0);

        let lines: Vec<Line> = if self.fields.is_empty() {
            vec![Line::from(Span::styled(self.empty_message, self.label_style))]
        } else {
            self.fields
                .iter()
                .map(|field| {
                    let value = match field.style {
                        Some(style) => Span::styled(field.value.clone(), style),
                        None => Span::raw(field.value.clone()),
                    };
                    Line::from(vec![
                        Span::styled(format!("{:<width$}  ", field.label), self.label_style),
                        value,
                    ])
                })
                .collect()
        };

        let widget = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
