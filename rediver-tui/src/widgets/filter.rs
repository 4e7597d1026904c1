//! Filter bar widget.

use crate::list::FilterField;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub filters: &'a [FilterField],
    pub focus: usize,
    pub active_style: Style,
    pub inactive_style: Style,
    pub focus_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans: Vec<Span> = Vec::new();
        for (index, filter) in self.filters.iter().enumerate() {
            let value = filter.value.as_deref().unwrap_or("all");
            let mut style = if filter.value.is_some() {
                self.active_style
            } else {
                self.inactive_style
            };
            if index == self.focus {
                style = style.patch(self.focus_style).add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(format!(" {}: {} ", filter.label, value), style));
            spans.push(Span::raw(" "));
        }
        if spans.is_empty() {
            spans.push(Span::styled(" no filters ", self.inactive_style));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
