//! Stat card widget: one headline number with a caption.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct StatCard {
    pub title: String,
    pub value: String,
    pub caption: String,
    pub style: Style,
    pub caption_style: Style,
}

impl StatCard {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                self.value.clone(),
                self.style.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(self.caption.clone(), self.caption_style)),
        ];
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .title(self.title.as_str())
                .borders(Borders::ALL),
        );
        f.render_widget(paragraph, area);
    }
}
