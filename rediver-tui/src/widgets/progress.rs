//! Gauge for used-versus-capacity figures: token uses, agent job slots,
//! host CPU and memory.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

pub struct UsageGauge {
    pub title: String,
    pub used: f64,
    pub capacity: f64,
    /// Label drawn on the bar; defaults to the percentage.
    pub label: Option<String>,
    pub style: Style,
}

impl UsageGauge {
    pub fn ratio(&self) -> f64 {
        if self.capacity <= 0.0 || !self.used.is_finite() {
            0.0
        } else {
            (self.used / self.capacity).clamp(0.0, 1.0)
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let ratio = self.ratio();
        let label = self
            .label
            .clone()
            .unwrap_or_else(|| format!("{:.0}%", ratio * 100.0));

        let gauge = Gauge::default()
            .block(Block::default().title(self.title.as_str()).borders(Borders::ALL))
            .gauge_style(self.style)
            .ratio(ratio)
            .label(label);
        f.render_widget(gauge, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge(used: f64, capacity: f64) -> UsageGauge {
        UsageGauge {
            title: "Jobs".to_string(),
            used,
            capacity,
            label: None,
            style: Style::default(),
        }
    }

    #[test]
    fn test_ratio_clamps() {
        assert_eq!(gauge(3.0, 0.0).ratio(), 0.0);
        assert_eq!(gauge(12.0, 10.0).ratio(), 1.0);
        assert_eq!(gauge(5.0, 10.0).ratio(), 0.5);
    }
}
