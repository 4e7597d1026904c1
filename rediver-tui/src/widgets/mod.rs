//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod progress;
pub mod status;

pub use detail::{DetailField, DetailPanel};
pub use filter::FilterBar;
pub use progress::UsageGauge;
pub use status::StatCard;
