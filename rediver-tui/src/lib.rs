//! Rediver admin console library exports.

pub mod actions;
pub mod config;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod events;
pub mod fetch;
pub mod forms;
pub mod handlers;
pub mod keys;
pub mod list;
pub mod nav;
pub mod notifications;
pub mod poller;
pub mod resources;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
