//! Console theme and color utilities.

use crate::notifications::NotificationLevel;
use rediver_core::{AdminRole, AgentHealth, AgentStatus, JobStatus, TokenStatus};
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct ConsoleTheme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl ConsoleTheme {
    pub fn console() -> Self {
        Self {
            bg: Color::Rgb(12, 14, 18),
            bg_secondary: Color::Rgb(24, 27, 33),
            bg_highlight: Color::Rgb(40, 45, 54),
            primary: Color::Rgb(56, 189, 248),
            primary_dim: Color::Rgb(30, 104, 138),
            secondary: Color::Rgb(167, 139, 250),
            tertiary: Color::Rgb(250, 204, 21),
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(245, 158, 11),
            error: Color::Rgb(239, 68, 68),
            info: Color::Rgb(56, 189, 248),
            text: Color::Rgb(229, 231, 235),
            text_dim: Color::Rgb(148, 163, 184),
            text_muted: Color::Rgb(71, 85, 105),
            border: Color::Rgb(51, 65, 85),
            border_focus: Color::Rgb(56, 189, 248),
        }
    }
}

pub fn agent_status_color(status: AgentStatus, theme: &ConsoleTheme) -> Color {
    match status {
        AgentStatus::Active => theme.success,
        AgentStatus::Disabled => theme.warning,
        AgentStatus::Revoked => theme.error,
    }
}

pub fn agent_health_color(health: AgentHealth, theme: &ConsoleTheme) -> Color {
    match health {
        AgentHealth::Online => theme.success,
        AgentHealth::Offline => theme.error,
        AgentHealth::Unknown => theme.text_dim,
    }
}

pub fn job_status_color(status: JobStatus, theme: &ConsoleTheme) -> Color {
    match status {
        JobStatus::Pending | JobStatus::Queued => theme.text_dim,
        JobStatus::Assigned | JobStatus::Running => theme.primary,
        JobStatus::Completed => theme.success,
        JobStatus::Failed | JobStatus::Timeout => theme.error,
        JobStatus::Cancelled => theme.warning,
    }
}

pub fn token_status_color(status: TokenStatus, theme: &ConsoleTheme) -> Color {
    match status {
        TokenStatus::Active => theme.success,
        TokenStatus::Expired | TokenStatus::Exhausted => theme.text_dim,
        TokenStatus::Revoked => theme.error,
    }
}

pub fn admin_role_color(role: AdminRole, theme: &ConsoleTheme) -> Color {
    match role {
        AdminRole::SuperAdmin => theme.secondary,
        AdminRole::OpsAdmin => theme.primary,
        AdminRole::Viewer => theme.text_dim,
    }
}

pub fn notification_color(level: NotificationLevel, theme: &ConsoleTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Success => theme.success,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
    }
}

pub fn utilization_color(percent: f32, theme: &ConsoleTheme) -> Color {
    if percent < 70.0 {
        theme.success
    } else if percent < 90.0 {
        theme.warning
    } else {
        theme.error
    }
}
