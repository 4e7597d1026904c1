//! Notification system for the console.

use chrono::{DateTime, Duration, Utc};

/// How long a notification stays in the footer.
pub const NOTIFICATION_TTL_SECS: i64 = 5;
const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl NotificationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
            NotificationLevel::Success => "OK",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(NOTIFICATION_TTL_SECS)
    }
}

/// Bounded notification history; the footer shows the newest live entry.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    entries: Vec<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        self.entries.push(notification);
        if self.entries.len() > HISTORY_LIMIT {
            let overflow = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..overflow);
        }
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|n| !n.is_expired(now));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_drops_expired() {
        let mut notes = Notifications::default();
        let mut old = Notification::new(NotificationLevel::Info, "old");
        old.created_at = Utc::now() - Duration::seconds(NOTIFICATION_TTL_SECS + 1);
        notes.push(old);
        notes.push(Notification::new(NotificationLevel::Error, "fresh"));

        notes.prune(Utc::now());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.latest().map(|n| n.message.as_str()), Some("fresh"));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut notes = Notifications::default();
        for i in 0..(HISTORY_LIMIT + 5) {
            notes.push(Notification::new(NotificationLevel::Info, i.to_string()));
        }
        assert_eq!(notes.len(), HISTORY_LIMIT);
        assert_eq!(
            notes.iter().next().map(|n| n.message.clone()),
            Some("5".to_string())
        );
    }
}
