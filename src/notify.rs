//! Dismissible notifications and the single-line status bar.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
    next_id: u64,
    status: String,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        let message = message.into();
        match level {
            NotificationLevel::Error => log::error!("{}", message),
            NotificationLevel::Warning => log::warn!("{}", message),
            NotificationLevel::Info | NotificationLevel::Success => log::info!("{}", message),
        }
        self.next_id += 1;
        self.queue.push_back(Notification {
            id: self.next_id,
            level,
            message,
        });
        self.next_id
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Info, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Success, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Warning, message)
    }

    /// Error toast plus matching status line.
    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        let message = message.into();
        self.status = message.clone();
        self.push(NotificationLevel::Error, message)
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }

    pub fn pending(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_removes_only_target() {
        let mut n = Notifications::new();
        let first = n.info("one");
        let second = n.success("two");
        assert!(n.dismiss(first));
        assert!(!n.dismiss(first));
        assert_eq!(n.pending().count(), 1);
        assert_eq!(n.latest().unwrap().id, second);
    }

    #[test]
    fn test_error_updates_status_line() {
        let mut n = Notifications::new();
        n.set_status("Ready to scan");
        n.error("Settings could not be saved");
        assert_eq!(n.status(), "Settings could not be saved");
        assert_eq!(n.latest().unwrap().level, NotificationLevel::Error);
    }
}
