//! Dismissible message channel.
//!
//! Errors from every flow end up here. Messages expire on their own after the
//! configured timeout and can be dismissed earlier.

use crate::error::DashError;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use strum::Display;

/// Default auto-dismiss delay
pub const DEFAULT_NOTICE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NoticeKind {
    Validation,
    Server,
    Transport,
    NotFound,
    Info,
}

impl NoticeKind {
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: Instant,
}

/// Newest-first queue of visible messages
#[derive(Debug, Clone)]
pub struct Notices {
    items: VecDeque<Notice>,
    next_id: u64,
    timeout: Duration,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TIMEOUT)
    }
}

impl Notices {
    pub fn new(timeout: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            next_id: 1,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Show a message; returns its id
    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Instant::now())
    }

    pub fn push_at(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push_front(Notice {
            id,
            kind,
            message: message.into(),
            raised_at: now,
        });
        id
    }

    /// Surface a flow error
    pub fn raise(&mut self, error: &DashError) -> u64 {
        self.push(error.kind(), error.message())
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeKind::Info, message)
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn dismiss_latest(&mut self) -> Option<Notice> {
        self.items.pop_front()
    }

    /// Drop messages older than the timeout; returns how many were removed
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        let timeout = self.timeout;
        self.items
            .retain(|n| now.saturating_duration_since(n.raised_at) < timeout);
        before - self.items.len()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut notices = Notices::default();
        notices.push(NoticeKind::Validation, "first");
        notices.push(NoticeKind::Server, "second");
        assert_eq!(notices.latest().unwrap().message, "second");
        assert_eq!(notices.len(), 2);
    }

    #[test]
    fn test_expire_after_timeout() {
        let mut notices = Notices::new(Duration::from_secs(5));
        let start = Instant::now();
        notices.push_at(NoticeKind::Validation, "old", start);
        notices.push_at(NoticeKind::Validation, "new", start + Duration::from_secs(3));

        assert_eq!(notices.expire(start + Duration::from_secs(4)), 0);
        assert_eq!(notices.expire(start + Duration::from_secs(5)), 1);
        assert_eq!(notices.latest().unwrap().message, "new");
        assert_eq!(notices.expire(start + Duration::from_secs(9)), 1);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_dismiss_by_id() {
        let mut notices = Notices::default();
        let a = notices.push(NoticeKind::NotFound, "a");
        let b = notices.push(NoticeKind::Transport, "b");
        assert!(notices.dismiss(a));
        assert!(!notices.dismiss(a));
        assert_eq!(notices.latest().unwrap().id, b);
        assert_eq!(notices.dismiss_latest().unwrap().id, b);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_raise_uses_error_kind() {
        let mut notices = Notices::default();
        notices.raise(&DashError::not_found("No image found to download"));
        let notice = notices.latest().unwrap();
        assert_eq!(notice.kind, NoticeKind::NotFound);
        assert!(notice.kind.is_error());
        assert_eq!(notice.message, "No image found to download");
    }
}
