//! Transient user-visible messages shown after mutations and failures

use std::time::Duration;

/// Types of notices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Banner message with kind and creation time
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub created_at: chrono::DateTime<chrono::Local>,
}

impl Notice {
    pub fn new(message: String, kind: NoticeKind) -> Self {
        Self {
            message,
            kind,
            created_at: chrono::Local::now(),
        }
    }

    pub fn info(message: String) -> Self {
        Self::new(message, NoticeKind::Info)
    }

    pub fn success(message: String) -> Self {
        Self::new(message, NoticeKind::Success)
    }

    pub fn error(message: String) -> Self {
        Self::new(message, NoticeKind::Error)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// Success and info notices expire after `ttl`; errors stay until replaced
    pub fn is_expired(&self, ttl: Duration) -> bool {
        if self.is_error() {
            return false;
        }
        let elapsed = chrono::Local::now().signed_duration_since(self.created_at);
        elapsed.to_std().unwrap_or_default() >= ttl
    }

    pub fn prefix(&self) -> &'static str {
        match self.kind {
            NoticeKind::Info => "ℹ",
            NoticeKind::Success => "✓",
            NoticeKind::Error => "✗",
        }
    }
}

/// Holds at most one notice and drops it once it expires
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    ttl: Duration,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn post(&mut self, notice: Notice) {
        self.current = Some(notice);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Current notice, or `None` when nothing is posted or it has expired
    pub fn current(&self) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|notice| !notice.is_expired(self.ttl))
    }

    /// Drop an expired notice; returns true if something was removed
    pub fn prune(&mut self) -> bool {
        if let Some(notice) = &self.current {
            if notice.is_expired(self.ttl) {
                self.current = None;
                return true;
            }
        }
        false
    }
}
