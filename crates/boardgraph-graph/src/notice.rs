use std::time::{Duration, Instant};

/// Notice severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Auto-clears after the configured delay
    Info,
    /// Stays until replaced
    Status,
    /// Consistency problems; stays until replaced
    Warning,
    /// Must be dismissed by the user
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    expires: Option<Instant>,
}

impl Notice {
    pub fn is_blocking(&self) -> bool {
        self.level == NoticeLevel::Alert
    }
}

/// Single-slot notice area. A newer notice replaces the current one.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    transient: Duration,
}

impl NoticeBoard {
    pub fn new(transient: Duration) -> Self {
        Self {
            current: None,
            transient,
        }
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match level {
            NoticeLevel::Warning => tracing::warn!("{message}"),
            _ => tracing::debug!("Notice ({level:?}): {message}"),
        }
        let expires = (level == NoticeLevel::Info).then(|| now + self.transient);
        self.current = Some(Notice {
            level,
            message,
            expires,
        });
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(NoticeLevel::Info, message, now);
    }

    pub fn status(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(NoticeLevel::Status, message, now);
    }

    pub fn warning(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(NoticeLevel::Warning, message, now);
    }

    pub fn alert(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(NoticeLevel::Alert, message, now);
    }

    /// The notice on display at `now`; expired transient notices read as none.
    pub fn current_at(&self, now: Instant) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|n| n.expires.is_none_or(|at| now < at))
    }

    /// Acknowledges a blocking alert.
    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
