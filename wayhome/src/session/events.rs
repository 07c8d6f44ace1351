//! Broadcast payloads for session consumers.
//!
//! The session pushes these over a `tokio::sync::broadcast` channel so the
//! presentation layer can react without polling.

use std::time::Duration;

use crate::location::PositionEstimate;

/// Kind of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient user-facing message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// How long the notice should stay visible; `None` means until
    /// dismissed.
    pub ttl: Option<Duration>,
}

impl Notice {
    /// A success notice with a time-to-live.
    pub fn success(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            ttl: Some(ttl),
        }
    }

    /// An error notice, visible until dismissed.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            ttl: None,
        }
    }
}

/// Events broadcast by the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A fix was accepted and the estimate moved.
    PositionChanged(PositionEstimate),

    /// The source reported an error; coordinates are carried over or the
    /// fallback, with `is_live = false`.
    PositionDegraded {
        /// Human-readable error description.
        message: String,
    },

    /// The danger-zone snapshot was replaced.
    DangerZonesUpdated {
        /// Number of zones in the new snapshot.
        count: usize,
    },

    /// A new route was applied.
    RouteUpdated,

    /// A transient user-facing message.
    Notice(Notice),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_notice_carries_ttl() {
        let notice = Notice::success("Emergency alert sent", Duration::from_secs(6));
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.ttl, Some(Duration::from_secs(6)));
    }

    #[test]
    fn test_error_notice_has_no_ttl() {
        let notice = Notice::error("Report failed");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.ttl.is_none());
    }
}
