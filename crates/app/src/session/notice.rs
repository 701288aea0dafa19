//! Notices
//!
//! Short-lived messages shown under the cart after a checkout attempt.

use std::{fmt, time::Duration};

use tokio::time::Instant;

use crate::domain::orders::models::OrderId;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    kind: NoticeKind,
    message: String,
    posted_at: Instant,
}

impl Notice {
    #[must_use]
    pub fn new(kind: NoticeKind, message: impl Into<String>, posted_at: Instant) -> Self {
        Self {
            kind,
            message: message.into(),
            posted_at,
        }
    }

    #[must_use]
    pub fn order_created(order: OrderId, posted_at: Instant) -> Self {
        Self::new(
            NoticeKind::Success,
            format!("Order #{order} created successfully!"),
            posted_at,
        )
    }

    #[must_use]
    pub fn order_failed(posted_at: Instant) -> Self {
        Self::new(
            NoticeKind::Failure,
            "Failed to create order. Try again.",
            posted_at,
        )
    }

    #[must_use]
    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) >= NOTICE_TTL
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            NoticeKind::Success => "✓",
            NoticeKind::Failure => "✗",
        };

        write!(f, "{marker} {}", self.message)
    }
}
