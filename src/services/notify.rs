//! Seat notifications.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::core::SeatId;

/// How loudly to tell a seat something.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Delivers messages to seats. The engine never reads anything back.
pub trait Notifier {
    fn notify(&mut self, seat: SeatId, message: &str, severity: Severity);
}

/// One delivered message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub seat: SeatId,
    pub message: String,
    pub severity: Severity,
}

/// Keeps every notice in memory.
#[derive(Clone, Debug, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far.
    #[must_use]
    pub fn all(&self) -> &[Notice] {
        &self.notices
    }

    /// Notices for one seat, oldest first.
    pub fn for_seat(&self, seat: SeatId) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.seat == seat)
    }

    /// Most recent notice.
    #[must_use]
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Take and clear everything delivered so far.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, seat: SeatId, message: &str, severity: Severity) {
        self.notices.push(Notice {
            seat,
            message: message.to_string(),
            severity,
        });
    }
}

/// Forwards notices to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, seat: SeatId, message: &str, severity: Severity) {
        match severity {
            Severity::Info => info!(%seat, message, "notice"),
            Severity::Warning => warn!(%seat, message, "notice"),
            Severity::Error => error!(%seat, message, "notice"),
        }
    }
}
