//! Collaborators the engine consumes but does not own.
//!
//! - `Ledger`: seat purses. The engine asks, deducts, credits; it never
//!   treats a refusal as anything but "insufficient funds".
//! - `Notifier`: fire-and-forget messages to a seat.
//!
//! In-memory implementations are provided for embedding and tests.

mod ledger;
mod notify;

pub use ledger::{InMemoryLedger, Ledger};
pub use notify::{Notice, NoticeLog, Notifier, Severity, TracingNotifier};
