//! Error types.
//!
//! `ActionError` is what a rejected action reports to its caller: the table
//! turns it into a notification and leaves state untouched. `RuleError` is
//! a broken internal invariant; the public action surface validates its
//! inputs so these should never surface through it.

use thiserror::Error;

use super::config::RulesetMode;
use super::dice::Die;
use super::seat::SeatId;
use super::state::TableStatus;

/// Internal rule invariant violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("die index {index} out of range for {len} rolls")]
    DieIndexOutOfRange { index: usize, len: usize },
    #[error("{seat} has no seat record")]
    MissingSeat { seat: SeatId },
    #[error("total for {seat} drifted (stored={stored}, rolls={computed})")]
    TotalDrift { seat: SeatId, stored: u32, computed: u32 },
    #[error("{seat} is tracked but not in the turn order")]
    SeatOutsideTurnOrder { seat: SeatId },
    #[error("die result {result} outside 1..={sides}")]
    ResultOutOfRange { result: u8, sides: u8 },
    #[error("current player {seat:?} cannot act")]
    InactiveCurrentPlayer { seat: Option<SeatId> },
}

/// Why an action was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("{action} is not allowed while the table is {status:?}")]
    WrongStatus { action: &'static str, status: TableStatus },
    #[error("{action} is not allowed right now")]
    WrongPhase { action: &'static str },
    #[error("{action} is not part of {mode} rules")]
    WrongMode { action: &'static str, mode: RulesetMode },
    #[error("it is not {seat}'s turn")]
    NotYourTurn { seat: SeatId },
    #[error("{seat} is not playing this round")]
    UnknownSeat { seat: SeatId },
    #[error("{seat} is already out of the betting")]
    SeatFinished { seat: SeatId },
    #[error("{seat} must finish the pending decision first")]
    PendingDecision { seat: SeatId },
    #[error("{die} cannot be rolled here")]
    DieNotAllowed { die: Die },
    #[error("{seat} is locked into rolling a {die}")]
    ForcedDie { seat: SeatId, die: Die },
    #[error("{seat} has been goaded and must roll")]
    MustRoll { seat: SeatId },
    #[error("{seat} is at the limit and must hold")]
    AtLimit { seat: SeatId },
    #[error("{seat} cannot hold while trailing the table")]
    HoldNotAllowed { seat: SeatId },
    #[error("{seat} cannot afford {amount}")]
    InsufficientFunds { seat: SeatId, amount: u64 },
    #[error("{seat} has already used {what} this round")]
    AlreadyUsed { seat: SeatId, what: &'static str },
    #[error("{seat} has no boots to spend")]
    NoBoots { seat: SeatId },
    #[error("invalid payload: {0}")]
    Malformed(String),
    #[error("table is full ({max} seats)")]
    TableFull { max: usize },
    #[error("need at least {min} seats to start (have {have})")]
    NotEnoughSeats { min: usize, have: usize },
    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl ActionError {
    /// Malformed payload with a message.
    pub fn malformed(message: impl Into<String>) -> Self {
        ActionError::Malformed(message.into())
    }

    /// A broken invariant rather than a bad call.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, ActionError::Rule(_))
    }
}
