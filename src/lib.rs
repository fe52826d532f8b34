//! # tavern-dice
//!
//! Round and turn engine for Tavern Twenty-One, a push-your-luck dice game
//! played at a shared table.
//!
//! ## Design Principles
//!
//! 1. **One Snapshot**: The table owns a single `GameState`. Every action
//!    produces a whole new snapshot or none at all.
//!
//! 2. **Rulesets Behind a Trait**: Standard and Chamber share one turn
//!    engine and one state machine; what differs lives behind `Ruleset`.
//!
//! 3. **Injected Collaborators**: Dice, purses, and notifications come in
//!    through `DiceSource`, `Ledger`, and `Notifier`, so every round can be
//!    scripted exactly.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) snapshot clones via `im`, so a
//!   rejected action simply drops its working copy.
//!
//! - **Deterministic Dice**: ChaCha8-backed `GameRng` for play,
//!   `LoadedDice` for scripted scenarios.
//!
//! ## Modules
//!
//! - `core`: Seats, dice, RNG, configuration, actions, state, errors
//! - `rules`: Pure calculations, skill contests, the `Ruleset` trait
//! - `services`: Ledger and notifier seams
//! - `turns`: Roll, hold, fold, and passing the turn
//! - `skills`: Hunch, profile, goad, bump, cheat
//! - `games`: Standard and Chamber rulesets
//! - `table`: The round state machine and the action surface
//!
//! ```
//! use tavern_dice::{GameRng, InMemoryLedger, NoticeLog, PlayerInfo, RulesetMode, SeatId, Table, TableConfig, TableStatus};
//!
//! let seats = [SeatId::new(0), SeatId::new(1)];
//! let mut table = Table::new(
//!     TableConfig::default(),
//!     InMemoryLedger::with_balances(seats, 100),
//!     NoticeLog::new(),
//!     GameRng::new(7),
//! );
//! table.seat_player(seats[0], PlayerInfo::new("Brom"));
//! table.seat_player(seats[1], PlayerInfo::new("Vex"));
//!
//! let state = table.start_round(10, RulesetMode::Standard);
//! assert_eq!(state.status, TableStatus::Playing);
//! assert_eq!(state.pot, 20);
//! ```

pub mod core;
pub mod rules;
pub mod services;
pub mod turns;
pub mod skills;
pub mod games;
pub mod table;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, ActionRecord, CheatPayload, DiceSource, Die, GameRng, GameRngState,
    GameState, LoadedDice, Payment, Pending, Phase, PlayerInfo, Roll, RollPayload, RuleError,
    RulesetMode, SeatId, SeatState, Skill, TableConfig, TableStatus,
};

pub use crate::rules::{Check, ContestResult, Outcome, Ruleset, Standings};

pub use crate::services::{InMemoryLedger, Ledger, Notice, NoticeLog, Notifier, Severity, TracingNotifier};

pub use crate::games::{ruleset_for, ChamberRules, StandardRules};

pub use crate::table::Table;
