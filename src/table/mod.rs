//! Round and phase state machine.
//!
//! `Table` owns the committed snapshot and exposes one method per action.
//! The modules under it hold the lifecycle handlers it routes to.

pub mod duel;
pub mod machine;
pub mod payout;
pub mod round;
pub mod side_bets;

pub use machine::Table;
