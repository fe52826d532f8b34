//! Rules: pure calculations, skill contests, and the `Ruleset` seam.
//!
//! Rulesets implement `Ruleset` to define:
//! - How a round opens
//! - Which dice may be rolled and what they cost
//! - How a landed die scores
//! - Who acts next, and when betting is over
//! - Who won
//!
//! The turn engine and the table call into `Ruleset` but never interpret
//! ruleset-specific concepts directly.

pub mod calc;
pub mod contest;
pub mod context;
pub mod ruleset;

pub use calc::{DuelSummary, Hunch, HunchThresholds};
pub use contest::{Check, ContestResult, Difficulty, Outcome};
pub use context::ActionContext;
pub use ruleset::{Ruleset, Standings};
