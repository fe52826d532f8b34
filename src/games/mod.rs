//! Ruleset implementations.
//!
//! - `standard`: hold-or-bust to twenty-one with hole dice, skills, and an
//!   inspection before scoring
//! - `chamber`: the Goblin ladder, every seat rolling a shrinking die until
//!   one survivor is left

pub mod chamber;
pub mod standard;

pub use chamber::ChamberRules;
pub use standard::StandardRules;

use crate::core::config::RulesetMode;
use crate::rules::Ruleset;

/// Rules for a mode.
#[must_use]
pub fn ruleset_for(mode: RulesetMode) -> &'static dyn Ruleset {
    match mode {
        RulesetMode::Standard => &StandardRules,
        RulesetMode::Chamber => &ChamberRules,
    }
}
