//! Skill contest resolver.
//!
//! Every social and cheat action is one d20 check: against a fixed
//! difficulty, or against a defender's own roll. The resolver only reports
//! what happened; each action decides what success and failure mean.
//!
//! - Natural 1 fails regardless of modifiers (critical failure).
//! - Natural 20 succeeds regardless of difficulty (critical success).
//! - Fixed difficulty: `natural + modifier >= dc` succeeds.
//! - Opposed: the attacker must beat the defender's total; ties hold.
//!
//! With disadvantage the d20 is rolled twice and the lower face is kept.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rng::DiceSource;

/// Outcome tier of a check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    CriticalFailure,
    Failure,
    Success,
    CriticalSuccess,
}

/// What the check is measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// A fixed number to meet or beat.
    Fixed(i32),
    /// The defender rolls d20 plus this modifier.
    Opposed { modifier: i32 },
}

/// A check waiting to be rolled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Check {
    pub modifier: i32,
    pub difficulty: Difficulty,
    pub disadvantage: bool,
}

/// A rolled check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContestResult {
    pub outcome: Outcome,
    /// The kept d20 face.
    pub natural: u8,
    /// `natural + modifier`.
    pub total: i32,
    /// What the total was compared against: the DC or the defender's total.
    pub target: i32,
}

impl ContestResult {
    /// The action lands.
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self.outcome, Outcome::Success | Outcome::CriticalSuccess)
    }

    /// Natural 20.
    #[must_use]
    pub fn critical(&self) -> bool {
        self.outcome == Outcome::CriticalSuccess
    }

    /// Natural 1.
    #[must_use]
    pub fn fumbled(&self) -> bool {
        self.outcome == Outcome::CriticalFailure
    }
}

impl Check {
    /// Check against a fixed difficulty.
    #[must_use]
    pub fn against_dc(modifier: i32, dc: i32) -> Self {
        Self {
            modifier,
            difficulty: Difficulty::Fixed(dc),
            disadvantage: false,
        }
    }

    /// Check against a defender's roll.
    #[must_use]
    pub fn opposed(modifier: i32, defender_modifier: i32) -> Self {
        Self {
            modifier,
            difficulty: Difficulty::Opposed {
                modifier: defender_modifier,
            },
            disadvantage: false,
        }
    }

    /// Roll with disadvantage when `on`.
    #[must_use]
    pub fn with_disadvantage(mut self, on: bool) -> Self {
        self.disadvantage = on;
        self
    }

    /// Roll the check. The attacker's d20 is rolled before the defender's.
    pub fn resolve(&self, dice: &mut dyn DiceSource) -> ContestResult {
        let natural = if self.disadvantage {
            let first = dice.d20();
            let second = dice.d20();
            first.min(second)
        } else {
            dice.d20()
        };
        let total = i32::from(natural) + self.modifier;

        let (target, beats) = match self.difficulty {
            Difficulty::Fixed(dc) => (dc, total >= dc),
            Difficulty::Opposed { modifier } => {
                let defense = i32::from(dice.d20()) + modifier;
                (defense, total > defense)
            }
        };

        let outcome = match natural {
            1 => Outcome::CriticalFailure,
            20 => Outcome::CriticalSuccess,
            _ if beats => Outcome::Success,
            _ => Outcome::Failure,
        };

        debug!(natural, total, target, disadvantage = self.disadvantage, ?outcome, "skill check");

        ContestResult {
            outcome,
            natural,
            total,
            target,
        }
    }
}
