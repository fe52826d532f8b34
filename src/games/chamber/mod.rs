//! Chamber ("Goblin") rules: a shrinking die ladder.
//!
//! - Everyone rolls the stage die once per stage: d20, d12, d10, d8, d6, d4,
//!   then a coin
//! - A 1 eliminates; a natural maximum earns a Boot
//! - A Boot forces a held seat back into the betting
//! - Holding early marks a coward, who wins only part of the pot
//! - Ties go to coin-flip sudden death

mod game;

pub use game::{boot, goblin_continue, ChamberRules};
