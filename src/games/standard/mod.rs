//! Standard rules: hold-or-bust to twenty-one.
//!
//! - Each seat opens with two d10s: one showing, one in the hole
//! - The lowest showing die holds the Cut and may reroll its hole die
//! - Dice are bought from the purse or put on the tab; steadier dice cost more
//! - A natural 20 on the d20 snaps the total to exactly the limit
//! - Every purchase opens a cheat window before the die is shown
//! - Ties at the top go to a showdown duel

mod game;

pub use game::{use_cut, StandardRules};
pub(crate) use game::HOLE_DIE;
