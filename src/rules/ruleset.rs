//! Ruleset trait for table variants.
//!
//! Rulesets implement `Ruleset` to define their rules:
//! - How the opening is dealt
//! - What dice are legal and what they cost
//! - How rolls score and who acts next
//! - Who won

use crate::core::action::RollPayload;
use crate::core::config::{RulesetMode, TableConfig};
use crate::core::dice::Die;
use crate::core::error::ActionError;
use crate::core::seat::SeatId;
use crate::core::state::{DuelKind, TableData};

use super::context::ActionContext;

/// Result of scoring a finished round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Standings {
    /// Single winner.
    Winner { seat: SeatId, total: u32 },
    /// Several seats share the best total; a duel decides.
    Tie { seats: Vec<SeatId>, total: u32 },
    /// Nobody qualified; the pot carries over.
    NoWinner,
}

impl Standings {
    /// Check if a seat won outright.
    #[must_use]
    pub fn is_winner(&self, seat: SeatId) -> bool {
        matches!(self, Standings::Winner { seat: s, .. } if *s == seat)
    }

    /// Rank candidate totals: one best total wins, several tie.
    ///
    /// Tied seats keep the order they were given in.
    pub fn from_totals(candidates: impl IntoIterator<Item = (SeatId, u32)>) -> Self {
        let candidates: Vec<(SeatId, u32)> = candidates.into_iter().collect();
        let Some(best) = candidates.iter().map(|&(_, total)| total).max() else {
            return Standings::NoWinner;
        };
        let mut seats: Vec<SeatId> = candidates
            .iter()
            .filter(|&&(_, total)| total == best)
            .map(|&(seat, _)| seat)
            .collect();

        if seats.len() == 1 {
            Standings::Winner { seat: seats.remove(0), total: best }
        } else {
            Standings::Tie { seats, total: best }
        }
    }

    /// Seats still in contention.
    #[must_use]
    pub fn contenders(&self) -> Vec<SeatId> {
        match self {
            Standings::Winner { seat, .. } => vec![*seat],
            Standings::Tie { seats, .. } => seats.clone(),
            Standings::NoWinner => Vec::new(),
        }
    }
}

/// Ruleset trait.
///
/// The turn engine calls these at fixed points of a turn. Validation hooks
/// take `&ActionContext` and must not mutate; everything that mutates runs
/// only after validation has passed.
///
/// ## Implementation Notes
///
/// - `deal_opening`: leave the table either in `Phase::Cut` or
///   `Phase::Betting` with a current player
/// - `score_roll`: either open a pending decision, or leave `pending` empty
///   to end the turn on the spot
/// - `after_turn`: pick the next seat, or set `Phase::Complete`
pub trait Ruleset: Send + Sync {
    /// Which mode this is.
    fn mode(&self) -> RulesetMode;

    /// Deal opening dice and set up the first decision of the round.
    fn deal_opening(&self, ctx: &mut ActionContext<'_>) -> Result<(), ActionError>;

    /// Whether `seat` may make this roll right now.
    fn allowed_die(&self, ctx: &ActionContext<'_>, seat: SeatId, roll: &RollPayload) -> Result<(), ActionError>;

    /// Coin price of a die. Zero where dice are free.
    fn purchase_cost(&self, config: &TableConfig, die: Die, ante: u64, blind: bool) -> u64;

    /// Put a landed face on the seat's rolls and open any follow-up decision.
    fn score_roll(
        &self,
        ctx: &mut ActionContext<'_>,
        seat: SeatId,
        die: Die,
        face: u8,
        blind: bool,
    ) -> Result<(), ActionError>;

    /// Whether `seat` may hold right now.
    fn can_hold(&self, ctx: &ActionContext<'_>, seat: SeatId) -> Result<(), ActionError>;

    /// Bookkeeping after a hold was accepted.
    fn on_hold(&self, _ctx: &mut ActionContext<'_>, _seat: SeatId) -> Result<(), ActionError> {
        Ok(())
    }

    /// Whether `seat` may fold right now.
    fn can_fold(&self, ctx: &ActionContext<'_>, seat: SeatId) -> Result<(), ActionError>;

    /// Whether `seat` has to roll before its turn can close.
    fn must_roll(&self, ctx: &ActionContext<'_>, seat: SeatId) -> bool;

    /// Hunch, profile, goad, bump and cheat are available.
    fn allows_skills(&self) -> bool {
        false
    }

    /// The current seat's turn closed: pick who acts next.
    fn after_turn(&self, ctx: &mut ActionContext<'_>) -> Result<(), ActionError>;

    /// Nobody is left to act.
    fn is_round_over(&self, table: &TableData) -> bool;

    /// Score the table.
    fn standings(&self, table: &TableData, config: &TableConfig) -> Standings;

    /// How ties are broken.
    fn duel_kind(&self) -> DuelKind;

    /// Finished betting goes through reveal and inspection before scoring.
    fn has_inspection(&self) -> bool;
}
