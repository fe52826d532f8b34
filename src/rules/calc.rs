//! Pure rule functions.
//!
//! Side-effect-free math over rolls and seats. Totals are always derived
//! from the rolls here; nothing caches them across a mutation.

use im::{OrdMap, Vector};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::dice::{Die, Roll};
use crate::core::error::RuleError;
use crate::core::seat::SeatId;
use crate::core::state::{DuelRoll, Payout};

/// Sum of every roll's result.
pub fn calculate_total<'a>(rolls: impl IntoIterator<Item = &'a Roll>) -> u32 {
    rolls.into_iter().map(|r| u32::from(r.result)).sum()
}

/// Sum of the results the rest of the table can see.
pub fn calculate_visible_total<'a>(rolls: impl IntoIterator<Item = &'a Roll>) -> u32 {
    rolls
        .into_iter()
        .filter(|r| r.is_visible())
        .map(|r| u32::from(r.result))
        .sum()
}

/// Replace the result of the die at `index`, clamped onto the die.
///
/// Returns a new roll vector; the input is untouched. An index past the end
/// is a caller bug and reported as `RuleError::DieIndexOutOfRange`.
///
/// ```
/// use im::vector;
/// use tavern_dice::core::{Die, Roll};
/// use tavern_dice::rules::calc::reroll_die_at_index;
///
/// let rolls = vector![Roll::public(Die::D6, 2)];
/// let bumped = reroll_die_at_index(&rolls, 0, 9).unwrap();
/// assert_eq!(bumped[0].result, 6);
/// assert!(reroll_die_at_index(&rolls, 1, 3).is_err());
/// ```
pub fn reroll_die_at_index(rolls: &Vector<Roll>, index: usize, new_value: i32) -> Result<Vector<Roll>, RuleError> {
    let mut roll = *rolls
        .get(index)
        .ok_or(RuleError::DieIndexOutOfRange { index, len: rolls.len() })?;

    let clamped = new_value.clamp(1, i32::from(roll.die.sides()));
    roll.result = u8::try_from(clamped).unwrap_or(1);

    let mut out = rolls.clone();
    out.set(index, roll);
    Ok(out)
}

/// Betting order: ascending visible total, ties keep turn order.
///
/// Seats missing from `visible_totals` count as zero.
pub fn calculate_betting_order(turn_order: &[SeatId], visible_totals: &FxHashMap<SeatId, u32>) -> Vec<SeatId> {
    let mut order = turn_order.to_vec();
    // sort_by_key is stable
    order.sort_by_key(|seat| visible_totals.get(seat).copied().unwrap_or(0));
    order
}

/// A hunch bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hunch {
    High,
    Low,
}

/// Per-die cutoffs for a `High` hunch: strictly above the cutoff is high.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HunchThresholds {
    cutoffs: FxHashMap<Die, u8>,
}

impl HunchThresholds {
    /// Override the cutoff for one die.
    #[must_use]
    pub fn with(mut self, die: Die, cutoff: u8) -> Self {
        self.cutoffs.insert(die, cutoff);
        self
    }

    /// Cutoff for `die`; half its faces unless overridden.
    #[must_use]
    pub fn cutoff(&self, die: Die) -> u8 {
        self.cutoffs.get(&die).copied().unwrap_or(die.sides() / 2)
    }
}

impl Default for HunchThresholds {
    fn default() -> Self {
        Self {
            cutoffs: FxHashMap::default(),
        }
    }
}

/// Classify a face as high or low for its die.
#[must_use]
pub fn classify_hunch_prediction(die: Die, value: u8, thresholds: &HunchThresholds) -> Hunch {
    if value > thresholds.cutoff(die) {
        Hunch::High
    } else {
        Hunch::Low
    }
}

/// Result of one duel round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuelSummary {
    pub highest_total: u32,
    /// Every participant's total, in seat order.
    pub results: Vec<(SeatId, u32)>,
    /// Seats at the highest total, in seat order.
    pub winners: Vec<SeatId>,
    pub is_tie: bool,
}

/// Summarize a duel round.
pub fn summarize_duel_rolls(rolls: &OrdMap<SeatId, DuelRoll>) -> DuelSummary {
    let results: Vec<(SeatId, u32)> = rolls.iter().map(|(&seat, roll)| (seat, roll.total)).collect();
    let highest_total = results.iter().map(|&(_, total)| total).max().unwrap_or(0);
    let winners: Vec<SeatId> = results
        .iter()
        .filter(|&&(_, total)| total == highest_total)
        .map(|&(seat, _)| seat)
        .collect();
    let is_tie = winners.len() > 1;

    DuelSummary {
        highest_total,
        results,
        winners,
        is_tie,
    }
}

/// Price of a Standard die in coins.
///
/// Steadier dice cost more: in half-antes, d4=4, d6=3, d8=2, d10=2, d12=2,
/// d20=1. Rounded up, so a die never costs nothing at a nonzero ante.
#[must_use]
pub fn die_cost(die: Die, ante: u64) -> u64 {
    let halves = match die {
        Die::D4 => 4,
        Die::D6 => 3,
        Die::D8 | Die::D10 | Die::D12 => 2,
        Die::D20 | Die::Coin => 1,
    };
    (ante * halves).div_ceil(2)
}

/// Split `pool` among stakes in proportion to their size.
///
/// Floor division; the remainder goes to the first listed stake. Returns an
/// empty list when there is nothing staked.
pub fn split_proportionally(pool: u64, stakes: &[(SeatId, u64)]) -> Vec<Payout> {
    let staked: u128 = stakes.iter().map(|&(_, amount)| u128::from(amount)).sum();
    if staked == 0 {
        return Vec::new();
    }

    let mut payouts: Vec<Payout> = stakes
        .iter()
        .map(|&(seat, amount)| Payout {
            seat,
            amount: u64::try_from(u128::from(pool) * u128::from(amount) / staked).unwrap_or(0),
        })
        .collect();

    let paid: u64 = payouts.iter().map(|p| p.amount).sum();
    if let Some(first) = payouts.first_mut() {
        first.amount += pool - paid;
    }
    payouts
}
