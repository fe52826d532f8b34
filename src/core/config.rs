//! Table configuration.
//!
//! Every tunable number in the rules lives in `TableConfig`. Amounts that
//! scale with the stake are expressed as multiples of the round's ante and
//! resolved through the helper methods, so one config works at any stake.

use serde::{Deserialize, Serialize};

use super::dice::Die;

/// Which ruleset a round is played under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RulesetMode {
    /// Hold-or-bust to twenty-one with hole dice and skills.
    #[default]
    Standard,
    /// Shrinking die ladder, last survivor wins.
    Chamber,
}

impl std::fmt::Display for RulesetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesetMode::Standard => f.write_str("standard"),
            RulesetMode::Chamber => f.write_str("chamber"),
        }
    }
}

/// Rules configuration for a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Highest Standard total that does not bust.
    pub bust_limit: u32,

    /// Die used for both Standard opening dice.
    pub opening_die: Die,

    /// Dice a Standard seat may buy.
    pub standard_dice: Vec<Die>,

    /// Chamber stage ladder, largest first. The last entry is the final stage.
    pub chamber_ladder: Vec<Die>,

    /// Percent of the ante refunded on a fold before acting.
    pub fold_refund_percent: u64,

    /// Difficulty of a hunch.
    pub hunch_dc: i32,

    /// Difficulty of profiling an opponent.
    pub profile_dc: i32,

    /// Starting cheat difficulty for every seat.
    pub base_heat: i32,

    /// Heat added by a landed (non-invisible) cheat or a failed attempt.
    pub heat_step: i32,

    /// Drinks on the tab at which skill checks take disadvantage.
    pub drunk_threshold: u32,

    /// Fine for a fumbled cheat, in antes.
    pub cheat_fine_multiplier: u64,

    /// Fee to accuse, in antes.
    pub inspection_fee_multiplier: u64,

    /// Bounty a caught cheater pays the accuser, in antes.
    pub bounty_multiplier: u64,

    /// Flat cleaning fee per fumbled skill check.
    pub cleaning_fee: u64,

    /// Holding at a Chamber stage index below this marks a coward.
    pub coward_stage_cutoff: usize,

    /// Percent of the pot withheld from a coward winner.
    pub coward_tax_percent: u64,

    /// Fewest seats needed to start a round.
    pub min_seats: usize,

    /// Most seats allowed at the table.
    pub max_seats: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            bust_limit: 21,
            opening_die: Die::D10,
            standard_dice: vec![Die::D4, Die::D6, Die::D8, Die::D10, Die::D20],
            chamber_ladder: vec![Die::D20, Die::D12, Die::D10, Die::D8, Die::D6, Die::D4, Die::Coin],
            fold_refund_percent: 50,
            hunch_dc: 12,
            profile_dc: 12,
            base_heat: 10,
            heat_step: 2,
            drunk_threshold: 3,
            cheat_fine_multiplier: 1,
            inspection_fee_multiplier: 1,
            bounty_multiplier: 2,
            cleaning_fee: 1,
            coward_stage_cutoff: 2,
            coward_tax_percent: 50,
            min_seats: 2,
            max_seats: 8,
        }
    }
}

impl TableConfig {
    /// Default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bust limit.
    #[must_use]
    pub fn with_bust_limit(mut self, limit: u32) -> Self {
        self.bust_limit = limit;
        self
    }

    /// Set the Chamber ladder.
    #[must_use]
    pub fn with_chamber_ladder(mut self, ladder: Vec<Die>) -> Self {
        self.chamber_ladder = ladder;
        self
    }

    /// Set the heat model.
    #[must_use]
    pub fn with_heat(mut self, base: i32, step: i32) -> Self {
        self.base_heat = base;
        self.heat_step = step;
        self
    }

    /// Set the drink count that imposes disadvantage.
    #[must_use]
    pub fn with_drunk_threshold(mut self, drinks: u32) -> Self {
        self.drunk_threshold = drinks;
        self
    }

    /// Set the Coward's Tax.
    #[must_use]
    pub fn with_coward_tax(mut self, cutoff: usize, percent: u64) -> Self {
        self.coward_stage_cutoff = cutoff;
        self.coward_tax_percent = percent.min(100);
        self
    }

    /// Set the seat limits.
    #[must_use]
    pub fn with_seat_limits(mut self, min: usize, max: usize) -> Self {
        self.min_seats = min;
        self.max_seats = max;
        self
    }

    /// Ante refunded on an early fold.
    #[must_use]
    pub fn fold_refund(&self, ante: u64) -> u64 {
        ante * self.fold_refund_percent / 100
    }

    /// Fine for a fumbled cheat.
    #[must_use]
    pub fn cheat_fine(&self, ante: u64) -> u64 {
        ante * self.cheat_fine_multiplier
    }

    /// Cost of an accusation.
    #[must_use]
    pub fn inspection_fee(&self, ante: u64) -> u64 {
        ante * self.inspection_fee_multiplier
    }

    /// Bounty owed by a confirmed cheater.
    #[must_use]
    pub fn bounty(&self, ante: u64) -> u64 {
        ante * self.bounty_multiplier
    }

    /// Share of `pot` paid to a coward winner.
    #[must_use]
    pub fn coward_share(&self, pot: u64) -> u64 {
        pot * (100 - self.coward_tax_percent.min(100)) / 100
    }

    /// Stage die at `stage`, if the ladder reaches that far.
    #[must_use]
    pub fn chamber_stage(&self, stage: usize) -> Option<Die> {
        self.chamber_ladder.get(stage).copied()
    }

    /// Index of the final Chamber stage.
    #[must_use]
    pub fn final_chamber_stage(&self) -> usize {
        self.chamber_ladder.len().saturating_sub(1)
    }
}
