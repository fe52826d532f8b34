//! Working context for one action.
//!
//! An `ActionContext` owns a working copy of the snapshot plus borrowed
//! collaborators. Handlers mutate the copy freely; the table commits it
//! only if the handler returns `Ok`. Notifications are buffered here for
//! the same reason and delivered on commit.
//!
//! The ledger is the one collaborator that is not buffered, so handlers
//! finish validating before they move any money.

use crate::core::config::TableConfig;
use crate::core::error::ActionError;
use crate::core::rng::DiceSource;
use crate::core::seat::{PlayerInfo, SeatId, Skill};
use crate::core::state::{GameState, SeatState, SkillState, TableData};
use crate::games::ruleset_for;
use crate::services::{Ledger, Notice, Severity};

use super::contest::{Check, ContestResult, Difficulty};
use super::ruleset::Ruleset;

/// Everything a handler needs to apply one action.
pub struct ActionContext<'a> {
    /// Working copy of the snapshot.
    pub state: GameState,
    pub config: &'a TableConfig,
    pub dice: &'a mut dyn DiceSource,
    pub ledger: &'a mut dyn Ledger,
    notices: Vec<Notice>,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        state: GameState,
        config: &'a TableConfig,
        dice: &'a mut dyn DiceSource,
        ledger: &'a mut dyn Ledger,
    ) -> Self {
        Self {
            state,
            config,
            dice,
            ledger,
            notices: Vec::new(),
        }
    }

    /// Hand back the working state and the buffered notices.
    pub fn into_parts(self) -> (GameState, Vec<Notice>) {
        (self.state, self.notices)
    }

    /// Rules for the round in progress.
    #[must_use]
    pub fn ruleset(&self) -> &'static dyn Ruleset {
        ruleset_for(self.state.table.mode)
    }

    /// Queue a message for a seat.
    pub fn notify(&mut self, seat: SeatId, message: impl Into<String>, severity: Severity) {
        self.notices.push(Notice {
            seat,
            message: message.into(),
            severity,
        });
    }

    /// Queue a message for every seat in the round.
    pub fn notify_table(&mut self, message: impl Into<String>) {
        let message = message.into();
        let seats: Vec<SeatId> = self.state.table.seats.keys().copied().collect();
        for seat in seats {
            self.notify(seat, message.clone(), Severity::Info);
        }
    }

    #[must_use]
    pub fn table(&self) -> &TableData {
        &self.state.table
    }

    pub fn table_mut(&mut self) -> &mut TableData {
        &mut self.state.table
    }

    /// A seat playing this round.
    pub fn seat(&self, seat: SeatId) -> Result<&SeatState, ActionError> {
        self.state.table.seat(seat).ok_or(ActionError::UnknownSeat { seat })
    }

    pub fn seat_mut(&mut self, seat: SeatId) -> Result<&mut SeatState, ActionError> {
        self.state.table.seat_mut(seat).ok_or(ActionError::UnknownSeat { seat })
    }

    /// Standard skill state of a seat.
    pub fn skills(&self, seat: SeatId) -> Result<&SkillState, ActionError> {
        let mode = self.state.table.mode;
        self.seat(seat)?
            .skills()
            .ok_or(ActionError::WrongMode { action: "skills", mode })
    }

    pub fn skills_mut(&mut self, seat: SeatId) -> Result<&mut SkillState, ActionError> {
        let mode = self.state.table.mode;
        self.seat_mut(seat)?
            .skills_mut()
            .ok_or(ActionError::WrongMode { action: "skills", mode })
    }

    /// Profile of a seated player.
    pub fn player(&self, seat: SeatId) -> Result<&PlayerInfo, ActionError> {
        self.state.players.get(&seat).ok_or(ActionError::UnknownSeat { seat })
    }

    /// Take `amount` from a seat's purse.
    pub fn charge(&mut self, seat: SeatId, amount: u64) -> Result<(), ActionError> {
        if amount == 0 {
            return Ok(());
        }
        if !self.ledger.deduct(seat, amount) {
            return Err(ActionError::InsufficientFunds { seat, amount });
        }
        Ok(())
    }

    /// Roll a skill check for `seat`.
    ///
    /// Applies the player's modifier and disadvantage from the tab. A
    /// natural 1 leaves a cleaning fee owing.
    pub fn skill_check(
        &mut self,
        seat: SeatId,
        skill: Skill,
        difficulty: Difficulty,
    ) -> Result<ContestResult, ActionError> {
        let modifier = self.player(seat)?.modifier(skill);
        let drunk = self.seat(seat)?.tab >= self.config.drunk_threshold;

        let check = Check {
            modifier,
            difficulty,
            disadvantage: drunk,
        };
        let result = check.resolve(&mut *self.dice);

        if result.fumbled() {
            self.seat_mut(seat)?.cleaning_fees += 1;
        }
        Ok(result)
    }

    /// Skill check against another seat's roll.
    pub fn opposed_check(
        &mut self,
        seat: SeatId,
        skill: Skill,
        defender: SeatId,
        defense: Skill,
    ) -> Result<ContestResult, ActionError> {
        let modifier = self.player(defender)?.modifier(defense);
        self.skill_check(seat, skill, Difficulty::Opposed { modifier })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RulesetMode;
    use crate::core::rng::LoadedDice;
    use crate::core::state::SeatState;
    use crate::services::InMemoryLedger;

    fn state_with(seat: SeatId, info: PlayerInfo, config: &TableConfig) -> GameState {
        let mut state = GameState::new();
        state.players.insert(seat, info);
        state.turn_order.push(seat);
        state.table.seats.insert(seat, SeatState::new(RulesetMode::Standard, config));
        state
    }

    #[test]
    fn test_charge_refuses_without_funds() {
        let config = TableConfig::default();
        let seat = SeatId::new(0);
        let mut dice = LoadedDice::new(0);
        let mut ledger = InMemoryLedger::with_balances([seat], 5);
        let state = state_with(seat, PlayerInfo::new("Ada"), &config);

        let mut ctx = ActionContext::new(state, &config, &mut dice, &mut ledger);
        assert!(ctx.charge(seat, 3).is_ok());
        assert_eq!(
            ctx.charge(seat, 3),
            Err(ActionError::InsufficientFunds { seat, amount: 3 })
        );
        drop(ctx);
        assert_eq!(ledger.balance(seat), 2);
    }

    #[test]
    fn test_skill_check_applies_modifier_and_fee() {
        let config = TableConfig::default();
        let seat = SeatId::new(0);
        let mut dice = LoadedDice::new(0).with_faces([8, 1]);
        let mut ledger = InMemoryLedger::new();
        let state = state_with(seat, PlayerInfo::new("Ada").with_skill(Skill::Insight, 4), &config);

        let mut ctx = ActionContext::new(state, &config, &mut dice, &mut ledger);
        let hit = ctx.skill_check(seat, Skill::Insight, Difficulty::Fixed(12)).unwrap();
        assert!(hit.success());
        assert_eq!(hit.total, 12);

        let miss = ctx.skill_check(seat, Skill::Insight, Difficulty::Fixed(12)).unwrap();
        assert!(miss.fumbled());
        assert_eq!(ctx.seat(seat).unwrap().cleaning_fees, 1);
    }

    #[test]
    fn test_drunk_seat_rolls_with_disadvantage() {
        let config = TableConfig::default().with_drunk_threshold(2);
        let seat = SeatId::new(0);
        let mut dice = LoadedDice::new(0).with_faces([17, 4]);
        let mut ledger = InMemoryLedger::new();
        let mut state = state_with(seat, PlayerInfo::new("Ada"), &config);
        state.table.seat_mut(seat).unwrap().tab = 2;

        let mut ctx = ActionContext::new(state, &config, &mut dice, &mut ledger);
        let result = ctx.skill_check(seat, Skill::Insight, Difficulty::Fixed(10)).unwrap();
        assert_eq!(result.natural, 4);
        assert!(!result.success());
    }

    #[test]
    fn test_notices_are_buffered() {
        let config = TableConfig::default();
        let seat = SeatId::new(0);
        let mut dice = LoadedDice::new(0);
        let mut ledger = InMemoryLedger::new();
        let state = state_with(seat, PlayerInfo::new("Ada"), &config);

        let mut ctx = ActionContext::new(state, &config, &mut dice, &mut ledger);
        ctx.notify(seat, "hello", Severity::Info);
        ctx.notify_table("round over");

        let (_, notices) = ctx.into_parts();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[1].message, "round over");
    }
}
