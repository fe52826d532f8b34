//! Standard ruleset implementation.

use im::vector;
use tracing::debug;

use crate::core::action::RollPayload;
use crate::core::config::{RulesetMode, TableConfig};
use crate::core::dice::{Die, Roll};
use crate::core::error::{ActionError, RuleError};
use crate::core::seat::SeatId;
use crate::core::state::{
    DuelKind, ForcedLock, Pending, Phase, StandardTable, TableData, TableStatus, VariantState,
};
use crate::rules::calc::die_cost;
use crate::rules::{ActionContext, Ruleset, Standings};
use crate::services::Severity;
use crate::turns::engine::{begin_betting, next_active_after};

/// Index of the hole die in a Standard opening.
pub(crate) const HOLE_DIE: usize = 1;

/// Hold-or-bust to twenty-one.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

/// The lock that binds `seat` right now.
///
/// A seat at the limit cannot roll, so a lock never binds it.
fn lock_of(ctx: &ActionContext<'_>, seat: SeatId) -> Result<Option<ForcedLock>, ActionError> {
    if ctx.seat(seat)?.total >= ctx.config.bust_limit {
        return Ok(None);
    }
    Ok(ctx.skills(seat)?.lock)
}

impl Ruleset for StandardRules {
    fn mode(&self) -> RulesetMode {
        RulesetMode::Standard
    }

    fn deal_opening(&self, ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
        let die = ctx.config.opening_die;
        let seats: Vec<SeatId> = ctx.table().betting_order.iter().copied().collect();

        for &seat in &seats {
            let up = ctx.dice.roll(die.sides());
            let hole = ctx.dice.roll(die.sides());
            ctx.seat_mut(seat)?
                .set_rolls(vector![Roll::public(die, up), Roll::hole(die, hole)]);
            ctx.notify(seat, format!("Opening: {up} showing, {hole} in the hole."), Severity::Info);
        }

        // Lowest showing die; the first in turn order keeps a tie.
        let mut cut: Option<(SeatId, u32)> = None;
        for &seat in &seats {
            let showing = ctx.seat(seat)?.visible_total;
            if cut.map_or(true, |(_, lowest)| showing < lowest) {
                cut = Some((seat, showing));
            }
        }

        match cut {
            Some((seat, showing)) => {
                let table = ctx.table_mut();
                table.variant = VariantState::Standard(StandardTable { cut: Some(seat) });
                table.phase = Phase::Cut;
                table.current_player = Some(seat);
                debug!(%seat, showing, "cut offered");
                ctx.notify(seat, "You hold the Cut: reroll your hole die or pass.", Severity::Info);
            }
            None => begin_betting(ctx),
        }
        Ok(())
    }

    fn allowed_die(&self, ctx: &ActionContext<'_>, seat: SeatId, roll: &RollPayload) -> Result<(), ActionError> {
        if !ctx.config.standard_dice.contains(&roll.die) {
            return Err(ActionError::DieNotAllowed { die: roll.die });
        }
        if ctx.seat(seat)?.total >= ctx.config.bust_limit {
            return Err(ActionError::AtLimit { seat });
        }
        if let Some(ForcedLock { die: Some(forced), .. }) = lock_of(ctx, seat)? {
            if forced != roll.die {
                return Err(ActionError::ForcedDie { seat, die: forced });
            }
        }
        Ok(())
    }

    fn purchase_cost(&self, _config: &TableConfig, die: Die, ante: u64, blind: bool) -> u64 {
        let cost = die_cost(die, ante);
        if blind {
            cost.div_ceil(2)
        } else {
            cost
        }
    }

    fn score_roll(
        &self,
        ctx: &mut ActionContext<'_>,
        seat: SeatId,
        die: Die,
        face: u8,
        blind: bool,
    ) -> Result<(), ActionError> {
        let limit = ctx.config.bust_limit;
        let state = ctx.seat_mut(seat)?;
        let previous = state.total;

        // A natural 20 on the d20 lands the total exactly on the limit.
        let result = if die == Die::D20 && die.is_max(face) && previous < limit {
            u8::try_from((limit - previous).min(u32::from(die.sides()))).unwrap_or(face)
        } else {
            face
        };

        let roll = Roll {
            die,
            result,
            face,
            public: false,
            blind,
            coin_value: None,
        };
        let die_index = state.push_roll(roll);
        state.pending_bust = state.total > limit;
        let total = state.total;

        ctx.table_mut().pending = Some(Pending::CheatDecision { seat, die_index });

        let message = if blind {
            format!("You rolled a {die} blind.")
        } else if result != face {
            format!("Natural 20 on the {die}: {total} exactly.")
        } else {
            format!("You rolled {face} on the {die}; total {total}.")
        };
        ctx.notify(seat, message, Severity::Info);
        Ok(())
    }

    fn can_hold(&self, ctx: &ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
        match lock_of(ctx, seat)? {
            Some(_) => Err(ActionError::MustRoll { seat }),
            None => Ok(()),
        }
    }

    fn can_fold(&self, ctx: &ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
        self.can_hold(ctx, seat)
    }

    fn must_roll(&self, ctx: &ActionContext<'_>, seat: SeatId) -> bool {
        lock_of(ctx, seat).is_ok_and(|lock| lock.is_some())
    }

    fn allows_skills(&self) -> bool {
        true
    }

    fn after_turn(&self, ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
        let current = ctx.table().current_player;
        let next = next_active_after(ctx, current, |_| true);
        let table = ctx.table_mut();

        match next {
            Some((seat, wrapped)) => {
                if wrapped {
                    table.betting_round += 1;
                }
                table.current_player = Some(seat);
            }
            None => {
                table.phase = Phase::Complete;
                table.current_player = None;
                debug!("betting complete");
            }
        }
        Ok(())
    }

    fn is_round_over(&self, table: &TableData) -> bool {
        table.active_seats().is_empty()
    }

    fn standings(&self, table: &TableData, config: &TableConfig) -> Standings {
        Standings::from_totals(
            table
                .seats
                .iter()
                .filter(|(_, s)| s.is_live() && s.total <= config.bust_limit)
                .map(|(&seat, s)| (seat, s.total)),
        )
    }

    fn duel_kind(&self) -> DuelKind {
        DuelKind::Showdown
    }

    fn has_inspection(&self) -> bool {
        true
    }
}

/// The cut holder rerolls its hole die, or passes.
pub fn use_cut(ctx: &mut ActionContext<'_>, seat: SeatId, reroll: bool) -> Result<(), ActionError> {
    if ctx.state.status != TableStatus::Playing {
        return Err(ActionError::WrongStatus {
            action: "use_cut",
            status: ctx.state.status,
        });
    }
    if ctx.table().mode != RulesetMode::Standard {
        return Err(ActionError::WrongMode {
            action: "use_cut",
            mode: ctx.table().mode,
        });
    }
    if ctx.table().phase != Phase::Cut {
        return Err(ActionError::WrongPhase { action: "use_cut" });
    }
    if ctx.table().cut_holder() != Some(seat) {
        return Err(ActionError::NotYourTurn { seat });
    }

    if reroll {
        let len = ctx.seat(seat)?.rolls.len();
        let hole = ctx
            .seat(seat)?
            .rolls
            .get(HOLE_DIE)
            .copied()
            .ok_or(RuleError::DieIndexOutOfRange { index: HOLE_DIE, len })?;
        let face = ctx.dice.roll(hole.die.sides());

        let state = ctx.seat_mut(seat)?;
        state.rolls.set(HOLE_DIE, Roll::hole(hole.die, face));
        state.recompute();
        debug!(%seat, old = hole.result, new = face, "cut reroll");
        ctx.notify(seat, format!("Your hole die now shows {face}."), Severity::Info);
    } else {
        debug!(%seat, "cut passed");
    }

    ctx.table_mut().variant = VariantState::Standard(StandardTable { cut: None });
    begin_betting(ctx);
    Ok(())
}
