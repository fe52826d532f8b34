//! Chamber ruleset implementation.

use im::Vector;
use tracing::debug;

use crate::core::action::RollPayload;
use crate::core::config::{RulesetMode, TableConfig};
use crate::core::dice::{Die, Roll};
use crate::core::error::ActionError;
use crate::core::seat::SeatId;
use crate::core::state::{ChamberTable, DuelKind, Pending, Phase, TableData, VariantState};
use crate::rules::{ActionContext, Ruleset, Standings};
use crate::services::Severity;
use crate::turns::engine::{begin_betting, end_turn, next_active_after, require_betting};

/// The Goblin ladder.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChamberRules;

fn stage_of(table: &TableData) -> usize {
    table.chamber_stage().unwrap_or(0)
}

fn owes_roll(table: &TableData, seat: SeatId, stage: usize) -> bool {
    table
        .seat(seat)
        .and_then(|s| s.chamber())
        .is_some_and(|c| c.owes_roll(stage))
}

fn best_live_total(table: &TableData) -> u32 {
    table
        .seats
        .values()
        .filter(|s| s.is_live())
        .map(|s| s.total)
        .max()
        .unwrap_or(0)
}

impl Ruleset for ChamberRules {
    fn mode(&self) -> RulesetMode {
        RulesetMode::Chamber
    }

    fn deal_opening(&self, ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
        ctx.table_mut().variant = VariantState::Chamber(ChamberTable { stage: 0 });
        if let Some(die) = ctx.config.chamber_stage(0) {
            ctx.notify_table(format!("Stage 1: everyone rolls the {die}."));
        }
        begin_betting(ctx);
        Ok(())
    }

    fn allowed_die(&self, ctx: &ActionContext<'_>, seat: SeatId, roll: &RollPayload) -> Result<(), ActionError> {
        if roll.blind {
            return Err(ActionError::WrongMode {
                action: "blind roll",
                mode: RulesetMode::Chamber,
            });
        }
        let stage_die = ctx
            .config
            .chamber_stage(stage_of(ctx.table()))
            .ok_or(ActionError::WrongPhase { action: "roll" })?;
        if roll.die != stage_die {
            return Err(ActionError::ForcedDie { seat, die: stage_die });
        }
        Ok(())
    }

    fn purchase_cost(&self, _config: &TableConfig, _die: Die, _ante: u64, _blind: bool) -> u64 {
        0
    }

    fn score_roll(
        &self,
        ctx: &mut ActionContext<'_>,
        seat: SeatId,
        die: Die,
        face: u8,
        _blind: bool,
    ) -> Result<(), ActionError> {
        let stage = stage_of(ctx.table());
        let roll = if die == Die::Coin { Roll::coin(face) } else { Roll::public(die, face) };

        let state = ctx.seat_mut(seat)?;
        let eliminated = face == 1;
        if let Some(chamber) = state.chamber_mut() {
            chamber.acted_stage = Some(stage);
            if eliminated {
                chamber.fatal_roll = Some(roll);
            } else if die != Die::Coin && die.is_max(face) {
                chamber.boots += 1;
            }
        }

        if eliminated {
            state.busted = true;
            state.set_rolls(Vector::new());
            debug!(%seat, %die, "eliminated");
            ctx.notify_table(format!("{seat} rolled a 1 on the {die} and is out."));
            ctx.table_mut().pending = None;
            return Ok(());
        }

        state.push_roll(roll);
        let total = state.total;
        let boots = state.chamber().map_or(0, |c| c.boots);
        ctx.table_mut().pending = Some(Pending::ChamberContinue { seat });

        let message = if die != Die::Coin && die.is_max(face) {
            format!("{face} on the {die}! Total {total}, {boots} boot(s) to spend.")
        } else {
            format!("{face} on the {die}; total {total}.")
        };
        ctx.notify(seat, message, Severity::Info);
        Ok(())
    }

    fn can_hold(&self, ctx: &ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
        if ctx.seat(seat)?.total < best_live_total(ctx.table()) {
            return Err(ActionError::HoldNotAllowed { seat });
        }
        Ok(())
    }

    fn on_hold(&self, ctx: &mut ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
        let stage = stage_of(ctx.table());
        if stage < ctx.config.coward_stage_cutoff {
            if let Some(chamber) = ctx.seat_mut(seat)?.chamber_mut() {
                chamber.coward = true;
            }
            debug!(%seat, stage, "coward hold");
        }
        Ok(())
    }

    fn can_fold(&self, _ctx: &ActionContext<'_>, _seat: SeatId) -> Result<(), ActionError> {
        Err(ActionError::WrongMode {
            action: "fold",
            mode: RulesetMode::Chamber,
        })
    }

    fn must_roll(&self, ctx: &ActionContext<'_>, seat: SeatId) -> bool {
        let table = ctx.table();
        owes_roll(table, seat, stage_of(table))
    }

    fn after_turn(&self, ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
        if self.is_round_over(ctx.table()) {
            let table = ctx.table_mut();
            table.phase = Phase::Complete;
            table.current_player = None;
            debug!("chamber round over");
            return Ok(());
        }

        let stage = stage_of(ctx.table());
        let current = ctx.table().current_player;
        let table = ctx.table();
        if let Some((seat, _)) = next_active_after(ctx, current, |s| owes_roll(table, s, stage)) {
            ctx.table_mut().current_player = Some(seat);
            return Ok(());
        }

        // Everyone still in has rolled this stage.
        if stage >= ctx.config.final_chamber_stage() {
            let table = ctx.table_mut();
            table.phase = Phase::Complete;
            table.current_player = None;
            debug!(stage, "final stage done");
            return Ok(());
        }

        let next_stage = stage + 1;
        {
            let table = ctx.table_mut();
            table.variant = VariantState::Chamber(ChamberTable { stage: next_stage });
            table.betting_round += 1;
        }
        let first = next_active_after(ctx, None, |_| true).map(|(seat, _)| seat);
        let table = ctx.table_mut();
        table.current_player = first;
        if first.is_none() {
            table.phase = Phase::Complete;
        }

        if let Some(die) = ctx.config.chamber_stage(next_stage) {
            debug!(stage = next_stage, %die, "stage advanced");
            ctx.notify_table(format!("Stage {}: everyone rolls the {die}.", next_stage + 1));
        }
        Ok(())
    }

    fn is_round_over(&self, table: &TableData) -> bool {
        table.live_seats().len() <= 1 || table.active_seats().is_empty()
    }

    fn standings(&self, table: &TableData, _config: &TableConfig) -> Standings {
        Standings::from_totals(
            table
                .seats
                .iter()
                .filter(|(_, s)| s.is_live())
                .map(|(&seat, s)| (seat, s.total)),
        )
    }

    fn duel_kind(&self) -> DuelKind {
        DuelKind::CoinFlip
    }

    fn has_inspection(&self) -> bool {
        false
    }
}

fn require_continue_window(ctx: &ActionContext<'_>, seat: SeatId, action: &'static str) -> Result<(), ActionError> {
    require_betting(ctx, action)?;
    if ctx.table().mode != RulesetMode::Chamber {
        return Err(ActionError::WrongMode {
            action,
            mode: ctx.table().mode,
        });
    }
    match ctx.table().pending {
        Some(Pending::ChamberContinue { seat: owner }) if owner == seat => Ok(()),
        Some(pending) => Err(ActionError::PendingDecision { seat: pending.owner() }),
        None => Err(ActionError::WrongPhase { action }),
    }
}

/// Spend a boot to force a held seat back into the betting.
pub fn boot(ctx: &mut ActionContext<'_>, seat: SeatId, target: SeatId) -> Result<(), ActionError> {
    require_continue_window(ctx, seat, "boot")?;
    if target == seat {
        return Err(ActionError::malformed("cannot boot yourself"));
    }
    let boots = ctx.seat(seat)?.chamber().map_or(0, |c| c.boots);
    if boots == 0 {
        return Err(ActionError::NoBoots { seat });
    }
    if !ctx.seat(target)?.held {
        return Err(ActionError::malformed(format!("{target} is not holding")));
    }

    if let Some(chamber) = ctx.seat_mut(seat)?.chamber_mut() {
        chamber.boots -= 1;
    }
    ctx.seat_mut(target)?.held = false;

    debug!(%seat, %target, "boot");
    ctx.notify(target, format!("{seat} booted you back into the game."), Severity::Warning);
    Ok(())
}

/// Move on after a Chamber roll.
pub fn goblin_continue(ctx: &mut ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
    require_continue_window(ctx, seat, "goblin_continue")?;
    end_turn(ctx)
}
