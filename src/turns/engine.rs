//! Turn resolution.
//!
//! A turn moves through:
//!
//! ```text
//! awaiting action -> roll | hold | fold | skill
//!                 -> [pending: cheat decision | chamber continue]
//!                 -> finish -> next seat | betting complete
//! ```
//!
//! Everything here is ruleset-neutral. Ruleset-specific checks and
//! bookkeeping go through `ctx.ruleset()`.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::action::{Payment, RollPayload};
use crate::core::dice::Die;
use crate::core::error::ActionError;
use crate::core::seat::SeatId;
use crate::core::state::{Pending, Phase, TableStatus};
use crate::rules::calc::calculate_betting_order;
use crate::rules::ActionContext;
use crate::services::Severity;

/// The table is mid-betting.
pub fn require_betting(ctx: &ActionContext<'_>, action: &'static str) -> Result<(), ActionError> {
    if ctx.state.status != TableStatus::Playing {
        return Err(ActionError::WrongStatus {
            action,
            status: ctx.state.status,
        });
    }
    if ctx.table().phase != Phase::Betting {
        return Err(ActionError::WrongPhase { action });
    }
    Ok(())
}

/// It is `seat`'s turn and the seat can still act.
pub fn require_turn(ctx: &ActionContext<'_>, seat: SeatId, action: &'static str) -> Result<(), ActionError> {
    require_betting(ctx, action)?;
    let state = ctx.seat(seat)?;
    if ctx.table().current_player != Some(seat) {
        return Err(ActionError::NotYourTurn { seat });
    }
    if state.is_terminal() {
        return Err(ActionError::SeatFinished { seat });
    }
    Ok(())
}

/// Nothing is waiting on a decision.
pub fn require_no_pending(ctx: &ActionContext<'_>) -> Result<(), ActionError> {
    match ctx.table().pending {
        Some(pending) => Err(ActionError::PendingDecision { seat: pending.owner() }),
        None => Ok(()),
    }
}

/// Fix the betting order from the visible totals and hand the first turn out.
pub fn begin_betting(ctx: &mut ActionContext<'_>) {
    let participants: Vec<SeatId> = ctx.table().betting_order.iter().copied().collect();
    let visible: FxHashMap<SeatId, u32> = ctx
        .table()
        .seats
        .iter()
        .map(|(&seat, state)| (seat, state.visible_total))
        .collect();
    let order = calculate_betting_order(&participants, &visible);

    let table = ctx.table_mut();
    table.betting_order = order.into_iter().collect();
    table.betting_round = 1;
    table.phase = Phase::Betting;
    table.pending = None;

    let first = table.active_seats().first().copied();
    table.current_player = first;
    match first {
        Some(seat) => {
            debug!(%seat, order = ?ctx.table().betting_order, "betting opened");
            ctx.notify(seat, "Your turn.", Severity::Info);
        }
        None => ctx.table_mut().phase = Phase::Complete,
    }
}

/// Next face for `die`: a hunch's preroll if the seat holds one.
fn draw_face(ctx: &mut ActionContext<'_>, seat: SeatId, die: Die) -> Result<u8, ActionError> {
    let foreseen = ctx.seat_mut(seat)?.skills_mut().and_then(|skills| {
        let index = skills.prerolls.iter().position(|f| f.die == die)?;
        Some(skills.prerolls.remove(index).face)
    });
    Ok(match foreseen {
        Some(face) => face,
        None => ctx.dice.roll(die.sides()),
    })
}

/// Buy (Standard) or take (Chamber) a die and roll it.
pub fn roll(ctx: &mut ActionContext<'_>, seat: SeatId, payload: RollPayload) -> Result<(), ActionError> {
    require_turn(ctx, seat, "roll")?;
    require_no_pending(ctx)?;
    let ruleset = ctx.ruleset();
    ruleset.allowed_die(ctx, seat, &payload)?;

    let cost = ruleset.purchase_cost(ctx.config, payload.die, ctx.state.ante, payload.blind);
    if cost > 0 {
        match payload.payment {
            Payment::Coin => {
                ctx.charge(seat, cost)?;
                ctx.state.pot += cost;
            }
            Payment::Tab => ctx.seat_mut(seat)?.tab += 1,
        }
    }

    let face = draw_face(ctx, seat, payload.die)?;
    {
        let state = ctx.seat_mut(seat)?;
        state.acted = true;
        if let Some(skills) = state.skills_mut() {
            skills.lock = None;
        }
    }
    debug!(%seat, die = %payload.die, face, cost, blind = payload.blind, "roll");

    ruleset.score_roll(ctx, seat, payload.die, face, payload.blind)?;

    // No follow-up decision means the roll closed the turn.
    if ctx.table().pending.is_none() {
        end_turn(ctx)?;
    }
    Ok(())
}

/// Close the Standard cheat window: show the die and settle any bust.
pub fn close_cheat_window(ctx: &mut ActionContext<'_>, seat: SeatId, die_index: usize) -> Result<(), ActionError> {
    let limit = ctx.config.bust_limit;
    let state = ctx.seat_mut(seat)?;
    if let Some(mut roll) = state.rolls.get(die_index).copied() {
        roll.public = !roll.blind;
        state.rolls.set(die_index, roll);
    }
    state.recompute();

    let busted = state.total > limit;
    state.pending_bust = false;
    if busted && !state.caught {
        state.busted = true;
        let total = state.total;
        debug!(%seat, total, "bust");
        ctx.notify(seat, format!("Bust with {total}."), Severity::Info);
    }
    ctx.table_mut().pending = None;
    Ok(())
}

/// End the current seat's turn on its own say-so.
pub fn finish_turn(ctx: &mut ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
    require_turn(ctx, seat, "finish_turn")?;

    match ctx.table().pending {
        Some(Pending::CheatDecision { seat: owner, die_index }) if owner == seat => {
            close_cheat_window(ctx, seat, die_index)?;
        }
        Some(Pending::ChamberContinue { seat: owner }) if owner == seat => {
            ctx.table_mut().pending = None;
        }
        Some(pending) => return Err(ActionError::PendingDecision { seat: pending.owner() }),
        None => {
            if ctx.ruleset().must_roll(ctx, seat) {
                return Err(ActionError::MustRoll { seat });
            }
        }
    }

    end_turn(ctx)
}

/// Stand on the current total.
pub fn hold(ctx: &mut ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
    require_turn(ctx, seat, "hold")?;
    require_no_pending(ctx)?;
    let ruleset = ctx.ruleset();
    ruleset.can_hold(ctx, seat)?;

    let state = ctx.seat_mut(seat)?;
    state.held = true;
    state.acted = true;
    let total = state.total;
    ruleset.on_hold(ctx, seat)?;

    debug!(%seat, total, "hold");
    ctx.notify(seat, format!("Holding at {total}."), Severity::Info);
    end_turn(ctx)
}

/// Drop out of the round. Folding before acting refunds part of the ante.
pub fn fold(ctx: &mut ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
    require_turn(ctx, seat, "fold")?;
    require_no_pending(ctx)?;
    ctx.ruleset().can_fold(ctx, seat)?;

    let refund = if ctx.seat(seat)?.acted {
        0
    } else {
        ctx.config.fold_refund(ctx.state.ante).min(ctx.state.pot)
    };

    ctx.seat_mut(seat)?.folded = true;
    if refund > 0 {
        ctx.state.pot -= refund;
        ctx.ledger.credit(seat, refund);
    }

    debug!(%seat, refund, "fold");
    ctx.notify(seat, format!("Folded; {refund} refunded."), Severity::Info);
    end_turn(ctx)
}

/// Clear per-turn state and pass the turn on.
pub fn end_turn(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    ctx.table_mut().pending = None;
    if let Some(seat) = ctx.table().current_player {
        if let Some(skills) = ctx.seat_mut(seat)?.skills_mut() {
            skills.used.this_turn = false;
            skills.used.cheated_this_turn = false;
        }
    }

    ctx.ruleset().after_turn(ctx)?;

    if let Some(next) = ctx.table().current_player {
        if ctx.table().phase == Phase::Betting {
            ctx.notify(next, "Your turn.", Severity::Info);
        }
    }
    Ok(())
}

/// Next active seat after `from` in betting order, wrapping around.
///
/// Returns the seat and whether the search wrapped past the end.
pub fn next_active_after(ctx: &ActionContext<'_>, from: Option<SeatId>, eligible: impl Fn(SeatId) -> bool) -> Option<(SeatId, bool)> {
    let order = &ctx.table().betting_order;
    let len = order.len();
    if len == 0 {
        return None;
    }
    let start = from
        .and_then(|seat| order.iter().position(|&s| s == seat))
        .map_or(0, |i| i + 1);

    (0..len).find_map(|step| {
        let index = start + step;
        let seat = order[index % len];
        let active = ctx.table().seat(seat).is_some_and(|s| !s.is_terminal());
        (active && eligible(seat)).then_some((seat, index >= len))
    })
}
