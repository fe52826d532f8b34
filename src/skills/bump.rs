//! Bump: jostle the table under another seat's dice.

use tracing::debug;

use crate::core::error::ActionError;
use crate::core::seat::{SeatId, Skill};
use crate::core::state::Pending;
use crate::rules::calc::reroll_die_at_index;
use crate::rules::ActionContext;
use crate::services::Severity;
use crate::turns::engine::{end_turn, require_betting};

use super::{mark_used, require_other_seat, require_skill_window, SkillSlot};

/// Face-up die at `die_index`, or a malformed-payload error.
fn require_public_die(ctx: &ActionContext<'_>, seat: SeatId, die_index: usize) -> Result<(), ActionError> {
    let roll = ctx
        .seat(seat)?
        .rolls
        .get(die_index)
        .copied()
        .ok_or_else(|| ActionError::malformed(format!("{seat} has no die {die_index}")))?;
    if !roll.public {
        return Err(ActionError::malformed(format!("{seat}'s die {die_index} is not face up")));
    }
    Ok(())
}

/// Reroll one die; a seat pushed over the limit busts on the spot.
fn knock_die(ctx: &mut ActionContext<'_>, seat: SeatId, die_index: usize) -> Result<bool, ActionError> {
    let limit = ctx.config.bust_limit;
    let sides = ctx
        .seat(seat)?
        .rolls
        .get(die_index)
        .map(|r| r.die.sides())
        .unwrap_or(1);
    let face = ctx.dice.roll(sides);

    let state = ctx.seat_mut(seat)?;
    let rolls = reroll_die_at_index(&state.rolls, die_index, i32::from(face))?;
    state.set_rolls(rolls);
    let busted = state.total > limit;
    if busted {
        state.busted = true;
        state.pending_bust = false;
    }
    let total = state.total;
    debug!(%seat, die_index, face, total, busted, "die knocked");
    Ok(busted)
}

/// Athletics, opposed by the target's Athletics.
///
/// Success rerolls one of the target's face-up dice. Failure lets the
/// target knock one of the bumper's dice in return.
pub fn bump_table(ctx: &mut ActionContext<'_>, seat: SeatId, target: SeatId, die_index: usize) -> Result<(), ActionError> {
    require_skill_window(ctx, seat, SkillSlot::Bump)?;
    require_other_seat(ctx, seat, target)?;
    if !ctx.seat(target)?.is_live() {
        return Err(ActionError::SeatFinished { seat: target });
    }
    require_public_die(ctx, target, die_index)?;
    mark_used(ctx, seat, SkillSlot::Bump)?;

    let result = ctx.opposed_check(seat, Skill::Athletics, target, Skill::Athletics)?;
    debug!(%seat, %target, die_index, natural = result.natural, outcome = ?result.outcome, "bump");

    if result.success() {
        let busted = knock_die(ctx, target, die_index)?;
        let total = ctx.seat(target)?.total;
        let message = if busted {
            format!("{seat} bumped the table: your dice now total {total}. Bust.")
        } else {
            format!("{seat} bumped the table: your dice now total {total}.")
        };
        ctx.notify(target, message, Severity::Warning);
    } else {
        ctx.table_mut().pending = Some(Pending::BumpRetaliation {
            victim: target,
            attacker: seat,
        });
        ctx.notify(target, format!("{seat} fumbled a bump. Pick one of their dice to knock."), Severity::Info);
        ctx.notify(seat, format!("{target} saw it coming."), Severity::Info);
    }
    Ok(())
}

/// The victim of a failed bump knocks one of the bumper's face-up dice.
pub fn bump_retaliation(ctx: &mut ActionContext<'_>, seat: SeatId, die_index: usize) -> Result<(), ActionError> {
    require_betting(ctx, "bump_retaliation")?;
    let attacker = match ctx.table().pending {
        Some(Pending::BumpRetaliation { victim, attacker }) if victim == seat => attacker,
        Some(pending) => return Err(ActionError::PendingDecision { seat: pending.owner() }),
        None => return Err(ActionError::WrongPhase { action: "bump_retaliation" }),
    };
    require_public_die(ctx, attacker, die_index)?;

    let busted = knock_die(ctx, attacker, die_index)?;
    ctx.table_mut().pending = None;

    let total = ctx.seat(attacker)?.total;
    ctx.notify(attacker, format!("{seat} knocked your dice: total {total}."), Severity::Warning);

    // The bumper was the seat on turn; a bust ends that turn.
    if busted && ctx.table().current_player == Some(attacker) {
        end_turn(ctx)?;
    }
    Ok(())
}
