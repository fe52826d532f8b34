//! Cheat: nudge one of your own dice while nobody is looking.
//!
//! Only hidden dice can be touched: the hole die and the die just rolled.
//!
//! The difficulty is the seat's heat. Landed cheats and failed attempts
//! both add heat; a natural 20 lands without a trace and adds none.
//!
//! | natural | effect                                       |
//! |---------|----------------------------------------------|
//! | 1       | caught and fined, die untouched              |
//! | 20      | die changed, invisible to inspection         |
//! | hit     | die changed, heat rises                      |
//! | miss    | die untouched, heat rises                    |
//!
//! Every attempt is logged, and the attempt closes the turn.

use tracing::{debug, info};

use crate::core::action::CheatPayload;
use crate::core::error::ActionError;
use crate::core::seat::{SeatId, Skill};
use crate::core::state::{CheatRecord, Pending};
use crate::rules::calc::reroll_die_at_index;
use crate::rules::{ActionContext, Difficulty};
use crate::services::Severity;
use crate::turns::engine::{close_cheat_window, end_turn, require_turn};

/// Attempt a cheat inside the seat's own cheat window.
pub fn cheat(ctx: &mut ActionContext<'_>, seat: SeatId, payload: CheatPayload) -> Result<(), ActionError> {
    if !ctx.ruleset().allows_skills() {
        return Err(ActionError::WrongMode {
            action: "cheat",
            mode: ctx.table().mode,
        });
    }
    require_turn(ctx, seat, "cheat")?;
    let window = match ctx.table().pending {
        Some(Pending::CheatDecision { seat: owner, die_index }) if owner == seat => die_index,
        Some(pending) => return Err(ActionError::PendingDecision { seat: pending.owner() }),
        None => return Err(ActionError::WrongPhase { action: "cheat" }),
    };
    if !matches!(payload.skill, Skill::SleightOfHand | Skill::Deception) {
        return Err(ActionError::malformed(format!("cannot cheat with {}", payload.skill)));
    }
    if payload.adjustment == 0 {
        return Err(ActionError::malformed("adjustment must be nonzero"));
    }
    let old = ctx
        .seat(seat)?
        .rolls
        .get(payload.die_index)
        .copied()
        .ok_or_else(|| ActionError::malformed(format!("no die {}", payload.die_index)))?;
    if old.public {
        return Err(ActionError::malformed(format!("die {} is face up", payload.die_index)));
    }
    if ctx.skills(seat)?.used.cheated_this_turn {
        return Err(ActionError::AlreadyUsed { seat, what: "cheat" });
    }

    let dc = ctx.skills(seat)?.heat;
    let result = ctx.skill_check(seat, payload.skill, Difficulty::Fixed(dc))?;
    let mut record = CheatRecord {
        die_index: payload.die_index,
        adjustment: payload.adjustment,
        fumbled: result.fumbled(),
        failed: !result.success(),
        invisible: result.critical(),
        dc,
        roll: result.natural,
        old_value: Some(old.result),
        new_value: None,
    };
    // A fumble is logged as a fumble, not as a plain miss.
    if record.fumbled {
        record.failed = false;
    }

    if record.fumbled {
        let fine = ctx.config.cheat_fine(ctx.state.ante);
        ctx.seat_mut(seat)?.caught = true;
        if ctx.ledger.can_afford(seat, fine) && ctx.ledger.deduct(seat, fine) {
            ctx.state.pot += fine;
            ctx.notify(seat, format!("Caught red-handed! Fined {fine}."), Severity::Warning);
        } else {
            ctx.notify(seat, "Caught red-handed! You cannot cover the fine.", Severity::Warning);
        }
        info!(%seat, fine, "cheat caught");
    } else if record.failed {
        ctx.skills_mut(seat)?.heat += ctx.config.heat_step;
        ctx.notify(seat, "Your hands fumble; the die stays put.", Severity::Info);
    } else {
        let state = ctx.seat_mut(seat)?;
        let rolls = reroll_die_at_index(
            &state.rolls,
            payload.die_index,
            i32::from(old.result) + payload.adjustment,
        )?;
        let new_value = rolls.get(payload.die_index).map(|r| r.result);
        state.set_rolls(rolls);
        record.new_value = new_value;
        if !record.invisible {
            ctx.skills_mut(seat)?.heat += ctx.config.heat_step;
        }
        let shown = new_value.unwrap_or(old.result);
        ctx.notify(seat, format!("Die {} now shows {shown}.", payload.die_index), Severity::Info);
    }

    debug!(%seat, die_index = payload.die_index, natural = record.roll, dc, altered = record.altered(), invisible = record.invisible, "cheat");
    let skills = ctx.skills_mut(seat)?;
    skills.cheats.push_back(record);
    skills.used.cheated_this_turn = true;

    close_cheat_window(ctx, seat, window)?;
    end_turn(ctx)
}
