//! Goad: push another seat into rolling.

use tracing::debug;

use crate::core::dice::Die;
use crate::core::error::ActionError;
use crate::core::seat::{SeatId, Skill};
use crate::core::state::ForcedLock;
use crate::rules::ActionContext;
use crate::services::Severity;

use super::{mark_used, require_other_seat, require_skill_window, SkillSlot};

/// Intimidation or Persuasion, opposed by the target's Insight.
///
/// Success locks the target into rolling on its next turn (no hold, no
/// fold); a critical success locks it to the d20. A critical failure locks
/// the goader to the d20 instead.
pub fn goad(ctx: &mut ActionContext<'_>, seat: SeatId, target: SeatId, skill: Skill) -> Result<(), ActionError> {
    if !matches!(skill, Skill::Intimidation | Skill::Persuasion) {
        return Err(ActionError::malformed(format!("cannot goad with {skill}")));
    }
    require_skill_window(ctx, seat, SkillSlot::Goad)?;
    require_other_seat(ctx, seat, target)?;
    if ctx.seat(target)?.is_terminal() {
        return Err(ActionError::SeatFinished { seat: target });
    }
    mark_used(ctx, seat, SkillSlot::Goad)?;

    let result = ctx.opposed_check(seat, skill, target, Skill::Insight)?;
    debug!(%seat, %target, %skill, natural = result.natural, outcome = ?result.outcome, "goad");

    if result.fumbled() {
        ctx.skills_mut(seat)?.lock = Some(ForcedLock {
            die: Some(Die::D20),
            source: seat,
        });
        ctx.notify(seat, format!("{target} turns it around: your next roll must be a d20."), Severity::Info);
    } else if result.success() {
        let die = result.critical().then_some(Die::D20);
        ctx.skills_mut(target)?.lock = Some(ForcedLock { die, source: seat });
        let message = match die {
            Some(die) => format!("{seat} goaded you: you must roll a {die} next."),
            None => format!("{seat} goaded you: you must roll next."),
        };
        ctx.notify(target, message, Severity::Warning);
        ctx.notify(seat, format!("{target} takes the bait."), Severity::Info);
    } else {
        ctx.notify(seat, format!("{target} shrugs you off."), Severity::Info);
    }
    Ok(())
}
