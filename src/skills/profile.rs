//! Profile: size up an opponent.

use tracing::debug;

use crate::core::dice::Die;
use crate::core::error::ActionError;
use crate::core::seat::{SeatId, Skill};
use crate::core::state::{Insight, InsightKind};
use crate::rules::calc::{classify_hunch_prediction, HunchThresholds};
use crate::rules::{ActionContext, Difficulty};
use crate::services::Severity;

use crate::games::standard::HOLE_DIE;

use super::{mark_used, require_other_seat, require_skill_window, SkillSlot};

fn hole_value(ctx: &ActionContext<'_>, seat: SeatId) -> Result<Option<(Die, u8)>, ActionError> {
    Ok(ctx.seat(seat)?.rolls.get(HOLE_DIE).map(|r| (r.die, r.result)))
}

/// Investigation against the profile difficulty.
///
/// - Success: whether the target's hole die is high or low, and whether the
///   target has a landed cheat on the table.
/// - Critical success: the hole die's exact value, and the cheat answer.
/// - Critical failure: the target reads you instead and learns your hole die.
pub fn profile(ctx: &mut ActionContext<'_>, seat: SeatId, target: SeatId) -> Result<(), ActionError> {
    require_skill_window(ctx, seat, SkillSlot::Profile)?;
    require_other_seat(ctx, seat, target)?;
    mark_used(ctx, seat, SkillSlot::Profile)?;

    let result = ctx.skill_check(seat, Skill::Investigation, Difficulty::Fixed(ctx.config.profile_dc))?;
    debug!(%seat, %target, natural = result.natural, outcome = ?result.outcome, "profile");

    if result.fumbled() {
        if let Some((_, value)) = hole_value(ctx, seat)? {
            ctx.skills_mut(target)?.insights.push_back(Insight {
                about: seat,
                kind: InsightKind::HoleDieExact(value),
            });
            ctx.notify(target, format!("{seat} tipped their hand: hole die {value}."), Severity::Info);
        }
        ctx.notify(seat, format!("{target} caught you staring."), Severity::Info);
        return Ok(());
    }
    if !result.success() {
        ctx.notify(seat, format!("{target} gives nothing away."), Severity::Info);
        return Ok(());
    }

    let cheated = ctx.skills(target)?.has_detectable_cheat();
    let hole = match hole_value(ctx, target)? {
        Some((_, value)) if result.critical() => Some(InsightKind::HoleDieExact(value)),
        Some((die, value)) => Some(InsightKind::HoleDie(classify_hunch_prediction(
            die,
            value,
            &HunchThresholds::default(),
        ))),
        None => None,
    };

    let skills = ctx.skills_mut(seat)?;
    if let Some(kind) = hole {
        skills.insights.push_back(Insight { about: target, kind });
    }
    skills.insights.push_back(Insight {
        about: target,
        kind: InsightKind::Cheated(cheated),
    });

    let hole_text = match hole {
        Some(InsightKind::HoleDieExact(value)) => format!("hole die {value}"),
        Some(InsightKind::HoleDie(bucket)) => format!("hole die {bucket:?}"),
        _ => "no hole die".to_string(),
    };
    let cheat_text = if cheated { "has been cheating" } else { "looks clean" };
    ctx.notify(seat, format!("{target}: {hole_text}, {cheat_text}."), Severity::Info);
    Ok(())
}
