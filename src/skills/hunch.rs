//! Hunch: read the dice before you buy one.

use tracing::debug;

use crate::core::dice::Die;
use crate::core::error::ActionError;
use crate::core::seat::{SeatId, Skill};
use crate::core::state::{ForcedLock, Foresight, Insight, InsightKind};
use crate::rules::calc::{classify_hunch_prediction, HunchThresholds};
use crate::rules::{ActionContext, Difficulty};
use crate::services::Severity;

use super::{mark_used, require_skill_window, SkillSlot};

/// Insight against the hunch difficulty.
///
/// - Success: every purchasable die is pre-rolled; the seat learns whether
///   each next roll comes up high or low, and the next roll of that die
///   will show the pre-rolled face.
/// - Critical success: the exact faces instead of high/low.
/// - Critical failure: the seat's nerve goes, forcing a d20 next roll.
pub fn hunch(ctx: &mut ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
    require_skill_window(ctx, seat, SkillSlot::Hunch)?;
    mark_used(ctx, seat, SkillSlot::Hunch)?;

    let result = ctx.skill_check(seat, Skill::Insight, Difficulty::Fixed(ctx.config.hunch_dc))?;
    debug!(%seat, natural = result.natural, outcome = ?result.outcome, "hunch");

    if result.fumbled() {
        ctx.skills_mut(seat)?.lock = Some(ForcedLock {
            die: Some(Die::D20),
            source: seat,
        });
        ctx.notify(seat, "Your hunch shakes you: next roll must be a d20.", Severity::Info);
        return Ok(());
    }
    if !result.success() {
        ctx.notify(seat, "Nothing comes to you.", Severity::Info);
        return Ok(());
    }

    let thresholds = HunchThresholds::default();
    let dice = ctx.config.standard_dice.clone();
    let mut foresight = Vec::with_capacity(dice.len());
    for die in dice {
        foresight.push(Foresight {
            die,
            face: ctx.dice.roll(die.sides()),
        });
    }

    let skills = ctx.skills_mut(seat)?;
    skills.prerolls.clear();
    for f in &foresight {
        skills.prerolls.push(*f);
        let kind = if result.critical() {
            InsightKind::NextDieExact { die: f.die, face: f.face }
        } else {
            InsightKind::NextDie {
                die: f.die,
                hunch: classify_hunch_prediction(f.die, f.face, &thresholds),
            }
        };
        skills.insights.push_back(Insight { about: seat, kind });
    }

    let reading: Vec<String> = foresight
        .iter()
        .map(|f| {
            if result.critical() {
                format!("{} {}", f.die, f.face)
            } else {
                format!("{} {:?}", f.die, classify_hunch_prediction(f.die, f.face, &thresholds))
            }
        })
        .collect();
    ctx.notify(seat, format!("Hunch: {}.", reading.join(", ")), Severity::Info);
    Ok(())
}
