//! Standard-mode skills.
//!
//! Each skill is one d20 contest (see `rules::contest`) followed by an
//! effect. Social skills (hunch, profile, goad, bump) are used on your own
//! turn with nothing pending, one per turn and each once per round. Cheating
//! happens only inside your own cheat window and closes the turn.
//!
//! Every natural 1 leaves a cleaning fee owing, settled at payout.

pub mod bump;
pub mod cheat;
pub mod goad;
pub mod hunch;
pub mod profile;

pub use bump::{bump_retaliation, bump_table};
pub use cheat::cheat;
pub use goad::goad;
pub use hunch::hunch;
pub use profile::profile;

use crate::core::error::ActionError;
use crate::core::seat::SeatId;
use crate::core::state::SkillsUsed;
use crate::rules::ActionContext;
use crate::turns::engine::{require_no_pending, require_turn};

/// Which once-per-round flag a skill spends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SkillSlot {
    Hunch,
    Profile,
    Goad,
    Bump,
}

impl SkillSlot {
    fn name(self) -> &'static str {
        match self {
            SkillSlot::Hunch => "hunch",
            SkillSlot::Profile => "profile",
            SkillSlot::Goad => "goad",
            SkillSlot::Bump => "bump_table",
        }
    }

    fn flag(self, used: &mut SkillsUsed) -> &mut bool {
        match self {
            SkillSlot::Hunch => &mut used.hunch,
            SkillSlot::Profile => &mut used.profile,
            SkillSlot::Goad => &mut used.goad,
            SkillSlot::Bump => &mut used.bump,
        }
    }
}

/// Check that `seat` may use a social skill right now.
pub(crate) fn require_skill_window(ctx: &ActionContext<'_>, seat: SeatId, slot: SkillSlot) -> Result<(), ActionError> {
    let action = slot.name();
    if !ctx.ruleset().allows_skills() {
        return Err(ActionError::WrongMode {
            action,
            mode: ctx.table().mode,
        });
    }
    require_turn(ctx, seat, action)?;
    require_no_pending(ctx)?;

    let mut used = ctx.skills(seat)?.used;
    if used.this_turn {
        return Err(ActionError::AlreadyUsed { seat, what: "a skill this turn" });
    }
    if *slot.flag(&mut used) {
        return Err(ActionError::AlreadyUsed { seat, what: action });
    }
    Ok(())
}

/// Spend the skill's flags.
pub(crate) fn mark_used(ctx: &mut ActionContext<'_>, seat: SeatId, slot: SkillSlot) -> Result<(), ActionError> {
    let used = &mut ctx.skills_mut(seat)?.used;
    used.this_turn = true;
    *slot.flag(used) = true;
    Ok(())
}

/// Target of a skill: another seat in this round.
pub(crate) fn require_other_seat(ctx: &ActionContext<'_>, seat: SeatId, target: SeatId) -> Result<(), ActionError> {
    if target == seat {
        return Err(ActionError::malformed("cannot target yourself"));
    }
    ctx.seat(target)?;
    Ok(())
}
