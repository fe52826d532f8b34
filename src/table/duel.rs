//! Tie-break duels.
//!
//! Showdown (Standard): each tied seat rolls a d20 plus one d4 for every
//! die of theirs that landed on its natural maximum. CoinFlip (Chamber):
//! each tied seat flips a coin. Either way, a tie at the top re-duels among
//! the tied seats only.

use tracing::{debug, info};

use crate::core::dice::Die;
use crate::core::error::ActionError;
use crate::core::seat::SeatId;
use crate::core::state::{Duel, DuelKind, DuelRoll, TableStatus};
use crate::rules::calc::summarize_duel_rolls;
use crate::rules::ActionContext;
use crate::services::Severity;

use super::payout;

/// Open a duel among the tied seats.
pub fn open(ctx: &mut ActionContext<'_>, seats: Vec<SeatId>, total: u32) -> Result<(), ActionError> {
    let kind = ctx.ruleset().duel_kind();
    info!(?seats, total, ?kind, "duel");
    for &seat in &seats {
        ctx.notify(seat, format!("Tied at {total}. Duel!"), Severity::Info);
    }
    ctx.state.duel = Some(Duel::new(seats, kind));
    ctx.state.status = TableStatus::Duel;
    Ok(())
}

fn roll_for(ctx: &mut ActionContext<'_>, seat: SeatId, kind: DuelKind) -> Result<DuelRoll, ActionError> {
    Ok(match kind {
        DuelKind::Showdown => {
            let hits = ctx.seat(seat)?.rolls.iter().filter(|r| r.is_natural_max()).count();
            let hits = u8::try_from(hits).unwrap_or(u8::MAX);
            let d20 = ctx.dice.d20();
            let d4_bonus: u32 = (0..hits).map(|_| u32::from(ctx.dice.roll(Die::D4.sides()))).sum();
            DuelRoll {
                d20,
                d4_bonus: u8::try_from(d4_bonus).unwrap_or(u8::MAX),
                hits,
                total: u32::from(d20) + d4_bonus,
            }
        }
        DuelKind::CoinFlip => {
            let face = ctx.dice.roll(Die::Coin.sides());
            DuelRoll {
                total: u32::from(face),
                ..DuelRoll::default()
            }
        }
    })
}

/// Roll for a seat in the running duel.
pub fn duel_roll(ctx: &mut ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
    if ctx.state.status != TableStatus::Duel {
        return Err(ActionError::WrongStatus {
            action: "duel_roll",
            status: ctx.state.status,
        });
    }
    let duel = ctx
        .state
        .duel
        .as_ref()
        .ok_or(ActionError::WrongPhase { action: "duel_roll" })?;
    if !duel.participants.contains(&seat) {
        return Err(ActionError::NotYourTurn { seat });
    }
    if !duel.pending_rolls.contains(&seat) {
        return Err(ActionError::AlreadyUsed { seat, what: "this duel roll" });
    }
    let kind = duel.kind;

    let roll = roll_for(ctx, seat, kind)?;
    debug!(%seat, d20 = roll.d20, hits = roll.hits, bonus = roll.d4_bonus, total = roll.total, "duel roll");
    ctx.notify(seat, format!("Duel roll: {}.", roll.total), Severity::Info);

    let Some(duel) = ctx.state.duel.as_mut() else {
        return Err(ActionError::WrongPhase { action: "duel_roll" });
    };
    duel.pending_rolls.retain(|&s| s != seat);
    duel.rolls.insert(seat, roll);
    if !duel.pending_rolls.is_empty() {
        return Ok(());
    }

    let summary = summarize_duel_rolls(&duel.rolls);
    if summary.is_tie {
        duel.rematch(summary.winners.clone());
        let round = duel.round;
        info!(round, winners = ?summary.winners, highest = summary.highest_total, "duel tied again");
        for &seat in &summary.winners {
            ctx.notify(seat, format!("Tied again at {}. Roll once more.", summary.highest_total), Severity::Info);
        }
        return Ok(());
    }

    let winner = summary.winners.first().copied();
    payout::settle(ctx, winner)
}
