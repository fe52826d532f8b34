//! Side bets on who wins the round.
//!
//! Any seat may back another during the first pass of betting. Stakes sit
//! in their own pool, apart from the pot. Backers of the winner split the
//! whole pool in proportion to their stakes; if nobody backed the winner,
//! or nobody won, every stake goes back.

use tracing::debug;

use crate::core::error::ActionError;
use crate::core::seat::SeatId;
use crate::core::state::{Payout, SideBet};
use crate::rules::calc::split_proportionally;
use crate::rules::ActionContext;
use crate::services::Severity;
use crate::turns::engine::require_betting;

/// Back `champion` with `amount`.
pub fn place_side_bet(ctx: &mut ActionContext<'_>, seat: SeatId, champion: SeatId, amount: u64) -> Result<(), ActionError> {
    require_betting(ctx, "place_side_bet")?;
    if ctx.table().betting_round > 1 {
        return Err(ActionError::WrongPhase { action: "place_side_bet" });
    }
    ctx.seat(seat)?;
    ctx.seat(champion)?;
    if champion == seat {
        return Err(ActionError::malformed("cannot side bet on yourself"));
    }
    if amount == 0 {
        return Err(ActionError::malformed("side bet must be positive"));
    }
    if ctx.table().side_bets.bets.iter().any(|b| b.bettor == seat) {
        return Err(ActionError::AlreadyUsed { seat, what: "a side bet" });
    }

    ctx.charge(seat, amount)?;
    let side_bets = &mut ctx.table_mut().side_bets;
    side_bets.pool += amount;
    side_bets.bets.push_back(SideBet {
        bettor: seat,
        champion,
        amount,
    });

    debug!(%seat, %champion, amount, "side bet");
    ctx.notify(seat, format!("You backed {champion} for {amount}."), Severity::Info);
    Ok(())
}

/// Pay out or refund the side-bet pool.
pub fn settle(ctx: &mut ActionContext<'_>, winner: Option<SeatId>) -> Vec<Payout> {
    let pool = ctx.table().side_bets.pool;
    if pool == 0 {
        return Vec::new();
    }
    let bets: Vec<SideBet> = ctx.table().side_bets.bets.iter().copied().collect();

    let backers: Vec<(SeatId, u64)> = bets
        .iter()
        .filter(|b| Some(b.champion) == winner)
        .map(|b| (b.bettor, b.amount))
        .collect();

    let payouts = if backers.is_empty() {
        bets.iter()
            .map(|b| Payout {
                seat: b.bettor,
                amount: b.amount,
            })
            .collect()
    } else {
        split_proportionally(pool, &backers)
    };

    for payout in &payouts {
        ctx.ledger.credit(payout.seat, payout.amount);
        ctx.notify(payout.seat, format!("Side bet returns {}.", payout.amount), Severity::Info);
    }
    ctx.table_mut().side_bets.pool = 0;
    debug!(pool, refunded = backers.is_empty(), "side bets settled");
    payouts
}
