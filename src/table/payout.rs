//! End-of-round settlement.
//!
//! Steps run in a fixed order:
//!
//! 1. Cleaning fees: each fumble costs its seat a flat fee into the pot.
//!    Waived when the seat cannot pay.
//! 2. Confirmed accusations: the accuser's fee comes back out of the pot,
//!    and the cheater pays the accuser a bounty directly.
//! 3. The winner takes the pot. A Chamber coward takes only their share;
//!    the rest carries over.
//! 4. Side bets settle from their own pool.
//!
//! Whatever the steps do, the pot balances:
//! `pot_after + paid_from_pot == pot_before + fees_collected`.

use tracing::info;

use crate::core::error::ActionError;
use crate::core::seat::SeatId;
use crate::core::state::{Bounty, Payout, RoundSummary, TableStatus};
use crate::rules::ActionContext;
use crate::services::Severity;

use super::side_bets;

fn collect_cleaning_fees(ctx: &mut ActionContext<'_>) -> Vec<Payout> {
    let owing: Vec<(SeatId, u64)> = ctx
        .table()
        .seats
        .iter()
        .filter(|(_, s)| s.cleaning_fees > 0)
        .map(|(&seat, s)| (seat, ctx.config.cleaning_fee * u64::from(s.cleaning_fees)))
        .collect();

    let mut collected = Vec::new();
    for (seat, amount) in owing {
        if amount == 0 {
            continue;
        }
        if ctx.ledger.deduct(seat, amount) {
            ctx.state.pot += amount;
            collected.push(Payout { seat, amount });
            ctx.notify(seat, format!("Cleaning fee: {amount}."), Severity::Info);
        } else {
            ctx.notify(seat, format!("Cleaning fee of {amount} waived; you are broke."), Severity::Warning);
        }
    }
    collected
}

fn settle_accusations(ctx: &mut ActionContext<'_>) -> (Vec<Payout>, Vec<Bounty>) {
    let bounty = ctx.config.bounty(ctx.state.ante);
    let confirmed: Vec<_> = ctx
        .table()
        .accusations
        .iter()
        .filter(|a| a.confirmed)
        .copied()
        .collect();

    let mut refunds = Vec::new();
    let mut bounties = Vec::new();
    for accusation in confirmed {
        let refund = accusation.fee.min(ctx.state.pot);
        if refund > 0 {
            ctx.state.pot -= refund;
            ctx.ledger.credit(accusation.accuser, refund);
            refunds.push(Payout {
                seat: accusation.accuser,
                amount: refund,
            });
        }

        if bounty > 0 && ctx.ledger.deduct(accusation.target, bounty) {
            ctx.ledger.credit(accusation.accuser, bounty);
            bounties.push(Bounty {
                accuser: accusation.accuser,
                cheater: accusation.target,
                amount: bounty,
            });
            ctx.notify(accusation.target, format!("You pay a {bounty} bounty to {}.", accusation.accuser), Severity::Warning);
            ctx.notify(accusation.accuser, format!("Bounty collected: {bounty}."), Severity::Info);
        } else if bounty > 0 {
            ctx.notify(accusation.accuser, format!("{} cannot cover the bounty.", accusation.target), Severity::Warning);
        }
    }
    (refunds, bounties)
}

/// Pay out the round and record its summary.
pub fn settle(ctx: &mut ActionContext<'_>, winner: Option<SeatId>) -> Result<(), ActionError> {
    let pot_before = ctx.state.pot;

    let cleaning_fees = collect_cleaning_fees(ctx);
    let (accusation_refunds, bounties) = settle_accusations(ctx);

    let mut winner_payout = 0;
    let mut coward_tax = 0;
    let mut winning_total = None;
    if let Some(seat) = winner {
        let state = ctx.seat(seat)?;
        winning_total = Some(state.total);
        let coward = state.chamber().is_some_and(|c| c.coward);

        let pot = ctx.state.pot;
        winner_payout = if coward { ctx.config.coward_share(pot) } else { pot };
        coward_tax = pot - winner_payout;

        ctx.state.pot -= winner_payout;
        ctx.ledger.credit(seat, winner_payout);
        let message = if coward {
            format!("{seat} wins {winner_payout}; {coward_tax} withheld as Coward's Tax.")
        } else {
            format!("{seat} wins {winner_payout}.")
        };
        ctx.notify_table(message);
    } else {
        ctx.notify_table(format!("No winner. {} carries over.", ctx.state.pot));
    }

    let side_bet_payouts = side_bets::settle(ctx, winner);

    let summary = RoundSummary {
        round: ctx.state.round,
        mode: ctx.table().mode,
        winner,
        winning_total,
        pot_before,
        cleaning_fees,
        accusation_refunds,
        bounties,
        winner_payout,
        coward_tax,
        carried_over: ctx.state.pot,
        side_bet_payouts,
    };
    info!(
        round = summary.round,
        winner = ?summary.winner,
        payout = summary.winner_payout,
        carried_over = summary.carried_over,
        fees = summary.fees_collected(),
        "round settled"
    );

    ctx.state.last_round = Some(summary);
    ctx.state.duel = None;
    ctx.state.status = TableStatus::Payout;
    Ok(())
}
