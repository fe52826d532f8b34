//! Round lifecycle: lobby, opening, reveal, inspection, scoring.
//!
//! ```text
//! Lobby --start--> Playing(cut? -> betting) --all done--> Revealing
//!   --reveal--> Inspection --accuse*/skip--> scoring --tie--> Duel
//!   --> Payout --return--> Lobby
//! ```
//!
//! Chamber skips reveal and inspection and scores as soon as betting ends.

use tracing::{debug, info};

use crate::core::config::RulesetMode;
use crate::core::error::ActionError;
use crate::core::seat::{PlayerInfo, SeatId};
use crate::core::state::{Accusation, Phase, SeatState, TableData, TableStatus};
use crate::rules::{ActionContext, Standings};
use crate::services::Severity;

use super::{duel, payout};

fn require_status(ctx: &ActionContext<'_>, status: TableStatus, action: &'static str) -> Result<(), ActionError> {
    if ctx.state.status != status {
        return Err(ActionError::WrongStatus {
            action,
            status: ctx.state.status,
        });
    }
    Ok(())
}

/// Take a seat at the table.
pub fn seat_player(ctx: &mut ActionContext<'_>, seat: SeatId, info: PlayerInfo) -> Result<(), ActionError> {
    require_status(ctx, TableStatus::Lobby, "seat_player")?;
    if ctx.state.players.contains_key(&seat) {
        return Err(ActionError::malformed(format!("{seat} is taken")));
    }
    if ctx.state.players.len() >= ctx.config.max_seats {
        return Err(ActionError::TableFull { max: ctx.config.max_seats });
    }

    debug!(%seat, name = %info.name, "seated");
    ctx.state.players.insert(seat, info);
    ctx.state.turn_order.push(seat);
    ctx.state.turn_order.sort();
    Ok(())
}

/// Leave the table.
pub fn unseat(ctx: &mut ActionContext<'_>, seat: SeatId) -> Result<(), ActionError> {
    require_status(ctx, TableStatus::Lobby, "unseat")?;
    if ctx.state.players.remove(&seat).is_none() {
        return Err(ActionError::UnknownSeat { seat });
    }
    ctx.state.turn_order.retain(|&s| s != seat);
    debug!(%seat, "unseated");
    Ok(())
}

/// Collect antes, deal the opening, and start the round.
///
/// Seats that cannot cover the ante sit the round out. Any pot carried
/// over from the last round stays in.
pub fn start_round(ctx: &mut ActionContext<'_>, ante: u64, mode: RulesetMode) -> Result<(), ActionError> {
    require_status(ctx, TableStatus::Lobby, "start_round")?;
    let min = ctx.config.min_seats;
    if ctx.state.turn_order.len() < min {
        return Err(ActionError::NotEnoughSeats {
            min,
            have: ctx.state.turn_order.len(),
        });
    }

    let (playing, sitting_out): (Vec<SeatId>, Vec<SeatId>) = ctx
        .state
        .turn_order
        .iter()
        .copied()
        .partition(|&seat| ctx.ledger.can_afford(seat, ante));
    if playing.len() < min {
        return Err(ActionError::NotEnoughSeats { min, have: playing.len() });
    }

    for &seat in &playing {
        ctx.charge(seat, ante)?;
    }
    for &seat in &sitting_out {
        ctx.notify(seat, format!("You cannot cover the {ante} ante and sit this round out."), Severity::Warning);
    }

    let mut table = TableData::new(mode);
    for &seat in &playing {
        table.seats.insert(seat, SeatState::new(mode, ctx.config));
        table.betting_order.push_back(seat);
    }

    let state = &mut ctx.state;
    state.pot += ante * playing.len() as u64;
    state.ante = ante;
    state.round += 1;
    state.sequence = 0;
    state.table = table;
    state.duel = None;
    state.status = TableStatus::Playing;

    info!(round = state.round, %mode, ante, seats = playing.len(), pot = state.pot, "round started");
    ctx.ruleset().deal_opening(ctx)
}

/// Move on once betting has finished.
///
/// Runs after every accepted action.
pub fn advance(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    if ctx.state.status != TableStatus::Playing || ctx.table().phase != Phase::Complete {
        return Ok(());
    }

    if ctx.ruleset().has_inspection() {
        ctx.state.status = TableStatus::Revealing;
        ctx.table_mut().current_player = None;
        debug!("betting closed, awaiting reveal");
        ctx.notify_table("Betting is over. Dice are about to be revealed.");
        Ok(())
    } else {
        score(ctx)
    }
}

/// Turn every die face up.
pub fn reveal_dice(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    require_status(ctx, TableStatus::Revealing, "reveal_dice")?;

    let seats: Vec<SeatId> = ctx.table().seats.keys().copied().collect();
    for seat in seats {
        let state = ctx.seat_mut(seat)?;
        let rolls = state
            .rolls
            .iter()
            .map(|r| {
                let mut r = *r;
                r.public = true;
                r.blind = false;
                r
            })
            .collect();
        state.set_rolls(rolls);
    }

    ctx.state.status = TableStatus::Inspection;
    let totals: Vec<String> = ctx
        .table()
        .seats
        .iter()
        .map(|(seat, s)| format!("{seat}: {}", s.total))
        .collect();
    debug!("dice revealed");
    ctx.notify_table(format!("Dice revealed. {}. Accuse or skip.", totals.join(", ")));
    Ok(())
}

/// Pay to accuse a seat of altering one die.
pub fn accuse(ctx: &mut ActionContext<'_>, seat: SeatId, target: SeatId, die_index: usize) -> Result<(), ActionError> {
    require_status(ctx, TableStatus::Inspection, "accuse")?;
    ctx.seat(seat)?;
    if target == seat {
        return Err(ActionError::malformed("cannot accuse yourself"));
    }
    let len = ctx.seat(target)?.rolls.len();
    if die_index >= len {
        return Err(ActionError::malformed(format!("{target} has no die {die_index}")));
    }
    if ctx.table().accusations.iter().any(|a| a.accuser == seat) {
        return Err(ActionError::AlreadyUsed { seat, what: "an accusation" });
    }

    let fee = ctx.config.inspection_fee(ctx.state.ante);
    ctx.charge(seat, fee)?;
    ctx.state.pot += fee;

    let confirmed = ctx
        .seat(target)?
        .skills()
        .is_some_and(|skills| skills.altered_die(die_index));
    if confirmed {
        ctx.seat_mut(target)?.caught = true;
    }
    ctx.table_mut().accusations.push_back(Accusation {
        accuser: seat,
        target,
        die_index,
        fee,
        confirmed,
    });

    info!(%seat, %target, die_index, confirmed, "accusation");
    if confirmed {
        ctx.notify_table(format!("{seat} caught {target} cheating on die {die_index}!"));
    } else {
        ctx.notify_table(format!("{seat} accused {target}; die {die_index} is clean."));
    }

    if ctx.table().accusations.len() >= ctx.table().seats.len() {
        return score(ctx);
    }
    Ok(())
}

/// Close inspection and score.
pub fn skip_inspection(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    require_status(ctx, TableStatus::Inspection, "skip_inspection")?;
    score(ctx)
}

/// Score the table: pay a winner, duel a tie, or carry the pot.
pub fn score(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    let standings = ctx.ruleset().standings(ctx.table(), ctx.config);
    debug!(?standings, "scored");
    match standings {
        Standings::Winner { seat, .. } => payout::settle(ctx, Some(seat)),
        Standings::Tie { seats, total } => duel::open(ctx, seats, total),
        Standings::NoWinner => payout::settle(ctx, None),
    }
}

/// Clear the finished round and go back to the lobby.
pub fn return_to_lobby(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    require_status(ctx, TableStatus::Payout, "return_to_lobby")?;
    ctx.state.status = TableStatus::Lobby;
    ctx.state.table = TableData::idle();
    ctx.state.duel = None;
    debug!(pot = ctx.state.pot, "back to lobby");
    Ok(())
}
