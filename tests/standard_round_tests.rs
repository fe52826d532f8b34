//! Standard round flow tests.
//!
//! Every test scripts its dice with `LoadedDice`. Faces are consumed in
//! order: opening dice seat by seat (showing, then hole), then whatever
//! the actions roll.

use tavern_dice::core::{Die, DuelKind, Payment, Phase, RollPayload, TableStatus};
use tavern_dice::{
    ActionError, GameState, InMemoryLedger, LoadedDice, NoticeLog, PlayerInfo, RulesetMode, SeatId, Severity, Table,
    TableConfig,
};

type TestTable = Table<InMemoryLedger, NoticeLog, LoadedDice>;

const A: SeatId = SeatId::new(0);
const B: SeatId = SeatId::new(1);
const C: SeatId = SeatId::new(2);

fn table_with(seats: usize, faces: impl IntoIterator<Item = u8>) -> TestTable {
    let ids: Vec<SeatId> = SeatId::all(seats).collect();
    let mut table = Table::new(
        TableConfig::default(),
        InMemoryLedger::with_balances(ids.clone(), 100),
        NoticeLog::new(),
        LoadedDice::new(99).with_faces(faces),
    );
    for &seat in &ids {
        table.seat_player(seat, PlayerInfo::new(format!("Patron {}", seat.0)));
    }
    table
}

fn order(state: &GameState) -> Vec<SeatId> {
    state.table.betting_order.iter().copied().collect()
}

/// Full round: cut, purchases, a natural-20 snap, inspection, payout.
#[test]
fn test_full_standard_round() {
    let mut table = table_with(3, [7, 5, 4, 6, 7, 3, 3, 20]);

    let state = table.start_round(10, RulesetMode::Standard);
    assert_eq!(state.status, TableStatus::Playing);
    assert_eq!(state.table.phase, Phase::Cut);
    assert_eq!(state.table.cut_holder(), Some(B));
    assert_eq!(state.pot, 30);

    let state = table.use_cut(B, false);
    assert_eq!(order(&state), vec![B, A, C]);
    assert_eq!(state.table.current_player, Some(B));
    assert_eq!(state.table.betting_round, 1);

    let state = table.submit_roll(B, RollPayload::coin(Die::D4));
    let b = state.seat(B).unwrap();
    assert_eq!(b.total, 13);
    assert_eq!(b.visible_total, 4);
    assert_eq!(table.ledger().balance(B), 70);

    let state = table.finish_turn(B);
    assert_eq!(state.seat(B).unwrap().visible_total, 7);
    assert_eq!(state.table.current_player, Some(A));

    let state = table.hold(A);
    assert!(state.seat(A).unwrap().held);
    assert_eq!(state.table.current_player, Some(C));

    let state = table.submit_roll(C, RollPayload::coin(Die::D20));
    let c = state.seat(C).unwrap();
    assert_eq!(c.total, 21);
    assert_eq!(c.rolls[2].face, 20);
    assert_eq!(c.rolls[2].result, 11);

    let state = table.finish_turn(C);
    assert_eq!(state.table.current_player, Some(B));
    assert_eq!(state.table.betting_round, 2);

    table.hold(B);
    assert_eq!(
        table.try_dispatch(Some(C), tavern_dice::Action::Roll(RollPayload::coin(Die::D4))),
        Err(ActionError::AtLimit { seat: C })
    );

    let state = table.hold(C);
    assert_eq!(state.status, TableStatus::Revealing);
    assert_eq!(state.table.phase, Phase::Complete);

    let state = table.reveal_dice();
    assert_eq!(state.status, TableStatus::Inspection);
    assert!(state.table.seats.values().all(|s| s.rolls.iter().all(|r| r.public)));

    let state = table.skip_inspection();
    assert_eq!(state.status, TableStatus::Payout);
    let summary = state.last_round.clone().unwrap();
    assert_eq!(summary.winner, Some(C));
    assert_eq!(summary.winning_total, Some(21));
    assert_eq!(summary.winner_payout, 55);
    assert_eq!(state.pot, 0);

    assert_eq!(table.ledger().balance(A), 90);
    assert_eq!(table.ledger().balance(B), 70);
    assert_eq!(table.ledger().balance(C), 140);
    assert_eq!(table.ledger().total(), 300);

    let state = table.return_to_lobby();
    assert_eq!(state.status, TableStatus::Lobby);
    assert!(state.table.seats.is_empty());
}

/// 19 plus a natural 20 lands on exactly 21.
#[test]
fn test_natural_twenty_from_nineteen() {
    let mut table = table_with(2, [10, 9, 3, 2, 20]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(B, false);
    table.hold(B);

    let state = table.submit_roll(A, RollPayload::coin(Die::D20));
    let a = state.seat(A).unwrap();
    assert_eq!(a.total, 21);
    assert!(!a.pending_bust);
    assert_eq!(a.rolls[2].face, 20);
}

#[test]
fn test_bust_resolves_when_turn_ends() {
    let mut table = table_with(2, [9, 8, 2, 2, 6]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(B, false);
    table.hold(B);

    let state = table.submit_roll(A, RollPayload::coin(Die::D8));
    let a = state.seat(A).unwrap();
    assert_eq!(a.total, 23);
    assert!(a.pending_bust);
    assert!(!a.busted);

    let state = table.finish_turn(A);
    assert!(state.seat(A).unwrap().busted);
    assert_eq!(state.status, TableStatus::Revealing);

    table.reveal_dice();
    let state = table.skip_inspection();
    let summary = state.last_round.unwrap();
    assert_eq!(summary.winner, Some(B));
    assert_eq!(summary.winner_payout, 30);
}

#[test]
fn test_cut_reroll_replaces_hole_die() {
    let mut table = table_with(2, [3, 2, 8, 8, 9]);
    table.start_round(10, RulesetMode::Standard);

    let state = table.use_cut(A, true);
    let a = state.seat(A).unwrap();
    assert_eq!(a.rolls[1].result, 9);
    assert!(!a.rolls[1].public);
    assert_eq!(a.total, 12);
    assert_eq!(a.visible_total, 3);
    assert_eq!(state.table.cut_holder(), None);
    assert_eq!(state.table.phase, Phase::Betting);
}

#[test]
fn test_fold_before_acting_refunds_half_ante() {
    let mut table = table_with(2, [5, 5, 6, 6]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(A, false);

    let state = table.fold(A);
    assert!(state.seat(A).unwrap().folded);
    assert_eq!(state.pot, 15);
    assert_eq!(table.ledger().balance(A), 95);
    assert_eq!(state.table.current_player, Some(B));
}

#[test]
fn test_fold_after_acting_refunds_nothing() {
    let mut table = table_with(2, [5, 5, 6, 6, 2, 1]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(A, false);
    table.submit_roll(A, RollPayload::coin(Die::D10));
    table.finish_turn(A);
    table.hold(B);

    let pot = table.state().pot;
    let state = table.fold(A);
    assert_eq!(state.pot, pot);
    assert_eq!(table.ledger().balance(A), 80);
}

#[test]
fn test_out_of_turn_is_rejected_without_change() {
    let mut table = table_with(2, [5, 5, 6, 6]);
    table.start_round(10, RulesetMode::Standard);

    let err = table
        .try_dispatch(Some(B), tavern_dice::Action::Roll(RollPayload::coin(Die::D6)))
        .unwrap_err();
    assert_eq!(err, ActionError::WrongPhase { action: "roll" });

    table.use_cut(A, false);
    let before = table.state().clone();
    let state = table.submit_roll(B, RollPayload::coin(Die::D6));
    assert_eq!(state, before);

    let notice = table.notifier().last().unwrap();
    assert_eq!(notice.seat, B);
    assert_eq!(notice.severity, Severity::Warning);
    assert_eq!(notice.message, "it is not Seat 1's turn");
}

#[test]
fn test_blind_roll_is_half_price_and_hidden() {
    let mut table = table_with(2, [5, 5, 6, 6, 4]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(A, false);

    table.submit_roll(A, RollPayload::coin(Die::D6).blind());
    let state = table.finish_turn(A);
    let a = state.seat(A).unwrap();
    assert_eq!(a.total, 14);
    assert_eq!(a.visible_total, 5);
    assert!(a.rolls[2].blind);
    assert!(!a.rolls[2].public);
    assert_eq!(table.ledger().balance(A), 82);

    table.hold(B);
    table.hold(A);
    let state = table.reveal_dice();
    assert!(state.seat(A).unwrap().rolls[2].public);
    assert_eq!(state.seat(A).unwrap().visible_total, 14);
}

#[test]
fn test_tab_payment_records_a_drink() {
    let mut table = table_with(2, [5, 5, 6, 6, 4]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(A, false);

    let state = table.submit_roll(A, RollPayload { die: Die::D6, payment: Payment::Tab, blind: false });
    assert_eq!(state.seat(A).unwrap().tab, 1);
    assert_eq!(table.ledger().balance(A), 90);
    assert_eq!(state.pot, 20);
}

#[test]
fn test_unaffordable_die_is_rejected() {
    let mut table = table_with(2, [5, 5, 6, 6]);
    table.ledger_mut().set_balance(A, 25);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(A, false);

    let err = table
        .try_dispatch(Some(A), tavern_dice::Action::Roll(RollPayload::coin(Die::D4)))
        .unwrap_err();
    assert_eq!(err, ActionError::InsufficientFunds { seat: A, amount: 20 });
    assert_eq!(table.ledger().balance(A), 15);
    assert!(table.state().seat(A).unwrap().rolls.len() == 2);
}

#[test]
fn test_die_outside_standard_set_is_rejected() {
    let mut table = table_with(2, [5, 5, 6, 6]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(A, false);

    let err = table
        .try_dispatch(Some(A), tavern_dice::Action::Roll(RollPayload::coin(Die::D12)))
        .unwrap_err();
    assert_eq!(err, ActionError::DieNotAllowed { die: Die::D12 });
}

#[test]
fn test_showdown_duel_rematches_until_decided() {
    let mut table = table_with(3, [9, 9, 9, 9, 5, 6, 12, 12, 4, 17]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(C, false);
    assert_eq!(order(table.state()), vec![C, A, B]);

    table.hold(C);
    table.hold(A);
    table.hold(B);
    table.reveal_dice();

    let state = table.skip_inspection();
    assert_eq!(state.status, TableStatus::Duel);
    let duel = state.duel.clone().unwrap();
    assert_eq!(duel.participants, vec![A, B]);
    assert_eq!(duel.kind, DuelKind::Showdown);

    let err = table.try_dispatch(Some(C), tavern_dice::Action::DuelRoll).unwrap_err();
    assert_eq!(err, ActionError::NotYourTurn { seat: C });

    table.duel_roll(A);
    let state = table.duel_roll(B);
    let duel = state.duel.clone().unwrap();
    assert_eq!(duel.round, 2);
    assert_eq!(duel.pending_rolls, vec![A, B]);

    table.duel_roll(A);
    let state = table.duel_roll(B);
    assert_eq!(state.status, TableStatus::Payout);
    assert!(state.duel.is_none());
    assert_eq!(state.last_round.unwrap().winner, Some(B));
    assert_eq!(table.ledger().balance(B), 120);
}

#[test]
fn test_no_winner_carries_pot() {
    let mut table = table_with(2, [10, 10, 10, 10, 4, 3]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(A, false);

    table.submit_roll(A, RollPayload::coin(Die::D4));
    table.finish_turn(A);
    table.submit_roll(B, RollPayload::coin(Die::D4));
    let state = table.finish_turn(B);
    assert_eq!(state.status, TableStatus::Revealing);

    table.reveal_dice();
    let state = table.skip_inspection();
    let summary = state.last_round.clone().unwrap();
    assert_eq!(summary.winner, None);
    assert_eq!(summary.carried_over, 60);
    assert_eq!(state.pot, 60);

    table.return_to_lobby();
    let state = table.start_round(10, RulesetMode::Standard);
    assert_eq!(state.pot, 80);
    assert_eq!(state.round, 2);
}

#[test]
fn test_broke_seat_sits_out() {
    let mut table = table_with(3, [5, 5, 6, 6]);
    table.ledger_mut().set_balance(C, 5);

    let state = table.start_round(10, RulesetMode::Standard);
    assert_eq!(state.status, TableStatus::Playing);
    assert_eq!(state.pot, 20);
    assert!(state.seat(C).is_none());
    assert_eq!(table.ledger().balance(C), 5);
    assert!(table
        .notifier()
        .for_seat(C)
        .any(|n| n.severity == Severity::Warning));
}

#[test]
fn test_start_needs_two_seats() {
    let mut table = table_with(1, []);
    let err = table
        .try_dispatch(None, tavern_dice::Action::StartRound(tavern_dice::core::StartRound {
            ante: 10,
            mode: RulesetMode::Standard,
        }))
        .unwrap_err();
    assert_eq!(err, ActionError::NotEnoughSeats { min: 2, have: 1 });
}

#[test]
fn test_snapshot_json_round_trip() {
    let mut table = table_with(2, [5, 5, 6, 6, 4]);
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(A, false);
    let state = table.submit_roll(A, RollPayload::coin(Die::D6));

    let json = state.to_json().unwrap();
    let restored = GameState::from_json(&json).unwrap();
    assert_eq!(state, restored);
    assert!(restored.check_invariants().is_ok());
}
