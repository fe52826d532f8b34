//! Skill tests: hunch, profile, goad, bump, cheat.
//!
//! Every table opens the same way: Seat 0 shows 5 over 5, Seat 1 shows
//! 6 over 6, Seat 0 passes the cut and acts first.

use tavern_dice::core::{Die, Insight, InsightKind, Pending, RollPayload};
use tavern_dice::rules::Hunch;
use tavern_dice::{
    Action, ActionError, CheatPayload, GameState, InMemoryLedger, LoadedDice, NoticeLog, PlayerInfo, RulesetMode,
    SeatId, Skill, Table, TableConfig,
};

type TestTable = Table<InMemoryLedger, NoticeLog, LoadedDice>;

const A: SeatId = SeatId::new(0);
const B: SeatId = SeatId::new(1);

const OPENING: [u8; 4] = [5, 5, 6, 6];

fn betting_table(after_opening: impl IntoIterator<Item = u8>) -> TestTable {
    let mut table = Table::new(
        TableConfig::default(),
        InMemoryLedger::with_balances([A, B], 100),
        NoticeLog::new(),
        LoadedDice::new(11).with_faces(OPENING.into_iter().chain(after_opening)),
    );
    table.seat_player(A, PlayerInfo::new("Brom"));
    table.seat_player(B, PlayerInfo::new("Vex"));
    table.start_round(10, RulesetMode::Standard);
    table.use_cut(A, false);
    table
}

fn insights(state: &GameState, seat: SeatId) -> Vec<Insight> {
    state
        .seat(seat)
        .and_then(|s| s.skills())
        .map(|skills| skills.insights.iter().copied().collect())
        .unwrap_or_default()
}

fn cheat(die_index: usize, adjustment: i32) -> CheatPayload {
    CheatPayload {
        die_index,
        adjustment,
        skill: Skill::SleightOfHand,
    }
}

// === Hunch ===

#[test]
fn test_hunch_foresees_next_rolls() {
    let mut table = betting_table([15, 3, 2, 7, 4, 18]);

    let state = table.hunch(A);
    let seen = insights(&state, A);
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0].kind, InsightKind::NextDie { die: Die::D4, hunch: Hunch::High });
    assert_eq!(seen[1].kind, InsightKind::NextDie { die: Die::D6, hunch: Hunch::Low });
    assert_eq!(seen[4].kind, InsightKind::NextDie { die: Die::D20, hunch: Hunch::High });

    let err = table.try_dispatch(Some(A), Action::Hunch).unwrap_err();
    assert_eq!(err, ActionError::AlreadyUsed { seat: A, what: "a skill this turn" });

    let state = table.submit_roll(A, RollPayload::coin(Die::D6));
    let a = state.seat(A).unwrap();
    assert_eq!(a.rolls[2].face, 2);
    assert_eq!(a.total, 12);
    assert_eq!(a.skills().unwrap().prerolls.len(), 4);
}

#[test]
fn test_hunch_once_per_round() {
    let mut table = betting_table([15, 3, 2, 7, 4, 18]);
    table.hunch(A);
    let state = table.submit_roll(A, RollPayload::coin(Die::D4));
    assert_eq!(state.seat(A).unwrap().total, 13);
    table.finish_turn(A);
    table.hold(B);

    let err = table.try_dispatch(Some(A), Action::Hunch).unwrap_err();
    assert_eq!(err, ActionError::AlreadyUsed { seat: A, what: "hunch" });
}

#[test]
fn test_hunch_critical_gives_exact_faces() {
    let mut table = betting_table([20, 3, 2, 7, 4, 18]);
    let state = table.hunch(A);
    let seen = insights(&state, A);
    assert_eq!(seen[3].kind, InsightKind::NextDieExact { die: Die::D10, face: 4 });
}

#[test]
fn test_hunch_fumble_locks_to_d20() {
    let mut table = betting_table([1, 9]);

    let state = table.hunch(A);
    let a = state.seat(A).unwrap();
    assert_eq!(a.cleaning_fees, 1);
    assert!(a.skills().unwrap().prerolls.is_empty());

    assert_eq!(table.try_dispatch(Some(A), Action::Hold).unwrap_err(), ActionError::MustRoll { seat: A });
    assert_eq!(table.try_dispatch(Some(A), Action::FinishTurn).unwrap_err(), ActionError::MustRoll { seat: A });
    assert_eq!(
        table.try_dispatch(Some(A), Action::Roll(RollPayload::coin(Die::D6))).unwrap_err(),
        ActionError::ForcedDie { seat: A, die: Die::D20 }
    );

    let state = table.submit_roll(A, RollPayload::coin(Die::D20));
    assert_eq!(state.seat(A).unwrap().total, 19);
    assert!(state.seat(A).unwrap().skills().unwrap().lock.is_none());
}

#[test]
fn test_hunch_fumble_at_the_limit_still_holds() {
    let mut table = betting_table([20, 1]);
    table.submit_roll(A, RollPayload::coin(Die::D20));
    let state = table.finish_turn(A);
    assert_eq!(state.seat(A).unwrap().total, 21);
    table.finish_turn(B);

    let state = table.hunch(A);
    assert!(state.seat(A).unwrap().skills().unwrap().lock.is_some());
    assert_eq!(
        table.try_dispatch(Some(A), Action::Roll(RollPayload::coin(Die::D20))).unwrap_err(),
        ActionError::AtLimit { seat: A }
    );

    let state = table.hold(A);
    assert!(state.seat(A).unwrap().held);
    assert_eq!(state.table.current_player, Some(B));
}

// === Profile ===

#[test]
fn test_profile_reads_hole_die() {
    let mut table = betting_table([13]);
    let state = table.profile(A, B);
    let seen = insights(&state, A);
    assert_eq!(
        seen,
        vec![
            Insight { about: B, kind: InsightKind::HoleDie(Hunch::High) },
            Insight { about: B, kind: InsightKind::Cheated(false) },
        ]
    );
}

#[test]
fn test_profile_critical_reads_exact_value() {
    let mut table = betting_table([20]);
    let state = table.profile(A, B);
    assert_eq!(insights(&state, A)[0].kind, InsightKind::HoleDieExact(6));
}

#[test]
fn test_profile_fumble_tips_your_hand() {
    let mut table = betting_table([1]);
    let state = table.profile(A, B);
    assert!(insights(&state, A).is_empty());
    assert_eq!(
        insights(&state, B),
        vec![Insight { about: A, kind: InsightKind::HoleDieExact(5) }]
    );
}

#[test]
fn test_profile_needs_another_seat() {
    let mut table = betting_table([]);
    let err = table
        .try_dispatch(Some(A), Action::Profile(tavern_dice::core::TargetPayload { target: A }))
        .unwrap_err();
    assert!(matches!(err, ActionError::Malformed(_)));
}

// === Goad ===

#[test]
fn test_goad_forces_a_roll() {
    let mut table = betting_table([15, 10, 2]);

    let state = table.goad(A, B, Skill::Intimidation);
    let lock = state.seat(B).unwrap().skills().unwrap().lock.unwrap();
    assert_eq!(lock.die, None);
    assert_eq!(lock.source, A);

    table.hold(A);
    assert_eq!(table.try_dispatch(Some(B), Action::Hold).unwrap_err(), ActionError::MustRoll { seat: B });
    assert_eq!(table.try_dispatch(Some(B), Action::Fold).unwrap_err(), ActionError::MustRoll { seat: B });

    let state = table.submit_roll(B, RollPayload::coin(Die::D4));
    assert!(state.seat(B).unwrap().skills().unwrap().lock.is_none());
    assert_eq!(state.seat(B).unwrap().total, 14);
}

#[test]
fn test_goad_against_a_seat_at_the_limit() {
    let mut table = betting_table([20, 15, 3]);
    table.submit_roll(A, RollPayload::coin(Die::D20));
    table.finish_turn(A);

    let state = table.goad(B, A, Skill::Intimidation);
    assert!(state.seat(A).unwrap().skills().unwrap().lock.is_some());
    table.finish_turn(B);

    let state = table.finish_turn(A);
    assert_eq!(state.table.current_player, Some(B));
    assert_eq!(state.seat(A).unwrap().total, 21);
    assert!(!state.seat(A).unwrap().is_terminal());
}

#[test]
fn test_goad_critical_forces_d20() {
    let mut table = betting_table([20, 10]);
    let state = table.goad(A, B, Skill::Persuasion);
    let lock = state.seat(B).unwrap().skills().unwrap().lock.unwrap();
    assert_eq!(lock.die, Some(Die::D20));

    table.hold(A);
    assert_eq!(
        table.try_dispatch(Some(B), Action::Roll(RollPayload::coin(Die::D6))).unwrap_err(),
        ActionError::ForcedDie { seat: B, die: Die::D20 }
    );
}

#[test]
fn test_goad_fumble_backfires() {
    let mut table = betting_table([1, 10]);
    let state = table.goad(A, B, Skill::Intimidation);
    assert!(state.seat(B).unwrap().skills().unwrap().lock.is_none());
    assert_eq!(state.seat(A).unwrap().skills().unwrap().lock.unwrap().die, Some(Die::D20));
}

#[test]
fn test_goad_needs_a_social_skill() {
    let mut table = betting_table([]);
    let err = table
        .try_dispatch(
            Some(A),
            Action::Goad(tavern_dice::core::GoadPayload { target: B, skill: Skill::Athletics }),
        )
        .unwrap_err();
    assert!(matches!(err, ActionError::Malformed(_)));
}

// === Bump ===

#[test]
fn test_bump_rerolls_a_face_up_die() {
    let mut table = betting_table([15, 5, 9]);
    let state = table.bump_table(A, B, 0);
    let b = state.seat(B).unwrap();
    assert_eq!(b.rolls[0].result, 9);
    assert_eq!(b.rolls[0].face, 6);
    assert_eq!(b.total, 15);
    assert_eq!(b.visible_total, 9);
    assert_eq!(state.table.current_player, Some(A));
}

#[test]
fn test_bump_hole_die_is_rejected() {
    let mut table = betting_table([]);
    let err = table
        .try_dispatch(Some(A), Action::BumpTable(tavern_dice::core::BumpPayload { target: B, die_index: 1 }))
        .unwrap_err();
    assert!(matches!(err, ActionError::Malformed(_)));
}

#[test]
fn test_failed_bump_invites_retaliation() {
    let mut table = betting_table([5, 15, 10]);
    let state = table.bump_table(A, B, 0);
    assert_eq!(state.table.pending, Some(Pending::BumpRetaliation { victim: B, attacker: A }));

    assert_eq!(
        table.try_dispatch(Some(A), Action::Hold).unwrap_err(),
        ActionError::PendingDecision { seat: B }
    );

    let state = table.bump_retaliation(B, 0);
    let a = state.seat(A).unwrap();
    assert_eq!(a.rolls[0].result, 10);
    assert_eq!(a.total, 15);
    assert!(state.table.pending.is_none());
    assert_eq!(state.table.current_player, Some(A));

    let state = table.hold(A);
    assert_eq!(state.table.current_player, Some(B));
}

// === Cheat ===

#[test]
fn test_cheat_needs_an_open_window() {
    let mut table = betting_table([3]);
    let err = table.try_dispatch(Some(A), Action::Cheat(cheat(0, 2))).unwrap_err();
    assert_eq!(err, ActionError::WrongPhase { action: "cheat" });

    table.submit_roll(A, RollPayload::coin(Die::D10));
    let bad_skill = CheatPayload { skill: Skill::Athletics, ..cheat(2, 2) };
    assert!(matches!(
        table.try_dispatch(Some(A), Action::Cheat(bad_skill)).unwrap_err(),
        ActionError::Malformed(_)
    ));
    assert!(matches!(
        table.try_dispatch(Some(A), Action::Cheat(cheat(2, 0))).unwrap_err(),
        ActionError::Malformed(_)
    ));
}

#[test]
fn test_cheat_only_touches_hidden_dice() {
    let mut table = betting_table([3, 4, 15]);
    table.submit_roll(A, RollPayload::coin(Die::D10));
    table.finish_turn(A);
    table.finish_turn(B);
    table.submit_roll(A, RollPayload::coin(Die::D4));

    // The showing opening die and the earlier purchase are both face up.
    for die_index in [0, 2] {
        assert!(matches!(
            table.try_dispatch(Some(A), Action::Cheat(cheat(die_index, 1))).unwrap_err(),
            ActionError::Malformed(_)
        ));
    }

    let state = table.cheat(A, cheat(1, 1));
    let a = state.seat(A).unwrap();
    assert_eq!(a.rolls[1].result, 6);
    assert_eq!(a.total, 18);
    assert!(a.skills().unwrap().cheats[0].altered());
}

#[test]
fn test_cheat_over_the_limit_busts() {
    let mut table = betting_table([11, 15]);
    let state = table.submit_roll(A, RollPayload::coin(Die::D20));
    assert_eq!(state.seat(A).unwrap().total, 21);
    assert!(!state.seat(A).unwrap().pending_bust);

    let state = table.cheat(A, cheat(2, 3));
    let a = state.seat(A).unwrap();
    assert_eq!(a.rolls[2].result, 14);
    assert_eq!(a.total, 24);
    assert!(a.busted);
    assert!(a.is_terminal());
    assert_eq!(state.table.current_player, Some(B));
}

#[test]
fn test_cheat_saves_a_bust() {
    let mut table = betting_table([15, 12]);

    let state = table.submit_roll(A, RollPayload::coin(Die::D20));
    assert!(state.seat(A).unwrap().pending_bust);

    let state = table.cheat(A, cheat(2, -5));
    let a = state.seat(A).unwrap();
    assert_eq!(a.total, 20);
    assert!(!a.busted);
    assert!(!a.pending_bust);
    assert_eq!(a.rolls[2].face, 15);
    assert_eq!(a.rolls[2].result, 10);
    assert!(a.rolls[2].public);
    assert_eq!(a.skills().unwrap().heat, 12);
    assert_eq!(state.table.current_player, Some(B));
}

#[test]
fn test_failed_cheat_raises_heat_only() {
    let mut table = betting_table([3, 5]);
    table.submit_roll(A, RollPayload::coin(Die::D10));

    let state = table.cheat(A, cheat(2, 5));
    let a = state.seat(A).unwrap();
    assert_eq!(a.rolls[2].result, 3);
    let skills = a.skills().unwrap();
    assert_eq!(skills.heat, 12);
    assert!(skills.cheats[0].failed);
    assert!(!skills.cheats[0].altered());
}

#[test]
fn test_caught_cheater_loses_bounty() {
    let mut table = betting_table([3, 14]);
    table.submit_roll(A, RollPayload::coin(Die::D10));
    let state = table.cheat(A, cheat(2, 5));
    assert_eq!(state.seat(A).unwrap().total, 18);
    assert_eq!(state.seat(A).unwrap().visible_total, 13);

    table.hold(B);
    table.hold(A);
    table.reveal_dice();

    let state = table.accuse(B, A, 2);
    assert!(state.seat(A).unwrap().caught);
    assert_eq!(state.pot, 40);

    let state = table.skip_inspection();
    let summary = state.last_round.unwrap();
    assert_eq!(summary.winner, Some(B));
    assert_eq!(summary.accusation_refunds.len(), 1);
    assert_eq!(summary.bounties[0].amount, 20);
    assert_eq!(summary.winner_payout, 30);

    assert_eq!(table.ledger().balance(A), 60);
    assert_eq!(table.ledger().balance(B), 140);
}

#[test]
fn test_natural_twenty_cheat_leaves_no_trace() {
    let mut table = betting_table([3, 20]);
    table.submit_roll(A, RollPayload::coin(Die::D10));
    let state = table.cheat(A, cheat(2, 5));
    let skills = state.seat(A).unwrap().skills().unwrap().clone();
    assert_eq!(skills.heat, 10);
    assert!(skills.cheats[0].invisible);
    assert!(!skills.has_detectable_cheat());

    table.hold(B);
    table.hold(A);
    table.reveal_dice();
    let state = table.accuse(B, A, 2);
    assert!(!state.seat(A).unwrap().caught);

    let state = table.skip_inspection();
    let summary = state.last_round.unwrap();
    assert_eq!(summary.winner, Some(A));
    assert_eq!(summary.winner_payout, 40);
}

#[test]
fn test_fumbled_cheat_is_caught_and_fined() {
    let mut table = betting_table([3, 1]);
    table.submit_roll(A, RollPayload::coin(Die::D10));

    let state = table.cheat(A, cheat(2, 5));
    let a = state.seat(A).unwrap();
    assert!(a.caught);
    assert_eq!(a.rolls[2].result, 3);
    assert_eq!(a.cleaning_fees, 1);
    let record = a.skills().unwrap().cheats[0];
    assert!(record.fumbled);
    assert!(!record.failed);
    assert_eq!(state.pot, 40);
    assert_eq!(state.table.current_player, Some(B));

    table.hold(B);
    table.reveal_dice();
    let state = table.skip_inspection();
    let summary = state.last_round.unwrap();
    assert_eq!(summary.winner, Some(B));
    assert_eq!(summary.cleaning_fees.len(), 1);
    assert_eq!(summary.winner_payout, 41);
    assert_eq!(table.ledger().balance(A), 69);
    assert_eq!(table.ledger().balance(B), 131);
}

#[test]
fn test_skills_are_standard_only() {
    let mut table = Table::new(
        TableConfig::default(),
        InMemoryLedger::with_balances([A, B], 100),
        NoticeLog::new(),
        LoadedDice::new(3),
    );
    table.seat_player(A, PlayerInfo::new("Brom"));
    table.seat_player(B, PlayerInfo::new("Vex"));
    table.start_round(10, RulesetMode::Chamber);

    let err = table.try_dispatch(Some(A), Action::Hunch).unwrap_err();
    assert!(matches!(err, ActionError::WrongMode { action: "hunch", .. }));
}
