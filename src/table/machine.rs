//! The table: one committed snapshot and the action surface over it.
//!
//! Every call runs against a working copy of the snapshot inside an
//! `ActionContext`. If the handler succeeds, the copy becomes the new
//! snapshot, the action is appended to history, and buffered notices are
//! delivered. If it fails, the copy is dropped, the caller gets a
//! notification, and the committed snapshot is returned untouched.
//!
//! `&mut self` on every action makes the table its own single writer.

use tracing::{debug, error, warn};

use crate::core::action::{
    AccusePayload, Action, BumpPayload, CheatPayload, GoadPayload, RetaliationPayload, RollPayload,
    SideBetPayload, StartRound, TargetPayload,
};
use crate::core::config::{RulesetMode, TableConfig};
use crate::core::error::ActionError;
use crate::core::rng::{DiceSource, GameRng};
use crate::core::seat::{PlayerInfo, SeatId, Skill};
use crate::core::state::GameState;
use crate::games::{chamber, standard};
use crate::rules::ActionContext;
use crate::services::{InMemoryLedger, Ledger, NoticeLog, Notifier, Severity};
use crate::skills;
use crate::turns;

use super::{duel, round, side_bets};

/// A dice table.
pub struct Table<L = InMemoryLedger, N = NoticeLog, D = GameRng> {
    state: GameState,
    config: TableConfig,
    ledger: L,
    notifier: N,
    dice: D,
}

impl Table {
    /// In-memory table with seeded dice.
    #[must_use]
    pub fn with_seed(config: TableConfig, seed: u64) -> Self {
        Self::new(config, InMemoryLedger::new(), NoticeLog::new(), GameRng::new(seed))
    }
}

impl<L: Ledger, N: Notifier, D: DiceSource> Table<L, N, D> {
    /// Empty lobby.
    pub fn new(config: TableConfig, ledger: L, notifier: N, dice: D) -> Self {
        Self {
            state: GameState::new(),
            config,
            ledger,
            notifier,
            dice,
        }
    }

    /// Resume from a saved snapshot.
    pub fn from_state(state: GameState, config: TableConfig, ledger: L, notifier: N, dice: D) -> Self {
        Self {
            state,
            config,
            ledger,
            notifier,
            dice,
        }
    }

    /// The committed snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Apply an action, or report why not.
    ///
    /// On error the committed snapshot is untouched and the acting seat has
    /// been notified.
    pub fn try_dispatch(&mut self, seat: Option<SeatId>, action: Action) -> Result<GameState, ActionError> {
        let mut ctx = ActionContext::new(self.state.clone(), &self.config, &mut self.dice, &mut self.ledger);
        let outcome = apply(&mut ctx, seat, &action).and_then(|()| round::advance(&mut ctx));

        match outcome {
            Ok(()) => {
                let (mut state, notices) = ctx.into_parts();
                debug!(seat = ?seat, action = action.name(), status = ?state.status, "action accepted");
                state.record_action(seat, action);
                debug_assert!(
                    state.check_invariants().is_ok(),
                    "invariant broken: {:?}",
                    state.check_invariants()
                );
                for notice in notices {
                    self.notifier.notify(notice.seat, &notice.message, notice.severity);
                }
                self.state = state;
                Ok(self.state.clone())
            }
            Err(err) => {
                drop(ctx);
                let severity = if err.is_internal() {
                    error!(seat = ?seat, action = action.name(), %err, "invariant violation");
                    Severity::Error
                } else {
                    warn!(seat = ?seat, action = action.name(), %err, "action rejected");
                    Severity::Warning
                };
                if let Some(seat) = seat {
                    self.notifier.notify(seat, &err.to_string(), severity);
                }
                Err(err)
            }
        }
    }

    /// Apply an action and return the resulting snapshot, rejected or not.
    pub fn dispatch(&mut self, seat: Option<SeatId>, action: Action) -> GameState {
        match self.try_dispatch(seat, action) {
            Ok(state) => state,
            Err(_) => self.state.clone(),
        }
    }

    fn act(&mut self, seat: SeatId, action: Action) -> GameState {
        self.dispatch(Some(seat), action)
    }

    // === Lobby ===

    pub fn seat_player(&mut self, seat: SeatId, info: PlayerInfo) -> GameState {
        self.act(seat, Action::SeatPlayer(info))
    }

    pub fn unseat(&mut self, seat: SeatId) -> GameState {
        self.act(seat, Action::Unseat)
    }

    /// Collect antes and open a round.
    pub fn start_round(&mut self, ante: u64, mode: RulesetMode) -> GameState {
        self.dispatch(None, Action::StartRound(StartRound { ante, mode }))
    }

    // === Turns ===

    pub fn submit_roll(&mut self, seat: SeatId, roll: RollPayload) -> GameState {
        self.act(seat, Action::Roll(roll))
    }

    pub fn finish_turn(&mut self, seat: SeatId) -> GameState {
        self.act(seat, Action::FinishTurn)
    }

    pub fn hold(&mut self, seat: SeatId) -> GameState {
        self.act(seat, Action::Hold)
    }

    pub fn fold(&mut self, seat: SeatId) -> GameState {
        self.act(seat, Action::Fold)
    }

    /// Reroll the hole die (`true`) or pass the Cut.
    pub fn use_cut(&mut self, seat: SeatId, reroll: bool) -> GameState {
        self.act(seat, Action::UseCut { reroll })
    }

    // === Skills ===

    pub fn hunch(&mut self, seat: SeatId) -> GameState {
        self.act(seat, Action::Hunch)
    }

    pub fn profile(&mut self, seat: SeatId, target: SeatId) -> GameState {
        self.act(seat, Action::Profile(TargetPayload { target }))
    }

    pub fn cheat(&mut self, seat: SeatId, payload: CheatPayload) -> GameState {
        self.act(seat, Action::Cheat(payload))
    }

    pub fn goad(&mut self, seat: SeatId, target: SeatId, skill: Skill) -> GameState {
        self.act(seat, Action::Goad(GoadPayload { target, skill }))
    }

    pub fn bump_table(&mut self, seat: SeatId, target: SeatId, die_index: usize) -> GameState {
        self.act(seat, Action::BumpTable(BumpPayload { target, die_index }))
    }

    pub fn bump_retaliation(&mut self, seat: SeatId, die_index: usize) -> GameState {
        self.act(seat, Action::BumpRetaliation(RetaliationPayload { die_index }))
    }

    // === Reveal, inspection, duel ===

    pub fn reveal_dice(&mut self) -> GameState {
        self.dispatch(None, Action::RevealDice)
    }

    pub fn accuse(&mut self, seat: SeatId, target: SeatId, die_index: usize) -> GameState {
        self.act(seat, Action::Accuse(AccusePayload { target, die_index }))
    }

    pub fn skip_inspection(&mut self) -> GameState {
        self.dispatch(None, Action::SkipInspection)
    }

    pub fn duel_roll(&mut self, seat: SeatId) -> GameState {
        self.act(seat, Action::DuelRoll)
    }

    pub fn place_side_bet(&mut self, seat: SeatId, champion: SeatId, amount: u64) -> GameState {
        self.act(seat, Action::PlaceSideBet(SideBetPayload { champion, amount }))
    }

    // === Chamber ===

    pub fn boot(&mut self, seat: SeatId, target: SeatId) -> GameState {
        self.act(seat, Action::Boot(TargetPayload { target }))
    }

    pub fn goblin_continue(&mut self, seat: SeatId) -> GameState {
        self.act(seat, Action::GoblinContinue)
    }

    pub fn return_to_lobby(&mut self) -> GameState {
        self.dispatch(None, Action::ReturnToLobby)
    }
}

/// Route an action to its handler.
fn apply(ctx: &mut ActionContext<'_>, seat: Option<SeatId>, action: &Action) -> Result<(), ActionError> {
    let actor = match (seat, action.needs_seat()) {
        (Some(seat), _) => seat,
        (None, false) => SeatId::new(0),
        (None, true) => return Err(ActionError::malformed(format!("{} needs a seat", action.name()))),
    };

    match action {
        Action::SeatPlayer(info) => round::seat_player(ctx, actor, info.clone()),
        Action::Unseat => round::unseat(ctx, actor),
        Action::StartRound(StartRound { ante, mode }) => round::start_round(ctx, *ante, *mode),
        Action::Roll(roll) => turns::roll(ctx, actor, *roll),
        Action::FinishTurn => turns::finish_turn(ctx, actor),
        Action::Hold => turns::hold(ctx, actor),
        Action::Fold => turns::fold(ctx, actor),
        Action::UseCut { reroll } => standard::use_cut(ctx, actor, *reroll),
        Action::Hunch => skills::hunch(ctx, actor),
        Action::Profile(TargetPayload { target }) => skills::profile(ctx, actor, *target),
        Action::Cheat(payload) => skills::cheat(ctx, actor, *payload),
        Action::Goad(GoadPayload { target, skill }) => skills::goad(ctx, actor, *target, *skill),
        Action::BumpTable(BumpPayload { target, die_index }) => skills::bump_table(ctx, actor, *target, *die_index),
        Action::BumpRetaliation(RetaliationPayload { die_index }) => skills::bump_retaliation(ctx, actor, *die_index),
        Action::RevealDice => round::reveal_dice(ctx),
        Action::Accuse(AccusePayload { target, die_index }) => round::accuse(ctx, actor, *target, *die_index),
        Action::SkipInspection => round::skip_inspection(ctx),
        Action::DuelRoll => duel::duel_roll(ctx, actor),
        Action::PlaceSideBet(SideBetPayload { champion, amount }) => {
            side_bets::place_side_bet(ctx, actor, *champion, *amount)
        }
        Action::Boot(TargetPayload { target }) => chamber::boot(ctx, actor, *target),
        Action::GoblinContinue => chamber::goblin_continue(ctx, actor),
        Action::ReturnToLobby => round::return_to_lobby(ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LoadedDice;
    use crate::core::state::TableStatus;

    fn lobby(seats: u8) -> Table<InMemoryLedger, NoticeLog, LoadedDice> {
        let mut table = Table::new(
            TableConfig::default(),
            InMemoryLedger::with_balances(SeatId::all(usize::from(seats)), 100),
            NoticeLog::new(),
            LoadedDice::new(1),
        );
        for seat in SeatId::all(usize::from(seats)) {
            table.seat_player(seat, PlayerInfo::new(format!("p{}", seat.0)));
        }
        table
    }

    #[test]
    fn test_rejected_action_leaves_state() {
        let mut table = lobby(2);
        let before = table.state().clone();

        let err = table.try_dispatch(Some(SeatId::new(0)), Action::Hold).unwrap_err();
        assert!(matches!(err, ActionError::WrongStatus { action: "hold", .. }));
        assert_eq!(table.state(), &before);

        let notice = table.notifier().last().unwrap();
        assert_eq!(notice.seat, SeatId::new(0));
        assert_eq!(notice.severity, Severity::Warning);
    }

    #[test]
    fn test_seat_limits() {
        let mut table = Table::new(
            TableConfig::default().with_seat_limits(2, 2),
            InMemoryLedger::new(),
            NoticeLog::new(),
            LoadedDice::new(0),
        );
        table.seat_player(SeatId::new(0), PlayerInfo::new("a"));
        table.seat_player(SeatId::new(1), PlayerInfo::new("b"));

        let err = table
            .try_dispatch(Some(SeatId::new(2)), Action::SeatPlayer(PlayerInfo::new("c")))
            .unwrap_err();
        assert_eq!(err, ActionError::TableFull { max: 2 });
        assert_eq!(table.state().turn_order.len(), 2);
    }

    #[test]
    fn test_history_records_accepted_actions() {
        let mut table = lobby(2);
        table.start_round(10, RulesetMode::Chamber);

        let state = table.state();
        assert_eq!(state.status, TableStatus::Playing);
        let last = state.history.last().unwrap();
        assert_eq!(last.round, 1);
        assert_eq!(last.sequence, 0);
        assert_eq!(last.seat, None);
    }

    #[test]
    fn test_action_without_seat_is_malformed() {
        let mut table = lobby(2);
        let err = table.try_dispatch(None, Action::Hold).unwrap_err();
        assert!(matches!(err, ActionError::Malformed(_)));
    }
}
