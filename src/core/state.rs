//! Game state: the single document the table owns and replaces per action.
//!
//! ## GameState
//!
//! Top-level snapshot: status, pot, seated players, turn order, the
//! current round's `TableData`, any running duel, the last payout and the
//! action history.
//!
//! ## TableData
//!
//! A small shared core (phase, current player, pending decision, betting
//! order, side bets, accusations) plus one `SeatState` per seat in the
//! turn order. Ruleset-specific data is a tagged union at both levels:
//! `VariantState` for the table and `SeatVariant` for each seat.
//!
//! Uses `im` persistent collections so every snapshot clone is O(1).

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::ActionRecord;
use super::config::{RulesetMode, TableConfig};
use super::dice::{Die, Roll};
use super::error::RuleError;
use super::seat::{PlayerInfo, SeatId};
use crate::rules::calc::{calculate_total, calculate_visible_total, Hunch};

/// Top-level table status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableStatus {
    #[default]
    Lobby,
    Playing,
    Inspection,
    Revealing,
    Duel,
    Payout,
}

/// Progress within `TableStatus::Playing`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting on the cut holder.
    Cut,
    /// Seats take turns.
    Betting,
    /// Every seat is done; nothing left to act on.
    Complete,
}

/// A decision that must be made before anything else happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pending {
    /// The seat just bought a die and may cheat before the turn closes.
    CheatDecision { seat: SeatId, die_index: usize },
    /// The Chamber roller may spend a boot before moving on.
    ChamberContinue { seat: SeatId },
    /// A failed bump lets the victim knock one of the bumper's dice.
    BumpRetaliation { victim: SeatId, attacker: SeatId },
}

impl Pending {
    /// The seat that must resolve this decision.
    #[must_use]
    pub fn owner(&self) -> SeatId {
        match *self {
            Pending::CheatDecision { seat, .. } | Pending::ChamberContinue { seat } => seat,
            Pending::BumpRetaliation { victim, .. } => victim,
        }
    }
}

/// A lock placed on a seat's next roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForcedLock {
    /// Die the seat must roll; `None` means any die, but no holding.
    pub die: Option<Die>,
    /// Who imposed it (the seat itself after a backfire).
    pub source: SeatId,
}

/// A face pre-rolled by a hunch, consumed by the next roll of that die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Foresight {
    pub die: Die,
    pub face: u8,
}

/// Intel a seat has gathered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightKind {
    /// Next roll of `die` will come up high or low.
    NextDie { die: Die, hunch: Hunch },
    /// Next roll of `die` will show `face`.
    NextDieExact { die: Die, face: u8 },
    /// The subject's hole die is high or low.
    HoleDie(Hunch),
    /// The subject's hole die shows this value.
    HoleDieExact(u8),
    /// Whether the subject has a landed, detectable cheat this round.
    Cheated(bool),
}

/// One piece of intel about a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Insight {
    pub about: SeatId,
    pub kind: InsightKind,
}

/// One cheat attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheatRecord {
    pub die_index: usize,
    pub adjustment: i32,
    /// Natural 1: caught on the spot.
    pub fumbled: bool,
    /// Missed the difficulty: die untouched.
    pub failed: bool,
    /// Natural 20: the die changed and leaves no trace.
    pub invisible: bool,
    pub dc: i32,
    /// Natural d20 face of the check.
    pub roll: u8,
    pub old_value: Option<u8>,
    pub new_value: Option<u8>,
}

impl CheatRecord {
    /// The die was actually changed.
    #[must_use]
    pub fn altered(&self) -> bool {
        !self.fumbled && !self.failed
    }

    /// The die was changed and an inspection can find it.
    #[must_use]
    pub fn detectable(&self) -> bool {
        self.altered() && !self.invisible
    }
}

/// Once-per-round and once-per-turn skill flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillsUsed {
    pub hunch: bool,
    pub profile: bool,
    pub goad: bool,
    pub bump: bool,
    /// Any skill this turn; cleared when the turn ends.
    pub this_turn: bool,
    /// Cheated during the current cheat window.
    pub cheated_this_turn: bool,
}

/// Standard-mode per-seat skill state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillState {
    /// Difficulty of this seat's next cheat.
    pub heat: i32,
    pub cheats: Vector<CheatRecord>,
    pub used: SkillsUsed,
    pub lock: Option<ForcedLock>,
    pub prerolls: SmallVec<[Foresight; 5]>,
    pub insights: Vector<Insight>,
}

impl SkillState {
    /// Fresh state at the given starting heat.
    #[must_use]
    pub fn new(heat: i32) -> Self {
        Self {
            heat,
            cheats: Vector::new(),
            used: SkillsUsed::default(),
            lock: None,
            prerolls: SmallVec::new(),
            insights: Vector::new(),
        }
    }

    /// Has a landed, detectable cheat on `die_index`.
    #[must_use]
    pub fn altered_die(&self, die_index: usize) -> bool {
        self.cheats.iter().any(|c| c.die_index == die_index && c.detectable())
    }

    /// Has any landed, detectable cheat.
    #[must_use]
    pub fn has_detectable_cheat(&self) -> bool {
        self.cheats.iter().any(CheatRecord::detectable)
    }
}

/// Chamber-mode per-seat escalation state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChamberSeat {
    /// Last stage index this seat rolled at.
    pub acted_stage: Option<usize>,
    /// Boots earned and not yet spent.
    pub boots: u32,
    /// Held during an early stage.
    pub coward: bool,
    /// The roll that eliminated this seat.
    pub fatal_roll: Option<Roll>,
}

impl ChamberSeat {
    /// Still owes a roll at `stage`.
    #[must_use]
    pub fn owes_roll(&self, stage: usize) -> bool {
        self.acted_stage.map_or(true, |s| s < stage)
    }
}

/// Ruleset-specific seat data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatVariant {
    Standard(SkillState),
    Chamber(ChamberSeat),
}

/// Everything the table tracks for one seat during a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    pub rolls: Vector<Roll>,
    pub total: u32,
    pub visible_total: u32,
    pub held: bool,
    pub busted: bool,
    pub folded: bool,
    pub caught: bool,
    /// Has taken any betting action this round.
    pub acted: bool,
    /// Over the limit, awaiting the end of the cheat window.
    pub pending_bust: bool,
    /// Drinks taken instead of paying.
    pub tab: u32,
    /// Fumbles owing a cleaning fee at payout.
    pub cleaning_fees: u32,
    pub variant: SeatVariant,
}

impl SeatState {
    /// Empty seat for the given ruleset.
    #[must_use]
    pub fn new(mode: RulesetMode, config: &TableConfig) -> Self {
        let variant = match mode {
            RulesetMode::Standard => SeatVariant::Standard(SkillState::new(config.base_heat)),
            RulesetMode::Chamber => SeatVariant::Chamber(ChamberSeat::default()),
        };
        Self {
            rolls: Vector::new(),
            total: 0,
            visible_total: 0,
            held: false,
            busted: false,
            folded: false,
            caught: false,
            acted: false,
            pending_bust: false,
            tab: 0,
            cleaning_fees: 0,
            variant,
        }
    }

    /// Out of the betting for this round.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.held || self.busted || self.folded || self.caught
    }

    /// Still eligible to win.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.busted && !self.folded && !self.caught
    }

    /// Replace the rolls and recompute both totals.
    pub fn set_rolls(&mut self, rolls: Vector<Roll>) {
        self.rolls = rolls;
        self.recompute();
    }

    /// Append a roll and recompute both totals. Returns its index.
    pub fn push_roll(&mut self, roll: Roll) -> usize {
        self.rolls.push_back(roll);
        self.recompute();
        self.rolls.len() - 1
    }

    /// Recompute totals from the rolls.
    pub fn recompute(&mut self) {
        self.total = calculate_total(&self.rolls);
        self.visible_total = calculate_visible_total(&self.rolls);
    }

    /// Standard skill state.
    #[must_use]
    pub fn skills(&self) -> Option<&SkillState> {
        match &self.variant {
            SeatVariant::Standard(skills) => Some(skills),
            SeatVariant::Chamber(_) => None,
        }
    }

    /// Mutable Standard skill state.
    pub fn skills_mut(&mut self) -> Option<&mut SkillState> {
        match &mut self.variant {
            SeatVariant::Standard(skills) => Some(skills),
            SeatVariant::Chamber(_) => None,
        }
    }

    /// Chamber escalation state.
    #[must_use]
    pub fn chamber(&self) -> Option<&ChamberSeat> {
        match &self.variant {
            SeatVariant::Chamber(chamber) => Some(chamber),
            SeatVariant::Standard(_) => None,
        }
    }

    /// Mutable Chamber escalation state.
    pub fn chamber_mut(&mut self) -> Option<&mut ChamberSeat> {
        match &mut self.variant {
            SeatVariant::Chamber(chamber) => Some(chamber),
            SeatVariant::Standard(_) => None,
        }
    }
}

/// Standard-mode table data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StandardTable {
    /// Seat holding the cut privilege, until it is used or passed.
    pub cut: Option<SeatId>,
}

/// Chamber-mode table data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChamberTable {
    /// Index into the ladder.
    pub stage: usize,
}

/// Ruleset-specific table data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantState {
    Standard(StandardTable),
    Chamber(ChamberTable),
}

/// One side bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideBet {
    pub bettor: SeatId,
    pub champion: SeatId,
    pub amount: u64,
}

/// Side bets for the round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideBets {
    pub bets: Vector<SideBet>,
    pub pool: u64,
}

/// One accusation made during inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Accusation {
    pub accuser: SeatId,
    pub target: SeatId,
    pub die_index: usize,
    pub fee: u64,
    pub confirmed: bool,
}

/// Round data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub mode: RulesetMode,
    pub phase: Phase,
    pub current_player: Option<SeatId>,
    pub pending: Option<Pending>,
    pub betting_order: Vector<SeatId>,
    /// Completed passes through the betting order, starting at 1.
    pub betting_round: u32,
    pub seats: OrdMap<SeatId, SeatState>,
    pub side_bets: SideBets,
    pub accusations: Vector<Accusation>,
    pub variant: VariantState,
}

impl TableData {
    /// Empty table between rounds.
    #[must_use]
    pub fn idle() -> Self {
        Self::new(RulesetMode::Standard)
    }

    /// Empty table for a ruleset.
    #[must_use]
    pub fn new(mode: RulesetMode) -> Self {
        let variant = match mode {
            RulesetMode::Standard => VariantState::Standard(StandardTable::default()),
            RulesetMode::Chamber => VariantState::Chamber(ChamberTable::default()),
        };
        Self {
            mode,
            phase: Phase::Idle,
            current_player: None,
            pending: None,
            betting_order: Vector::new(),
            betting_round: 0,
            seats: OrdMap::new(),
            side_bets: SideBets::default(),
            accusations: Vector::new(),
            variant,
        }
    }

    /// Seat record.
    #[must_use]
    pub fn seat(&self, seat: SeatId) -> Option<&SeatState> {
        self.seats.get(&seat)
    }

    /// Mutable seat record.
    pub fn seat_mut(&mut self, seat: SeatId) -> Option<&mut SeatState> {
        self.seats.get_mut(&seat)
    }

    /// Mutable seat record, or `MissingSeat`.
    pub fn require_seat_mut(&mut self, seat: SeatId) -> Result<&mut SeatState, RuleError> {
        self.seats.get_mut(&seat).ok_or(RuleError::MissingSeat { seat })
    }

    /// Seats still able to act, in betting order.
    #[must_use]
    pub fn active_seats(&self) -> Vec<SeatId> {
        self.betting_order
            .iter()
            .copied()
            .filter(|s| self.seats.get(s).is_some_and(|st| !st.is_terminal()))
            .collect()
    }

    /// Seats still able to win, in betting order.
    #[must_use]
    pub fn live_seats(&self) -> Vec<SeatId> {
        self.betting_order
            .iter()
            .copied()
            .filter(|s| self.seats.get(s).is_some_and(SeatState::is_live))
            .collect()
    }

    /// Current Chamber stage index.
    #[must_use]
    pub fn chamber_stage(&self) -> Option<usize> {
        match self.variant {
            VariantState::Chamber(chamber) => Some(chamber.stage),
            VariantState::Standard(_) => None,
        }
    }

    /// Seat holding the cut privilege.
    #[must_use]
    pub fn cut_holder(&self) -> Option<SeatId> {
        match self.variant {
            VariantState::Standard(standard) => standard.cut,
            VariantState::Chamber(_) => None,
        }
    }
}

impl Default for TableData {
    fn default() -> Self {
        Self::idle()
    }
}

/// Whether a duel is a Standard showdown or Chamber sudden death.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuelKind {
    /// d20 plus a d4 per natural-max die.
    Showdown,
    /// Coin flips; heads survive.
    CoinFlip,
}

/// One participant's duel roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DuelRoll {
    pub d20: u8,
    pub d4_bonus: u8,
    pub hits: u8,
    pub total: u32,
}

/// A tie-break in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duel {
    pub participants: Vec<SeatId>,
    pub rolls: OrdMap<SeatId, DuelRoll>,
    pub pending_rolls: Vec<SeatId>,
    pub round: u32,
    pub kind: DuelKind,
}

impl Duel {
    /// Open a duel among `participants`.
    #[must_use]
    pub fn new(participants: Vec<SeatId>, kind: DuelKind) -> Self {
        Self {
            pending_rolls: participants.clone(),
            participants,
            rolls: OrdMap::new(),
            round: 1,
            kind,
        }
    }

    /// Start another round among the tied seats.
    pub fn rematch(&mut self, participants: Vec<SeatId>) {
        self.pending_rolls = participants.clone();
        self.participants = participants;
        self.rolls = OrdMap::new();
        self.round += 1;
    }
}

/// An amount paid to a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payout {
    pub seat: SeatId,
    pub amount: u64,
}

/// A bounty moved from a caught cheater to the accuser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounty {
    pub accuser: SeatId,
    pub cheater: SeatId,
    pub amount: u64,
}

/// What a payout did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub mode: RulesetMode,
    pub winner: Option<SeatId>,
    pub winning_total: Option<u32>,
    /// Pot before any payout step.
    pub pot_before: u64,
    pub cleaning_fees: Vec<Payout>,
    pub accusation_refunds: Vec<Payout>,
    pub bounties: Vec<Bounty>,
    pub winner_payout: u64,
    /// Withheld from a coward winner.
    pub coward_tax: u64,
    /// Left in the pot for the next round.
    pub carried_over: u64,
    pub side_bet_payouts: Vec<Payout>,
}

impl RoundSummary {
    /// Everything paid out of the pot.
    #[must_use]
    pub fn pot_payouts(&self) -> u64 {
        self.winner_payout + self.accusation_refunds.iter().map(|p| p.amount).sum::<u64>()
    }

    /// Cleaning fees added to the pot.
    #[must_use]
    pub fn fees_collected(&self) -> u64 {
        self.cleaning_fees.iter().map(|p| p.amount).sum()
    }
}

/// The full table snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub status: TableStatus,
    pub pot: u64,
    pub ante: u64,
    /// Rounds started so far.
    pub round: u32,
    pub turn_order: Vec<SeatId>,
    pub players: OrdMap<SeatId, PlayerInfo>,
    pub table: TableData,
    pub duel: Option<Duel>,
    pub last_round: Option<RoundSummary>,
    pub history: Vector<ActionRecord>,
    /// Next history sequence number within the round.
    pub sequence: u32,
}

impl GameState {
    /// Empty lobby.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: TableStatus::Lobby,
            pot: 0,
            ante: 0,
            round: 0,
            turn_order: Vec::new(),
            players: OrdMap::new(),
            table: TableData::idle(),
            duel: None,
            last_round: None,
            history: Vector::new(),
            sequence: 0,
        }
    }

    /// Seat record in the current round.
    #[must_use]
    pub fn seat(&self, seat: SeatId) -> Option<&SeatState> {
        self.table.seat(seat)
    }

    /// Record an action in history.
    pub fn record_action(&mut self, seat: Option<SeatId>, action: super::action::Action) {
        let record = ActionRecord::new(seat, action, self.round, self.sequence);
        self.sequence += 1;
        self.history.push_back(record);
    }

    /// Serialize the snapshot as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a snapshot from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Verify the structural invariants of the snapshot.
    ///
    /// - every seat record belongs to a seat in the turn order
    /// - the turn order only names seated players
    /// - totals match the rolls, and every result is on its die
    /// - during betting, the current player exists and is not terminal
    pub fn check_invariants(&self) -> Result<(), RuleError> {
        for &seat in &self.turn_order {
            if !self.players.contains_key(&seat) {
                return Err(RuleError::MissingSeat { seat });
            }
        }

        for (&seat, state) in &self.table.seats {
            if !self.turn_order.contains(&seat) {
                return Err(RuleError::SeatOutsideTurnOrder { seat });
            }
            let computed = calculate_total(&state.rolls);
            if computed != state.total {
                return Err(RuleError::TotalDrift { seat, stored: state.total, computed });
            }
            let visible = calculate_visible_total(&state.rolls);
            if visible != state.visible_total {
                return Err(RuleError::TotalDrift { seat, stored: state.visible_total, computed: visible });
            }
            if let Some(roll) = state.rolls.iter().find(|r| r.result < 1 || r.result > r.die.sides()) {
                return Err(RuleError::ResultOutOfRange { result: roll.result, sides: roll.die.sides() });
            }
        }

        if self.status == TableStatus::Playing && self.table.phase == Phase::Betting {
            let current = self.table.current_player;
            let ok = current
                .and_then(|s| self.table.seat(s))
                .is_some_and(|s| !s.is_terminal());
            if !ok {
                return Err(RuleError::InactiveCurrentPlayer { seat: current });
            }
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
