//! Action representation.
//!
//! Every call the table accepts is an `Action`: a verb plus its payload.
//! Seat-scoped actions are submitted with the acting `SeatId`; table-wide
//! ones (reveal, skip inspection, return to lobby) with none. Accepted
//! actions are appended to the state's history as `ActionRecord`s, which is
//! enough to replay a round against the same dice.

use serde::{Deserialize, Serialize};

use super::config::RulesetMode;
use super::dice::Die;
use super::seat::{PlayerInfo, SeatId, Skill};

/// How a Standard die purchase is paid for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Payment {
    /// Paid from the seat's purse.
    #[default]
    Coin,
    /// Put on the tab as a drink.
    Tab,
}

/// Open a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StartRound {
    pub ante: u64,
    pub mode: RulesetMode,
}

/// Buy (Standard) or take (Chamber) a die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RollPayload {
    pub die: Die,
    pub payment: Payment,
    /// Roll face-down, hidden even from yourself, at half price.
    pub blind: bool,
}

impl RollPayload {
    /// A face-up die paid in coin.
    #[must_use]
    pub fn coin(die: Die) -> Self {
        Self {
            die,
            payment: Payment::Coin,
            blind: false,
        }
    }

    /// A face-up die put on the tab.
    #[must_use]
    pub fn tab(die: Die) -> Self {
        Self {
            payment: Payment::Tab,
            ..Self::coin(die)
        }
    }

    /// Roll blind.
    #[must_use]
    pub fn blind(mut self) -> Self {
        self.blind = true;
        self
    }
}

/// Nudge one of your own dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheatPayload {
    pub die_index: usize,
    pub adjustment: i32,
    /// `SleightOfHand` or `Deception`.
    pub skill: Skill,
}

/// An action aimed at another seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetPayload {
    pub target: SeatId,
}

/// Goad a seat into rolling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoadPayload {
    pub target: SeatId,
    /// `Intimidation` or `Persuasion`.
    pub skill: Skill,
}

/// Bump the table under one of a seat's dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BumpPayload {
    pub target: SeatId,
    pub die_index: usize,
}

/// Pick which of the bumper's dice gets knocked in return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetaliationPayload {
    pub die_index: usize,
}

/// Accuse a seat of altering a specific die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccusePayload {
    pub target: SeatId,
    pub die_index: usize,
}

/// Back another seat to win the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideBetPayload {
    pub champion: SeatId,
    pub amount: u64,
}

/// A table action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    SeatPlayer(PlayerInfo),
    Unseat,
    StartRound(StartRound),
    Roll(RollPayload),
    FinishTurn,
    Hold,
    Fold,
    UseCut { reroll: bool },
    Hunch,
    Profile(TargetPayload),
    Cheat(CheatPayload),
    Goad(GoadPayload),
    BumpTable(BumpPayload),
    BumpRetaliation(RetaliationPayload),
    RevealDice,
    Accuse(AccusePayload),
    SkipInspection,
    DuelRoll,
    PlaceSideBet(SideBetPayload),
    Boot(TargetPayload),
    GoblinContinue,
    ReturnToLobby,
}

impl Action {
    /// Stable verb name, used in logs and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::SeatPlayer(_) => "seat_player",
            Action::Unseat => "unseat",
            Action::StartRound(_) => "start_round",
            Action::Roll(_) => "roll",
            Action::FinishTurn => "finish_turn",
            Action::Hold => "hold",
            Action::Fold => "fold",
            Action::UseCut { .. } => "use_cut",
            Action::Hunch => "hunch",
            Action::Profile(_) => "profile",
            Action::Cheat(_) => "cheat",
            Action::Goad(_) => "goad",
            Action::BumpTable(_) => "bump_table",
            Action::BumpRetaliation(_) => "bump_retaliation",
            Action::RevealDice => "reveal_dice",
            Action::Accuse(_) => "accuse",
            Action::SkipInspection => "skip_inspection",
            Action::DuelRoll => "duel_roll",
            Action::PlaceSideBet(_) => "place_side_bet",
            Action::Boot(_) => "boot",
            Action::GoblinContinue => "goblin_continue",
            Action::ReturnToLobby => "return_to_lobby",
        }
    }

    /// Whether the action must be submitted on behalf of a seat.
    #[must_use]
    pub fn needs_seat(&self) -> bool {
        !matches!(
            self,
            Action::RevealDice | Action::SkipInspection | Action::ReturnToLobby | Action::StartRound(_)
        )
    }
}

/// An accepted action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that acted, if the action was seat-scoped.
    pub seat: Option<SeatId>,

    /// The action taken.
    pub action: Action,

    /// Round number when the action was taken.
    pub round: u32,

    /// Sequence number within the round.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(seat: Option<SeatId>, action: Action, round: u32, sequence: u32) -> Self {
        Self {
            seat,
            action,
            round,
            sequence,
        }
    }
}
