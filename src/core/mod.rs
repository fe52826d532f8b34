//! Core engine types: seats, dice, RNG, configuration, actions, state, errors.
//!
//! Nothing in here knows the rules of either ruleset; it is the vocabulary
//! the rule modules and the table share.

pub mod seat;
pub mod dice;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod error;

pub use seat::{PlayerInfo, SeatId, Skill, SkillModifiers};
pub use dice::{Die, Roll};
pub use rng::{DiceSource, GameRng, GameRngState, LoadedDice};
pub use config::{RulesetMode, TableConfig};
pub use action::{
    AccusePayload, Action, ActionRecord, BumpPayload, CheatPayload, GoadPayload, Payment,
    RetaliationPayload, RollPayload, SideBetPayload, StartRound, TargetPayload,
};
pub use state::{
    Accusation, Bounty, ChamberSeat, ChamberTable, CheatRecord, Duel, DuelKind, DuelRoll,
    ForcedLock, Foresight, GameState, Insight, InsightKind, Payout, Pending, Phase,
    RoundSummary, SeatState, SeatVariant, SideBet, SideBets, SkillState, SkillsUsed,
    StandardTable, TableData, TableStatus, VariantState,
};
pub use error::{ActionError, RuleError};
