//! Turn resolution: rolling, holding, folding, and passing the turn on.

pub mod engine;

pub use engine::{
    begin_betting, close_cheat_window, end_turn, finish_turn, fold, hold, require_betting,
    require_no_pending, require_turn, roll,
};
