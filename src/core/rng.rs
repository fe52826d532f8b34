//! Deterministic dice for the table.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical rolls
//! - **Injectable**: The table only sees the `DiceSource` trait
//! - **Serializable**: O(1) state capture and restore
//! - **Scriptable**: `LoadedDice` replays queued faces for exact scenarios
//!
//! ```
//! use tavern_dice::core::{DiceSource, GameRng, LoadedDice};
//!
//! let mut dice = LoadedDice::new(7).with_faces([20, 1]);
//! assert_eq!(dice.roll(20), 20);
//! assert_eq!(dice.roll(20), 1);
//!
//! // Queue exhausted: falls back to the seeded stream.
//! let face = dice.roll(6);
//! assert!((1..=6).contains(&face));
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll(20), b.roll(20));
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of die faces.
///
/// `roll(sides)` returns a face in `1..=sides`.
pub trait DiceSource {
    /// Roll one die with `sides` faces.
    fn roll(&mut self, sides: u8) -> u8;

    /// Roll a d20.
    fn d20(&mut self) -> u8 {
        self.roll(20)
    }
}

/// Seeded dice backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl DiceSource for GameRng {
    fn roll(&mut self, sides: u8) -> u8 {
        self.inner.gen_range(1..=sides.max(1))
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Dice that return queued faces first, then fall back to a seeded stream.
///
/// Queued faces are clamped into `1..=sides` of the die actually rolled.
#[derive(Clone, Debug)]
pub struct LoadedDice {
    queue: VecDeque<u8>,
    fallback: GameRng,
}

impl LoadedDice {
    /// Empty queue over a seeded fallback.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback: GameRng::new(seed),
        }
    }

    /// Queue faces to be returned in order.
    #[must_use]
    pub fn with_faces(mut self, faces: impl IntoIterator<Item = u8>) -> Self {
        self.queue.extend(faces);
        self
    }

    /// Queue more faces at the back.
    pub fn load(&mut self, faces: impl IntoIterator<Item = u8>) {
        self.queue.extend(faces);
    }

    /// Faces still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DiceSource for LoadedDice {
    fn roll(&mut self, sides: u8) -> u8 {
        match self.queue.pop_front() {
            Some(face) => face.clamp(1, sides.max(1)),
            None => self.fallback.roll(sides),
        }
    }
}
