//! Dice and rolls.
//!
//! A `Die` is a polyhedral size; a `Roll` is one die on the table with its
//! scoring value and visibility flags.

use serde::{Deserialize, Serialize};

/// Polyhedral die sizes used at the table.
///
/// `Coin` is the two-sided final stage of Chamber mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Die {
    Coin,
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl Die {
    /// Number of faces.
    #[must_use]
    pub const fn sides(self) -> u8 {
        match self {
            Die::Coin => 2,
            Die::D4 => 4,
            Die::D6 => 6,
            Die::D8 => 8,
            Die::D10 => 10,
            Die::D12 => 12,
            Die::D20 => 20,
        }
    }

    /// Look up a die by face count.
    #[must_use]
    pub const fn from_sides(sides: u8) -> Option<Die> {
        match sides {
            2 => Some(Die::Coin),
            4 => Some(Die::D4),
            6 => Some(Die::D6),
            8 => Some(Die::D8),
            10 => Some(Die::D10),
            12 => Some(Die::D12),
            20 => Some(Die::D20),
            _ => None,
        }
    }

    /// Is `value` this die's natural maximum?
    #[must_use]
    pub const fn is_max(self, value: u8) -> bool {
        value == self.sides()
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Die::Coin => f.write_str("coin"),
            other => write!(f, "d{}", other.sides()),
        }
    }
}

/// One die on the table.
///
/// `face` is what the die showed when it landed. `result` is the value that
/// scores; the two differ once a cheat, a bump, or a snap rewrites the die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roll {
    pub die: Die,
    pub result: u8,
    pub face: u8,
    /// Visible to the other seats.
    pub public: bool,
    /// Hidden even from the owner until reveal.
    pub blind: bool,
    /// Set on coin-stage rolls: 1 for survive, 0 for fall.
    pub coin_value: Option<u8>,
}

impl Roll {
    /// A face-up roll.
    #[must_use]
    pub fn public(die: Die, face: u8) -> Self {
        Self {
            die,
            result: face,
            face,
            public: true,
            blind: false,
            coin_value: None,
        }
    }

    /// A hole roll, seen only by its owner.
    #[must_use]
    pub fn hole(die: Die, face: u8) -> Self {
        Self {
            public: false,
            ..Self::public(die, face)
        }
    }

    /// A blind roll, seen by nobody until reveal.
    #[must_use]
    pub fn blind(die: Die, face: u8) -> Self {
        Self {
            public: false,
            blind: true,
            ..Self::public(die, face)
        }
    }

    /// A coin-stage flip.
    #[must_use]
    pub fn coin(face: u8) -> Self {
        Self {
            coin_value: Some(u8::from(face == Die::Coin.sides())),
            ..Self::public(Die::Coin, face)
        }
    }

    /// Counts toward the visible total.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.public && !self.blind
    }

    /// Landed on the die's maximum face.
    #[must_use]
    pub const fn is_natural_max(&self) -> bool {
        self.die.is_max(self.face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_die_sides_round_trip() {
        for die in [Die::Coin, Die::D4, Die::D6, Die::D8, Die::D10, Die::D12, Die::D20] {
            assert_eq!(Die::from_sides(die.sides()), Some(die));
        }
        assert_eq!(Die::from_sides(7), None);
    }

    #[test]
    fn test_die_display() {
        assert_eq!(Die::D20.to_string(), "d20");
        assert_eq!(Die::Coin.to_string(), "coin");
    }

    #[test]
    fn test_roll_visibility() {
        assert!(Roll::public(Die::D6, 4).is_visible());
        assert!(!Roll::hole(Die::D10, 3).is_visible());

        let blind = Roll::blind(Die::D8, 8);
        assert!(!blind.is_visible());
        assert!(blind.is_natural_max());
    }

    #[test]
    fn test_coin_roll() {
        assert_eq!(Roll::coin(2).coin_value, Some(1));
        assert_eq!(Roll::coin(1).coin_value, Some(0));
    }
}
