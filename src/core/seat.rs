//! Seat identification and per-player profile data.
//!
//! ## SeatId
//!
//! Type-safe seat identifier supporting up to 255 seats. Seats are the unit
//! the engine reasons about: every action is submitted on behalf of a seat.
//!
//! ## PlayerInfo
//!
//! The persistent profile of whoever occupies a seat: a display name and the
//! skill modifiers used by social and cheat checks.

use serde::{Deserialize, Serialize};

/// Seat identifier.
///
/// Seat indices are 0-based: the first seat is `SeatId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatId(pub u8);

impl SeatId {
    /// Create a new seat ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over the first `count` seat IDs.
    ///
    /// ```
    /// use tavern_dice::core::SeatId;
    ///
    /// let seats: Vec<_> = SeatId::all(3).collect();
    /// assert_eq!(seats, vec![SeatId::new(0), SeatId::new(1), SeatId::new(2)]);
    /// ```
    pub fn all(count: usize) -> impl Iterator<Item = SeatId> {
        (0..count.min(255) as u8).map(SeatId)
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Skills a seat can bring to a contest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    /// Palming and nudging dice.
    SleightOfHand,
    /// Talking your way through a cheat.
    Deception,
    /// Reading the table; hunches and resisting goads.
    Insight,
    /// Profiling an opponent.
    Investigation,
    /// Goading by threat.
    Intimidation,
    /// Goading by charm.
    Persuasion,
    /// Bumping the table, and keeping your dice steady when bumped.
    Athletics,
}

impl Skill {
    /// All skills, in storage order.
    pub const ALL: [Skill; 7] = [
        Skill::SleightOfHand,
        Skill::Deception,
        Skill::Insight,
        Skill::Investigation,
        Skill::Intimidation,
        Skill::Persuasion,
        Skill::Athletics,
    ];

    const fn slot(self) -> usize {
        match self {
            Skill::SleightOfHand => 0,
            Skill::Deception => 1,
            Skill::Insight => 2,
            Skill::Investigation => 3,
            Skill::Intimidation => 4,
            Skill::Persuasion => 5,
            Skill::Athletics => 6,
        }
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Deception => "Deception",
            Skill::Insight => "Insight",
            Skill::Investigation => "Investigation",
            Skill::Intimidation => "Intimidation",
            Skill::Persuasion => "Persuasion",
            Skill::Athletics => "Athletics",
        };
        f.write_str(name)
    }
}

/// Flat modifiers added to a seat's d20 for each skill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillModifiers {
    values: [i8; 7],
}

impl SkillModifiers {
    /// All modifiers zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: [0; 7] }
    }

    /// Set a modifier.
    #[must_use]
    pub fn with(mut self, skill: Skill, modifier: i8) -> Self {
        self.values[skill.slot()] = modifier;
        self
    }

    /// Get the modifier for a skill.
    #[must_use]
    pub fn get(&self, skill: Skill) -> i32 {
        i32::from(self.values[skill.slot()])
    }
}

/// Profile of the player occupying a seat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Display name.
    pub name: String,
    /// Skill modifiers.
    pub skills: SkillModifiers,
}

impl PlayerInfo {
    /// Create a player with no skill modifiers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skills: SkillModifiers::new(),
        }
    }

    /// Set a skill modifier.
    #[must_use]
    pub fn with_skill(mut self, skill: Skill, modifier: i8) -> Self {
        self.skills = self.skills.with(skill, modifier);
        self
    }

    /// Modifier for a skill.
    #[must_use]
    pub fn modifier(&self, skill: Skill) -> i32 {
        self.skills.get(skill)
    }
}
