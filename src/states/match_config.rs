//! Match configuration data structures and resource
//!
//! Describes who fights, who controls each side, and the bout format.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available fighter types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterKind {
    Bruiser,
    Rocketeer,
}

impl FighterKind {
    /// Get all available fighter types
    pub fn all() -> &'static [FighterKind] {
        &[FighterKind::Bruiser, FighterKind::Rocketeer]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            FighterKind::Bruiser => "Bruiser",
            FighterKind::Rocketeer => "Rocketeer",
        }
    }

    /// Get a short description
    pub fn description(&self) -> &'static str {
        match self {
            FighterKind::Bruiser => "Heavy hitter with slow, punishing moves",
            FighterKind::Rocketeer => "Fast striker with a ranged rocket punch",
        }
    }
}

impl fmt::Display for FighterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FighterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FighterKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown fighter: '{}'. Valid fighters: Bruiser, Rocketeer", s))
    }
}

/// AI difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Insane,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }

    /// Parse a tier name, falling back to `Medium` for anything unrecognized.
    pub fn from_name_or_default(name: &str) -> Self {
        match name.parse() {
            Ok(tier) => tier,
            Err(_) => {
                warn!("Unknown difficulty '{}', using medium", name);
                Difficulty::Medium
            }
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::all()
            .iter()
            .copied()
            .find(|tier| tier.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown difficulty: '{}'", s))
    }
}

/// Which side of the arena a fighter starts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn name(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }

    /// Starting x position as a fraction of the arena width
    pub fn spawn_fraction(&self) -> f32 {
        match self {
            Side::Left => 0.25,
            Side::Right => 0.75,
        }
    }
}

/// One side of the match: which fighter, and whether an AI drives it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FighterSetup {
    pub kind: FighterKind,
    /// `None` leaves the fighter idle, waiting for external commands
    pub ai: Option<Difficulty>,
}

/// Match configuration resource
#[derive(Resource, Debug, Clone)]
pub struct MatchConfig {
    pub left: FighterSetup,
    pub right: FighterSetup,
    /// Rounds needed to take the match
    pub rounds_to_win: u32,
    /// Round clock in seconds
    pub round_time_secs: f32,
    pub arena_width: f32,
    pub arena_height: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            left: FighterSetup {
                kind: FighterKind::Bruiser,
                ai: None,
            },
            right: FighterSetup {
                kind: FighterKind::Rocketeer,
                ai: Some(Difficulty::Medium),
            },
            rounds_to_win: 2,
            round_time_secs: super::play_match::constants::ROUND_TIME_SECS,
            arena_width: super::play_match::constants::ARENA_WIDTH,
            arena_height: super::play_match::constants::ARENA_HEIGHT,
        }
    }
}

impl MatchConfig {
    pub fn setup(&self, side: Side) -> FighterSetup {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Upper bound on rounds, reached only when draws pile up
    pub fn max_rounds(&self) -> u32 {
        self.rounds_to_win.max(1).saturating_mul(2).saturating_sub(1)
    }
}
