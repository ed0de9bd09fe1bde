//! Data-Driven Fighter Roster
//!
//! Fighter stats, move tables, block values and combo patterns are defined in
//! `assets/config/fighters.ron`. The file is embedded at compile time so the
//! built-in roster is always available, and an alternative file can be loaded
//! from disk with [`load_fighter_roster`].
//!
//! Definitions are immutable once loaded. Every fighter of a type holds an
//! `Arc` to the same [`FighterDefinition`]; only per-fight state lives on the
//! `Fighter` component.
//!
//! ## Usage
//! ```ignore
//! fn my_system(roster: Res<FighterRoster>) {
//!     let def = roster.get(FighterKind::Bruiser).unwrap();
//!     println!("Bruiser kick range: {}", def.moves[&MoveKind::Kick].range);
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use super::components::AnimationTag;
use crate::states::match_config::FighterKind;

const BUILTIN_ROSTER: &str = include_str!("../../../assets/config/fighters.ron");

/// The four attack slots every fighter may define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoveKind {
    Punch,
    Kick,
    Special,
    Ultimate,
}

impl MoveKind {
    pub fn all() -> &'static [MoveKind] {
        &[
            MoveKind::Punch,
            MoveKind::Kick,
            MoveKind::Special,
            MoveKind::Ultimate,
        ]
    }

    /// Lowercase label used in commands and logs
    pub fn label(&self) -> &'static str {
        match self {
            MoveKind::Punch => "punch",
            MoveKind::Kick => "kick",
            MoveKind::Special => "special",
            MoveKind::Ultimate => "ultimate",
        }
    }

    /// Animation shown while the move is being thrown
    pub fn animation(&self) -> AnimationTag {
        match self {
            MoveKind::Punch => AnimationTag::Punch,
            MoveKind::Kick => AnimationTag::Kick,
            MoveKind::Special => AnimationTag::Special,
            MoveKind::Ultimate => AnimationTag::Ultimate,
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MoveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveKind::all()
            .iter()
            .copied()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown move: '{}'", s))
    }
}

/// A single attack definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveConfig {
    /// Display name of the move
    pub name: String,
    pub damage: f32,
    /// Maximum center-to-center reach in pixels
    pub range: f32,
    pub cooldown_ms: f32,
    /// Horizontal velocity given to the victim
    pub knockback: f32,
    /// Energy the attacker earns when the move connects
    #[serde(default)]
    pub special_gain: f32,
    /// Energy required (and spent) to throw the move
    #[serde(default)]
    pub special_cost: f32,
    /// Fired as a projectile instead of resolved as melee
    #[serde(default)]
    pub projectile: bool,
    /// Cosmetic effect label passed through to presentation
    #[serde(default)]
    pub effect: Option<String>,
}

impl MoveConfig {
    /// Returns true if the move spends special energy
    pub fn is_energy_gated(&self) -> bool {
        self.special_cost > 0.0
    }
}

/// Blocking behaviour of a fighter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Fraction of incoming melee damage absorbed (0.8 = 80% absorbed)
    pub damage_reduction: f32,
    /// Energy gained for each blocked hit
    #[serde(default)]
    pub special_gain: f32,
}

/// A recognized move sequence and the bonus it pays out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComboConfig {
    pub name: String,
    pub sequence: Vec<MoveKind>,
    /// Reported bonus damage; cosmetic, not applied to health
    #[serde(default)]
    pub damage: f32,
    /// Energy granted to the attacker when the combo completes
    #[serde(default)]
    pub special_gain: f32,
    #[serde(default)]
    pub effect: Option<String>,
}

impl ComboConfig {
    /// Whether the buffer ends with this combo's sequence
    pub fn matches(&self, buffer: &[MoveKind]) -> bool {
        !self.sequence.is_empty() && buffer.ends_with(&self.sequence)
    }
}

/// Optional movement abilities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FighterAbilities {
    #[serde(default)]
    pub double_jump: bool,
    /// Dash velocity; `None` means the fighter cannot dash
    #[serde(default)]
    pub dash_speed: Option<f32>,
}

/// Complete static definition of one fighter type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterDefinition {
    pub name: String,
    pub max_health: f32,
    pub max_special_energy: f32,
    /// Walking speed in pixels per tick
    pub speed: f32,
    pub jump_power: f32,
    /// Gravity multiplier
    pub weight: f32,
    pub width: f32,
    pub height: f32,
    pub moves: HashMap<MoveKind, MoveConfig>,
    pub block: BlockConfig,
    /// Checked in declaration order; the first match wins
    #[serde(default)]
    pub combos: Vec<ComboConfig>,
    #[serde(default)]
    pub abilities: FighterAbilities,
}

impl FighterDefinition {
    pub fn move_config(&self, kind: MoveKind) -> Option<&MoveConfig> {
        self.moves.get(&kind)
    }

    /// First combo, in declaration order, completed by the buffer
    pub fn completed_combo(&self, buffer: &[MoveKind]) -> Option<&ComboConfig> {
        self.combos.iter().find(|combo| combo.matches(buffer))
    }
}

/// Root structure for the fighters.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct RosterConfig {
    pub fighters: HashMap<FighterKind, FighterDefinition>,
}

/// Errors raised while loading a roster
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("missing fighter definitions: {0:?}")]
    MissingFighters(Vec<FighterKind>),
    #[error("{fighter} has invalid stats: {reason}")]
    InvalidDefinition { fighter: FighterKind, reason: String },
}

/// Resource containing every fighter definition.
#[derive(Resource, Debug, Clone)]
pub struct FighterRoster {
    definitions: HashMap<FighterKind, Arc<FighterDefinition>>,
}

impl FighterRoster {
    /// Create from a loaded config
    pub fn new(config: RosterConfig) -> Self {
        Self {
            definitions: config
                .fighters
                .into_iter()
                .map(|(kind, def)| (kind, Arc::new(def)))
                .collect(),
        }
    }

    /// The roster compiled into the binary
    pub fn builtin() -> Result<Self, RosterError> {
        parse_roster(BUILTIN_ROSTER, "built-in fighters.ron")
    }

    /// Shared handle to a fighter's definition
    pub fn get(&self, kind: FighterKind) -> Option<Arc<FighterDefinition>> {
        self.definitions.get(&kind).cloned()
    }

    /// Lookup that reports a missing fighter as an error
    pub fn definition(&self, kind: FighterKind) -> Result<Arc<FighterDefinition>, RosterError> {
        self.get(kind)
            .ok_or_else(|| RosterError::MissingFighters(vec![kind]))
    }

    /// Check that every fighter type is defined with usable stats
    pub fn validate(&self) -> Result<(), RosterError> {
        let missing: Vec<FighterKind> = FighterKind::all()
            .iter()
            .copied()
            .filter(|kind| !self.definitions.contains_key(kind))
            .collect();

        if !missing.is_empty() {
            return Err(RosterError::MissingFighters(missing));
        }

        for (kind, def) in &self.definitions {
            let invalid = |reason: &str| RosterError::InvalidDefinition {
                fighter: *kind,
                reason: reason.to_string(),
            };
            if def.max_health <= 0.0 {
                return Err(invalid("max_health must be positive"));
            }
            if def.width <= 0.0 || def.height <= 0.0 {
                return Err(invalid("body size must be positive"));
            }
            if !(0.0..=1.0).contains(&def.block.damage_reduction) {
                return Err(invalid("block damage_reduction must be within 0..=1"));
            }
            for required in [MoveKind::Punch, MoveKind::Kick] {
                if !def.moves.contains_key(&required) {
                    return Err(invalid(&format!("missing {} move", required)));
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn parse_roster(contents: &str, origin: &str) -> Result<FighterRoster, RosterError> {
    let config: RosterConfig = ron::from_str(contents).map_err(|source| RosterError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    let roster = FighterRoster::new(config);
    roster.validate()?;

    info!("Loaded {} fighter definitions from {}", roster.len(), origin);
    Ok(roster)
}

/// Load a roster from a RON file on disk
pub fn load_fighter_roster(path: &Path) -> Result<FighterRoster, RosterError> {
    let contents = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_roster(&contents, &path.display().to_string())
}
