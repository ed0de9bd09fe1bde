//! JSON configuration parsing for headless mode
//!
//! Parses JSON match configurations and converts them to the game's MatchConfig format.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::states::match_config::{Difficulty, FighterKind, FighterSetup, MatchConfig};
use crate::states::play_match::constants::{ARENA_HEIGHT, ARENA_WIDTH, ROUND_TIME_SECS};

/// Errors raised while loading or validating a headless config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid match config: {0}")]
    Invalid(String),
}

/// One side of a headless match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideConfig {
    /// Fighter name ("Bruiser" or "Rocketeer", case-insensitive)
    pub fighter: String,
    /// AI difficulty name; omitted leaves the fighter idle
    #[serde(default)]
    pub ai: Option<String>,
}

impl SideConfig {
    pub fn new(fighter: impl Into<String>, ai: Option<&str>) -> Self {
        Self {
            fighter: fighter.into(),
            ai: ai.map(str::to_string),
        }
    }

    fn to_setup(&self) -> Result<FighterSetup, ConfigError> {
        let kind = self
            .fighter
            .parse::<FighterKind>()
            .map_err(ConfigError::Invalid)?;
        // Unknown tier names fall back to medium with a warning
        let ai = self.ai.as_deref().map(Difficulty::from_name_or_default);
        Ok(FighterSetup { kind, ai })
    }
}

/// Headless match configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessMatchConfig {
    pub left: SideConfig,
    pub right: SideConfig,
    /// Rounds needed to take the match (default: 2)
    #[serde(default = "default_rounds_to_win")]
    pub rounds_to_win: u32,
    /// Round clock in seconds (default: 99)
    #[serde(default = "default_round_time")]
    pub round_time_secs: f32,
    /// Maximum simulated match time before declaring a draw (default: 600)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic match reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for match log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// RON roster to use instead of the built-in one (optional)
    #[serde(default)]
    pub roster_path: Option<String>,
}

fn default_rounds_to_win() -> u32 {
    2
}

fn default_round_time() -> f32 {
    ROUND_TIME_SECS
}

fn default_max_duration() -> f32 {
    600.0
}

impl Default for HeadlessMatchConfig {
    fn default() -> Self {
        Self {
            left: SideConfig::new("Bruiser", Some("medium")),
            right: SideConfig::new("Rocketeer", Some("medium")),
            rounds_to_win: default_rounds_to_win(),
            round_time_secs: default_round_time(),
            max_duration_secs: default_max_duration(),
            random_seed: None,
            output_path: None,
            roster_path: None,
        }
    }
}

impl HeadlessMatchConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: HeadlessMatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.left.to_setup()?;
        self.right.to_setup()?;

        if self.rounds_to_win == 0 {
            return Err(ConfigError::Invalid(
                "rounds_to_win must be at least 1".to_string(),
            ));
        }
        if !is_positive_finite(self.round_time_secs) {
            return Err(ConfigError::Invalid(
                "round_time_secs must be a positive number of seconds".to_string(),
            ));
        }
        if !is_positive_finite(self.max_duration_secs) {
            return Err(ConfigError::Invalid(
                "max_duration_secs must be a positive number of seconds".to_string(),
            ));
        }

        Ok(())
    }

    /// Convert to the game's MatchConfig format
    pub fn to_match_config(&self) -> Result<MatchConfig, ConfigError> {
        self.validate()?;
        Ok(MatchConfig {
            left: self.left.to_setup()?,
            right: self.right.to_setup()?,
            rounds_to_win: self.rounds_to_win,
            round_time_secs: self.round_time_secs,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
        })
    }
}

/// Finite and above zero. NaN fails every comparison.
fn is_positive_finite(secs: f32) -> bool {
    secs > 0.0 && secs.is_finite()
}
