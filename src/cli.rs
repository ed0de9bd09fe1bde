//! Command-line interface for brawlsim
//!
//! Matches come either from a JSON config file or from per-side flags.
//! Flags for seed, rounds, output and duration override the file.

use clap::Parser;
use std::path::PathBuf;

use crate::headless::{ConfigError, HeadlessMatchConfig, SideConfig};

/// Two-fighter arena brawler simulator
#[derive(Parser, Debug)]
#[command(name = "brawlsim")]
#[command(about = "Two-fighter arena brawler simulator")]
#[command(version)]
pub struct Args {
    /// Load the match from a JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Left fighter (ignored with --config)
    #[arg(long, default_value = "Bruiser")]
    pub left: String,

    /// Right fighter (ignored with --config)
    #[arg(long, default_value = "Rocketeer")]
    pub right: String,

    /// Left AI difficulty, or "none" for an idle fighter (ignored with --config)
    #[arg(long, default_value = "medium", value_name = "DIFFICULTY")]
    pub left_ai: String,

    /// Right AI difficulty, or "none" for an idle fighter (ignored with --config)
    #[arg(long, default_value = "medium", value_name = "DIFFICULTY")]
    pub right_ai: String,

    /// Random seed for a reproducible match
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rounds needed to take the match
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Output path for the match log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum simulated match duration in seconds
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Log filter passed to the logger (e.g. "info" or "brawlsim=debug")
    #[arg(long, default_value = "info")]
    pub log_filter: String,
}

fn ai_flag(value: &str) -> Option<&str> {
    if value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value)
    }
}

impl Args {
    /// Build the headless config these arguments describe.
    pub fn to_headless_config(&self) -> Result<HeadlessMatchConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => HeadlessMatchConfig::load_from_file(path)?,
            None => HeadlessMatchConfig {
                left: SideConfig::new(self.left.as_str(), ai_flag(&self.left_ai)),
                right: SideConfig::new(self.right.as_str(), ai_flag(&self.right_ai)),
                ..Default::default()
            },
        };

        if let Some(seed) = self.seed {
            config.random_seed = Some(seed);
        }
        if let Some(rounds) = self.rounds {
            config.rounds_to_win = rounds;
        }
        if let Some(output) = &self.output {
            config.output_path = Some(output.to_string_lossy().into_owned());
        }
        if let Some(max_duration) = self.max_duration {
            config.max_duration_secs = max_duration;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}
