//! Headless mode for automated matches
//!
//! This module runs bouts without any graphical output, suitable for
//! automated testing, balance runs and AI tuning.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless match from a JSON config
//! cargo run --release -- --config match_config.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "left": { "fighter": "Bruiser", "ai": "hard" },
//!   "right": { "fighter": "Rocketeer", "ai": "medium" },
//!   "rounds_to_win": 2,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{ConfigError, HeadlessMatchConfig, SideConfig};
pub use runner::{
    build_headless_app, run_headless_match, FighterResult, HeadlessError, HeadlessMatchState,
    MatchResult,
};
