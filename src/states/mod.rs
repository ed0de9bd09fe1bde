//! Bout state
//!
//! Match setup (`match_config`) and the live fight simulation (`play_match`).

pub mod match_config;
pub mod play_match;

pub use match_config::MatchConfig;
