//! brawlsim - Two-Fighter Arena Brawler
//!
//! Simulation core for a one-on-one fighting game: fighter physics and moves,
//! combos, projectiles, an adaptive AI opponent and a round-based bout.
//!
//! This library exposes the core game modules for testing and reuse.

pub mod cli;
pub mod combat;
pub mod headless;
pub mod states;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::HeadlessMatchConfig;
pub use states::match_config::{Difficulty, FighterKind, MatchConfig, Side};
pub use states::play_match::{Fighter, FighterAi, FighterRoster, MoveKind};
