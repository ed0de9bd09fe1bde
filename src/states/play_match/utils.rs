//! Shared Utility Functions
//!
//! Helpers used by more than one fight module.

use crate::combat::log::FighterId;
use crate::states::match_config::{FighterKind, Side};

/// Helper to generate a consistent fighter ID for the combat log.
///
/// Format: "{side} {fighter}" e.g., "Left Bruiser"
pub fn fighter_id(side: Side, kind: FighterKind) -> FighterId {
    format!("{} {}", side.name(), kind.name())
}

/// Horizontal gap between two fighters' left edges, as the AI measures it
pub fn horizontal_distance(a_x: f32, b_x: f32) -> f32 {
    (a_x - b_x).abs()
}
