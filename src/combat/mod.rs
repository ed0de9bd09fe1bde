//! Combat system
//!
//! Shared combat plumbing used by the fight simulation:
//! - Hit geometry and block mitigation
//! - Combat events
//! - Combat logging

use bevy::prelude::*;

pub mod events;
pub mod hit_math;
pub mod log;
pub mod systems;

use events::*;

/// Plugin for the combat system
///
/// Registers events and the combat log. The systems that produce and consume
/// them are scheduled by `states::play_match::systems`.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<FighterCommandEvent>()
            .add_event::<HitLandedEvent>()
            .add_event::<AttackWhiffedEvent>()
            .add_event::<ProjectileImpactEvent>()
            .add_event::<RoundStartedEvent>()
            .add_event::<RoundEndedEvent>()
            .add_event::<MatchEndedEvent>()
            // Resources
            .init_resource::<log::CombatLog>();
    }
}
