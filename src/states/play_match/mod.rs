//! Play Match - Two-Fighter Bout Simulation
//!
//! This module handles the live fight between two fighters.
//!
//! ## Combat System
//! - **Movement**: walking, jumping (double jump for some fighters), dashing, blocking
//! - **Attacks**: punch, kick, special and ultimate moves with per-move cooldowns
//! - **Hit Resolution**: melee swings resolve 100ms after they are thrown
//! - **Projectiles**: fly at a fixed speed and hit on contact
//! - **Combos**: recent moves are matched against each fighter's combo list
//! - **AI**: adaptive controllers with difficulty tiers drive non-player fighters
//!
//! ## Flow
//! 1. `setup_bout`: Spawns both fighters from `MatchConfig` and the `FighterRoster`
//! 2. Systems run each frame in `FightPhase` order (see [`systems`])
//! 3. Rounds end on a knockout or when the clock runs out; the match ends when
//!    a side reaches `rounds_to_win` or the round cap is hit

// Submodules
pub mod combat_ai;
pub mod combat_core;
pub mod components;
pub mod constants;
pub mod fighter_ai;
pub mod match_flow;
pub mod move_config;
pub mod projectiles;
pub mod systems;
pub mod utils;

// Re-exports
pub use components::*;
pub use fighter_ai::{AiTuning, FighterAi, Strategy};
pub use match_flow::{BoutPhase, BoutState, FighterStats, RoundRecord};
pub use move_config::{
    load_fighter_roster, FighterDefinition, FighterRoster, MoveConfig, MoveKind, RosterError,
};
pub use projectiles::{Projectile, ProjectileImpact};

use bevy::prelude::*;

use crate::combat::CombatPlugin;

/// Plugin wiring the fight simulation into an app.
///
/// Expects `MatchConfig` and `FighterRoster` to be inserted by the caller.
/// `ArenaBounds` and `GameRng` fall back to defaults when absent.
pub struct FightPlugin;

impl Plugin for FightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaBounds>()
            .init_resource::<GameRng>()
            .add_plugins(CombatPlugin);
        systems::configure_fight_system_ordering(app);
        systems::add_core_fight_systems(app, || true);
    }
}
