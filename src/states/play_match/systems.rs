//! Fight Systems API
//!
//! This module provides a stable API for the fight simulation systems.
//! Front ends (the headless runner, tests, a future renderer) should import
//! from here rather than directly from internal modules.
//!
//! ## System Phases
//!
//! Fight systems run in four ordered phases each frame:
//!
//! 1. **Clock** - Celebration pause between rounds, round clock
//! 2. **Simulation** - External commands, fighter physics and projectiles, AI decisions
//! 3. **Resolution** - Delayed melee hits, match stats, round end checks
//! 4. **Logging** - Combat log recording
//!
//! ## Usage
//!
//! ```ignore
//! use brawlsim::states::play_match::systems;
//!
//! systems::configure_fight_system_ordering(&mut app);
//! systems::add_core_fight_systems(&mut app, || true);
//! ```

use bevy::prelude::*;

// === Phase 1: Clock ===
pub use super::match_flow::advance_between_rounds;
pub use super::match_flow::tick_round_clock;

// === Phase 2: Simulation ===
pub use super::combat_core::apply_fighter_commands;
pub use super::combat_core::update_fighters;
pub use super::combat_ai::drive_fighter_ai;

// === Phase 3: Resolution ===
pub use super::combat_core::resolve_pending_attacks;
pub use super::match_flow::check_round_end;
pub use super::match_flow::track_match_stats;

// === Phase 4: Logging ===
pub use crate::combat::systems::record_combat_log;

// === Setup and run conditions ===
pub use super::match_flow::{fight_in_progress, setup_bout};

// === Components and Resources ===
pub use super::components::{ArenaBounds, Fighter, FighterPair, FighterSide, GameRng};
pub use super::fighter_ai::FighterAi;
pub use super::match_flow::{BoutPhase, BoutState};
pub use super::move_config::FighterRoster;

/// System set labels for fight system ordering.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FightPhase {
    /// Phase 1: Between-round pause and round clock
    Clock,
    /// Phase 2: Commands, physics, projectiles, AI
    Simulation,
    /// Phase 3: Melee resolution, stats, round end
    Resolution,
    /// Phase 4: Combat log
    Logging,
}

/// Configures the ordering between fight system phases.
///
/// Call this once during app setup before adding fight systems.
pub fn configure_fight_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            FightPhase::Clock,
            FightPhase::Simulation,
            FightPhase::Resolution,
            FightPhase::Logging,
        )
            .chain(),
    );
}

/// Adds the fight simulation systems to the app.
///
/// `setup_bout` runs at startup and needs `MatchConfig`, `FighterRoster`
/// and `ArenaBounds` to be present. Commands, AI and melee resolution only
/// run while a round is live; physics keeps running so victory and defeat
/// animations play out.
///
/// # Arguments
/// * `app` - The Bevy App to add systems to
/// * `run_condition` - Extra gate for every system (`|| true` for headless)
pub fn add_core_fight_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_systems(Startup, setup_bout);

    // Phase 1: Clock
    app.add_systems(
        Update,
        (advance_between_rounds, tick_round_clock)
            .chain()
            .in_set(FightPhase::Clock)
            .run_if(run_condition.clone()),
    );

    // Phase 2: Simulation
    app.add_systems(
        Update,
        (
            apply_fighter_commands.run_if(fight_in_progress),
            update_fighters,
            drive_fighter_ai.run_if(fight_in_progress),
        )
            .chain()
            .in_set(FightPhase::Simulation)
            .run_if(run_condition.clone()),
    );

    // Phase 3: Resolution
    app.add_systems(
        Update,
        (
            resolve_pending_attacks.run_if(fight_in_progress),
            track_match_stats,
            check_round_end,
        )
            .chain()
            .in_set(FightPhase::Resolution)
            .run_if(run_condition.clone()),
    );

    // Phase 4: Logging
    app.add_systems(
        Update,
        record_combat_log
            .in_set(FightPhase::Logging)
            .run_if(run_condition),
    );
}
