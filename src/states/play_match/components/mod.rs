//! Component Definitions for Play Match
//!
//! This module contains the ECS components, resources, and data structures
//! used during the fight simulation.
//!
//! ## Module Structure
//!
//! - `fighter`: the `Fighter` component and its state machine
//! - `scheduled`: the per-fighter timer queue for delayed effects
//!
//! Shared resources (`GameRng`, `ArenaBounds`, `FighterPair`) live here.

pub mod fighter;
pub mod scheduled;

pub use fighter::*;
pub use scheduled::TimerQueue;

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;

use super::constants::{ARENA_HEIGHT, ARENA_WIDTH, FLOOR_MARGIN, SPAWN_HEIGHT_OFFSET};
use super::move_config::{ComboConfig, MoveKind};
use crate::states::match_config::Side;

// ============================================================================
// Resources
// ============================================================================

/// Seeded random number generator for deterministic fight simulation.
///
/// When a seed is provided (e.g., via headless config), the same seed will
/// always produce the same fight. Without a seed, uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// AI code is generic over `Rng`, so the resource can be handed to it directly.
impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Size of the playing field in pixels
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl ArenaBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The y coordinate fighters stand on
    pub fn floor_y(&self) -> f32 {
        self.height - FLOOR_MARGIN
    }

    /// Round-start position for the given side (top-left of the body)
    pub fn spawn_position(&self, side: Side) -> (f32, f32) {
        (
            self.width * side.spawn_fraction(),
            self.height - SPAWN_HEIGHT_OFFSET,
        )
    }
}

/// The two fighter entities of the bout, injected into every fight system
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FighterPair {
    pub left: Entity,
    pub right: Entity,
}

impl FighterPair {
    pub fn entity(&self, side: Side) -> Entity {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn side_of(&self, entity: Entity) -> Option<Side> {
        if entity == self.left {
            Some(Side::Left)
        } else if entity == self.right {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, entity: Entity) -> Option<Entity> {
        self.side_of(entity).map(|side| match side {
            Side::Left => self.right,
            Side::Right => self.left,
        })
    }
}

/// Marks which side a fighter entity plays on
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FighterSide(pub Side);

// ============================================================================
// Fighter data
// ============================================================================

/// Presentation hint for renderers. Never read by game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AnimationTag {
    #[default]
    Idle,
    Walk,
    Jump,
    Punch,
    Kick,
    Special,
    Ultimate,
    Block,
    Hurt,
    Win,
    Defeat,
}

/// A melee swing waiting for the orchestrator to resolve it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingAttack {
    pub move_kind: MoveKind,
    pub target: Entity,
    /// Time on the attacker's clock when the swing started
    pub issued_at_ms: f32,
}

/// Result of a resolved melee hit
#[derive(Debug, Clone, PartialEq)]
pub struct HitOutcome {
    pub was_blocked: bool,
    /// Damage after block reduction
    pub damage: f32,
    pub target_health: f32,
    /// Combo completed by this hit, if any
    pub combo: Option<ComboConfig>,
}

/// Delayed effects a fighter schedules on itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FighterEffect {
    /// Attack recovery is over; only clears the attack with this serial
    EndAttack { serial: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = GameRng::from_seed(42);
        let mut b = GameRng::from_seed(42);
        for _ in 0..10 {
            assert_eq!(a.random_f32(), b.random_f32());
        }
        assert_eq!(a.seed, Some(42));
    }

    #[test]
    fn test_fighter_pair_lookup() {
        let left = Entity::from_raw(1);
        let right = Entity::from_raw(2);
        let pair = FighterPair { left, right };

        assert_eq!(pair.opponent_of(left), Some(right));
        assert_eq!(pair.opponent_of(right), Some(left));
        assert_eq!(pair.side_of(right), Some(Side::Right));
        assert_eq!(pair.opponent_of(Entity::from_raw(3)), None);
    }

    #[test]
    fn test_arena_spawn_positions() {
        let arena = ArenaBounds::new(1000.0, 700.0);
        assert_eq!(arena.spawn_position(Side::Left), (250.0, 450.0));
        assert_eq!(arena.spawn_position(Side::Right), (750.0, 450.0));
        assert_eq!(arena.floor_y(), 600.0);
    }
}
