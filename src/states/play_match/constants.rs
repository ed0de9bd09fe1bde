//! Fight Constants
//!
//! Centralized location for the fixed numbers of the fight simulation.
//! Time values are milliseconds unless the name says otherwise; velocities
//! are pixels per tick.

// ============================================================================
// Arena
// ============================================================================

/// Default arena width in pixels.
pub const ARENA_WIDTH: f32 = 1280.0;

/// Default arena height in pixels.
pub const ARENA_HEIGHT: f32 = 720.0;

/// Height of the ground strip at the bottom of the arena.
/// Fighters stand with their feet on `arena height - FLOOR_MARGIN`.
pub const FLOOR_MARGIN: f32 = 100.0;

/// Fighters spawn this far above the bottom edge and drop to the floor.
pub const SPAWN_HEIGHT_OFFSET: f32 = 250.0;

// ============================================================================
// Physics
// ============================================================================

/// Gravity added to vertical velocity each tick, scaled by fighter weight.
pub const GRAVITY: f32 = 0.8;

/// Horizontal velocity multiplier applied each grounded, idle tick.
pub const GROUND_FRICTION: f32 = 0.8;

/// Walking speed multiplier while airborne.
pub const AIR_CONTROL: f32 = 0.8;

/// Second jump impulse as a fraction of jump power.
pub const DOUBLE_JUMP_FACTOR: f32 = 0.8;

/// Upward velocity applied when taking a hit.
pub const HIT_POP_VELOCITY: f32 = -5.0;

/// Gravity used by the defeat fall animation.
pub const DEFEAT_GRAVITY: f32 = 0.5;

// ============================================================================
// Combat Timing
// ============================================================================

/// Recovery after an attack before the fighter may act again.
pub const ATTACK_RECOVERY_MS: f32 = 300.0;

/// Window for chaining the next move into the combo buffer.
pub const COMBO_WINDOW_MS: f32 = 500.0;

/// Hit-stun duration.
pub const HITSTUN_MS: f32 = 300.0;

/// Invulnerability after taking a hit.
pub const INVULNERABILITY_MS: f32 = 500.0;

/// Cooldown between dashes.
pub const DASH_COOLDOWN_MS: f32 = 500.0;

/// Melee attacks land this long after they are thrown.
pub const HIT_RESOLUTION_DELAY_MS: f32 = 100.0;

/// Melee attacks older than this are discarded unresolved.
pub const PENDING_ATTACK_EXPIRY_MS: f32 = 500.0;

/// Length of the defeat fall animation.
pub const DEFEAT_FALL_MS: f32 = 2000.0;

// ============================================================================
// Projectiles
// ============================================================================

pub const PROJECTILE_SPEED: f32 = 10.0;
pub const PROJECTILE_WIDTH: f32 = 30.0;
pub const PROJECTILE_HEIGHT: f32 = 20.0;

/// Projectiles left of this x are discarded.
pub const PROJECTILE_MIN_X: f32 = -50.0;

/// Projectiles right of this x are discarded.
pub const PROJECTILE_MAX_X: f32 = 2000.0;

// ============================================================================
// Match Flow
// ============================================================================

/// Round clock in seconds.
pub const ROUND_TIME_SECS: f32 = 99.0;

/// Pause after a knockout before the next round (or the match end).
pub const CELEBRATION_MS: f32 = 1500.0;

/// Simulation tick used by the headless runner (60 Hz).
pub const TICK_SECS: f64 = 1.0 / 60.0;
