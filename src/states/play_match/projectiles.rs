//! Projectile lifecycle
//!
//! Projectiles belong to the fighter that threw them and are advanced during
//! that fighter's update. A projectile flies at a fixed speed and disappears
//! when it leaves the field or touches the opponent.
//!
//! Impacts go straight through the victim's `take_damage`. The thrower earns
//! no special energy and no combo streak from them; only melee hits resolved
//! through `deal_damage` feed those meters.

use smallvec::SmallVec;

use super::constants::{
    PROJECTILE_HEIGHT, PROJECTILE_MAX_X, PROJECTILE_MIN_X, PROJECTILE_SPEED, PROJECTILE_WIDTH,
};
use super::components::Fighter;
use super::move_config::{MoveConfig, MoveKind};
use crate::combat::hit_math::{aabb_overlap, BodyBox};

/// A projectile in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    /// Horizontal velocity in pixels per tick
    pub vx: f32,
    pub width: f32,
    pub height: f32,
    pub damage: f32,
    pub knockback: f32,
    pub move_kind: MoveKind,
    pub effect: Option<String>,
    pub active: bool,
}

impl Projectile {
    /// Spawn a projectile at `(x, y)` carrying the move's payload.
    pub fn new(x: f32, y: f32, facing_right: bool, move_kind: MoveKind, config: &MoveConfig) -> Self {
        Self {
            x,
            y,
            vx: if facing_right { PROJECTILE_SPEED } else { -PROJECTILE_SPEED },
            width: PROJECTILE_WIDTH,
            height: PROJECTILE_HEIGHT,
            damage: config.damage,
            knockback: config.knockback,
            move_kind,
            effect: config.effect.clone(),
            active: true,
        }
    }

    /// Move one tick along the flight path
    pub fn advance(&mut self) {
        self.x += self.vx;
    }

    pub fn is_off_field(&self) -> bool {
        self.x < PROJECTILE_MIN_X || self.x > PROJECTILE_MAX_X
    }

    pub fn hitbox(&self) -> BodyBox {
        BodyBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn moving_right(&self) -> bool {
        self.vx > 0.0
    }
}

/// What happened when a projectile reached the opponent
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileImpact {
    pub move_kind: MoveKind,
    pub damage: f32,
    /// The opponent was blocking and took nothing
    pub blocked: bool,
    /// Damage was actually applied (false while blocking or invulnerable)
    pub landed: bool,
    pub target_health: f32,
}

/// Advance every projectile one tick, resolving hits against `opponent`.
///
/// Off-field projectiles are discarded before any overlap test. A projectile
/// that overlaps the opponent is consumed whether or not the opponent blocked.
pub fn advance_projectiles(
    projectiles: &mut Vec<Projectile>,
    opponent: &mut Fighter,
) -> SmallVec<[ProjectileImpact; 2]> {
    let mut impacts = SmallVec::new();
    let target = opponent.body();

    projectiles.retain_mut(|projectile| {
        projectile.advance();

        if projectile.is_off_field() {
            return false;
        }

        if !projectile.active || !aabb_overlap(&projectile.hitbox(), &target) {
            return true;
        }

        let blocked = opponent.is_blocking();
        let landed = !blocked
            && opponent.take_damage(
                projectile.damage,
                projectile.knockback,
                projectile.moving_right(),
            );

        impacts.push(ProjectileImpact {
            move_kind: projectile.move_kind,
            damage: if landed { projectile.damage } else { 0.0 },
            blocked,
            landed,
            target_health: opponent.health(),
        });

        projectile.active = false;
        false
    });

    impacts
}
