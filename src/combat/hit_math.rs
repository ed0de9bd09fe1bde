//! Hit geometry and damage mitigation
//!
//! Pure functions shared by melee resolution and projectile impacts.
//! Coordinates are screen-style: x grows to the right, y grows downward,
//! and every box is anchored at its top-left corner.

/// Axis-aligned box used for bodies and projectiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BodyBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Horizontal center of the box
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// True when the vertical extents touch or overlap.
    ///
    /// Touching edges count as overlap, matching the melee alignment check.
    pub fn overlaps_vertically(&self, other: &BodyBox) -> bool {
        !(self.bottom() < other.y || other.bottom() < self.y)
    }
}

/// Strict AABB intersection (touching edges do not count).
pub fn aabb_overlap(a: &BodyBox, b: &BodyBox) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Whether a melee swing from `attacker` reaches `defender`.
///
/// The defender's center must lie strictly on the side the attacker faces,
/// the center distance must be within `range`, and the bodies must be
/// vertically aligned. Invulnerability is checked by the caller.
pub fn melee_connects(attacker: &BodyBox, facing_right: bool, defender: &BodyBox, range: f32) -> bool {
    let attacker_center = attacker.center_x();
    let defender_center = defender.center_x();
    let distance = (attacker_center - defender_center).abs();

    let in_front = if facing_right {
        defender_center > attacker_center
    } else {
        defender_center < attacker_center
    };

    distance <= range && in_front && attacker.overlaps_vertically(defender)
}

/// Damage left over after a block with the given reduction fraction.
pub fn blocked_damage(damage: f32, damage_reduction: f32) -> f32 {
    damage * (1.0 - damage_reduction.clamp(0.0, 1.0))
}

/// Knockback velocity for a victim hit by an attacker facing the given way.
///
/// Victims are pushed away from the attacker, which is always along the
/// attacker's facing direction.
pub fn knockback_velocity(knockback: f32, attacker_facing_right: bool) -> f32 {
    if attacker_facing_right {
        knockback
    } else {
        -knockback
    }
}
