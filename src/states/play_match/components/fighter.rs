//! The `Fighter` component
//!
//! One fighter per side of the arena. All movement and combat commands go
//! through methods here; disallowed commands are refused silently (or report
//! `false`) instead of erroring. Static stats come from the shared
//! [`FighterDefinition`]; everything on this struct is per-round state.
//!
//! ## Tick order
//!
//! [`Fighter::update`] advances the fighter's clock and fires due scheduled
//! effects, then runs either a terminal animation (victory/defeat) or the
//! regular physics step: gravity, integration, floor and wall clamps,
//! friction, timer decay, projectiles, facing.

use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use super::scheduled::TimerQueue;
use super::{AnimationTag, ArenaBounds, FighterEffect, HitOutcome, PendingAttack};
use crate::combat::hit_math::{blocked_damage, knockback_velocity, melee_connects, BodyBox};
use crate::states::match_config::FighterKind;
use crate::states::play_match::constants::*;
use crate::states::play_match::move_config::{FighterDefinition, MoveConfig, MoveKind};
use crate::states::play_match::projectiles::{advance_projectiles, Projectile, ProjectileImpact};

/// Longest move history kept for combo matching
const COMBO_BUFFER_LEN: usize = 8;

/// Per-fighter combat and physics state
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Fighter {
    pub kind: FighterKind,
    pub is_player: bool,
    definition: Arc<FighterDefinition>,

    // Kinematics (top-left of the body box, y grows downward)
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub grounded: bool,
    pub facing_right: bool,

    health: f32,
    special_energy: f32,

    is_attacking: bool,
    is_blocking: bool,
    is_damaged: bool,
    is_invulnerable: bool,
    damage_timer_ms: f32,
    invulnerable_timer_ms: f32,

    cooldowns: HashMap<MoveKind, f32>,
    dash_cooldown_ms: f32,
    double_jump_used: bool,

    combo_buffer: SmallVec<[MoveKind; COMBO_BUFFER_LEN]>,
    combo_timer_ms: f32,
    current_combo: u32,
    max_combo: u32,
    last_move: Option<MoveKind>,

    pub animation: AnimationTag,
    projectiles: Vec<Projectile>,
    pending_attack: Option<PendingAttack>,
    scheduled: TimerQueue<FighterEffect>,
    attack_serial: u32,

    is_victorious: bool,
    is_defeated: bool,
    victory_timer_ms: f32,
    defeat_timer_ms: f32,
}

impl Fighter {
    /// A fresh fighter at full health with no energy, standing at `(x, y)`.
    pub fn new(
        kind: FighterKind,
        definition: Arc<FighterDefinition>,
        x: f32,
        y: f32,
        is_player: bool,
    ) -> Self {
        let health = definition.max_health;
        Self {
            kind,
            is_player,
            definition,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            grounded: false,
            facing_right: true,
            health,
            special_energy: 0.0,
            is_attacking: false,
            is_blocking: false,
            is_damaged: false,
            is_invulnerable: false,
            damage_timer_ms: 0.0,
            invulnerable_timer_ms: 0.0,
            cooldowns: HashMap::new(),
            dash_cooldown_ms: 0.0,
            double_jump_used: false,
            combo_buffer: SmallVec::new(),
            combo_timer_ms: 0.0,
            current_combo: 0,
            max_combo: 0,
            last_move: None,
            animation: AnimationTag::Idle,
            projectiles: Vec::new(),
            pending_attack: None,
            scheduled: TimerQueue::new(),
            attack_serial: 0,
            is_victorious: false,
            is_defeated: false,
            victory_timer_ms: 0.0,
            defeat_timer_ms: 0.0,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn definition(&self) -> &FighterDefinition {
        &self.definition
    }

    pub fn shared_definition(&self) -> Arc<FighterDefinition> {
        Arc::clone(&self.definition)
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn width(&self) -> f32 {
        self.definition.width
    }

    pub fn height(&self) -> f32 {
        self.definition.height
    }

    pub fn body(&self) -> BodyBox {
        BodyBox::new(self.x, self.y, self.definition.width, self.definition.height)
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.definition.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn special_energy(&self) -> f32 {
        self.special_energy
    }

    pub fn max_special_energy(&self) -> f32 {
        self.definition.max_special_energy
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    pub fn is_blocking(&self) -> bool {
        self.is_blocking
    }

    pub fn is_damaged(&self) -> bool {
        self.is_damaged
    }

    pub fn is_invulnerable(&self) -> bool {
        self.is_invulnerable
    }

    pub fn is_victorious(&self) -> bool {
        self.is_victorious
    }

    pub fn is_defeated(&self) -> bool {
        self.is_defeated
    }

    /// Remaining cooldown for a move (0 when ready)
    pub fn cooldown(&self, kind: MoveKind) -> f32 {
        self.cooldowns.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn dash_cooldown(&self) -> f32 {
        self.dash_cooldown_ms
    }

    pub fn can_dash(&self) -> bool {
        self.definition.abilities.dash_speed.is_some()
    }

    pub fn combo_buffer(&self) -> &[MoveKind] {
        &self.combo_buffer
    }

    /// Unblocked hits landed in the current streak
    pub fn current_combo(&self) -> u32 {
        self.current_combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn last_move(&self) -> Option<MoveKind> {
        self.last_move
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn pending_attack(&self) -> Option<&PendingAttack> {
        self.pending_attack.as_ref()
    }

    /// Remove and return the pending melee swing
    pub fn take_pending_attack(&mut self) -> Option<PendingAttack> {
        self.pending_attack.take()
    }

    /// Milliseconds this fighter has been simulated since spawn or reset
    pub fn clock_ms(&self) -> f32 {
        self.scheduled.now_ms()
    }

    /// Number of delayed effects still waiting to fire
    pub fn scheduled_effects(&self) -> usize {
        self.scheduled.len()
    }

    /// Set health, clamped to `[0, max_health]`
    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.definition.max_health);
    }

    /// Add (or remove, if negative) special energy, clamped to the meter
    pub fn add_special_energy(&mut self, amount: f32) {
        self.special_energy =
            (self.special_energy + amount).clamp(0.0, self.definition.max_special_energy);
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Walk in `direction` (-1 left, +1 right). Refused while damaged or attacking.
    pub fn walk(&mut self, direction: f32) {
        if self.is_damaged || self.is_attacking {
            return;
        }

        let speed = if self.grounded {
            self.definition.speed
        } else {
            self.definition.speed * AIR_CONTROL
        };
        self.vx = direction * speed;

        if self.grounded {
            self.animation = AnimationTag::Walk;
        }
    }

    /// Jump, or double jump when airborne and the fighter has one left.
    pub fn jump(&mut self) -> bool {
        if self.is_damaged {
            return false;
        }

        if self.grounded {
            self.vy = -self.definition.jump_power;
            self.grounded = false;
            self.animation = AnimationTag::Jump;
            true
        } else if self.definition.abilities.double_jump && !self.double_jump_used {
            self.vy = -self.definition.jump_power * DOUBLE_JUMP_FACTOR;
            self.double_jump_used = true;
            true
        } else {
            false
        }
    }

    /// Raise or lower the guard. Refused while damaged or attacking.
    pub fn block(&mut self, blocking: bool) {
        if self.is_damaged || self.is_attacking {
            return;
        }

        self.is_blocking = blocking;
        if blocking {
            self.animation = AnimationTag::Block;
            self.vx = 0.0;
        } else {
            self.animation = AnimationTag::Idle;
        }
    }

    /// Burst of horizontal speed for fighters with a dash ability.
    pub fn dash(&mut self, direction: f32) -> bool {
        let Some(dash_speed) = self.definition.abilities.dash_speed else {
            return false;
        };
        if self.dash_cooldown_ms > 0.0 || self.is_damaged || self.is_attacking {
            return false;
        }

        self.vx = direction * dash_speed;
        self.dash_cooldown_ms = DASH_COOLDOWN_MS;
        true
    }

    /// Throw a move at `target`.
    ///
    /// Refused while damaged, mid-attack, on cooldown, lacking energy, or when
    /// the fighter has no such move. Melee moves leave a [`PendingAttack`] for
    /// the orchestrator; projectile moves spawn a projectile.
    pub fn attack(&mut self, kind: MoveKind, target: Entity) -> bool {
        if self.is_damaged || self.is_attacking || self.cooldown(kind) > 0.0 {
            return false;
        }

        let definition = Arc::clone(&self.definition);
        let Some(config) = definition.move_config(kind) else {
            return false;
        };
        if config.is_energy_gated() && self.special_energy < config.special_cost {
            return false;
        }

        self.is_attacking = true;
        self.is_blocking = false;
        self.animation = kind.animation();
        self.cooldowns.insert(kind, config.cooldown_ms);
        if config.is_energy_gated() {
            self.add_special_energy(-config.special_cost);
        }

        if self.combo_buffer.len() == COMBO_BUFFER_LEN {
            self.combo_buffer.remove(0);
        }
        self.combo_buffer.push(kind);
        self.combo_timer_ms = COMBO_WINDOW_MS;
        self.last_move = Some(kind);

        self.attack_serial = self.attack_serial.wrapping_add(1);
        self.scheduled.schedule(
            ATTACK_RECOVERY_MS,
            FighterEffect::EndAttack {
                serial: self.attack_serial,
            },
        );

        if config.projectile {
            let spawn_x = if self.facing_right {
                self.x + self.definition.width
            } else {
                self.x
            };
            let spawn_y = self.y + self.definition.height / 2.0;
            self.projectiles
                .push(Projectile::new(spawn_x, spawn_y, self.facing_right, kind, config));
        } else {
            self.pending_attack = Some(PendingAttack {
                move_kind: kind,
                target,
                issued_at_ms: self.clock_ms(),
            });
        }

        true
    }

    /// [`Fighter::attack`] by move label; unknown labels are refused.
    pub fn attack_named(&mut self, move_name: &str, target: Entity) -> bool {
        match move_name.parse::<MoveKind>() {
            Ok(kind) => self.attack(kind, target),
            Err(_) => false,
        }
    }

    // ------------------------------------------------------------------------
    // Hit resolution
    // ------------------------------------------------------------------------

    /// Whether `config` thrown now would reach `opponent`. No side effects.
    pub fn check_hit(&self, opponent: &Fighter, config: &MoveConfig) -> bool {
        if opponent.is_invulnerable {
            return false;
        }
        melee_connects(&self.body(), self.facing_right, &opponent.body(), config.range)
    }

    /// Apply a connected melee hit to `opponent` and update this fighter's
    /// energy, streak and combo bonus.
    pub fn deal_damage(&mut self, opponent: &mut Fighter, config: &MoveConfig) -> HitOutcome {
        let was_blocked = opponent.is_blocking;
        let mut damage = config.damage;

        if was_blocked {
            let block = &opponent.definition.block;
            damage = blocked_damage(damage, block.damage_reduction);
            let gain = block.special_gain;
            opponent.add_special_energy(gain);
        }

        opponent.take_damage(damage, config.knockback, self.facing_right);
        self.add_special_energy(config.special_gain);

        if was_blocked {
            self.current_combo = 0;
        } else {
            self.current_combo += 1;
            self.max_combo = self.max_combo.max(self.current_combo);
        }

        let combo = self
            .definition
            .completed_combo(&self.combo_buffer)
            .cloned();
        if let Some(combo) = &combo {
            self.add_special_energy(combo.special_gain);
        }

        HitOutcome {
            was_blocked,
            damage,
            target_health: opponent.health,
            combo,
        }
    }

    /// Receive a hit. Returns false (and changes nothing) while invulnerable
    /// or once the round has been decided for this fighter.
    pub fn take_damage(&mut self, damage: f32, knockback: f32, attacker_facing_right: bool) -> bool {
        if self.is_invulnerable || self.is_victorious || self.is_defeated {
            return false;
        }

        self.set_health(self.health - damage);

        self.is_damaged = true;
        self.is_attacking = false;
        self.is_blocking = false;
        self.animation = AnimationTag::Hurt;
        self.damage_timer_ms = 0.0;

        self.vx = knockback_velocity(knockback, attacker_facing_right);
        self.vy = HIT_POP_VELOCITY;

        self.current_combo = 0;

        self.is_invulnerable = true;
        self.invulnerable_timer_ms = 0.0;
        true
    }

    // ------------------------------------------------------------------------
    // Per-tick update
    // ------------------------------------------------------------------------

    /// Advance the fighter by `dt_ms`, returning projectile impacts on `opponent`.
    pub fn update(
        &mut self,
        dt_ms: f32,
        opponent: &mut Fighter,
        arena: &ArenaBounds,
    ) -> SmallVec<[ProjectileImpact; 2]> {
        for effect in self.scheduled.advance(dt_ms) {
            self.apply_effect(effect);
        }

        if self.is_victorious {
            self.update_victory(dt_ms);
            return SmallVec::new();
        }
        if self.is_defeated {
            self.update_defeat(dt_ms, arena);
            return SmallVec::new();
        }

        self.vy += GRAVITY * self.definition.weight;

        if self.dash_cooldown_ms > 0.0 {
            self.dash_cooldown_ms = (self.dash_cooldown_ms - dt_ms).max(0.0);
        }

        if !self.is_damaged && !self.is_attacking {
            self.x += self.vx;
        }
        self.y += self.vy;

        let floor = arena.floor_y();
        if self.y + self.definition.height >= floor {
            self.y = floor - self.definition.height;
            self.vy = 0.0;
            if !self.grounded && self.animation == AnimationTag::Jump {
                self.animation = AnimationTag::Idle;
            }
            self.grounded = true;
            self.double_jump_used = false;
        }

        self.x = self.x.max(0.0).min(arena.width - self.definition.width);

        if self.grounded && !self.is_attacking && !self.is_damaged {
            self.vx *= GROUND_FRICTION;
            if self.animation == AnimationTag::Walk && self.vx.abs() < 0.1 {
                self.animation = AnimationTag::Idle;
            }
        }

        for remaining in self.cooldowns.values_mut() {
            if *remaining > 0.0 {
                *remaining = (*remaining - dt_ms).max(0.0);
            }
        }

        if self.combo_timer_ms > 0.0 {
            self.combo_timer_ms -= dt_ms;
            if self.combo_timer_ms <= 0.0 {
                self.combo_timer_ms = 0.0;
                self.combo_buffer.clear();
                self.current_combo = 0;
            }
        }

        if self.is_damaged {
            self.damage_timer_ms += dt_ms;
            if self.damage_timer_ms > HITSTUN_MS {
                self.is_damaged = false;
                self.damage_timer_ms = 0.0;
                self.animation = AnimationTag::Idle;
            }
        }

        if self.is_invulnerable {
            self.invulnerable_timer_ms += dt_ms;
            if self.invulnerable_timer_ms > INVULNERABILITY_MS {
                self.is_invulnerable = false;
                self.invulnerable_timer_ms = 0.0;
            }
        }

        let impacts = advance_projectiles(&mut self.projectiles, opponent);

        self.facing_right = self.x < opponent.x;

        impacts
    }

    fn apply_effect(&mut self, effect: FighterEffect) {
        match effect {
            FighterEffect::EndAttack { serial } => {
                if serial == self.attack_serial && self.is_attacking {
                    self.is_attacking = false;
                    if !self.is_damaged && !self.is_victorious && !self.is_defeated {
                        self.animation = AnimationTag::Idle;
                    }
                }
            }
        }
    }

    fn update_victory(&mut self, dt_ms: f32) {
        self.victory_timer_ms += dt_ms;
        if self.victory_timer_ms % 1000.0 < 500.0 {
            self.y -= (self.victory_timer_ms * 0.01).sin() * 2.0;
        }
    }

    fn update_defeat(&mut self, dt_ms: f32, arena: &ArenaBounds) {
        self.defeat_timer_ms += dt_ms;
        if self.defeat_timer_ms < DEFEAT_FALL_MS {
            self.vy += DEFEAT_GRAVITY;
            self.y += self.vy;
            let floor = arena.floor_y();
            if self.y + self.definition.height >= floor {
                self.y = floor - self.definition.height;
                self.vy = 0.0;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Round lifecycle
    // ------------------------------------------------------------------------

    /// Restore the exact construction state at `(x, y)`.
    ///
    /// Pending swings, projectiles and scheduled effects are discarded.
    pub fn reset(&mut self, x: f32, y: f32) {
        *self = Fighter::new(self.kind, Arc::clone(&self.definition), x, y, self.is_player);
    }

    /// Drop every projectile still in flight
    pub fn clear_projectiles(&mut self) {
        self.projectiles.clear();
    }

    pub fn play_victory_animation(&mut self) {
        self.enter_terminal_state(true);
    }

    pub fn play_defeat_animation(&mut self) {
        self.enter_terminal_state(false);
    }

    fn enter_terminal_state(&mut self, victorious: bool) {
        self.is_victorious = victorious;
        self.is_defeated = !victorious;
        self.animation = if victorious {
            AnimationTag::Win
        } else {
            AnimationTag::Defeat
        };
        self.victory_timer_ms = 0.0;
        self.defeat_timer_ms = 0.0;
        self.is_attacking = false;
        self.is_damaged = false;
        self.is_blocking = false;
        self.pending_attack = None;
        self.projectiles.clear();
        self.vx = 0.0;
        self.vy = 0.0;
    }
}
