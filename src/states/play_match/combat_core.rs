//! Core Fight Systems
//!
//! Per-frame simulation of the two fighters:
//! - Applying queued movement and attack commands
//! - Advancing physics, timers and projectiles (left fighter first)
//! - Resolving melee swings a short delay after they were thrown

use bevy::prelude::*;

use super::components::*;
use super::constants::{HIT_RESOLUTION_DELAY_MS, PENDING_ATTACK_EXPIRY_MS};
use crate::combat::events::{
    AttackWhiffedEvent, FighterCommand, FighterCommandEvent, HitLandedEvent, ProjectileImpactEvent,
};
use crate::states::match_config::Side;

/// Apply externally issued commands (players, scripted tests) to fighters.
pub fn apply_fighter_commands(
    mut commands: EventReader<FighterCommandEvent>,
    pair: Res<FighterPair>,
    mut fighters: Query<&mut Fighter>,
) {
    for event in commands.read() {
        let Some(target) = pair.opponent_of(event.fighter) else {
            warn!("Command for unknown fighter {:?}", event.fighter);
            continue;
        };
        let Ok(mut fighter) = fighters.get_mut(event.fighter) else {
            continue;
        };

        match event.command {
            FighterCommand::Walk(direction) => fighter.walk(direction),
            FighterCommand::Jump => {
                fighter.jump();
            }
            FighterCommand::Block(blocking) => fighter.block(blocking),
            FighterCommand::Dash(direction) => {
                fighter.dash(direction);
            }
            FighterCommand::Attack(kind) => {
                if !fighter.attack(kind, target) {
                    debug!("{} could not throw {}", fighter.name(), kind);
                }
            }
        }
    }
}

/// Advance both fighters one tick and report projectile impacts.
pub fn update_fighters(
    time: Res<Time>,
    arena: Res<ArenaBounds>,
    pair: Res<FighterPair>,
    mut fighters: Query<&mut Fighter>,
    mut impacts: EventWriter<ProjectileImpactEvent>,
) {
    let dt_ms = time.delta_secs() * 1000.0;

    for side in [Side::Left, Side::Right] {
        let me = pair.entity(side);
        let Some(opponent) = pair.opponent_of(me) else {
            continue;
        };
        let Ok([mut fighter, mut other]) = fighters.get_many_mut([me, opponent]) else {
            continue;
        };

        for impact in fighter.update(dt_ms, &mut other, &arena) {
            let move_name = fighter
                .definition()
                .move_config(impact.move_kind)
                .map(|config| config.name.clone())
                .unwrap_or_else(|| impact.move_kind.label().to_string());

            impacts.send(ProjectileImpactEvent {
                attacker: me,
                defender: opponent,
                move_kind: impact.move_kind,
                move_name,
                damage: impact.damage,
                blocked: impact.blocked,
                landed: impact.landed,
                target_health: impact.target_health,
            });
        }
    }
}

/// Resolve melee swings once they are old enough.
///
/// A swing connects if, at resolution time, the attacker's reach still
/// overlaps the target. Swings that outlive the expiry window without being
/// resolved are dropped and reported as expired whiffs.
pub fn resolve_pending_attacks(
    pair: Res<FighterPair>,
    mut fighters: Query<&mut Fighter>,
    mut hits: EventWriter<HitLandedEvent>,
    mut whiffs: EventWriter<AttackWhiffedEvent>,
) {
    for side in [Side::Left, Side::Right] {
        let me = pair.entity(side);

        let Ok(fighter) = fighters.get(me) else {
            continue;
        };
        let Some(pending) = fighter.pending_attack().copied() else {
            continue;
        };
        let age = fighter.clock_ms() - pending.issued_at_ms;
        if age < HIT_RESOLUTION_DELAY_MS {
            continue;
        }

        let Ok([mut attacker, mut defender]) = fighters.get_many_mut([me, pending.target]) else {
            continue;
        };
        attacker.take_pending_attack();

        let definition = attacker.shared_definition();
        let Some(config) = definition.move_config(pending.move_kind) else {
            continue;
        };

        if age > PENDING_ATTACK_EXPIRY_MS {
            whiffs.send(AttackWhiffedEvent {
                attacker: me,
                move_kind: pending.move_kind,
                move_name: config.name.clone(),
                expired: true,
            });
            continue;
        }

        if !attacker.check_hit(&defender, config) {
            whiffs.send(AttackWhiffedEvent {
                attacker: me,
                move_kind: pending.move_kind,
                move_name: config.name.clone(),
                expired: false,
            });
            continue;
        }

        let outcome = attacker.deal_damage(&mut defender, config);
        hits.send(HitLandedEvent {
            attacker: me,
            defender: pending.target,
            move_kind: pending.move_kind,
            move_name: config.name.clone(),
            damage: outcome.damage,
            was_blocked: outcome.was_blocked,
            target_health: outcome.target_health,
            combo: outcome.combo.as_ref().map(|combo| combo.name.clone()),
            combo_energy: outcome
                .combo
                .as_ref()
                .map(|combo| combo.special_gain)
                .unwrap_or(0.0),
            streak: attacker.current_combo(),
        });
    }
}
