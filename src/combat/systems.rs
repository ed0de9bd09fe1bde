//! Combat systems
//!
//! ECS systems that turn fight events into combat log entries.

use bevy::prelude::*;

use super::events::*;
use super::log::{CombatLog, CombatLogEventType, FighterId};
use crate::states::play_match::components::{Fighter, FighterSide};
use crate::states::play_match::utils::fighter_id;

fn lookup_id(fighters: &Query<(&Fighter, &FighterSide)>, entity: Entity) -> FighterId {
    fighters
        .get(entity)
        .map(|(fighter, side)| fighter_id(side.0, fighter.kind))
        .unwrap_or_else(|_| "Unknown".to_string())
}

/// Record events to the combat log
#[allow(clippy::too_many_arguments)]
pub fn record_combat_log(
    mut combat_log: ResMut<CombatLog>,
    time: Res<Time>,
    mut round_started: EventReader<RoundStartedEvent>,
    mut hits: EventReader<HitLandedEvent>,
    mut whiffs: EventReader<AttackWhiffedEvent>,
    mut impacts: EventReader<ProjectileImpactEvent>,
    mut round_ended: EventReader<RoundEndedEvent>,
    mut match_ended: EventReader<MatchEndedEvent>,
    fighters: Query<(&Fighter, &FighterSide)>,
) {
    // Update match time
    combat_log.match_time += time.delta_secs();

    for event in round_started.read() {
        combat_log.log_round(event.round, None, format!("Round {} - Fight!", event.round));
    }

    for event in hits.read() {
        let source = lookup_id(&fighters, event.attacker);
        let target = lookup_id(&fighters, event.defender);

        let message = if event.was_blocked {
            format!(
                "{}'s {} is blocked by {} ({:.1} damage)",
                source, event.move_name, target, event.damage
            )
        } else {
            format!(
                "{}'s {} hits {} for {:.1} damage",
                source, event.move_name, target, event.damage
            )
        };
        combat_log.log_hit(
            source.clone(),
            target,
            event.move_name.clone(),
            event.damage,
            event.was_blocked,
            message,
        );

        if let Some(combo) = &event.combo {
            let message = format!(
                "{} completes {} (+{:.0} energy)",
                source, combo, event.combo_energy
            );
            combat_log.log_combo(source, combo.clone(), event.combo_energy, message);
        }
    }

    for event in whiffs.read() {
        let source = lookup_id(&fighters, event.attacker);
        let message = if event.expired {
            format!("{}'s {} went unresolved", source, event.move_name)
        } else {
            format!("{}'s {} misses", source, event.move_name)
        };
        combat_log.log_whiff(source, event.move_name.clone(), message);
    }

    for event in impacts.read() {
        let source = lookup_id(&fighters, event.attacker);
        let target = lookup_id(&fighters, event.defender);

        let message = if event.blocked {
            format!("{} blocks {}'s {}", target, source, event.move_name)
        } else if event.landed {
            format!(
                "{}'s {} strikes {} for {:.1} damage",
                source, event.move_name, target, event.damage
            )
        } else {
            format!("{}'s {} passes through {}", source, event.move_name, target)
        };
        combat_log.log_projectile_hit(
            source,
            target,
            event.move_name.clone(),
            event.damage,
            event.blocked,
            message,
        );
    }

    for event in round_ended.read() {
        let winner = event.winner.and_then(|side| {
            fighters
                .iter()
                .find(|(_, s)| s.0 == side)
                .map(|(fighter, s)| fighter_id(s.0, fighter.kind))
        });
        let reason = match event.reason {
            RoundEndReason::Knockout => "K.O.",
            RoundEndReason::TimeUp => "Time up",
        };
        let message = match &winner {
            Some(id) => format!(
                "{}! {} wins round {} ({:.0} - {:.0})",
                reason, id, event.round, event.left_health, event.right_health
            ),
            None => format!(
                "{}! Round {} is a draw ({:.0} - {:.0})",
                reason, event.round, event.left_health, event.right_health
            ),
        };
        combat_log.log_round(event.round, winner, message);
    }

    for event in match_ended.read() {
        let message = match event.winner {
            Some(side) => format!(
                "Match over! {} side wins {} - {}",
                side.name(),
                event.left_wins.max(event.right_wins),
                event.left_wins.min(event.right_wins)
            ),
            None => format!(
                "Match over! Draw at {} - {}",
                event.left_wins, event.right_wins
            ),
        };
        combat_log.log(CombatLogEventType::MatchEvent, message);
    }
}
