//! Match Flow Systems
//!
//! Handles the overall flow of a match:
//! - Spawning both fighters at bout start
//! - The round clock
//! - Round end detection, victory/defeat animations and the celebration pause
//! - Resetting fighters and AIs between rounds, and deciding the match

use bevy::prelude::*;

use super::components::*;
use super::constants::CELEBRATION_MS;
use super::fighter_ai::FighterAi;
use super::move_config::FighterRoster;
use crate::combat::events::{
    HitLandedEvent, MatchEndedEvent, ProjectileImpactEvent, RoundEndReason, RoundEndedEvent,
    RoundStartedEvent,
};
use crate::states::match_config::{MatchConfig, Side};

/// Where the bout currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoutPhase {
    Fighting,
    /// Round decided; animations play until the celebration pause ends
    RoundOver,
    MatchOver,
}

/// Outcome of one round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRecord {
    pub round: u32,
    pub winner: Option<Side>,
    pub reason: RoundEndReason,
    pub left_health: f32,
    pub right_health: f32,
    /// Seconds the round lasted
    pub duration: f32,
}

/// Running totals for one side across the match
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FighterStats {
    pub damage_dealt: f32,
    pub damage_taken: f32,
    /// Longest unblocked-hit streak
    pub max_combo: u32,
    pub combos_completed: u32,
    /// Rounds won without losing any health
    pub perfect_rounds: u32,
}

/// Bout bookkeeping resource
#[derive(Resource, Debug, Clone)]
pub struct BoutState {
    pub phase: BoutPhase,
    pub round: u32,
    /// Seconds left on the round clock
    pub round_time_remaining: f32,
    pub round_time_secs: f32,
    pub rounds_to_win: u32,
    pub max_rounds: u32,
    pub left_wins: u32,
    pub right_wins: u32,
    pub celebration_remaining_ms: f32,
    pub rounds: Vec<RoundRecord>,
    pub winner: Option<Side>,
    pub left_stats: FighterStats,
    pub right_stats: FighterStats,
}

impl BoutState {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            phase: BoutPhase::Fighting,
            round: 1,
            round_time_remaining: config.round_time_secs,
            round_time_secs: config.round_time_secs,
            rounds_to_win: config.rounds_to_win.max(1),
            max_rounds: config.max_rounds(),
            left_wins: 0,
            right_wins: 0,
            celebration_remaining_ms: 0.0,
            rounds: Vec::new(),
            winner: None,
            left_stats: FighterStats::default(),
            right_stats: FighterStats::default(),
        }
    }

    pub fn is_fighting(&self) -> bool {
        self.phase == BoutPhase::Fighting
    }

    pub fn is_match_over(&self) -> bool {
        self.phase == BoutPhase::MatchOver
    }

    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_wins,
            Side::Right => self.right_wins,
        }
    }

    pub fn stats(&self, side: Side) -> &FighterStats {
        match side {
            Side::Left => &self.left_stats,
            Side::Right => &self.right_stats,
        }
    }

    fn stats_mut(&mut self, side: Side) -> &mut FighterStats {
        match side {
            Side::Left => &mut self.left_stats,
            Side::Right => &mut self.right_stats,
        }
    }

    /// Whether the match should end after the round just recorded
    pub fn match_decided(&self) -> bool {
        self.left_wins >= self.rounds_to_win
            || self.right_wins >= self.rounds_to_win
            || self.round >= self.max_rounds
    }

    /// Side with more round wins, `None` when level
    pub fn leader(&self) -> Option<Side> {
        match self.left_wins.cmp(&self.right_wins) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Round winner by remaining health; equal health is a draw
pub fn round_winner(left_health: f32, right_health: f32) -> Option<Side> {
    if left_health > right_health {
        Some(Side::Left)
    } else if right_health > left_health {
        Some(Side::Right)
    } else {
        None
    }
}

/// Run condition: commands, AI and hit resolution only run mid-round
pub fn fight_in_progress(bout: Res<BoutState>) -> bool {
    bout.is_fighting()
}

/// Spawn both fighters and initialize the bout.
pub fn setup_bout(
    mut commands: Commands,
    config: Res<MatchConfig>,
    roster: Res<FighterRoster>,
    arena: Res<ArenaBounds>,
    mut round_started: EventWriter<RoundStartedEvent>,
) {
    let mut spawned = Vec::with_capacity(2);

    for side in [Side::Left, Side::Right] {
        let setup = config.setup(side);
        let Some(definition) = roster.get(setup.kind) else {
            error!("No definition for {}; bout not started", setup.kind);
            return;
        };

        let (x, y) = arena.spawn_position(side);
        let fighter = Fighter::new(setup.kind, definition, x, y, setup.ai.is_none());

        let mut entity = commands.spawn((fighter, FighterSide(side)));
        if let Some(difficulty) = setup.ai {
            entity.insert(FighterAi::new(difficulty));
        }
        spawned.push(entity.id());

        info!(
            "{} side: {} ({})",
            side.name(),
            setup.kind,
            setup.ai.map(|d| d.name()).unwrap_or("idle")
        );
    }

    commands.insert_resource(FighterPair {
        left: spawned[0],
        right: spawned[1],
    });
    commands.insert_resource(BoutState::new(&config));
    round_started.send(RoundStartedEvent { round: 1 });
}

/// Tick the round clock down while the round is live.
pub fn tick_round_clock(time: Res<Time>, mut bout: ResMut<BoutState>) {
    if !bout.is_fighting() {
        return;
    }
    bout.round_time_remaining = (bout.round_time_remaining - time.delta_secs()).max(0.0);
}

/// End the round on a knockout or when the clock runs out.
pub fn check_round_end(
    mut bout: ResMut<BoutState>,
    pair: Res<FighterPair>,
    mut fighters: Query<&mut Fighter>,
    mut round_ended: EventWriter<RoundEndedEvent>,
) {
    if !bout.is_fighting() {
        return;
    }

    let Ok([mut left, mut right]) = fighters.get_many_mut([pair.left, pair.right]) else {
        return;
    };

    let knockout = !left.is_alive() || !right.is_alive();
    if !knockout && bout.round_time_remaining > 0.0 {
        return;
    }

    let reason = if knockout {
        RoundEndReason::Knockout
    } else {
        RoundEndReason::TimeUp
    };
    let winner = round_winner(left.health(), right.health());

    match winner {
        Some(Side::Left) => {
            left.play_victory_animation();
            right.play_defeat_animation();
            bout.left_wins += 1;
            if left.health() >= left.max_health() {
                bout.left_stats.perfect_rounds += 1;
            }
        }
        Some(Side::Right) => {
            right.play_victory_animation();
            left.play_defeat_animation();
            bout.right_wins += 1;
            if right.health() >= right.max_health() {
                bout.right_stats.perfect_rounds += 1;
            }
        }
        None => {
            left.clear_projectiles();
            right.clear_projectiles();
        }
    }

    let record = RoundRecord {
        round: bout.round,
        winner,
        reason,
        left_health: left.health(),
        right_health: right.health(),
        duration: bout.round_time_secs - bout.round_time_remaining,
    };
    info!(
        "Round {} over ({:?}): winner {:?}, health {:.0} - {:.0}",
        record.round, reason, winner, record.left_health, record.right_health
    );

    round_ended.send(RoundEndedEvent {
        round: record.round,
        winner,
        reason,
        left_health: record.left_health,
        right_health: record.right_health,
    });
    bout.rounds.push(record);
    bout.phase = BoutPhase::RoundOver;
    bout.celebration_remaining_ms = CELEBRATION_MS;
}

/// After the celebration pause, start the next round or close the match.
#[allow(clippy::too_many_arguments)]
pub fn advance_between_rounds(
    time: Res<Time>,
    mut bout: ResMut<BoutState>,
    pair: Res<FighterPair>,
    arena: Res<ArenaBounds>,
    mut fighters: Query<(&mut Fighter, &FighterSide)>,
    mut ais: Query<&mut FighterAi>,
    mut round_started: EventWriter<RoundStartedEvent>,
    mut match_ended: EventWriter<MatchEndedEvent>,
) {
    if bout.phase != BoutPhase::RoundOver {
        return;
    }

    bout.celebration_remaining_ms -= time.delta_secs() * 1000.0;
    if bout.celebration_remaining_ms > 0.0 {
        return;
    }

    if bout.match_decided() {
        bout.phase = BoutPhase::MatchOver;
        bout.winner = bout.leader();
        info!(
            "Match over: {:?} ({} - {})",
            bout.winner, bout.left_wins, bout.right_wins
        );
        match_ended.send(MatchEndedEvent {
            winner: bout.winner,
            left_wins: bout.left_wins,
            right_wins: bout.right_wins,
        });
        return;
    }

    bout.round += 1;
    bout.round_time_remaining = bout.round_time_secs;
    bout.phase = BoutPhase::Fighting;

    for entity in [pair.left, pair.right] {
        if let Ok((mut fighter, side)) = fighters.get_mut(entity) {
            let (x, y) = arena.spawn_position(side.0);
            fighter.reset(x, y);
        }
        if let Ok(mut ai) = ais.get_mut(entity) {
            ai.reset();
        }
    }

    info!("Round {} begins", bout.round);
    round_started.send(RoundStartedEvent { round: bout.round });
}

/// Fold hit and projectile events into the per-side match stats.
pub fn track_match_stats(
    mut bout: ResMut<BoutState>,
    pair: Res<FighterPair>,
    mut hits: EventReader<HitLandedEvent>,
    mut impacts: EventReader<ProjectileImpactEvent>,
) {
    for hit in hits.read() {
        let (Some(attacker), Some(defender)) = (pair.side_of(hit.attacker), pair.side_of(hit.defender))
        else {
            continue;
        };
        let stats = bout.stats_mut(attacker);
        stats.damage_dealt += hit.damage;
        stats.max_combo = stats.max_combo.max(hit.streak);
        if hit.combo.is_some() {
            stats.combos_completed += 1;
        }
        bout.stats_mut(defender).damage_taken += hit.damage;
    }

    for impact in impacts.read() {
        let (Some(attacker), Some(defender)) =
            (pair.side_of(impact.attacker), pair.side_of(impact.defender))
        else {
            continue;
        };
        bout.stats_mut(attacker).damage_dealt += impact.damage;
        bout.stats_mut(defender).damage_taken += impact.damage;
    }
}
