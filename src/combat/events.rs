//! Combat events
//!
//! Defines the events that occur during a fight for logging and processing.

use bevy::prelude::*;

use crate::states::match_config::Side;
use crate::states::play_match::move_config::MoveKind;

/// Command from an external input source (keyboard, network, script)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FighterCommand {
    /// Walk with direction -1.0 (left) or 1.0 (right)
    Walk(f32),
    Jump,
    Block(bool),
    Dash(f32),
    Attack(MoveKind),
}

/// Event carrying a command for one fighter
#[derive(Event, Debug, Clone, Copy)]
pub struct FighterCommandEvent {
    pub fighter: Entity,
    pub command: FighterCommand,
}

/// Event fired when a melee attack connects
#[derive(Event, Debug, Clone)]
pub struct HitLandedEvent {
    pub attacker: Entity,
    pub defender: Entity,
    pub move_kind: MoveKind,
    pub move_name: String,
    /// Damage after block reduction
    pub damage: f32,
    pub was_blocked: bool,
    pub target_health: f32,
    /// Name of the combo this hit completed, if any
    pub combo: Option<String>,
    pub combo_energy: f32,
    /// Attacker's unblocked-hit streak after this hit
    pub streak: u32,
}

/// Event fired when a melee attack misses or goes stale
#[derive(Event, Debug, Clone)]
pub struct AttackWhiffedEvent {
    pub attacker: Entity,
    pub move_kind: MoveKind,
    pub move_name: String,
    /// The swing aged out before it could be resolved
    pub expired: bool,
}

/// Event fired when a projectile reaches its target
#[derive(Event, Debug, Clone)]
pub struct ProjectileImpactEvent {
    pub attacker: Entity,
    pub defender: Entity,
    pub move_kind: MoveKind,
    pub move_name: String,
    pub damage: f32,
    pub blocked: bool,
    pub landed: bool,
    pub target_health: f32,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEndReason {
    Knockout,
    TimeUp,
}

/// Event fired when a round starts
#[derive(Event, Debug, Clone, Copy)]
pub struct RoundStartedEvent {
    pub round: u32,
}

/// Event fired when a round is decided
#[derive(Event, Debug, Clone, Copy)]
pub struct RoundEndedEvent {
    pub round: u32,
    /// `None` for a draw
    pub winner: Option<Side>,
    pub reason: RoundEndReason,
    pub left_health: f32,
    pub right_health: f32,
}

/// Event fired once the match is over
#[derive(Event, Debug, Clone, Copy)]
pub struct MatchEndedEvent {
    pub winner: Option<Side>,
    pub left_wins: u32,
    pub right_wins: u32,
}
