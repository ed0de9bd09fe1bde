//! What the AI remembers about its opponent
//!
//! A short rolling window of snapshots feeds the tendency flags and the
//! adaptation step; a running tally of observed moves feeds anticipation.

use std::collections::{HashMap, VecDeque};

use crate::states::play_match::components::Fighter;
use crate::states::play_match::move_config::MoveKind;
use crate::states::play_match::utils::horizontal_distance;

/// Snapshots kept in the rolling window
pub const WINDOW_CAPACITY: usize = 10;

/// Snapshots considered by the adaptation step
pub const ADAPTATION_SPAN: usize = 5;

/// One look at the opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub distance: f32,
    pub opponent_attacking: bool,
    pub opponent_blocking: bool,
    pub opponent_moving: bool,
    pub opponent_health: f32,
    pub timestamp_ms: f32,
}

impl Snapshot {
    pub fn capture(me: &Fighter, opponent: &Fighter, timestamp_ms: f32) -> Self {
        Self {
            distance: horizontal_distance(me.x, opponent.x),
            opponent_attacking: opponent.is_attacking(),
            opponent_blocking: opponent.is_blocking(),
            opponent_moving: opponent.vx != 0.0,
            opponent_health: opponent.health(),
            timestamp_ms,
        }
    }
}

/// Fixed-capacity FIFO of snapshots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationWindow {
    snapshots: VecDeque<Snapshot>,
}

impl ObservationWindow {
    /// Append a snapshot, evicting the oldest past capacity
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > WINDOW_CAPACITY {
            self.snapshots.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// The newest `count` snapshots, oldest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &Snapshot> {
        let skip = self.snapshots.len().saturating_sub(count);
        self.snapshots.iter().skip(skip)
    }

    pub fn attacking_count(&self) -> usize {
        self.snapshots.iter().filter(|s| s.opponent_attacking).count()
    }

    pub fn blocking_count(&self) -> usize {
        self.snapshots.iter().filter(|s| s.opponent_blocking).count()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

/// Coarse read on the opponent's play style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tendency {
    /// More than 6 of the last 10 snapshots caught the opponent attacking
    pub aggressive: bool,
    /// More than 4 of the last 10 snapshots caught the opponent blocking
    pub defensive: bool,
}

impl Tendency {
    pub fn from_window(window: &ObservationWindow) -> Self {
        Self {
            aggressive: window.attacking_count() > 6,
            defensive: window.blocking_count() > 4,
        }
    }
}

/// Tally of the opponent's attacks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerPatterns {
    /// Snapshots that caught the opponent mid-attack
    pub attack_frequency: u32,
    move_counts: HashMap<MoveKind, u32>,
}

impl PlayerPatterns {
    /// Count an attacking snapshot and, when known, the move behind it
    pub fn record_attack(&mut self, last_move: Option<MoveKind>) {
        self.attack_frequency += 1;
        if let Some(kind) = last_move {
            *self.move_counts.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn count(&self, kind: MoveKind) -> u32 {
        self.move_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Most observed move, `Punch` when nothing beats it
    pub fn favorite_move(&self) -> MoveKind {
        let mut favorite = MoveKind::Punch;
        for &kind in MoveKind::all() {
            if self.count(kind) > self.count(favorite) {
                favorite = kind;
            }
        }
        favorite
    }

    pub fn clear(&mut self) {
        self.attack_frequency = 0;
        self.move_counts.clear();
    }
}
