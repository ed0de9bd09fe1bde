//! Combat logging
//!
//! Records every fight event for post-match analysis. Entries carry both a
//! human-readable message and, where useful, structured data that the
//! aggregation queries work from.

use bevy::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stable identifier for a fighter in the log, e.g. "Left Bruiser"
pub type FighterId = String;

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// Melee hit that connected unblocked
    Hit,
    /// Melee hit that was blocked
    Blocked,
    /// Melee swing that missed or expired
    Whiff,
    /// Combo completed
    Combo,
    /// Projectile reached its target
    ProjectileHit,
    /// Round start/end
    RoundEvent,
    /// Match start/end
    MatchEvent,
}

/// Structured payload for entries that aggregation cares about
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum StructuredEventData {
    Hit {
        source: FighterId,
        target: FighterId,
        move_name: String,
        amount: f32,
        blocked: bool,
    },
    ProjectileHit {
        source: FighterId,
        target: FighterId,
        move_name: String,
        amount: f32,
        blocked: bool,
    },
    Whiff {
        source: FighterId,
        move_name: String,
    },
    Combo {
        source: FighterId,
        combo_name: String,
        bonus_energy: f32,
    },
    Round {
        round: u32,
        winner: Option<FighterId>,
    },
}

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in match time (seconds since match start)
    pub timestamp: f32,
    pub event_type: CombatLogEventType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StructuredEventData>,
}

/// Per-fighter summary written alongside the log
#[derive(Debug, Clone, Serialize)]
pub struct FighterMetadata {
    pub id: FighterId,
    pub fighter_name: String,
    pub difficulty: Option<String>,
    pub max_health: f32,
    pub final_health: f32,
    pub rounds_won: u32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub max_combo: u32,
}

/// Match summary written alongside the log
#[derive(Debug, Clone, Serialize)]
pub struct MatchMetadata {
    pub winner: Option<FighterId>,
    pub rounds_played: u32,
    pub match_time: f32,
    pub random_seed: Option<u64>,
    pub left: FighterMetadata,
    pub right: FighterMetadata,
}

#[derive(Serialize)]
struct SavedMatchLog<'a> {
    metadata: &'a MatchMetadata,
    entries: &'a [CombatLogEntry],
}

/// Errors raised while exporting the log
#[derive(Debug, Error)]
pub enum CombatLogError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize combat log: {0}")]
    Json(#[from] serde_json::Error),
}

/// The combat log resource storing all events
#[derive(Resource, Default, Debug, Clone)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current match time in seconds
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new match
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a plain entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.push(event_type, message, None);
    }

    fn push(&mut self, event_type: CombatLogEventType, message: String, data: Option<StructuredEventData>) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            data,
        });
    }

    /// Log a resolved melee hit
    pub fn log_hit(
        &mut self,
        source: FighterId,
        target: FighterId,
        move_name: String,
        amount: f32,
        blocked: bool,
        message: String,
    ) {
        let event_type = if blocked {
            CombatLogEventType::Blocked
        } else {
            CombatLogEventType::Hit
        };
        self.push(
            event_type,
            message,
            Some(StructuredEventData::Hit {
                source,
                target,
                move_name,
                amount,
                blocked,
            }),
        );
    }

    /// Log a projectile reaching its target
    pub fn log_projectile_hit(
        &mut self,
        source: FighterId,
        target: FighterId,
        move_name: String,
        amount: f32,
        blocked: bool,
        message: String,
    ) {
        self.push(
            CombatLogEventType::ProjectileHit,
            message,
            Some(StructuredEventData::ProjectileHit {
                source,
                target,
                move_name,
                amount,
                blocked,
            }),
        );
    }

    pub fn log_whiff(&mut self, source: FighterId, move_name: String, message: String) {
        self.push(
            CombatLogEventType::Whiff,
            message,
            Some(StructuredEventData::Whiff { source, move_name }),
        );
    }

    pub fn log_combo(&mut self, source: FighterId, combo_name: String, bonus_energy: f32, message: String) {
        self.push(
            CombatLogEventType::Combo,
            message,
            Some(StructuredEventData::Combo {
                source,
                combo_name,
                bonus_energy,
            }),
        );
    }

    pub fn log_round(&mut self, round: u32, winner: Option<FighterId>, message: String) {
        self.push(
            CombatLogEventType::RoundEvent,
            message,
            Some(StructuredEventData::Round { round, winner }),
        );
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Iterate (source, target, move, amount) over every damaging entry
    fn damage_events(&self) -> impl Iterator<Item = (&str, &str, &str, f32)> {
        self.entries.iter().filter_map(|entry| match &entry.data {
            Some(StructuredEventData::Hit {
                source,
                target,
                move_name,
                amount,
                ..
            })
            | Some(StructuredEventData::ProjectileHit {
                source,
                target,
                move_name,
                amount,
                ..
            }) => Some((source.as_str(), target.as_str(), move_name.as_str(), *amount)),
            _ => None,
        })
    }

    /// Total damage dealt by `source`, keyed by move name
    pub fn damage_by_move(&self, source: &str) -> HashMap<String, f32> {
        let mut totals = HashMap::new();
        for (from, _, move_name, amount) in self.damage_events() {
            if from == source {
                *totals.entry(move_name.to_string()).or_insert(0.0) += amount;
            }
        }
        totals
    }

    pub fn total_damage_dealt(&self, source: &str) -> f32 {
        self.damage_events()
            .filter(|(from, ..)| *from == source)
            .map(|(.., amount)| amount)
            .sum()
    }

    pub fn total_damage_taken(&self, target: &str) -> f32 {
        self.damage_events()
            .filter(|(_, to, ..)| *to == target)
            .map(|(.., amount)| amount)
            .sum()
    }

    /// Names of the combos `source` completed, in order
    pub fn combos_by_fighter(&self, source: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.data {
                Some(StructuredEventData::Combo {
                    source: from,
                    combo_name,
                    ..
                }) if from == source => Some(combo_name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of attacks `fighter` blocked (melee and projectile)
    pub fn blocked_hits(&self, fighter: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| match &entry.data {
                Some(StructuredEventData::Hit { target, blocked, .. })
                | Some(StructuredEventData::ProjectileHit { target, blocked, .. }) => {
                    *blocked && target == fighter
                }
                _ => false,
            })
            .count()
    }

    /// Write the log and metadata as pretty JSON.
    ///
    /// Without an explicit path the file goes to `match_logs/match_<unix secs>.json`.
    /// Returns the path written.
    pub fn save_to_file(
        &self,
        metadata: &MatchMetadata,
        path: Option<&Path>,
    ) -> Result<PathBuf, CombatLogError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let secs = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                PathBuf::from("match_logs").join(format!("match_{}.json", secs))
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CombatLogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let document = SavedMatchLog {
            metadata,
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(&path, json).map_err(|source| CombatLogError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
