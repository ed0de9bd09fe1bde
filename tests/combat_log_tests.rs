//! Tests for combat log recording, queries and export
//!
//! These tests verify that the CombatLog correctly:
//! - Aggregates damage by move and by fighter
//! - Tracks blocked hits and completed combos
//! - Turns fight events into readable entries
//! - Saves a JSON document with match metadata

use bevy::prelude::*;
use regex::Regex;

use brawlsim::combat::events::{
    AttackWhiffedEvent, HitLandedEvent, MatchEndedEvent, ProjectileImpactEvent, RoundEndReason,
    RoundEndedEvent,
};
use brawlsim::combat::log::{
    CombatLog, CombatLogEventType, FighterMetadata, MatchMetadata, StructuredEventData,
};
use brawlsim::combat::systems::record_combat_log;
use brawlsim::combat::CombatPlugin;
use brawlsim::states::match_config::{FighterKind, Side};
use brawlsim::states::play_match::components::{Fighter, FighterSide};
use brawlsim::states::play_match::move_config::{FighterRoster, MoveKind};

const LEFT: &str = "Left Bruiser";
const RIGHT: &str = "Right Rocketeer";

fn create_test_log() -> CombatLog {
    CombatLog::default()
}

fn log_melee(log: &mut CombatLog, source: &str, target: &str, move_name: &str, amount: f32, blocked: bool) {
    log.log_hit(
        source.to_string(),
        target.to_string(),
        move_name.to_string(),
        amount,
        blocked,
        "Test message".to_string(),
    );
}

// =============================================================================
// Damage Aggregation Tests
// =============================================================================

#[test]
fn test_damage_by_move_empty_log() {
    let log = create_test_log();
    assert!(log.damage_by_move(LEFT).is_empty());
    assert_eq!(log.total_damage_dealt(LEFT), 0.0);
}

#[test]
fn test_damage_by_move_single_source() {
    let mut log = create_test_log();

    log_melee(&mut log, LEFT, RIGHT, "Haymaker", 8.0, false);
    log_melee(&mut log, LEFT, RIGHT, "Haymaker", 8.0, false);
    log_melee(&mut log, LEFT, RIGHT, "Stomp Kick", 10.0, false);

    let damage = log.damage_by_move(LEFT);
    assert_eq!(damage.len(), 2);
    assert_eq!(damage.get("Haymaker"), Some(&16.0));
    assert_eq!(damage.get("Stomp Kick"), Some(&10.0));
}

#[test]
fn test_projectile_damage_is_counted() {
    let mut log = create_test_log();

    log_melee(&mut log, RIGHT, LEFT, "Jab", 6.0, false);
    log.log_projectile_hit(
        RIGHT.to_string(),
        LEFT.to_string(),
        "Rocket Punch".to_string(),
        12.0,
        false,
        "Test".to_string(),
    );

    assert_eq!(log.total_damage_dealt(RIGHT), 18.0);
    assert_eq!(log.total_damage_taken(LEFT), 18.0);
    assert_eq!(log.damage_by_move(RIGHT).get("Rocket Punch"), Some(&12.0));
    assert_eq!(log.total_damage_taken(RIGHT), 0.0);
}

#[test]
fn test_damage_split_between_fighters() {
    let mut log = create_test_log();

    log_melee(&mut log, LEFT, RIGHT, "Haymaker", 8.0, false);
    log_melee(&mut log, RIGHT, LEFT, "Snap Kick", 8.0, false);
    log_melee(&mut log, RIGHT, LEFT, "Jab", 6.0, false);

    assert_eq!(log.total_damage_dealt(LEFT), 8.0);
    assert_eq!(log.total_damage_dealt(RIGHT), 14.0);
    assert_eq!(log.total_damage_taken(LEFT), 14.0);
}

// =============================================================================
// Blocks and Combos
// =============================================================================

#[test]
fn test_blocked_hits_are_attributed_to_defender() {
    let mut log = create_test_log();

    log_melee(&mut log, LEFT, RIGHT, "Haymaker", 2.4, true);
    log_melee(&mut log, LEFT, RIGHT, "Haymaker", 8.0, false);
    log.log_projectile_hit(
        RIGHT.to_string(),
        LEFT.to_string(),
        "Rocket Punch".to_string(),
        0.0,
        true,
        "Test".to_string(),
    );

    assert_eq!(log.blocked_hits(RIGHT), 1);
    assert_eq!(log.blocked_hits(LEFT), 1);
    assert_eq!(log.filter_by_type(CombatLogEventType::Blocked).len(), 1);
    assert_eq!(log.filter_by_type(CombatLogEventType::Hit).len(), 1);
}

#[test]
fn test_combos_by_fighter_in_order() {
    let mut log = create_test_log();

    log.log_combo(LEFT.to_string(), "Storm Flurry".to_string(), 15.0, "Test".to_string());
    log.log_combo(RIGHT.to_string(), "Tesla Coil".to_string(), 18.0, "Test".to_string());
    log.log_combo(LEFT.to_string(), "Wall Combo".to_string(), 20.0, "Test".to_string());

    assert_eq!(log.combos_by_fighter(LEFT), vec!["Storm Flurry", "Wall Combo"]);
    assert_eq!(log.combos_by_fighter(RIGHT), vec!["Tesla Coil"]);
}

// =============================================================================
// Entry Access
// =============================================================================

#[test]
fn test_recent_returns_newest_in_order() {
    let mut log = create_test_log();
    for i in 0..5 {
        log.log(CombatLogEventType::MatchEvent, format!("entry {}", i));
    }

    let recent: Vec<&str> = log.recent(2).iter().map(|e| e.message.as_str()).collect();
    assert_eq!(recent, vec!["entry 3", "entry 4"]);
    assert_eq!(log.recent(50).len(), 5);
}

#[test]
fn test_entries_carry_match_time() {
    let mut log = create_test_log();
    log.match_time = 12.5;
    log.log_whiff(LEFT.to_string(), "Haymaker".to_string(), "Test".to_string());

    let entry = &log.entries[0];
    assert_eq!(entry.timestamp, 12.5);
    assert_eq!(
        entry.data,
        Some(StructuredEventData::Whiff {
            source: LEFT.to_string(),
            move_name: "Haymaker".to_string(),
        })
    );
}

#[test]
fn test_clear_resets_log() {
    let mut log = create_test_log();
    log.match_time = 3.0;
    log_melee(&mut log, LEFT, RIGHT, "Haymaker", 8.0, false);

    log.clear();
    assert!(log.entries.is_empty());
    assert_eq!(log.match_time, 0.0);
}

// =============================================================================
// Event Recording
// =============================================================================

/// App with the combat plugin, the log recorder and both fighters spawned
fn recording_app() -> (App, Entity, Entity) {
    let roster = FighterRoster::builtin().unwrap();
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, CombatPlugin))
        .add_systems(Update, record_combat_log);
    app.finish();
    app.cleanup();

    let left = app
        .world_mut()
        .spawn((
            Fighter::new(
                FighterKind::Bruiser,
                roster.get(FighterKind::Bruiser).unwrap(),
                320.0,
                320.0,
                false,
            ),
            FighterSide(Side::Left),
        ))
        .id();
    let right = app
        .world_mut()
        .spawn((
            Fighter::new(
                FighterKind::Rocketeer,
                roster.get(FighterKind::Rocketeer).unwrap(),
                960.0,
                320.0,
                false,
            ),
            FighterSide(Side::Right),
        ))
        .id();

    (app, left, right)
}

fn messages(app: &App) -> Vec<String> {
    app.world()
        .resource::<CombatLog>()
        .entries
        .iter()
        .map(|e| e.message.clone())
        .collect()
}

#[test]
fn test_hit_and_combo_messages() {
    let (mut app, left, right) = recording_app();

    app.world_mut().send_event(HitLandedEvent {
        attacker: left,
        defender: right,
        move_kind: MoveKind::Kick,
        move_name: "Stomp Kick".to_string(),
        damage: 10.0,
        was_blocked: false,
        target_health: 190.0,
        combo: Some("Storm Flurry".to_string()),
        combo_energy: 15.0,
        streak: 3,
    });
    app.update();

    let messages = messages(&app);
    let hit = Regex::new(r"^Left Bruiser's Stomp Kick hits Right Rocketeer for \d+\.\d damage$").unwrap();
    let combo = Regex::new(r"^Left Bruiser completes Storm Flurry \(\+15 energy\)$").unwrap();
    assert!(messages.iter().any(|m| hit.is_match(m)), "{:?}", messages);
    assert!(messages.iter().any(|m| combo.is_match(m)), "{:?}", messages);

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.combos_by_fighter(LEFT), vec!["Storm Flurry"]);
    assert_eq!(log.total_damage_taken(RIGHT), 10.0);
}

#[test]
fn test_block_whiff_and_projectile_messages() {
    let (mut app, left, right) = recording_app();

    app.world_mut().send_event(HitLandedEvent {
        attacker: right,
        defender: left,
        move_kind: MoveKind::Punch,
        move_name: "Jab".to_string(),
        damage: 1.2,
        was_blocked: true,
        target_health: 198.8,
        combo: None,
        combo_energy: 0.0,
        streak: 0,
    });
    app.world_mut().send_event(AttackWhiffedEvent {
        attacker: left,
        move_kind: MoveKind::Punch,
        move_name: "Haymaker".to_string(),
        expired: false,
    });
    app.world_mut().send_event(ProjectileImpactEvent {
        attacker: right,
        defender: left,
        move_kind: MoveKind::Special,
        move_name: "Rocket Punch".to_string(),
        damage: 12.0,
        blocked: false,
        landed: true,
        target_health: 186.8,
    });
    app.update();

    let messages = messages(&app);
    let patterns = [
        r"^Right Rocketeer's Jab is blocked by Left Bruiser \(1\.2 damage\)$",
        r"^Left Bruiser's Haymaker misses$",
        r"^Right Rocketeer's Rocket Punch strikes Left Bruiser for 12\.0 damage$",
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).unwrap();
        assert!(messages.iter().any(|m| re.is_match(m)), "no match for {pattern} in {messages:?}");
    }

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.blocked_hits(LEFT), 1);
    assert_eq!(log.filter_by_type(CombatLogEventType::Whiff).len(), 1);
    assert_eq!(log.filter_by_type(CombatLogEventType::ProjectileHit).len(), 1);
}

#[test]
fn test_round_and_match_messages() {
    let (mut app, _, _) = recording_app();

    app.world_mut().send_event(RoundEndedEvent {
        round: 1,
        winner: Some(Side::Right),
        reason: RoundEndReason::Knockout,
        left_health: 0.0,
        right_health: 142.0,
    });
    app.world_mut().send_event(RoundEndedEvent {
        round: 2,
        winner: None,
        reason: RoundEndReason::TimeUp,
        left_health: 80.0,
        right_health: 80.0,
    });
    app.world_mut().send_event(MatchEndedEvent {
        winner: Some(Side::Right),
        left_wins: 0,
        right_wins: 2,
    });
    app.update();

    let messages = messages(&app);
    let patterns = [
        r"^K\.O\.! Right Rocketeer wins round 1 \(0 - 142\)$",
        r"^Time up! Round 2 is a draw \(80 - 80\)$",
        r"^Match over! Right side wins 2 - 0$",
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).unwrap();
        assert!(messages.iter().any(|m| re.is_match(m)), "no match for {pattern} in {messages:?}");
    }

    let rounds = app
        .world()
        .resource::<CombatLog>()
        .filter_by_type(CombatLogEventType::RoundEvent)
        .len();
    assert_eq!(rounds, 2);
}

// =============================================================================
// Export
// =============================================================================

fn fighter_metadata(id: &str, name: &str) -> FighterMetadata {
    FighterMetadata {
        id: id.to_string(),
        fighter_name: name.to_string(),
        difficulty: Some("hard".to_string()),
        max_health: 200.0,
        final_health: 150.0,
        rounds_won: 1,
        damage_dealt: 50.0,
        damage_taken: 50.0,
        max_combo: 3,
    }
}

#[test]
fn test_save_to_file_writes_metadata_and_entries() {
    let mut log = create_test_log();
    log_melee(&mut log, LEFT, RIGHT, "Haymaker", 8.0, false);
    log.log(CombatLogEventType::MatchEvent, "Match over!".to_string());

    let metadata = MatchMetadata {
        winner: Some(LEFT.to_string()),
        rounds_played: 2,
        match_time: 61.5,
        random_seed: Some(7),
        left: fighter_metadata(LEFT, "Bruiser"),
        right: fighter_metadata(RIGHT, "Rocketeer"),
    };

    let path = std::env::temp_dir()
        .join(format!("brawlsim_log_test_{}", std::process::id()))
        .join("match.json");
    let written = log.save_to_file(&metadata, Some(&path)).unwrap();
    assert_eq!(written, path);

    let contents = std::fs::read_to_string(&written).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();

    assert_eq!(json["metadata"]["winner"], "Left Bruiser");
    assert_eq!(json["metadata"]["random_seed"], 7);
    assert_eq!(json["metadata"]["left"]["fighter_name"], "Bruiser");
    assert_eq!(json["entries"].as_array().map(|e| e.len()), Some(2));
    assert_eq!(json["entries"][0]["event_type"], "Hit");
    assert_eq!(json["entries"][0]["data"]["kind"], "Hit");
    assert!(json["entries"][1].get("data").is_none());

    if let Some(dir) = written.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}
