//! Headless match execution
//!
//! Runs bouts without any graphical output, stepping the app manually at a
//! fixed 60 Hz so a seeded match always plays out the same way.

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::combat::log::{
    CombatLog, CombatLogError, CombatLogEventType, FighterMetadata, MatchMetadata,
};
use crate::states::match_config::{Difficulty, FighterKind, Side};
use crate::states::play_match::constants::TICK_SECS;
use crate::states::play_match::move_config::{load_fighter_roster, FighterRoster, RosterError};
use crate::states::play_match::match_flow::RoundRecord;
use crate::states::play_match::systems::{
    ArenaBounds, BoutState, FightPhase, Fighter, FighterAi, FighterPair, GameRng,
};
use crate::states::play_match::utils::fighter_id;
use crate::states::play_match::FightPlugin;

use super::config::{ConfigError, HeadlessMatchConfig};

/// Errors that stop a headless match from running or being recorded
#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Log(#[from] CombatLogError),
    #[error("match setup failed: {0}")]
    Setup(String),
}

/// Result of a completed headless match
///
/// This struct provides programmatic access to match results for testing and analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The winning side, or None for a draw (including a timeout)
    pub winner: Option<Side>,
    /// Every round played, in order
    pub rounds: Vec<RoundRecord>,
    pub left_wins: u32,
    pub right_wins: u32,
    /// Simulated match duration in seconds
    pub match_time: f32,
    /// The duration cap ended the match before it was decided
    pub timed_out: bool,
    pub left: FighterResult,
    pub right: FighterResult,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
    /// Where the combat log was written
    pub log_path: PathBuf,
}

/// Statistics for a single fighter after the match
#[derive(Debug, Clone, PartialEq)]
pub struct FighterResult {
    pub kind: FighterKind,
    /// Display name from the roster (e.g., "Bruiser")
    pub fighter_name: String,
    pub difficulty: Option<Difficulty>,
    pub max_health: f32,
    /// Health at the end of the last round
    pub final_health: f32,
    pub rounds_won: u32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub max_combo: u32,
    pub combos_completed: u32,
    pub perfect_rounds: u32,
}

/// Resource to track headless match state
#[derive(Resource, Debug)]
pub struct HeadlessMatchState {
    /// Maximum simulated time before declaring a draw
    pub max_duration: f32,
    /// Elapsed simulated time
    pub elapsed_time: f32,
    /// Whether the match has completed
    pub match_complete: bool,
    /// The duration cap was hit
    pub timed_out: bool,
    /// Random seed for deterministic simulation (if provided)
    pub random_seed: Option<u64>,
}

/// Build a ready-to-step headless app for `config`.
///
/// The app uses `MinimalPlugins` and advances time by exactly one 60 Hz tick
/// per `update()`. Call `update()` until [`HeadlessMatchState::match_complete`].
pub fn build_headless_app(config: &HeadlessMatchConfig) -> Result<App, HeadlessError> {
    assemble_app(config, None)
}

fn assemble_app(
    config: &HeadlessMatchConfig,
    log_filter: Option<&str>,
) -> Result<App, HeadlessError> {
    let match_config = config.to_match_config()?;
    let roster = match &config.roster_path {
        Some(path) => load_fighter_roster(Path::new(path))?,
        None => FighterRoster::builtin()?,
    };
    for side in [Side::Left, Side::Right] {
        roster.definition(match_config.setup(side).kind)?;
    }

    let game_rng = match config.random_seed {
        Some(seed) => GameRng::from_seed(seed),
        None => GameRng::from_entropy(),
    };
    let arena = ArenaBounds::new(match_config.arena_width, match_config.arena_height);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    if let Some(filter) = log_filter {
        app.add_plugins(LogPlugin {
            filter: filter.to_string(),
            level: Level::INFO,
            ..default()
        });
    }

    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        TICK_SECS,
    )))
    .insert_resource(match_config)
    .insert_resource(roster)
    .insert_resource(arena)
    .insert_resource(game_rng)
    .insert_resource(HeadlessMatchState {
        max_duration: config.max_duration_secs,
        elapsed_time: 0.0,
        match_complete: false,
        timed_out: false,
        random_seed: config.random_seed,
    })
    .add_plugins(FightPlugin)
    .add_systems(Startup, headless_start_log)
    .add_systems(
        Update,
        (headless_track_time, headless_check_match_end)
            .chain()
            .after(FightPhase::Logging),
    );

    app.finish();
    app.cleanup();
    Ok(app)
}

/// Open the combat log for a new match
fn headless_start_log(mut combat_log: ResMut<CombatLog>, state: Res<HeadlessMatchState>) {
    combat_log.clear();
    let message = match state.random_seed {
        Some(seed) => format!("Match started (headless mode, seed {})", seed),
        None => "Match started (headless mode)".to_string(),
    };
    combat_log.log(CombatLogEventType::MatchEvent, message);
}

/// Track elapsed simulated time and enforce the duration cap.
fn headless_track_time(
    time: Res<Time>,
    mut state: ResMut<HeadlessMatchState>,
    mut combat_log: ResMut<CombatLog>,
) {
    if state.match_complete {
        return;
    }

    state.elapsed_time += time.delta_secs();
    if state.elapsed_time >= state.max_duration {
        info!(
            "Match timed out after {:.1}s - declaring DRAW",
            state.elapsed_time
        );
        combat_log.log(
            CombatLogEventType::MatchEvent,
            format!("Match timed out after {:.1}s", state.elapsed_time),
        );
        state.timed_out = true;
        state.match_complete = true;
    }
}

/// Mark the run complete once the bout is decided
fn headless_check_match_end(bout: Res<BoutState>, mut state: ResMut<HeadlessMatchState>) {
    if !state.match_complete && bout.is_match_over() {
        state.match_complete = true;
    }
}

/// Run a headless match to completion, save its combat log and return the result.
///
/// `log_filter` installs Bevy's `LogPlugin` with that filter (e.g. "info" or
/// "brawlsim=debug"). Leave it `None` when a logger is already installed.
pub fn run_headless_match(
    config: &HeadlessMatchConfig,
    log_filter: Option<&str>,
) -> Result<MatchResult, HeadlessError> {
    let mut app = assemble_app(config, log_filter)?;
    info!(
        "Starting headless match: {} ({}) vs {} ({})",
        config.left.fighter,
        config.left.ai.as_deref().unwrap_or("idle"),
        config.right.fighter,
        config.right.ai.as_deref().unwrap_or("idle"),
    );

    // One spare tick so the duration check always gets to run
    let max_frames = (config.max_duration_secs as f64 / TICK_SECS).ceil() as u64 + 2;
    for _ in 0..max_frames {
        app.update();
        if app.world().resource::<HeadlessMatchState>().match_complete {
            break;
        }
    }

    let mut state = app.world_mut().resource_mut::<HeadlessMatchState>();
    if !state.match_complete {
        state.timed_out = true;
        state.match_complete = true;
    }

    let result = collect_result(app.world(), config.output_path.as_deref())?;
    info!(
        "Match complete: winner {:?} after {} round(s). Log saved to {}",
        result.winner,
        result.rounds.len(),
        result.log_path.display()
    );
    Ok(result)
}

/// Build the [`MatchResult`] from the world and write the combat log.
pub fn collect_result(
    world: &World,
    output_path: Option<&str>,
) -> Result<MatchResult, HeadlessError> {
    let pair = *world
        .get_resource::<FighterPair>()
        .ok_or_else(|| HeadlessError::Setup("fighters were never spawned".to_string()))?;
    let bout = world
        .get_resource::<BoutState>()
        .cloned()
        .ok_or_else(|| HeadlessError::Setup("bout state missing".to_string()))?;
    let state = world.resource::<HeadlessMatchState>();
    let (timed_out, match_time, random_seed) =
        (state.timed_out, state.elapsed_time, state.random_seed);

    let left = fighter_result(world, &bout, pair.left, Side::Left)?;
    let right = fighter_result(world, &bout, pair.right, Side::Right)?;

    let winner = if timed_out && !bout.is_match_over() {
        None
    } else {
        bout.winner
    };

    let metadata = MatchMetadata {
        winner: winner.map(|side| {
            let kind = match side {
                Side::Left => left.kind,
                Side::Right => right.kind,
            };
            fighter_id(side, kind)
        }),
        rounds_played: bout.rounds.len() as u32,
        match_time,
        random_seed,
        left: fighter_metadata(Side::Left, &left),
        right: fighter_metadata(Side::Right, &right),
    };

    let combat_log = world.resource::<CombatLog>();
    let log_path = combat_log.save_to_file(&metadata, output_path.map(Path::new))?;

    Ok(MatchResult {
        winner,
        rounds: bout.rounds.clone(),
        left_wins: bout.left_wins,
        right_wins: bout.right_wins,
        match_time,
        timed_out,
        left,
        right,
        random_seed,
        log_path,
    })
}

fn fighter_result(
    world: &World,
    bout: &BoutState,
    entity: Entity,
    side: Side,
) -> Result<FighterResult, HeadlessError> {
    let fighter = world
        .get::<Fighter>(entity)
        .ok_or_else(|| HeadlessError::Setup(format!("{} fighter missing", side.name())))?;
    let difficulty = world.get::<FighterAi>(entity).map(|ai| ai.difficulty);
    let stats = bout.stats(side);

    Ok(FighterResult {
        kind: fighter.kind,
        fighter_name: fighter.name().to_string(),
        difficulty,
        max_health: fighter.max_health(),
        final_health: fighter.health(),
        rounds_won: bout.wins(side),
        damage_dealt: stats.damage_dealt,
        damage_taken: stats.damage_taken,
        max_combo: stats.max_combo,
        combos_completed: stats.combos_completed,
        perfect_rounds: stats.perfect_rounds,
    })
}

fn fighter_metadata(side: Side, result: &FighterResult) -> FighterMetadata {
    FighterMetadata {
        id: fighter_id(side, result.kind),
        fighter_name: result.fighter_name.clone(),
        difficulty: result.difficulty.map(|d| d.name().to_string()),
        max_health: result.max_health,
        final_health: result.final_health,
        rounds_won: result.rounds_won,
        damage_dealt: result.damage_dealt,
        damage_taken: result.damage_taken,
        max_combo: result.max_combo,
    }
}
