//! Integration tests for the adaptive fighter AI
//!
//! These tests verify that:
//! - Difficulty tiers resolve (unknown names fall back to medium)
//! - The observation window stays bounded
//! - Adaptation reacts to blocking and attacking opponents within its caps
//! - Round resets forget the opponent but keep adapted tuning
//! - Seeded controllers make identical decisions

use bevy::prelude::Entity;
use brawlsim::states::match_config::{Difficulty, FighterKind};
use brawlsim::states::play_match::components::{ArenaBounds, Fighter, GameRng};
use brawlsim::states::play_match::fighter_ai::{
    AiTuning, FighterAi, Strategy, BASE_FEINT_CHANCE, MAX_FEINT_CHANCE,
};
use brawlsim::states::play_match::move_config::{FighterRoster, MoveKind};
use rand::rngs::mock::StepRng;

fn spawn(kind: FighterKind, x: f32) -> Fighter {
    let roster = FighterRoster::builtin().expect("built-in roster");
    let mut fighter = Fighter::new(kind, roster.get(kind).unwrap(), x, 320.0, false);
    fighter.grounded = true;
    fighter
}

/// Every roll returns just under 1.0
fn never() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

// =============================================================================
// Tiers
// =============================================================================

#[test]
fn test_unknown_tier_name_defaults_to_medium() {
    let ai = FighterAi::from_tier_name("legendary");
    assert_eq!(ai.difficulty, Difficulty::Medium);
    assert_eq!(*ai.tuning(), AiTuning::for_difficulty(Difficulty::Medium));
}

#[test]
fn test_tier_names_are_case_insensitive() {
    assert_eq!(FighterAi::from_tier_name("INSANE").difficulty, Difficulty::Insane);
    assert_eq!(FighterAi::from_tier_name("easy").difficulty, Difficulty::Easy);
}

#[test]
fn test_insane_tier_parameters() {
    let tuning = AiTuning::for_difficulty(Difficulty::Insane);
    assert_eq!(tuning.reaction_time_ms, 50.0);
    assert_eq!(tuning.aggressiveness, 0.95);
    assert_eq!(tuning.adaptation_rate, 0.2);
    assert_eq!(tuning.prediction_accuracy, 0.9);
}

// =============================================================================
// Observation and adaptation
// =============================================================================

#[test]
fn test_observation_window_is_bounded() {
    let me = spawn(FighterKind::Bruiser, 100.0);
    let opponent = spawn(FighterKind::Rocketeer, 500.0);
    let mut ai = FighterAi::new(Difficulty::Hard);

    for _ in 0..25 {
        ai.observe(&me, &opponent);
        assert!(ai.observations().len() <= 10);
    }
    assert_eq!(ai.observations().len(), 10);
}

#[test]
fn test_blocking_opponent_raises_aggression_and_feints() {
    let me = spawn(FighterKind::Bruiser, 100.0);
    let mut opponent = spawn(FighterKind::Rocketeer, 300.0);
    opponent.block(true);
    let mut ai = FighterAi::new(Difficulty::Insane);

    for _ in 0..5 {
        ai.observe(&me, &opponent);
    }
    ai.adapt();

    assert_eq!(ai.aggressiveness(), 1.0);
    assert!((ai.feint_chance() - (BASE_FEINT_CHANCE + 0.2)).abs() < 1e-6);

    for _ in 0..10 {
        ai.observe(&me, &opponent);
        ai.adapt();
        assert!(ai.aggressiveness() <= 1.0);
        assert!(ai.feint_chance() <= MAX_FEINT_CHANCE);
    }
    assert_eq!(ai.feint_chance(), MAX_FEINT_CHANCE);
    assert!(ai.tendency().defensive);
}

#[test]
fn test_attacking_opponent_makes_ai_cautious() {
    let me = spawn(FighterKind::Rocketeer, 100.0);
    let mut opponent = spawn(FighterKind::Bruiser, 300.0);
    assert!(opponent.attack(MoveKind::Kick, Entity::from_raw(1)));
    let mut ai = FighterAi::new(Difficulty::Medium);

    for _ in 0..5 {
        ai.observe(&me, &opponent);
    }
    ai.adapt();

    assert!((ai.defensiveness() - 0.45).abs() < 1e-6);
    assert!((ai.aggressiveness() - 0.55).abs() < 1e-6);
    assert_eq!(ai.feint_chance(), BASE_FEINT_CHANCE);
    assert_eq!(ai.patterns().count(MoveKind::Kick), 5);
    assert_eq!(ai.patterns().favorite_move(), MoveKind::Kick);
}

#[test]
fn test_few_blocks_change_nothing() {
    let me = spawn(FighterKind::Bruiser, 100.0);
    let idle = spawn(FighterKind::Rocketeer, 300.0);
    let mut blocking = idle.clone();
    blocking.block(true);
    let mut ai = FighterAi::new(Difficulty::Hard);

    // Three of the last five snapshots is not enough
    ai.observe(&me, &idle);
    ai.observe(&me, &idle);
    for _ in 0..3 {
        ai.observe(&me, &blocking);
    }
    ai.adapt();

    assert_eq!(*ai.tuning(), AiTuning::for_difficulty(Difficulty::Hard));
    assert_eq!(ai.feint_chance(), BASE_FEINT_CHANCE);
}

// =============================================================================
// Round reset
// =============================================================================

#[test]
fn test_reset_forgets_opponent_but_keeps_tuning() {
    let me = spawn(FighterKind::Bruiser, 100.0);
    let mut opponent = spawn(FighterKind::Rocketeer, 300.0);
    opponent.block(true);
    let mut ai = FighterAi::new(Difficulty::Insane);

    for _ in 0..5 {
        ai.observe(&me, &opponent);
    }
    ai.adapt();
    let tuning = *ai.tuning();
    let feint = ai.feint_chance();

    ai.reset();

    assert!(ai.observations().is_empty());
    assert_eq!(ai.patterns().attack_frequency, 0);
    assert_eq!(ai.anticipated(), None);
    assert_eq!(ai.strategy(), Strategy::Neutral);
    assert_eq!(ai.pending_actions(), 0);
    assert_eq!(*ai.tuning(), tuning);
    assert_eq!(ai.feint_chance(), feint);
}

// =============================================================================
// Decisions
// =============================================================================

#[test]
fn test_first_update_decides_and_acts() {
    let mut me = spawn(FighterKind::Bruiser, 100.0);
    let opponent = spawn(FighterKind::Rocketeer, 700.0);
    let mut ai = FighterAi::new(Difficulty::Medium);

    ai.update(16.0, &mut me, &opponent, Entity::from_raw(2), &mut never());

    assert_eq!(ai.observations().len(), 1);
    // The default favorite (Punch) is anticipated, which forces aggression
    assert_eq!(ai.strategy(), Strategy::Aggressive);
    assert_eq!(me.vx, 3.0);
    assert!(!me.is_attacking());
}

#[test]
fn test_seeded_controllers_are_deterministic() {
    let arena = ArenaBounds::default();
    let run = |seed: u64| {
        let mut rng = GameRng::from_seed(seed);
        let mut me = spawn(FighterKind::Rocketeer, 200.0);
        let mut opponent = spawn(FighterKind::Bruiser, 600.0);
        let mut ai = FighterAi::new(Difficulty::Hard);

        for _ in 0..300 {
            ai.update(16.0, &mut me, &opponent, Entity::from_raw(2), &mut rng);
            me.update(16.0, &mut opponent, &arena);
        }
        (me, opponent, ai.strategy())
    };

    assert_eq!(run(42), run(42));
}
