//! Adaptive Fighter AI
//!
//! A `FighterAi` component drives one fighter. It runs on two clocks:
//!
//! 1. **Decisions** (every reaction time plus up to 200ms of jitter): observe
//!    the opponent, adapt the tunables, predict the opponent's next action and
//!    pick a [`Strategy`].
//! 2. **Actions** (every half reaction time): run the behaviour for the
//!    current strategy.
//!
//! Tunables start from the difficulty tier and drift as the AI adapts. They
//! survive [`FighterAi::reset`], so an AI that adapted in round one carries
//! that into round two.

pub mod behaviors;
pub mod observation;
pub mod strategy;

pub use behaviors::{combo_sequence, Actor, DeferredAction};
pub use observation::{ObservationWindow, PlayerPatterns, Snapshot, Tendency, ADAPTATION_SPAN};
pub use strategy::{decide_strategy, AnticipatedAction, Strategy, StrategyContext};

use bevy::prelude::*;
use rand::Rng;

use super::components::{Fighter, TimerQueue};
use super::move_config::MoveKind;
use super::utils::horizontal_distance;
use crate::states::match_config::Difficulty;

/// Starting feint chance for every tier
pub const BASE_FEINT_CHANCE: f32 = 0.1;

/// Ceiling for the feint chance under adaptation
pub const MAX_FEINT_CHANCE: f32 = 0.5;

/// Difficulty-derived parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiTuning {
    pub reaction_time_ms: f32,
    pub aggressiveness: f32,
    pub defensiveness: f32,
    pub combo_chance: f32,
    pub adaptation_rate: f32,
    pub prediction_accuracy: f32,
}

impl AiTuning {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                reaction_time_ms: 300.0,
                aggressiveness: 0.4,
                defensiveness: 0.2,
                combo_chance: 0.1,
                adaptation_rate: 0.02,
                prediction_accuracy: 0.3,
            },
            Difficulty::Medium => Self {
                reaction_time_ms: 200.0,
                aggressiveness: 0.6,
                defensiveness: 0.4,
                combo_chance: 0.3,
                adaptation_rate: 0.05,
                prediction_accuracy: 0.5,
            },
            Difficulty::Hard => Self {
                reaction_time_ms: 100.0,
                aggressiveness: 0.8,
                defensiveness: 0.6,
                combo_chance: 0.5,
                adaptation_rate: 0.1,
                prediction_accuracy: 0.7,
            },
            Difficulty::Insane => Self {
                reaction_time_ms: 50.0,
                aggressiveness: 0.95,
                defensiveness: 0.8,
                combo_chance: 0.8,
                adaptation_rate: 0.2,
                prediction_accuracy: 0.9,
            },
        }
    }
}

/// AI controller attached to the fighter it drives
#[derive(Component, Debug, Clone)]
pub struct FighterAi {
    pub difficulty: Difficulty,
    tuning: AiTuning,
    feint_chance: f32,
    pressure_level: f32,
    observations: ObservationWindow,
    patterns: PlayerPatterns,
    tendency: Tendency,
    anticipated: Option<AnticipatedAction>,
    strategy: Strategy,
    decision_timer_ms: f32,
    action_timer_ms: f32,
    deferred: TimerQueue<DeferredAction>,
}

impl FighterAi {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            tuning: AiTuning::for_difficulty(difficulty),
            feint_chance: BASE_FEINT_CHANCE,
            pressure_level: 0.0,
            observations: ObservationWindow::default(),
            patterns: PlayerPatterns::default(),
            tendency: Tendency::default(),
            anticipated: None,
            strategy: Strategy::Neutral,
            decision_timer_ms: 0.0,
            action_timer_ms: 0.0,
            deferred: TimerQueue::new(),
        }
    }

    /// Build from a tier name; unknown names get medium
    pub fn from_tier_name(name: &str) -> Self {
        Self::new(Difficulty::from_name_or_default(name))
    }

    pub fn tuning(&self) -> &AiTuning {
        &self.tuning
    }

    pub fn aggressiveness(&self) -> f32 {
        self.tuning.aggressiveness
    }

    pub fn defensiveness(&self) -> f32 {
        self.tuning.defensiveness
    }

    pub fn feint_chance(&self) -> f32 {
        self.feint_chance
    }

    pub fn pressure_level(&self) -> f32 {
        self.pressure_level
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn anticipated(&self) -> Option<AnticipatedAction> {
        self.anticipated
    }

    pub fn tendency(&self) -> Tendency {
        self.tendency
    }

    pub fn observations(&self) -> &ObservationWindow {
        &self.observations
    }

    pub fn patterns(&self) -> &PlayerPatterns {
        &self.patterns
    }

    pub fn pending_actions(&self) -> usize {
        self.deferred.len()
    }

    /// Advance the controller by `dt_ms`, possibly commanding `me`.
    pub fn update<R: Rng>(
        &mut self,
        dt_ms: f32,
        me: &mut Fighter,
        opponent: &Fighter,
        opponent_entity: Entity,
        rng: &mut R,
    ) {
        let due = self.deferred.advance(dt_ms);
        if !due.is_empty() {
            let mut actor = Actor {
                me: &mut *me,
                opponent,
                target: opponent_entity,
                rng: &mut *rng,
                deferred: &mut self.deferred,
            };
            for action in due {
                behaviors::run_deferred(action, &mut actor);
            }
        }

        self.decision_timer_ms -= dt_ms;
        self.action_timer_ms -= dt_ms;

        if self.decision_timer_ms <= 0.0 {
            self.observe(me, opponent);
            self.adapt();
            self.predict(me, opponent, rng);
            self.choose_strategy(me, opponent, rng);
            self.decision_timer_ms = self.tuning.reaction_time_ms + rng.gen::<f32>() * 200.0;
        }

        if self.action_timer_ms <= 0.0 {
            let mut actor = Actor {
                me: &mut *me,
                opponent,
                target: opponent_entity,
                rng: &mut *rng,
                deferred: &mut self.deferred,
            };
            behaviors::run_behavior(self.strategy, &mut actor);
            self.action_timer_ms = self.tuning.reaction_time_ms * 0.5;
        }

        if me.health() < 30.0 && me.special_energy() >= 100.0 {
            self.strategy = Strategy::Special;
        }
    }

    /// Record a snapshot of the opponent and refresh the tendency flags.
    pub fn observe(&mut self, me: &Fighter, opponent: &Fighter) {
        let snapshot = Snapshot::capture(me, opponent, self.deferred.now_ms());
        self.observations.push(snapshot);

        if snapshot.opponent_attacking {
            self.patterns.record_attack(opponent.last_move());
        }

        self.tendency = Tendency::from_window(&self.observations);
    }

    /// Shift aggressiveness, defensiveness and feint chance toward what the
    /// recent snapshots show, then anticipate the opponent's favorite move.
    pub fn adapt(&mut self) {
        let rate = self.tuning.adaptation_rate;
        let (attacking, blocking) = self
            .observations
            .recent(ADAPTATION_SPAN)
            .fold((0, 0), |(a, b), s| {
                (
                    a + s.opponent_attacking as usize,
                    b + s.opponent_blocking as usize,
                )
            });

        if attacking > 3 {
            self.tuning.defensiveness = (self.tuning.defensiveness + rate).min(1.0);
            self.tuning.aggressiveness = (self.tuning.aggressiveness - rate).max(0.0);
        } else if blocking > 3 {
            self.tuning.aggressiveness = (self.tuning.aggressiveness + rate).min(1.0);
            self.feint_chance = (self.feint_chance + rate).min(MAX_FEINT_CHANCE);
        }

        let favorite = self.patterns.favorite_move();
        if matches!(favorite, MoveKind::Punch | MoveKind::Kick) {
            self.anticipated = Some(AnticipatedAction::Attack(favorite));
        }
    }

    /// Refine the anticipated action, succeeding with the tier's accuracy.
    pub fn predict<R: Rng>(&mut self, me: &Fighter, opponent: &Fighter, rng: &mut R) {
        if rng.gen::<f32>() >= self.tuning.prediction_accuracy {
            return;
        }

        let distance = horizontal_distance(me.x, opponent.x);
        if distance < 120.0 && self.patterns.attack_frequency > 5 {
            self.anticipated = Some(AnticipatedAction::Attack(self.patterns.favorite_move()));
        } else if distance > 200.0 && opponent.vx != 0.0 {
            self.anticipated = Some(AnticipatedAction::Approach);
        }
    }

    fn choose_strategy<R: Rng>(&mut self, me: &Fighter, opponent: &Fighter, rng: &mut R) {
        let ctx = StrategyContext {
            distance: horizontal_distance(me.x, opponent.x),
            my_health: me.health(),
            my_energy: me.special_energy(),
            opponent_health: opponent.health(),
            combo_chance: self.tuning.combo_chance,
            defensiveness: self.tuning.defensiveness,
            anticipated: self.anticipated,
            opponent_aggressive: self.tendency.aggressive,
        };
        self.strategy = decide_strategy(&ctx, &mut self.pressure_level, rng);
    }

    /// Forget the opponent and cancel queued follow-ups for a new round.
    /// Adapted tunables and the feint chance are kept.
    pub fn reset(&mut self) {
        self.observations.clear();
        self.patterns.clear();
        self.tendency = Tendency::default();
        self.anticipated = None;
        self.strategy = Strategy::Neutral;
        self.pressure_level = 0.0;
        self.decision_timer_ms = 0.0;
        self.action_timer_ms = 0.0;
        self.deferred.cancel_all();
    }
}
