//! Strategy selection
//!
//! The cascade runs top to bottom and later rules overwrite earlier ones.
//! In practice the close-range aggression override wins most decisions.

use rand::Rng;
use serde::Serialize;

use crate::states::play_match::move_config::MoveKind;

/// Energy needed before the AI considers its special move
pub const SPECIAL_MIN_ENERGY: f32 = 30.0;

/// The AI's current behavioural mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Strategy {
    /// Placeholder before the first decision; acts like `Balanced`
    #[default]
    Neutral,
    Aggressive,
    Defensive,
    Balanced,
    Combo,
    Special,
    Counter,
    Intercept,
    Pressure,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Neutral => "neutral",
            Strategy::Aggressive => "aggressive",
            Strategy::Defensive => "defensive",
            Strategy::Balanced => "balanced",
            Strategy::Combo => "combo",
            Strategy::Special => "special",
            Strategy::Counter => "counter",
            Strategy::Intercept => "intercept",
            Strategy::Pressure => "pressure",
        }
    }
}

/// What the AI expects its opponent to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnticipatedAction {
    Attack(MoveKind),
    Approach,
}

/// Inputs to one strategy decision
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext {
    pub distance: f32,
    pub my_health: f32,
    pub my_energy: f32,
    pub opponent_health: f32,
    pub combo_chance: f32,
    pub defensiveness: f32,
    pub anticipated: Option<AnticipatedAction>,
    pub opponent_aggressive: bool,
}

/// Pick a strategy. `pressure_level` builds up while the opponent is low.
pub fn decide_strategy<R: Rng>(
    ctx: &StrategyContext,
    pressure_level: &mut f32,
    rng: &mut R,
) -> Strategy {
    let health_advantage = ctx.my_health - ctx.opponent_health;

    let mut strategy = if ctx.distance < 150.0 && rng.gen::<f32>() < ctx.combo_chance {
        Strategy::Combo
    } else if ctx.my_energy >= SPECIAL_MIN_ENERGY && rng.gen::<f32>() < 0.3 {
        Strategy::Special
    } else if health_advantage > 20.0 {
        Strategy::Aggressive
    } else if health_advantage < -20.0 {
        Strategy::Defensive
    } else {
        Strategy::Balanced
    };

    if ctx.distance < 200.0 && rng.gen::<f32>() < 0.9 {
        strategy = Strategy::Aggressive;
    }

    match ctx.anticipated {
        Some(AnticipatedAction::Approach) if ctx.distance > 150.0 => {
            strategy = Strategy::Aggressive;
        }
        Some(AnticipatedAction::Attack(_)) => {
            strategy = Strategy::Aggressive;
        }
        _ => {}
    }

    if ctx.opponent_aggressive && rng.gen::<f32>() < ctx.defensiveness * 0.1 {
        strategy = Strategy::Defensive;
    }

    if ctx.opponent_health < 50.0 {
        *pressure_level = (*pressure_level + 0.1).min(1.0);
        if rng.gen::<f32>() < *pressure_level {
            strategy = Strategy::Pressure;
        }
    }

    strategy
}
