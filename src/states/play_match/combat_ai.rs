//! Fighter AI System
//!
//! Runs each [`FighterAi`] controller against the fighter it drives. The
//! controller reads the opponent's state and issues commands directly on its
//! own fighter; anything the fighter refuses is dropped.

use bevy::prelude::*;

use super::components::*;
use super::fighter_ai::FighterAi;
use crate::states::match_config::Side;

/// Tick every AI-controlled fighter, left side first.
pub fn drive_fighter_ai(
    time: Res<Time>,
    pair: Res<FighterPair>,
    mut rng: ResMut<GameRng>,
    mut fighters: Query<&mut Fighter>,
    mut controllers: Query<&mut FighterAi>,
) {
    let dt_ms = time.delta_secs() * 1000.0;

    for side in [Side::Left, Side::Right] {
        let me = pair.entity(side);
        let Ok(mut ai) = controllers.get_mut(me) else {
            continue;
        };
        let Some(opponent) = pair.opponent_of(me) else {
            continue;
        };
        let Ok([mut fighter, other]) = fighters.get_many_mut([me, opponent]) else {
            continue;
        };

        let strategy = ai.strategy();
        ai.update(dt_ms, &mut fighter, &other, opponent, &mut *rng);
        if ai.strategy() != strategy {
            trace!(
                "{} switches to {} strategy",
                fighter.name(),
                ai.strategy().name()
            );
        }
    }
}
