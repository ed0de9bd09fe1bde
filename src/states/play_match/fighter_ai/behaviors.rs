//! Strategy behaviours
//!
//! Each behaviour issues zero or more commands on the AI's own fighter.
//! Commands the fighter refuses are simply dropped; nothing is retried.
//! Staggered follow-ups (combo hits, counters, block release) go on the
//! controller's deferred queue.

use bevy::prelude::Entity;
use rand::Rng;

use super::strategy::{Strategy, SPECIAL_MIN_ENERGY};
use crate::states::match_config::FighterKind;
use crate::states::play_match::components::{Fighter, TimerQueue};
use crate::states::play_match::move_config::MoveKind;
use crate::states::play_match::utils::horizontal_distance;

/// Delay between scripted combo hits
pub const COMBO_STAGGER_MS: f32 = 200.0;

/// Delay before a counter-attack riposte
pub const COUNTER_DELAY_MS: f32 = 100.0;

/// How long a counter-stance block is held
pub const COUNTER_BLOCK_MS: f32 = 200.0;

/// Follow-up actions the controller runs later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// One hit of a scripted combo
    ComboHit(MoveKind),
    /// Kick back after the opponent swung (80% chance)
    CounterKick,
    ReleaseBlock,
}

/// Everything a behaviour may touch during one action step
pub struct Actor<'a, R: Rng> {
    pub me: &'a mut Fighter,
    pub opponent: &'a Fighter,
    pub target: Entity,
    pub rng: &'a mut R,
    pub deferred: &'a mut TimerQueue<DeferredAction>,
}

impl<R: Rng> Actor<'_, R> {
    fn distance(&self) -> f32 {
        horizontal_distance(self.me.x, self.opponent.x)
    }

    fn roll(&mut self) -> f32 {
        self.rng.gen()
    }

    fn toward(&self) -> f32 {
        if self.me.x < self.opponent.x {
            1.0
        } else {
            -1.0
        }
    }

    fn attack(&mut self, kind: MoveKind) -> bool {
        self.me.attack(kind, self.target)
    }

    /// Punch 60% of the time, otherwise kick
    fn jab_or_kick(&mut self) {
        let kind = if self.roll() < 0.6 {
            MoveKind::Punch
        } else {
            MoveKind::Kick
        };
        self.attack(kind);
    }

    fn move_towards(&mut self) {
        let direction = self.toward();
        self.me.walk(direction);
        if self.me.can_dash() && self.roll() < 0.2 {
            self.me.dash(direction);
        }
    }

    fn move_away(&mut self) {
        let direction = -self.toward();
        self.me.walk(direction);
        if self.roll() < 0.3 {
            self.me.jump();
        }
    }
}

/// Run the behaviour for `strategy`.
pub fn run_behavior<R: Rng>(strategy: Strategy, actor: &mut Actor<'_, R>) {
    match strategy {
        Strategy::Aggressive => aggressive(actor),
        Strategy::Defensive => defensive(actor),
        Strategy::Neutral | Strategy::Balanced => balanced(actor),
        Strategy::Combo => combo(actor),
        Strategy::Special => special(actor),
        Strategy::Counter => counter(actor),
        Strategy::Intercept => intercept(actor),
        Strategy::Pressure => pressure(actor),
    }
}

/// Run a follow-up that came due on the deferred queue.
pub fn run_deferred<R: Rng>(action: DeferredAction, actor: &mut Actor<'_, R>) {
    match action {
        DeferredAction::ComboHit(kind) => combo_hit(actor, kind),
        DeferredAction::CounterKick => {
            if actor.roll() < 0.8 {
                actor.attack(MoveKind::Kick);
            }
        }
        DeferredAction::ReleaseBlock => actor.me.block(false),
    }
}

fn aggressive<R: Rng>(actor: &mut Actor<'_, R>) {
    let distance = actor.distance();

    if distance > 200.0 {
        actor.move_towards();
        if actor.roll() < 0.4 {
            actor.me.jump();
        }
    } else if distance < 150.0 {
        let roll = actor.roll();
        if roll < 0.7 {
            actor.attack(MoveKind::Punch);
        } else if roll < 0.9 {
            actor.attack(MoveKind::Kick);
        } else if actor.me.special_energy() >= SPECIAL_MIN_ENERGY {
            actor.attack(MoveKind::Special);
        }
    } else {
        actor.move_towards();
    }
}

fn defensive<R: Rng>(actor: &mut Actor<'_, R>) {
    let distance = actor.distance();

    if distance < 120.0 {
        if actor.roll() < 0.7 {
            actor.jab_or_kick();
        } else {
            actor.move_away();
        }
    } else if distance > 200.0 {
        actor.move_towards();
    } else if actor.roll() < 0.8 {
        actor.jab_or_kick();
    } else {
        actor.move_towards();
    }
}

fn balanced<R: Rng>(actor: &mut Actor<'_, R>) {
    let distance = actor.distance();

    if distance > 200.0 {
        actor.move_towards();
    } else if distance < 150.0 {
        actor.jab_or_kick();
    } else if actor.roll() < 0.9 {
        actor.jab_or_kick();
    } else {
        actor.move_towards();
    }
}

/// Scripted sequence thrown by the combo behaviour
pub fn combo_sequence(kind: FighterKind) -> [MoveKind; 3] {
    match kind {
        FighterKind::Bruiser => [MoveKind::Punch, MoveKind::Punch, MoveKind::Kick],
        FighterKind::Rocketeer => [MoveKind::Kick, MoveKind::Punch, MoveKind::Special],
    }
}

fn combo<R: Rng>(actor: &mut Actor<'_, R>) {
    if actor.distance() > 150.0 {
        actor.move_towards();
        return;
    }

    let sequence = combo_sequence(actor.me.kind);
    combo_hit(actor, sequence[0]);
    for (i, kind) in sequence.iter().enumerate().skip(1) {
        actor
            .deferred
            .schedule(COMBO_STAGGER_MS * i as f32, DeferredAction::ComboHit(*kind));
    }
}

/// A special in the script falls back to a kick when energy has run dry.
fn combo_hit<R: Rng>(actor: &mut Actor<'_, R>, kind: MoveKind) {
    if kind == MoveKind::Special && actor.me.special_energy() < SPECIAL_MIN_ENERGY {
        actor.attack(MoveKind::Kick);
    } else {
        actor.attack(kind);
    }
}

fn special<R: Rng>(actor: &mut Actor<'_, R>) {
    let distance = actor.distance();
    let energy = actor.me.special_energy();

    if energy >= actor.me.max_special_energy() && distance < 200.0 {
        actor.attack(MoveKind::Ultimate);
    } else if energy >= SPECIAL_MIN_ENERGY && distance < 180.0 {
        actor.attack(MoveKind::Special);
    } else {
        aggressive(actor);
    }
}

fn counter<R: Rng>(actor: &mut Actor<'_, R>) {
    let distance = actor.distance();

    if actor.opponent.is_attacking() && distance < 150.0 {
        actor
            .deferred
            .schedule(COUNTER_DELAY_MS, DeferredAction::CounterKick);
    } else if distance > 180.0 {
        actor.move_towards();
    } else {
        actor.me.block(true);
        actor
            .deferred
            .schedule(COUNTER_BLOCK_MS, DeferredAction::ReleaseBlock);
    }
}

fn intercept<R: Rng>(actor: &mut Actor<'_, R>) {
    if actor.distance() > 120.0 {
        actor.move_towards();
        if actor.roll() < 0.4 {
            actor.me.jump();
        }
    } else {
        actor.jab_or_kick();
    }
}

fn pressure<R: Rng>(actor: &mut Actor<'_, R>) {
    if actor.distance() > 100.0 {
        actor.move_towards();
        if actor.me.can_dash() && actor.roll() < 0.5 {
            let direction = actor.toward();
            actor.me.dash(direction);
        }
    } else {
        let roll = actor.roll();
        if roll < 0.5 {
            actor.attack(MoveKind::Punch);
        } else if roll < 0.8 {
            actor.attack(MoveKind::Kick);
        } else if actor.me.special_energy() >= SPECIAL_MIN_ENERGY {
            actor.attack(MoveKind::Special);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::play_match::move_config::FighterRoster;
    use rand::rngs::mock::StepRng;

    fn fighter(kind: FighterKind, x: f32) -> Fighter {
        let roster = FighterRoster::builtin().unwrap();
        let mut fighter = Fighter::new(kind, roster.get(kind).unwrap(), x, 320.0, false);
        fighter.grounded = true;
        fighter
    }

    #[test]
    fn test_combo_staggers_follow_up_hits() {
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        let opponent = fighter(FighterKind::Rocketeer, 200.0);
        let mut rng = StepRng::new(0, 0);
        let mut deferred = TimerQueue::new();

        let mut actor = Actor {
            me: &mut me,
            opponent: &opponent,
            target: Entity::from_raw(2),
            rng: &mut rng,
            deferred: &mut deferred,
        };
        run_behavior(Strategy::Combo, &mut actor);

        assert_eq!(me.last_move(), Some(MoveKind::Punch));
        assert_eq!(deferred.len(), 2);
        assert!(deferred.advance(199.0).is_empty());
        let due = deferred.advance(1.0);
        assert_eq!(due.as_slice(), &[DeferredAction::ComboHit(MoveKind::Punch)]);
        let due = deferred.advance(200.0);
        assert_eq!(due.as_slice(), &[DeferredAction::ComboHit(MoveKind::Kick)]);
    }

    #[test]
    fn test_combo_special_falls_back_to_kick_without_energy() {
        let mut me = fighter(FighterKind::Rocketeer, 100.0);
        let opponent = fighter(FighterKind::Bruiser, 200.0);
        let mut rng = StepRng::new(0, 0);
        let mut deferred = TimerQueue::new();

        let mut actor = Actor {
            me: &mut me,
            opponent: &opponent,
            target: Entity::from_raw(2),
            rng: &mut rng,
            deferred: &mut deferred,
        };
        run_deferred(DeferredAction::ComboHit(MoveKind::Special), &mut actor);

        assert_eq!(me.last_move(), Some(MoveKind::Kick));
        assert_eq!(me.special_energy(), 0.0);
    }

    #[test]
    fn test_counter_holds_block_then_releases() {
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        let opponent = fighter(FighterKind::Rocketeer, 250.0);
        let mut rng = StepRng::new(0, 0);
        let mut deferred = TimerQueue::new();

        let mut actor = Actor {
            me: &mut me,
            opponent: &opponent,
            target: Entity::from_raw(2),
            rng: &mut rng,
            deferred: &mut deferred,
        };
        run_behavior(Strategy::Counter, &mut actor);
        for action in actor.deferred.advance(COUNTER_BLOCK_MS) {
            assert_eq!(action, DeferredAction::ReleaseBlock);
            assert!(actor.me.is_blocking());
            run_deferred(action, &mut actor);
        }

        assert!(!me.is_blocking());
    }

    #[test]
    fn test_aggressive_closes_distance_when_far() {
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        let opponent = fighter(FighterKind::Rocketeer, 900.0);
        // Every roll lands near 1.0: no jump, no attack
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut deferred = TimerQueue::new();

        let mut actor = Actor {
            me: &mut me,
            opponent: &opponent,
            target: Entity::from_raw(2),
            rng: &mut rng,
            deferred: &mut deferred,
        };
        run_behavior(Strategy::Aggressive, &mut actor);

        assert!(me.vx > 0.0);
        assert!(me.grounded);
        assert!(!me.is_attacking());
    }

    /// Every roll returns `value` (to within 2^-24)
    fn rolls(value: f32) -> StepRng {
        StepRng::new((value as f64 * 4294967296.0) as u64, 0)
    }

    /// Run one action step of `strategy`
    fn act(strategy: Strategy, me: &mut Fighter, opponent: &Fighter, mut rng: StepRng) {
        let mut deferred = TimerQueue::new();
        let mut actor = Actor {
            me,
            opponent,
            target: Entity::from_raw(2),
            rng: &mut rng,
            deferred: &mut deferred,
        };
        run_behavior(strategy, &mut actor);
    }

    // ------------------------------------------------------------------------
    // Aggressive
    // ------------------------------------------------------------------------

    #[test]
    fn test_aggressive_close_range_weights_punch_kick_special() {
        let opponent = fighter(FighterKind::Rocketeer, 200.0);

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Aggressive, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.last_move(), Some(MoveKind::Punch));

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Aggressive, &mut me, &opponent, rolls(0.75));
        assert_eq!(me.last_move(), Some(MoveKind::Kick));

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        me.add_special_energy(50.0);
        act(Strategy::Aggressive, &mut me, &opponent, rolls(0.95));
        assert_eq!(me.last_move(), Some(MoveKind::Special));
        assert_eq!(me.special_energy(), 20.0);
    }

    #[test]
    fn test_aggressive_top_roll_without_energy_does_nothing() {
        let opponent = fighter(FighterKind::Rocketeer, 200.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        me.add_special_energy(29.0);

        act(Strategy::Aggressive, &mut me, &opponent, rolls(0.95));

        assert!(!me.is_attacking());
        assert_eq!(me.last_move(), None);
        assert_eq!(me.vx, 0.0);
    }

    #[test]
    fn test_aggressive_jumps_in_from_far() {
        let opponent = fighter(FighterKind::Rocketeer, 900.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);

        act(Strategy::Aggressive, &mut me, &opponent, rolls(0.3));

        assert_eq!(me.vx, 3.0);
        assert!(!me.grounded);
        assert_eq!(me.vy, -15.0);
    }

    #[test]
    fn test_aggressive_mid_range_only_walks() {
        let opponent = fighter(FighterKind::Rocketeer, 270.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);

        act(Strategy::Aggressive, &mut me, &opponent, rolls(0.0));

        assert_eq!(me.vx, 3.0);
        assert!(me.grounded);
        assert!(!me.is_attacking());
    }

    // ------------------------------------------------------------------------
    // Defensive
    // ------------------------------------------------------------------------

    #[test]
    fn test_defensive_close_range_mostly_strikes() {
        let opponent = fighter(FighterKind::Rocketeer, 200.0);

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Defensive, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.last_move(), Some(MoveKind::Punch));

        // Below the 0.7 strike cut but above the 0.6 jab cut
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Defensive, &mut me, &opponent, rolls(0.65));
        assert_eq!(me.last_move(), Some(MoveKind::Kick));
    }

    #[test]
    fn test_defensive_close_range_retreats_otherwise() {
        let opponent = fighter(FighterKind::Rocketeer, 200.0);

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Defensive, &mut me, &opponent, rolls(0.75));
        assert_eq!(me.vx, -3.0);
        assert!(me.grounded);
        assert!(!me.is_attacking());

        // Rolls 0.75 (retreat) then 0.0 (hop)
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(
            Strategy::Defensive,
            &mut me,
            &opponent,
            StepRng::new(0xC000_0000, 0x4000_0000),
        );
        assert_eq!(me.vx, -3.0);
        assert!(!me.grounded);
        assert!(!me.is_attacking());
    }

    #[test]
    fn test_defensive_mid_range_splits_strike_and_approach() {
        let opponent = fighter(FighterKind::Rocketeer, 260.0);

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Defensive, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.last_move(), Some(MoveKind::Punch));

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Defensive, &mut me, &opponent, rolls(0.85));
        assert!(!me.is_attacking());
        assert_eq!(me.vx, 3.0);
    }

    #[test]
    fn test_defensive_far_range_approaches() {
        let opponent = fighter(FighterKind::Rocketeer, 500.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);

        act(Strategy::Defensive, &mut me, &opponent, rolls(0.0));

        assert!(!me.is_attacking());
        assert_eq!(me.vx, 3.0);
    }

    // ------------------------------------------------------------------------
    // Balanced
    // ------------------------------------------------------------------------

    #[test]
    fn test_balanced_close_range_always_attacks() {
        let opponent = fighter(FighterKind::Rocketeer, 200.0);

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Balanced, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.last_move(), Some(MoveKind::Punch));

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Balanced, &mut me, &opponent, StepRng::new(u64::MAX, 0));
        assert_eq!(me.last_move(), Some(MoveKind::Kick));
    }

    #[test]
    fn test_balanced_mid_range() {
        let opponent = fighter(FighterKind::Rocketeer, 270.0);

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Balanced, &mut me, &opponent, rolls(0.85));
        assert_eq!(me.last_move(), Some(MoveKind::Kick));

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Balanced, &mut me, &opponent, rolls(0.95));
        assert!(!me.is_attacking());
        assert_eq!(me.vx, 3.0);
    }

    #[test]
    fn test_neutral_behaves_like_balanced() {
        let opponent = fighter(FighterKind::Rocketeer, 500.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Neutral, &mut me, &opponent, rolls(0.0));
        assert!(!me.is_attacking());
        assert_eq!(me.vx, 3.0);

        let opponent = fighter(FighterKind::Rocketeer, 200.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Neutral, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.last_move(), Some(MoveKind::Punch));
    }

    // ------------------------------------------------------------------------
    // Special
    // ------------------------------------------------------------------------

    #[test]
    fn test_special_full_meter_throws_ultimate() {
        let opponent = fighter(FighterKind::Rocketeer, 290.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        me.add_special_energy(100.0);

        act(Strategy::Special, &mut me, &opponent, rolls(0.0));

        assert_eq!(me.last_move(), Some(MoveKind::Ultimate));
        assert_eq!(me.special_energy(), 20.0);
    }

    #[test]
    fn test_special_partial_meter_throws_special() {
        let opponent = fighter(FighterKind::Rocketeer, 270.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        me.add_special_energy(SPECIAL_MIN_ENERGY);

        act(Strategy::Special, &mut me, &opponent, rolls(0.0));

        assert_eq!(me.last_move(), Some(MoveKind::Special));
        assert_eq!(me.special_energy(), 0.0);
    }

    #[test]
    fn test_special_out_of_range_falls_back_to_aggressive() {
        // Full meter but beyond ultimate range
        let opponent = fighter(FighterKind::Rocketeer, 310.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        me.add_special_energy(100.0);
        act(Strategy::Special, &mut me, &opponent, rolls(0.5));
        assert!(!me.is_attacking());
        assert_eq!(me.vx, 3.0);
        assert!(me.grounded);

        // Partial meter between special and ultimate range
        let opponent = fighter(FighterKind::Rocketeer, 290.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        me.add_special_energy(50.0);
        act(Strategy::Special, &mut me, &opponent, rolls(0.0));
        assert!(!me.is_attacking());
        assert_eq!(me.special_energy(), 50.0);
        assert_eq!(me.vx, 3.0);

        // Empty meter up close uses the aggressive strike table
        let opponent = fighter(FighterKind::Rocketeer, 200.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Special, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.last_move(), Some(MoveKind::Punch));
    }

    // ------------------------------------------------------------------------
    // Intercept
    // ------------------------------------------------------------------------

    #[test]
    fn test_intercept_far_approaches_and_may_jump() {
        let opponent = fighter(FighterKind::Rocketeer, 300.0);

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Intercept, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.vx, 3.0);
        assert!(!me.grounded);
        assert!(!me.is_attacking());

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Intercept, &mut me, &opponent, rolls(0.5));
        assert_eq!(me.vx, 3.0);
        assert!(me.grounded);
    }

    #[test]
    fn test_intercept_close_strikes() {
        let opponent = fighter(FighterKind::Rocketeer, 210.0);

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Intercept, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.last_move(), Some(MoveKind::Punch));

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Intercept, &mut me, &opponent, rolls(0.65));
        assert_eq!(me.last_move(), Some(MoveKind::Kick));
    }

    // ------------------------------------------------------------------------
    // Pressure
    // ------------------------------------------------------------------------

    #[test]
    fn test_pressure_dashes_in_when_able() {
        let opponent = fighter(FighterKind::Bruiser, 400.0);

        // Above the approach dash cut, below the pressure dash cut
        let mut me = fighter(FighterKind::Rocketeer, 100.0);
        act(Strategy::Pressure, &mut me, &opponent, rolls(0.3));
        assert_eq!(me.vx, 8.0);
        assert!(me.dash_cooldown() > 0.0);

        let mut me = fighter(FighterKind::Rocketeer, 100.0);
        act(Strategy::Pressure, &mut me, &opponent, rolls(0.7));
        assert!(me.vx > 0.0 && me.vx < 8.0);
        assert_eq!(me.dash_cooldown(), 0.0);

        // No dash ability, so only a walk
        let opponent = fighter(FighterKind::Rocketeer, 400.0);
        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Pressure, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.vx, 3.0);
    }

    #[test]
    fn test_pressure_close_range_attack_split() {
        let opponent = fighter(FighterKind::Rocketeer, 180.0);

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Pressure, &mut me, &opponent, rolls(0.0));
        assert_eq!(me.last_move(), Some(MoveKind::Punch));

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Pressure, &mut me, &opponent, rolls(0.65));
        assert_eq!(me.last_move(), Some(MoveKind::Kick));

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        me.add_special_energy(SPECIAL_MIN_ENERGY);
        act(Strategy::Pressure, &mut me, &opponent, rolls(0.9));
        assert_eq!(me.last_move(), Some(MoveKind::Special));

        let mut me = fighter(FighterKind::Bruiser, 100.0);
        act(Strategy::Pressure, &mut me, &opponent, rolls(0.9));
        assert!(!me.is_attacking());
        assert_eq!(me.last_move(), None);
    }
}
