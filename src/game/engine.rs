//! Resolution of a single tick: movement, eating, collisions, progression
use super::effects::{Activation, EffectKind};
use super::food::{Food, FoodKind};
use super::world::SpawnError;
use super::{Game, RunState};
use crate::consts;
use log::{debug, info};
use rand::Rng;
use std::time::Instant;

/// What happened during a tick
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum StepOutcome {
    /// The game was not running
    Skipped,
    /// The snake stayed put because of the freeze effect
    Frozen,
    /// The snake moved without eating
    Moved,
    /// The snake moved onto a food and ate it
    Ate(FoodKind),
    /// The snake ran into itself or an obstacle and the run is over
    Collided,
}

impl<R: Rng> Game<R> {
    /// Advance the game by one tick.
    ///
    /// The order is fixed: expire timed effects, commit the pending
    /// direction, move and eat, check for collisions, then check for level &
    /// speed progression.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a food or obstacle needed to be placed but the grid
    /// had no free cell left.  The run is over in that case.
    pub(crate) fn step(&mut self, now: Instant) -> Result<StepOutcome, SpawnError> {
        if self.state != RunState::Running {
            return Ok(StepOutcome::Skipped);
        }
        let r = self.resolve(now);
        if r.is_err() {
            self.end_run();
        }
        r
    }

    fn resolve(&mut self, now: Instant) -> Result<StepOutcome, SpawnError> {
        for kind in self.effects.tick(now) {
            self.expire(kind);
        }
        if !self.world.turn(self.pending) {
            debug!("Ignored reversal to {:?}", self.pending);
            self.pending = self.world.snake().direction();
        }
        if self.effects.is_active(EffectKind::Freeze) {
            return Ok(StepOutcome::Frozen);
        }
        let head = self.world.push_head();
        let outcome = if let Some((kind, food)) = self.world.foods().at(head) {
            self.eat(kind, food, now)?;
            StepOutcome::Ate(kind)
        } else {
            self.world.drop_tail();
            StepOutcome::Moved
        };
        if !self.effects.is_active(EffectKind::Bonus)
            && (self.world.snake().hits_body() || self.world.head_on_obstacle())
        {
            self.end_run();
            return Ok(StepOutcome::Collided);
        }
        self.progress()?;
        Ok(outcome)
    }

    fn eat(&mut self, kind: FoodKind, food: Food, now: Instant) -> Result<(), SpawnError> {
        self.world.set_food(kind, None);
        let points = food.value.saturating_mul(self.effects.multiplier());
        self.score = self.score.saturating_add(points);
        debug!("Ate {kind} at {} for {points} points", food.pos);
        if let Some(effect) = kind.effect() {
            self.activate(effect, now);
        }
        if kind == FoodKind::Standard {
            let spawned = self.world.spawn_food_wave(&mut self.rng)?;
            debug!("Spawned {spawned:?}");
        }
        Ok(())
    }

    fn activate(&mut self, effect: EffectKind, now: Instant) {
        let activation = self.effects.activate(effect, now);
        debug!("Effect {effect}: {activation:?}");
        match (effect, activation) {
            (EffectKind::Slow, Activation::Started) => {
                self.pace.slow_down();
                debug!("Tick interval slowed to {:?}", self.interval());
            }
            (EffectKind::Shrink, _) => {
                self.world.shrink_snake();
                debug!("Snake shrunk to {} segments", self.world.snake().len());
            }
            _ => (),
        }
    }

    fn expire(&mut self, effect: EffectKind) {
        debug!("Effect {effect} expired");
        if effect == EffectKind::Slow {
            self.pace.restore();
            debug!("Tick interval restored to {:?}", self.interval());
        }
    }

    fn progress(&mut self) -> Result<(), SpawnError> {
        if self.score >= consts::LEVEL_THRESHOLD.saturating_mul(self.level) {
            self.level += 1;
            info!("Reached level {} with score {}", self.level, self.score);
            self.world.regenerate_obstacles(&mut self.rng)?;
        }
        if self.pace.check_speed_up(self.score) {
            info!(
                "Reached speed level {}; tick interval is now {:?}",
                self.speed_level(),
                self.interval()
            );
        }
        Ok(())
    }
}
