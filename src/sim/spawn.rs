//! Pending fruit control
//!
//! Only one fruit waits above the container at a time. After a drop the
//! next one is scheduled for a later tick instead of appearing at once,
//! so the player cannot chain drops faster than the delay.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::catalog::{self, Tier};
use super::engine::SimulationEngine;
use super::fruit::{Fruit, FruitId};
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct SpawnController {
    seed: u64,
    rng: Pcg32,
    /// Tier of the fruit the next spawn will create
    next_tier: Tier,
    pending: Option<FruitId>,
    /// Tick at which the next pending fruit appears
    spawn_due: Option<u64>,
}

impl SpawnController {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_tier: 0,
            pending: None,
            spawn_due: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Tier of the upcoming fruit, for the "next fruit" indicator
    pub fn next_tier(&self) -> Tier {
        self.next_tier
    }

    /// When the next pending fruit is due, if a drop scheduled one
    pub fn spawn_due(&self) -> Option<u64> {
        self.spawn_due
    }

    /// The pending fruit, if it is still in play and still pending
    pub fn pending(&self, engine: &SimulationEngine) -> Option<FruitId> {
        self.pending
            .filter(|&id| engine.fruit(id).is_some_and(|fruit| fruit.pending))
    }

    /// Create the pending fruit from the current hint and roll a new hint.
    ///
    /// Does nothing while another fruit is pending.
    pub fn spawn_next(&mut self, engine: &mut SimulationEngine) -> Option<FruitId> {
        if self.pending(engine).is_some() {
            return None;
        }

        let tier = self.next_tier;
        let pos = Vec2::new(0.0, engine.container().spawn_height());
        let id = engine.add_fruit(Fruit::pending(tier, pos));
        self.pending = Some(id);

        self.next_tier = self.rng.random_range(0..SPAWN_TIER_CAP);
        log::debug!(
            "Spawned {}, next up: {}",
            catalog::kind(tier).name,
            catalog::kind(self.next_tier).name
        );

        Some(id)
    }

    /// Slide the pending fruit sideways. `direction` is clamped to -1..=1.
    pub fn move_active(&self, engine: &mut SimulationEngine, direction: i8) -> bool {
        let Some(id) = self.pending(engine) else {
            return false;
        };
        let container = *engine.container();
        let Some(fruit) = engine.fruit_mut(id) else {
            return false;
        };

        let step = MOVE_STEP * f32::from(direction.signum());
        fruit.pos.x = container.clamp_x(fruit.pos.x + step, fruit.radius());
        true
    }

    /// Release the pending fruit into physics and schedule the next one.
    ///
    /// Returns the released fruit, or `None` if nothing was pending.
    pub fn drop(&mut self, engine: &mut SimulationEngine, now_tick: u64) -> Option<FruitId> {
        let id = self.pending(engine)?;
        let fruit = engine.fruit_mut(id)?;

        fruit.release(Vec2::new(0.0, -DROP_SPEED));
        self.pending = None;
        self.spawn_due = Some(now_tick + DROP_DELAY_TICKS);

        log::debug!(
            "Dropped {} at x={:.2}, next spawn at tick {}",
            fruit.kind().name,
            fruit.pos.x,
            now_tick + DROP_DELAY_TICKS
        );

        Some(id)
    }

    /// Spawn the scheduled fruit once its tick has come
    pub fn poll(&mut self, engine: &mut SimulationEngine, now_tick: u64) -> Option<FruitId> {
        match self.spawn_due {
            Some(due) if now_tick >= due => {
                self.spawn_due = None;
                self.spawn_next(engine)
            }
            _ => None,
        }
    }

    /// Forget the pending fruit and any scheduled spawn
    pub fn reset(&mut self) {
        self.pending = None;
        self.spawn_due = None;
    }
}
