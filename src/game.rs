//! Per-frame game driver
//!
//! Glues input, spawning and the simulation together in a fixed order:
//! intents → move/drop → engine step → scheduled spawn → overflow check.

use serde::Serialize;

use crate::input::{InputState, Intent};
use crate::sim::{
    Container, FruitId, FruitView, MergeEvent, NextFruit, SimulationEngine, SpawnController, Tier,
    fruit_views,
};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Created or disposed, waiting for `init`
    Ready,
    /// Active gameplay
    Playing,
    /// A resting fruit poked out of the container top
    GameOver,
}

/// Things the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    Spawned { id: FruitId, tier: Tier },
    Dropped { id: FruitId, x: f32 },
    Merged(MergeEvent),
    GameOver { tick: u64, fruits: usize },
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub merges: u32,
    pub next: NextFruit,
    pub fruits: Vec<FruitView>,
}

/// A single run of the game
#[derive(Debug, Clone)]
pub struct Game {
    engine: SimulationEngine,
    spawner: SpawnController,
    input: InputState,
    phase: GamePhase,
    /// Simulation tick counter
    time_ticks: u64,
    merges: u32,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self::with_container(seed, Container::default())
    }

    pub fn with_container(seed: u64, container: Container) -> Self {
        Self {
            engine: SimulationEngine::new(container),
            spawner: SpawnController::new(seed),
            input: InputState::new(),
            phase: GamePhase::Ready,
            time_ticks: 0,
            merges: 0,
            events: Vec::new(),
        }
    }

    /// Start a run: empty container, first fruit waiting at the top.
    ///
    /// Calling it again restarts from the same seed.
    pub fn init(&mut self) {
        if self.phase != GamePhase::Ready {
            self.dispose();
        }
        self.spawner = SpawnController::new(self.spawner.seed());
        self.time_ticks = 0;
        self.merges = 0;

        if let Some(id) = self.spawner.spawn_next(&mut self.engine) {
            self.push_spawned(id);
        }
        self.phase = GamePhase::Playing;
        log::info!("Started run with seed {}", self.spawner.seed());
    }

    /// Advance one frame using the current key state
    pub fn update(&mut self) {
        let intent = self.input.take_intent();
        self.tick(intent);
    }

    /// Advance one frame with an explicit intent
    pub fn tick(&mut self, intent: Intent) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.time_ticks += 1;
        let now = self.time_ticks;

        if intent.direction != 0 {
            self.spawner.move_active(&mut self.engine, intent.direction);
        }
        if intent.drop {
            if let Some(id) = self.spawner.drop(&mut self.engine, now) {
                let x = self.engine.fruit(id).map_or(0.0, |fruit| fruit.pos.x);
                self.events.push(GameEvent::Dropped { id, x });
            }
        }

        let report = self.engine.step();
        if let Some(merge) = report.merge {
            self.merges += 1;
            self.events.push(GameEvent::Merged(merge));
        }

        if let Some(id) = self.spawner.poll(&mut self.engine, now) {
            self.push_spawned(id);
        }

        let overflowing = self.engine.overflowing();
        if !overflowing.is_empty() {
            let fruits = self.engine.fruits().len();
            log::warn!(
                "Game over at tick {}: {} fruit(s) above the rim, {} in play",
                now,
                overflowing.len(),
                fruits
            );
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver { tick: now, fruits });
        }
    }

    /// Release every fruit and return to `Ready`
    pub fn dispose(&mut self) {
        self.engine.dispose();
        self.spawner.reset();
        self.input.clear();
        self.events.clear();
        self.phase = GamePhase::Ready;
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn spawner(&self) -> &SpawnController {
        &self.spawner
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn merges(&self) -> u32 {
        self.merges
    }

    /// Tier the player will get after the current fruit
    pub fn next_tier(&self) -> Tier {
        self.spawner.next_tier()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            merges: self.merges,
            next: NextFruit::new(self.spawner.next_tier()),
            fruits: fruit_views(&self.engine),
        }
    }

    fn push_spawned(&mut self, id: FruitId) {
        let tier = self.engine.fruit(id).map_or(0, |fruit| fruit.tier);
        self.events.push(GameEvent::Spawned { id, tier });
    }
}
