//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (arena order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod catalog;
pub mod container;
pub mod engine;
pub mod fruit;
pub mod snapshot;
pub mod spawn;

pub use arena::FruitArena;
pub use catalog::{FRUITS, FruitKind, MAX_TIER, Tier};
pub use container::Container;
pub use engine::{MergeEvent, SimulationEngine, StepReport, merge_eligible};
pub use fruit::{Fruit, FruitId, FruitPhase};
pub use snapshot::{FruitView, NextFruit, fruit_views};
pub use spawn::SpawnController;
