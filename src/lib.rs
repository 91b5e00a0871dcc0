//! Fruit Merge - A falling-fruit merge puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, merges, spawning)
//! - `input`: Key state to player intents
//! - `game`: Per-frame driver and lifecycle hooks
//! - `web`: Browser bindings (wasm32 only)

pub mod game;
pub mod input;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{Game, GameEvent, GamePhase};
pub use input::{Intent, InputState, Key};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Container dimensions (floor at y = 0, centered on x = 0)
    pub const CONTAINER_WIDTH: f32 = 10.0;
    pub const CONTAINER_HEIGHT: f32 = 15.0;
    pub const WALL_THICKNESS: f32 = 0.2;

    /// Downward acceleration, length units per tick²
    pub const GRAVITY: f32 = 0.005;
    /// Overlap required beyond plain contact before two fruits merge
    pub const MERGE_TOLERANCE: f32 = 0.1;

    /// Spawned tiers are drawn from [0, SPAWN_TIER_CAP)
    pub const SPAWN_TIER_CAP: u8 = 4;
    /// Pending fruit hovers this far below the container top
    pub const SPAWN_DROP_MARGIN: f32 = 1.0;
    /// Horizontal distance per move intent
    pub const MOVE_STEP: f32 = 0.2;
    /// Initial downward speed on release, length units per tick
    pub const DROP_SPEED: f32 = 0.1;
    /// Pause between a drop and the next pending fruit
    pub const DROP_DELAY_MS: u32 = 500;
    pub const DROP_DELAY_TICKS: u64 = (DROP_DELAY_MS * TICK_RATE_HZ / 1000) as u64;
}
