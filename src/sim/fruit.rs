//! Fruit entity
//!
//! Position and velocity are in container units, floor at y = 0.
//! Velocity is per tick, not per second.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use super::catalog::{self, FruitKind, MAX_TIER, Tier};

new_key_type! {
    /// Stable handle for a fruit in the arena
    pub struct FruitId;
}

/// Where a fruit is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitPhase {
    /// Hovering above the container, moved by the player
    Pending,
    /// Under gravity, not supported this tick
    Falling,
    /// Supported by the floor or another resting fruit
    Resting,
}

/// A fruit in the container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fruit {
    pub tier: Tier,
    pub pos: Vec2,
    pub vel: Vec2,
    pub resting: bool,
    /// Excluded from physics and merges while set
    pub pending: bool,
}

impl Fruit {
    /// A fruit under physics, falling
    pub fn new(tier: Tier, pos: Vec2) -> Self {
        Self {
            tier: tier.min(MAX_TIER),
            pos,
            vel: Vec2::ZERO,
            resting: false,
            pending: false,
        }
    }

    /// A fruit waiting for the player to drop it
    pub fn pending(tier: Tier, pos: Vec2) -> Self {
        Self {
            pending: true,
            ..Self::new(tier, pos)
        }
    }

    /// Same fruit, already resting
    pub fn at_rest(mut self) -> Self {
        self.resting = true;
        self
    }

    /// Same fruit, with a velocity
    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        catalog::radius(self.tier)
    }

    #[inline]
    pub fn kind(&self) -> &'static FruitKind {
        catalog::kind(self.tier)
    }

    pub fn phase(&self) -> FruitPhase {
        if self.pending {
            FruitPhase::Pending
        } else if self.resting {
            FruitPhase::Resting
        } else {
            FruitPhase::Falling
        }
    }

    /// Whether this fruit can still grow by merging
    pub fn can_merge(&self) -> bool {
        self.tier < MAX_TIER
    }

    /// Top edge of the fruit
    pub fn top(&self) -> f32 {
        self.pos.y + self.radius()
    }

    /// Release from pending into physics with an initial velocity
    pub fn release(&mut self, vel: Vec2) {
        self.pending = false;
        self.resting = false;
        self.vel = vel;
    }
}
