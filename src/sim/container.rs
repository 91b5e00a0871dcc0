//! Container geometry and boundary clamps

use serde::{Deserialize, Serialize};

use super::fruit::Fruit;
use crate::consts::*;

/// The box fruits fall into. Floor at y = 0, walls at x = ±width/2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            width: CONTAINER_WIDTH,
            height: CONTAINER_HEIGHT,
            wall_thickness: WALL_THICKNESS,
        }
    }
}

impl Container {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Allowed x range for a fruit center of the given radius
    pub fn x_range(&self, radius: f32) -> (f32, f32) {
        let wall = (self.half_width() - radius).max(0.0);
        (-wall, wall)
    }

    /// Clamp an x coordinate between the walls
    pub fn clamp_x(&self, x: f32, radius: f32) -> f32 {
        let (min, max) = self.x_range(radius);
        x.clamp(min, max)
    }

    /// Where new fruits hover before being dropped
    pub fn spawn_height(&self) -> f32 {
        self.height - SPAWN_DROP_MARGIN
    }

    /// Keep a fruit between the walls and above the floor.
    /// Returns true if the floor had to push it up.
    pub fn confine(&self, fruit: &mut Fruit) -> bool {
        let radius = fruit.radius();
        fruit.pos.x = self.clamp_x(fruit.pos.x, radius);
        if fruit.pos.y < radius {
            fruit.pos.y = radius;
            true
        } else {
            false
        }
    }

    /// Whether a fruit pokes out of the top
    pub fn overflows(&self, fruit: &Fruit) -> bool {
        fruit.top() > self.height
    }
}
