//! Read-only view of the simulation for the presentation layer

use serde::Serialize;

use super::catalog::{self, Tier};
use super::engine::SimulationEngine;
use super::fruit::{Fruit, FruitId, FruitPhase};

/// One fruit as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FruitView {
    pub id: FruitId,
    pub tier: Tier,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: u32,
    /// Still hovering above the container
    pub pending: bool,
    pub phase: FruitPhase,
}

impl FruitView {
    pub fn new(id: FruitId, fruit: &Fruit) -> Self {
        let kind = fruit.kind();
        Self {
            id,
            tier: fruit.tier,
            x: fruit.pos.x,
            y: fruit.pos.y,
            radius: kind.radius,
            color: kind.color,
            pending: fruit.pending,
            phase: fruit.phase(),
        }
    }
}

/// Views of every fruit, in iteration order
pub fn fruit_views(engine: &SimulationEngine) -> Vec<FruitView> {
    engine
        .fruits()
        .iter()
        .map(|(id, fruit)| FruitView::new(id, fruit))
        .collect()
}

/// The "next fruit" indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextFruit {
    pub tier: Tier,
    pub name: &'static str,
    pub color: u32,
}

impl NextFruit {
    pub fn new(tier: Tier) -> Self {
        let kind = catalog::kind(tier);
        Self {
            tier: kind.tier,
            name: kind.name,
            color: kind.color,
        }
    }
}
