//! Per-tick physics and merging
//!
//! A deliberately simple positional solver:
//! 1. Per fruit in arena order: gravity, floor and wall clamps, then one
//!    overlap correction against resting fruits unless the floor holds it
//! 2. At most one merge, decided by a read-only scan and applied afterwards

use glam::Vec2;
use serde::Serialize;

use super::arena::FruitArena;
use super::catalog::{self, Tier};
use super::container::Container;
use super::fruit::{Fruit, FruitId};
use crate::consts::*;

/// A merge performed during a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergeEvent {
    /// The two fruits that were consumed
    pub removed: [FruitId; 2],
    /// The fruit that replaced them
    pub created: FruitId,
    /// Tier of the created fruit
    pub tier: Tier,
    pub pos: Vec2,
}

/// What happened during one step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Fruits pushed out of a resting neighbour
    pub corrections: usize,
    pub merge: Option<MergeEvent>,
}

/// Owns every fruit in play and advances them one tick at a time
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    container: Container,
    fruits: FruitArena,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(Container::default())
    }
}

impl SimulationEngine {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            fruits: FruitArena::new(),
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn fruits(&self) -> &FruitArena {
        &self.fruits
    }

    pub fn fruit(&self, id: FruitId) -> Option<&Fruit> {
        self.fruits.get(id)
    }

    pub fn fruit_mut(&mut self, id: FruitId) -> Option<&mut Fruit> {
        self.fruits.get_mut(id)
    }

    /// Put a fruit into play
    pub fn add_fruit(&mut self, fruit: Fruit) -> FruitId {
        self.fruits.insert(fruit)
    }

    /// The fruit waiting above the container, if any
    pub fn pending_id(&self) -> Option<FruitId> {
        self.fruits
            .iter()
            .find(|(_, fruit)| fruit.pending)
            .map(|(id, _)| id)
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) -> StepReport {
        let ids = self.fruits.ids().to_vec();

        let mut corrections = 0;
        for &id in &ids {
            let Some(fruit) = self.fruits.get_mut(id) else {
                continue;
            };
            if fruit.pending {
                continue;
            }
            integrate(fruit, &self.container);

            // The floor wins over any neighbour
            let on_floor = fruit.resting;
            if !on_floor && self.resolve_contacts(id, &ids) {
                corrections += 1;
            }
        }

        let merge = self.find_merge_pair().and_then(|(a, b)| self.merge(a, b));

        StepReport { corrections, merge }
    }

    /// Push an airborne fruit out of the resting fruits it overlaps.
    ///
    /// Neighbours later in arena order are seen with last tick's resting flag.
    /// Single pass: a later push may move the fruit back into an earlier partner.
    fn resolve_contacts(&mut self, id: FruitId, ids: &[FruitId]) -> bool {
        let mut touched = false;

        for &other_id in ids {
            if other_id == id {
                continue;
            }
            let Some(other) = self.fruits.get(other_id) else {
                continue;
            };
            if other.pending || !other.resting {
                continue;
            }
            let (other_pos, other_radius) = (other.pos, other.radius());

            let Some(fruit) = self.fruits.get_mut(id) else {
                return false;
            };
            let offset = fruit.pos - other_pos;
            let distance = offset.length();
            let min_distance = fruit.radius() + other_radius;

            if distance < min_distance {
                // Coincident centers separate along +x
                let dir = if distance > f32::EPSILON {
                    offset / distance
                } else {
                    Vec2::X
                };
                fruit.pos += dir * (min_distance - distance);
                fruit.vel.y = 0.0;
                fruit.resting = true;
                touched = true;
            }
        }

        if touched {
            if let Some(fruit) = self.fruits.get_mut(id) {
                self.container.confine(fruit);
            }
        }
        touched
    }

    /// First merge-eligible pair in iteration order
    pub fn find_merge_pair(&self) -> Option<(FruitId, FruitId)> {
        let ids = self.fruits.ids();
        for (i, &a) in ids.iter().enumerate() {
            let Some(fruit_a) = self.fruits.get(a) else {
                continue;
            };
            for &b in &ids[i + 1..] {
                let Some(fruit_b) = self.fruits.get(b) else {
                    continue;
                };
                if merge_eligible(fruit_a, fruit_b) {
                    return Some((a, b));
                }
            }
        }
        None
    }

    /// Replace two same-tier fruits with one fruit of the next tier at their midpoint.
    ///
    /// Returns `None` without touching anything if the pair cannot merge.
    pub fn merge(&mut self, a: FruitId, b: FruitId) -> Option<MergeEvent> {
        if a == b {
            return None;
        }
        let fruit_a = self.fruits.get(a)?;
        let fruit_b = self.fruits.get(b)?;
        if fruit_a.pending || fruit_b.pending {
            return None;
        }
        if fruit_a.tier != fruit_b.tier || !fruit_a.can_merge() {
            return None;
        }

        let tier = fruit_a.tier + 1;
        let mut pos = (fruit_a.pos + fruit_b.pos) * 0.5;
        // The bigger fruit must still fit between the walls
        pos.x = self.container.clamp_x(pos.x, catalog::radius(tier));

        let merged = Fruit::new(tier, pos).at_rest();
        let created = self.fruits.replace_pair(a, b, merged)?;

        log::debug!(
            "Merged two {} into {} at ({:.2}, {:.2})",
            catalog::kind(tier - 1).name,
            catalog::kind(tier).name,
            pos.x,
            pos.y
        );

        Some(MergeEvent {
            removed: [a, b],
            created,
            tier,
            pos,
        })
    }

    /// Resting fruits sticking out of the top of the container
    pub fn overflowing(&self) -> Vec<FruitId> {
        self.fruits
            .iter()
            .filter(|(_, fruit)| !fruit.pending && fruit.resting)
            .filter(|(_, fruit)| self.container.overflows(fruit))
            .map(|(id, _)| id)
            .collect()
    }

    /// Release every fruit, returning how many there were
    pub fn dispose(&mut self) -> usize {
        let released = self.fruits.clear();
        log::info!("Released {} fruits", released);
        released
    }
}

/// Gravity, then floor and wall constraints
fn integrate(fruit: &mut Fruit, container: &Container) {
    let radius = fruit.radius();

    fruit.vel.y -= GRAVITY;
    let new_y = fruit.pos.y + fruit.vel.y;

    if new_y <= radius {
        fruit.pos.y = radius;
        fruit.vel.y = 0.0;
        fruit.resting = true;
    } else {
        fruit.pos.y = new_y;
        fruit.resting = false;
    }

    fruit.pos.x = container.clamp_x(fruit.pos.x, radius);
}

/// Two resting fruits of the same mergeable tier, overlapping by more than the tolerance
pub fn merge_eligible(a: &Fruit, b: &Fruit) -> bool {
    !a.pending
        && !b.pending
        && a.resting
        && b.resting
        && a.tier == b.tier
        && a.can_merge()
        && a.pos.distance(b.pos) < a.radius() + b.radius() - MERGE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::MAX_TIER;
    use proptest::prelude::*;

    fn resting(tier: Tier, x: f32, y: f32) -> Fruit {
        Fruit::new(tier, Vec2::new(x, y)).at_rest()
    }

    #[test]
    fn test_falling_fruit_lands_on_floor() {
        let mut engine = SimulationEngine::default();
        let fruit = Fruit::new(0, Vec2::new(0.0, 0.35)).with_vel(Vec2::new(0.0, -0.1));
        let id = engine.add_fruit(fruit);

        engine.step();

        let fruit = engine.fruit(id).unwrap();
        assert!((fruit.pos.y - 0.3).abs() < 1e-6);
        assert_eq!(fruit.vel.y, 0.0);
        assert!(fruit.resting);
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut engine = SimulationEngine::default();
        let id = engine.add_fruit(Fruit::new(0, Vec2::new(0.0, 10.0)));

        engine.step();
        engine.step();

        let fruit = engine.fruit(id).unwrap();
        assert!((fruit.vel.y + 2.0 * GRAVITY).abs() < 1e-6);
        assert!((fruit.pos.y - (10.0 - 3.0 * GRAVITY)).abs() < 1e-5);
        assert!(!fruit.resting);
    }

    #[test]
    fn test_unsupported_fruit_starts_falling_again() {
        let mut engine = SimulationEngine::default();
        let id = engine.add_fruit(resting(2, 0.0, 3.0));

        engine.step();

        let fruit = engine.fruit(id).unwrap();
        assert!(!fruit.resting);
        assert!(fruit.pos.y < 3.0);
    }

    #[test]
    fn test_walls_clamp_x() {
        let mut engine = SimulationEngine::default();
        let left = engine.add_fruit(Fruit::new(3, Vec2::new(-9.0, 5.0)));
        let right = engine.add_fruit(Fruit::new(3, Vec2::new(9.0, 5.0)));

        engine.step();

        assert!((engine.fruit(left).unwrap().pos.x + 4.4).abs() < 1e-6);
        assert!((engine.fruit(right).unwrap().pos.x - 4.4).abs() < 1e-6);
    }

    #[test]
    fn test_pending_fruit_is_ignored() {
        let mut engine = SimulationEngine::default();
        let id = engine.add_fruit(Fruit::pending(0, Vec2::new(0.0, 14.0)));
        engine.add_fruit(resting(0, 0.0, 14.0));

        engine.step();

        let fruit = engine.fruit(id).unwrap();
        assert_eq!(fruit.pos, Vec2::new(0.0, 14.0));
        assert_eq!(fruit.vel, Vec2::ZERO);
        assert!(fruit.pending);
        assert_eq!(engine.pending_id(), Some(id));
    }

    #[test]
    fn test_falling_fruit_stops_on_resting_fruit() {
        let mut engine = SimulationEngine::default();
        engine.add_fruit(resting(1, 0.0, 0.4));
        let fruit = Fruit::new(1, Vec2::new(0.0, 1.2)).with_vel(Vec2::new(0.0, -0.1));
        let id = engine.add_fruit(fruit);

        let report = engine.step();

        assert_eq!(report.corrections, 1);
        assert!(report.merge.is_none());
        let fruit = engine.fruit(id).unwrap();
        assert!(fruit.resting);
        assert_eq!(fruit.vel.y, 0.0);
        assert!((fruit.pos.y - 1.2).abs() < 1e-5, "y = {}", fruit.pos.y);
        assert_eq!(engine.fruits().len(), 2);
    }

    #[test]
    fn test_stacked_fruit_stays_resting() {
        let mut engine = SimulationEngine::default();
        let bottom = engine.add_fruit(resting(2, 0.0, 0.5));
        let top = engine.add_fruit(resting(0, 0.0, 1.3));

        for tick in 0..100 {
            engine.step();
            let fruit = engine.fruit(top).unwrap();
            assert!(fruit.resting, "top fell at tick {}", tick);
            assert!((fruit.pos.y - 1.3).abs() < 1e-5, "tick {}: y = {}", tick, fruit.pos.y);
            assert!(engine.fruit(bottom).unwrap().resting);
        }
    }

    #[test]
    fn test_fruit_lands_on_stack_when_first_in_order() {
        let mut engine = SimulationEngine::default();
        let top = engine.add_fruit(Fruit::new(0, Vec2::new(0.0, 2.6)));
        let middle = engine.add_fruit(resting(1, 0.0, 1.4));
        engine.add_fruit(resting(2, 0.0, 0.5));

        for tick in 0..300 {
            assert!(engine.step().merge.is_none());
            let middle = engine.fruit(middle).unwrap();
            assert!(middle.resting, "middle fell at tick {}", tick);
            assert!((middle.pos.y - 1.4).abs() < 1e-5);
        }

        let top = engine.fruit(top).unwrap();
        let middle = engine.fruit(middle).unwrap();
        assert!(top.resting);
        assert!((top.pos.y - 2.1).abs() < 1e-4, "y = {}", top.pos.y);
        assert!(top.pos.distance(middle.pos) >= 0.7 - 1e-4);
    }

    #[test]
    fn test_overlapping_resting_pair_merges_in_one_step() {
        let mut engine = SimulationEngine::default();
        engine.add_fruit(resting(0, -0.225, 0.3));
        engine.add_fruit(resting(0, 0.225, 0.3));

        let report = engine.step();

        let merge = report.merge.expect("pair should merge");
        assert_eq!(merge.tier, 1);
        assert_eq!(engine.fruits().len(), 1);

        let merged = engine.fruit(merge.created).unwrap();
        assert_eq!(merged.tier, 1);
        assert!(merged.resting);
        assert_eq!(merged.vel, Vec2::ZERO);
        assert!(merged.pos.x.abs() < 1e-6);
        assert!((merged.pos.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_plain_contact_does_not_merge() {
        let mut engine = SimulationEngine::default();
        engine.add_fruit(resting(0, -0.28, 0.3));
        engine.add_fruit(resting(0, 0.28, 0.3));

        assert!(engine.step().merge.is_none());
        assert_eq!(engine.fruits().len(), 2);
    }

    #[test]
    fn test_one_merge_per_step() {
        let mut engine = SimulationEngine::default();
        engine.add_fruit(resting(0, -3.0, 0.3));
        engine.add_fruit(resting(0, -2.6, 0.3));
        engine.add_fruit(resting(2, 2.0, 0.5));
        engine.add_fruit(resting(2, 2.5, 0.5));

        let first = engine.step().merge.expect("first pair merges");
        assert_eq!(first.tier, 1);
        assert_eq!(engine.fruits().len(), 3);

        let second = engine.step().merge.expect("second pair merges");
        assert_eq!(second.tier, 3);
        assert_eq!(engine.fruits().len(), 2);
    }

    #[test]
    fn test_merge_midpoint_and_count() {
        let mut engine = SimulationEngine::default();
        let a = engine.add_fruit(resting(2, 1.0, 0.5));
        let b = engine.add_fruit(resting(2, 1.6, 0.7));
        let c = engine.add_fruit(resting(5, -3.0, 0.8));

        let event = engine.merge(a, b).unwrap();

        assert_eq!(engine.fruits().len(), 2);
        assert_eq!(event.removed, [a, b]);
        assert!(!engine.fruits().contains(a));
        assert!(!engine.fruits().contains(b));
        assert_eq!(engine.fruits().ids(), &[event.created, c]);

        let merged = engine.fruit(event.created).unwrap();
        assert_eq!(merged.tier, 3);
        assert!((merged.pos - Vec2::new(1.3, 0.6)).length() < 1e-5);
    }

    #[test]
    fn test_merge_rejects_invalid_pairs() {
        let mut engine = SimulationEngine::default();
        let a = engine.add_fruit(resting(1, 0.0, 0.4));
        let b = engine.add_fruit(resting(2, 0.3, 0.5));
        let top_a = engine.add_fruit(resting(MAX_TIER, -3.0, 1.2));
        let top_b = engine.add_fruit(resting(MAX_TIER, -2.5, 1.2));

        assert!(engine.merge(a, b).is_none());
        assert!(engine.merge(a, a).is_none());
        assert!(engine.merge(top_a, top_b).is_none());
        assert_eq!(engine.fruits().len(), 4);
    }

    #[test]
    fn test_top_tier_pair_never_merges_in_step() {
        let mut engine = SimulationEngine::default();
        engine.add_fruit(resting(MAX_TIER, -0.5, 1.2));
        engine.add_fruit(resting(MAX_TIER, 0.5, 1.2));

        assert!(engine.find_merge_pair().is_none());
        assert!(engine.step().merge.is_none());
        assert_eq!(engine.fruits().len(), 2);
    }

    #[test]
    fn test_merge_near_wall_stays_inside() {
        let mut engine = SimulationEngine::default();
        let a = engine.add_fruit(resting(3, 4.4, 0.6));
        let b = engine.add_fruit(resting(3, 4.3, 0.6));

        let event = engine.merge(a, b).unwrap();
        let merged = engine.fruit(event.created).unwrap();
        assert!(merged.pos.x <= 5.0 - merged.radius());
    }

    #[test]
    fn test_overflowing() {
        let mut engine = SimulationEngine::default();
        let high = engine.add_fruit(resting(4, 0.0, 14.6));
        engine.add_fruit(resting(0, 2.0, 0.3));
        engine.add_fruit(Fruit::pending(3, Vec2::new(0.0, 14.9)));

        assert_eq!(engine.overflowing(), vec![high]);
    }

    #[test]
    fn test_dispose_releases_everything() {
        let mut engine = SimulationEngine::default();
        engine.add_fruit(resting(0, 0.0, 0.3));
        engine.add_fruit(Fruit::pending(1, Vec2::new(0.0, 14.0)));

        assert_eq!(engine.dispose(), 2);
        assert!(engine.fruits().is_empty());
        assert!(engine.pending_id().is_none());
    }

    fn fruit_strategy() -> impl Strategy<Value = (u8, f32, f32, bool)> {
        (0u8..5, -6.0f32..6.0, 0.0f32..14.0, any::<bool>())
    }

    /// A vertical column of distinct tiers with gaps, inserted in any order
    fn column_strategy() -> impl Strategy<Value = (f32, Vec<Tier>, Vec<f32>, Vec<usize>)> {
        let tiers: Vec<Tier> = (0..=MAX_TIER).collect();
        prop::sample::subsequence(tiers, 2..=4)
            .prop_shuffle()
            .prop_flat_map(|tiers| {
                let n = tiers.len();
                (
                    -2.5f32..2.5,
                    Just(tiers),
                    prop::collection::vec(0.05f32..1.0, n),
                    Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
                )
            })
    }

    proptest! {
        #[test]
        fn prop_fruits_stay_inside_container(
            fruits in prop::collection::vec(fruit_strategy(), 1..12),
            ticks in 1usize..200,
        ) {
            let mut engine = SimulationEngine::default();
            for (tier, x, y, rest) in fruits {
                let fruit = Fruit::new(tier, Vec2::new(x, y));
                engine.add_fruit(if rest { fruit.at_rest() } else { fruit });
            }

            let container = *engine.container();
            for _ in 0..ticks {
                let report = engine.step();
                let created = report.merge.map(|m| m.created);

                for (id, fruit) in engine.fruits().iter() {
                    let (min, max) = container.x_range(fruit.radius());
                    prop_assert!(fruit.pos.x >= min && fruit.pos.x <= max);
                    // A fresh merge sits at its parents' midpoint until the next tick
                    if Some(id) != created {
                        prop_assert!(fruit.pos.y >= fruit.radius());
                    }
                }
            }
        }

        #[test]
        fn prop_settled_column_does_not_overlap((x, tiers, gaps, order) in column_strategy()) {
            let mut heights = Vec::with_capacity(tiers.len());
            let mut top = 0.0;
            for (&tier, &gap) in tiers.iter().zip(&gaps) {
                let radius = catalog::radius(tier);
                let y = top + gap + radius;
                heights.push(y);
                top = y + radius;
            }

            let mut engine = SimulationEngine::default();
            let mut ids = vec![None; tiers.len()];
            for &i in &order {
                ids[i] = Some(engine.add_fruit(Fruit::new(tiers[i], Vec2::new(x, heights[i]))));
            }

            for _ in 0..600 {
                prop_assert!(engine.step().merge.is_none());
            }

            let column: Vec<&Fruit> = ids
                .iter()
                .flatten()
                .filter_map(|&id| engine.fruit(id))
                .collect();
            prop_assert_eq!(column.len(), tiers.len());
            prop_assert!((column[0].pos.y - column[0].radius()).abs() < 1e-5);
            for fruit in &column {
                prop_assert!(fruit.resting);
            }
            for pair in column.windows(2) {
                let gap = pair[1].pos.distance(pair[0].pos) - pair[0].radius() - pair[1].radius();
                prop_assert!(gap.abs() < 1e-3, "gap between stacked fruits: {}", gap);
                prop_assert!(pair[1].pos.y > pair[0].pos.y);
            }
        }
    }
}
