//! Fruit storage with stable handles
//!
//! Fruits live in a generational slot map; a separate list keeps the
//! iteration order so scans are deterministic for a given history.

use slotmap::SlotMap;

use super::fruit::{Fruit, FruitId};

#[derive(Debug, Default, Clone)]
pub struct FruitArena {
    slots: SlotMap<FruitId, Fruit>,
    order: Vec<FruitId>,
}

impl FruitArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append a fruit at the end of the iteration order
    pub fn insert(&mut self, fruit: Fruit) -> FruitId {
        let id = self.slots.insert(fruit);
        self.order.push(id);
        id
    }

    /// Remove two fruits and put `fruit` where the earlier of them was
    pub fn replace_pair(&mut self, a: FruitId, b: FruitId, fruit: Fruit) -> Option<FruitId> {
        if a == b || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let pos_a = self.position(a)?;
        let pos_b = self.position(b)?;
        let (first, second) = if pos_a < pos_b { (pos_a, pos_b) } else { (pos_b, pos_a) };

        self.slots.remove(a);
        self.slots.remove(b);
        let id = self.slots.insert(fruit);
        self.order.remove(second);
        self.order[first] = id;
        Some(id)
    }

    pub fn contains(&self, id: FruitId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn get(&self, id: FruitId) -> Option<&Fruit> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: FruitId) -> Option<&mut Fruit> {
        self.slots.get_mut(id)
    }

    /// Handles in iteration order
    pub fn ids(&self) -> &[FruitId] {
        &self.order
    }

    /// Fruits in iteration order
    pub fn iter(&self) -> impl Iterator<Item = (FruitId, &Fruit)> + '_ {
        self.order.iter().map(move |&id| (id, &self.slots[id]))
    }

    /// Drop every fruit, returning how many were released
    pub fn clear(&mut self) -> usize {
        let released = self.order.len();
        self.slots.clear();
        self.order.clear();
        released
    }

    fn position(&self, id: FruitId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }
}
