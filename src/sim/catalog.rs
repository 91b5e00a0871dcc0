//! Fruit tiers
//!
//! Static table indexed by tier. Radius grows strictly with tier.

use serde::Serialize;

/// Fruit tier level (index into [`FRUITS`])
pub type Tier = u8;

/// A fruit tier definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FruitKind {
    pub tier: Tier,
    pub radius: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub name: &'static str,
}

/// All tiers, smallest first
pub const FRUITS: [FruitKind; 10] = [
    FruitKind {
        tier: 0,
        radius: 0.3,
        color: 0x9b59b6, // Purple
        name: "Grape",
    },
    FruitKind {
        tier: 1,
        radius: 0.4,
        color: 0xe74c3c, // Red
        name: "Cherry",
    },
    FruitKind {
        tier: 2,
        radius: 0.5,
        color: 0xf39c12, // Orange
        name: "Orange",
    },
    FruitKind {
        tier: 3,
        radius: 0.6,
        color: 0xf1c40f, // Yellow
        name: "Lemon",
    },
    FruitKind {
        tier: 4,
        radius: 0.7,
        color: 0x8b4513, // Brown
        name: "Kiwi",
    },
    FruitKind {
        tier: 5,
        radius: 0.8,
        color: 0xff6347, // Tomato red
        name: "Tomato",
    },
    FruitKind {
        tier: 6,
        radius: 0.9,
        color: 0xffb6c1, // Pink
        name: "Peach",
    },
    FruitKind {
        tier: 7,
        radius: 1.0,
        color: 0xffd700, // Gold
        name: "Pineapple",
    },
    FruitKind {
        tier: 8,
        radius: 1.1,
        color: 0x8b4513, // Dark brown
        name: "Coconut",
    },
    FruitKind {
        tier: 9,
        radius: 1.2,
        color: 0x228b22, // Green
        name: "Watermelon",
    },
];

/// Highest tier; fruits of this tier never merge
pub const MAX_TIER: Tier = (FRUITS.len() - 1) as Tier;

/// Look up a tier, saturating at the top tier
#[inline]
pub fn kind(tier: Tier) -> &'static FruitKind {
    &FRUITS[usize::from(tier.min(MAX_TIER))]
}

/// Radius for a tier
#[inline]
pub fn radius(tier: Tier) -> f32 {
    kind(tier).radius
}
