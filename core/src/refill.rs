//! Random tile generation for hand refills.
//!
//! The number of constrained neighbors on a new tile is drawn by roulette
//! selection over logistic weights. Each weight ramps from 0 to 1 as the
//! level passes its center, so higher levels favor tiles with more
//! neighbors.

use rand::prelude::*;

use crate::*;

/// Chance that a new tile is an area tile.
pub const AREA_CHANCE: f64 = 1.0 / 20.0;

/// Chance that an area tile is upgraded to a fill tile.
pub const FILL_CHANCE: f64 = 1.0 / 5.0;

/// Logistic tuning for a band of levels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RefillTier {
    /// Highest level this tier covers.
    pub max_level: Level,
    /// Logistic center per neighbor count, index 0 being a plain tile.
    pub centers: &'static [f64],
    pub divisor: f64,
}

pub const REFILL_TIERS: [RefillTier; 3] = [
    RefillTier {
        max_level: 10,
        centers: &[-10.0, 0.0, 5.0, 10.0],
        divisor: 2.0,
    },
    RefillTier {
        max_level: 100,
        centers: &[-100.0, 11.0, 40.0, 80.0, 120.0],
        divisor: 20.0,
    },
    RefillTier {
        max_level: 1000,
        centers: &[-1000.0, 200.0, 400.0, 600.0, 800.0, 999.0],
        divisor: 200.0,
    },
];

impl RefillTier {
    /// Tier for `level`; levels past the table reuse the last tier.
    pub fn for_level(level: Level) -> &'static RefillTier {
        REFILL_TIERS
            .iter()
            .find(|tier| level <= tier.max_level)
            .unwrap_or(&REFILL_TIERS[REFILL_TIERS.len() - 1])
    }

    /// Unnormalized roulette weight per neighbor count.
    pub fn weights(&self, level: Level) -> Vec<f64> {
        let level = f64::from(level);
        self.centers
            .iter()
            .map(|center| 1.0 / (1.0 + (-(level - center) / self.divisor).exp()))
            .collect()
    }
}

/// Picks an index with probability proportional to its weight.
pub fn roulette(rng: &mut StdRng, weights: &[f64]) -> usize {
    let sum: f64 = weights.iter().sum();
    let mut r = rng.random::<f64>() * sum;
    for (index, weight) in weights.iter().enumerate() {
        r -= weight;
        if r < 0.0 {
            return index;
        }
    }
    // only reachable through rounding at the very top of the wheel
    weights.len().saturating_sub(1)
}

pub fn roll_neighbor_count(rng: &mut StdRng, level: Level) -> usize {
    let tier = RefillTier::for_level(level);
    roulette(rng, &tier.weights(level))
}

pub fn roll_kind(rng: &mut StdRng) -> TileKind {
    if rng.random_bool(AREA_CHANCE) {
        if rng.random_bool(FILL_CHANCE) {
            TileKind::Fill
        } else {
            TileKind::Area
        }
    } else {
        TileKind::Simple
    }
}

/// Pattern with `count` distinct random slots, each with a random palette color.
pub fn random_pattern(rng: &mut StdRng, count: usize, palette: &[Color]) -> Pattern {
    let count = count.min(Pattern::SLOTS);
    let mut slots = [None; Pattern::SLOTS];
    for index in rand::seq::index::sample(rng, Pattern::SLOTS, count) {
        slots[index] = Some(random_color(rng, palette.len()));
    }
    Pattern::new(slots)
}

/// A fresh hand tile for `level`.
pub fn random_hand_tile(rng: &mut StdRng, level: Level) -> Tile {
    let palette = palette_for_level(level);
    let neighbors = roll_neighbor_count(rng, level);
    let kind = roll_kind(rng);
    let color = random_color(rng, palette.len());
    log::trace!(
        "Refill at level {}: {:?} tile, {} neighbors",
        level,
        kind,
        neighbors
    );
    if neighbors == 0 {
        Tile::new(color, kind)
    } else {
        Tile::constrained(color, kind, random_pattern(rng, neighbors, palette))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_cover_all_levels() {
        assert_eq!(RefillTier::for_level(1).max_level, 10);
        assert_eq!(RefillTier::for_level(10).max_level, 10);
        assert_eq!(RefillTier::for_level(11).max_level, 100);
        assert_eq!(RefillTier::for_level(1000).max_level, 1000);
        assert_eq!(RefillTier::for_level(5000).max_level, 1000);
    }

    #[test]
    fn low_levels_favor_plain_tiles() {
        let weights = RefillTier::for_level(5).weights(5);
        assert_eq!(weights.len(), 4);
        assert!(weights[0] > 0.99);
        assert!((weights[2] - 0.5).abs() < 1e-9);
        assert!(weights.windows(2).all(|pair| pair[0] > pair[1]));

        let mut rng = StdRng::seed_from_u64(5);
        let mut counts = [0usize; 4];
        for _ in 0..10_000 {
            counts[roll_neighbor_count(&mut rng, 5)] += 1;
        }
        assert!(counts[0] > counts[1]);
        assert!(counts[1] > counts[2]);
        assert!(counts[2] > counts[3]);
    }

    #[test]
    fn roulette_respects_zero_weights() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1_000 {
            assert_eq!(roulette(&mut rng, &[0.0, 3.0, 0.0]), 1);
        }
    }

    #[test]
    fn random_pattern_uses_distinct_slots() {
        let mut rng = StdRng::seed_from_u64(3);
        for count in 1..=Pattern::SLOTS {
            let pattern = random_pattern(&mut rng, count, palette_for_level(1));
            assert_eq!(pattern.constraint_count(), count);
            assert!(pattern.constraints().all(|(_, color)| palette_for_level(1).contains(&color)));
        }
    }

    #[test]
    fn hand_tiles_match_neighbor_roll() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut kinds = [0usize; 3];
        for _ in 0..5_000 {
            let tile = random_hand_tile(&mut rng, 150);
            assert!(palette_for_level(150).contains(&tile.color()));
            if let Some(pattern) = tile.pattern() {
                assert!((1..=5).contains(&pattern.constraint_count()));
            }
            kinds[tile.kind() as usize] += 1;
        }
        // roughly 95% simple, 4% area, 1% fill
        assert!(kinds[0] > 4_500);
        assert!(kinds[1] > kinds[2]);
        assert!(kinds[2] > 0);
    }
}
