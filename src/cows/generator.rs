//! Creature generator: turns one seeded draw sequence into a new cow.
//!
//! Draw order is fixed (sprite, name, stats, pitch) so a seed always yields
//! the same cow for a given sibling list.

use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

use crate::data::cows::*;
use crate::rng::{round2, SeededStream};
use crate::shared::*;

/// Builds a fresh level-1 cow from the draw sequence of `seed`, which is also
/// recorded on the cow.
pub fn generate_cow(seed: u64, siblings: &[Cow], now: DateTime<Utc>) -> Cow {
    let mut stream = SeededStream::new(seed);
    let sprite = roll_sprite(&mut stream);
    let name = roll_name(&mut stream, siblings);
    let stats = roll_stats(&mut stream, &sprite);
    let pitch = round2(stream.range(PITCH_RANGE.0, PITCH_RANGE.1)) as f32;
    let yesterday = now - Duration::days(1);

    Cow {
        id: Uuid::new_v4(),
        seed,
        sprite,
        name,
        level: 1,
        xp: 0,
        hearts: 0,
        pitch,
        last_pet: yesterday,
        last_decay_check: yesterday,
        stats,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sprite
// ─────────────────────────────────────────────────────────────────────────────

pub fn roll_sprite(stream: &mut SeededStream) -> SpriteInfo {
    let mut layers = Vec::with_capacity(4);
    if let Some(base) = stream.pick_weighted(BASE_COLORS) {
        layers.push(base.to_string());
    }
    layers.push(TONGUE_LAYER.to_string());
    if stream.chance(HORN_CHANCE) {
        layers.push(HORN_LAYER.to_string());
    }
    if stream.chance(SPOT_CHANCE) {
        let spot = SPOT_LAYERS[stream.pick_index(SPOT_LAYERS.len())];
        layers.push(spot.to_string());
    }

    let mut filters = BTreeMap::new();
    if layers.iter().any(|l| l == GREY_LAYER) && stream.chance(COLOUR_MUTATE_CHANCE) {
        filters.insert(GREY_LAYER.to_string(), roll_filter(stream));
    }
    for spot in SPOT_LAYERS {
        if layers.iter().any(|l| l == spot) {
            filters.insert(spot.to_string(), roll_filter(stream));
        }
    }

    SpriteInfo { layers, filters }
}

fn roll_filter(stream: &mut SeededStream) -> LayerFilter {
    LayerFilter {
        hue: stream.range(HUE_RANGE.0, HUE_RANGE.1) as f32,
        saturate: stream.range(SATURATE_RANGE.0, SATURATE_RANGE.1) as f32,
        contrast: stream.range(CONTRAST_RANGE.0, CONTRAST_RANGE.1) as f32,
        brightness: stream.range(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1) as f32,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Name
// ─────────────────────────────────────────────────────────────────────────────

pub fn roll_name(stream: &mut SeededStream, siblings: &[Cow]) -> String {
    let taken: HashSet<&str> = siblings.iter().map(|c| c.name.as_str()).collect();
    let free: Vec<&str> = COW_NAMES
        .iter()
        .copied()
        .filter(|n| !taken.contains(n))
        .collect();

    if !free.is_empty() {
        return free[stream.pick_index(free.len())].to_string();
    }

    // Pool exhausted: suffix a pool name until it is unique.
    let base = COW_NAMES[stream.pick_index(COW_NAMES.len())];
    let mut counter = 2u32;
    let mut name = format!("{} {}", base, counter);
    while taken.contains(name.as_str()) {
        counter += 1;
        name = format!("{} {}", base, counter);
    }
    name
}

// ─────────────────────────────────────────────────────────────────────────────
// Stats
// ─────────────────────────────────────────────────────────────────────────────

/// Rarity is only rolled for cows carrying at least one color transform;
/// everyone else gets the neutral baseline.
pub fn roll_stats(stream: &mut SeededStream, sprite: &SpriteInfo) -> CowStats {
    if sprite.filters.is_empty() {
        return CowStats::default();
    }

    let rarity = stream.pick_weighted(RARITY_WEIGHTS).unwrap_or_default();
    let ranges = stat_ranges(rarity);
    let eat_chance = round2(stream.range(ranges.eat_chance.0, ranges.eat_chance.1)) as f32;
    let extra_mooney = stream
        .range(ranges.extra_mooney.0, ranges.extra_mooney.1)
        .round() as u32;
    let value_multiplier =
        round2(stream.range(ranges.value_multiplier.0, ranges.value_multiplier.1)) as f32;

    CowStats {
        rarity,
        eat_chance,
        extra_mooney,
        value_multiplier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_same_seed_same_cow() {
        let t = now();
        let a = generate_cow(42, &[], t);
        let b = generate_cow(42, &[], t);
        assert_eq!(a.name, b.name);
        assert_eq!(a.sprite, b.sprite);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.pitch, b.pitch);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_layer_composition() {
        for seed in 0..500u64 {
            let sprite = roll_sprite(&mut SeededStream::new(seed));
            assert!(sprite.layers[0].starts_with("base_"), "seed {}", seed);
            assert_eq!(sprite.layers[1], TONGUE_LAYER);
            let spots = sprite
                .layers
                .iter()
                .filter(|l| SPOT_LAYERS.contains(&l.as_str()))
                .count();
            assert!(spots <= 1);
        }
    }

    #[test]
    fn test_filters_only_on_grey_or_spots() {
        for seed in 0..500u64 {
            let sprite = roll_sprite(&mut SeededStream::new(seed));
            for layer in sprite.filters.keys() {
                assert!(
                    layer == GREY_LAYER || SPOT_LAYERS.contains(&layer.as_str()),
                    "unexpected filter on {}",
                    layer
                );
                assert!(sprite.layers.contains(layer));
            }
            for spot in SPOT_LAYERS {
                if sprite.layers.iter().any(|l| l == spot) {
                    assert!(sprite.filters.contains_key(*spot));
                }
            }
        }
    }

    #[test]
    fn test_unfiltered_cows_are_common_baseline() {
        for seed in 0..500u64 {
            let cow = generate_cow(seed, &[], now());
            if cow.sprite.filters.is_empty() {
                assert_eq!(cow.stats, CowStats::default());
            }
        }
    }

    #[test]
    fn test_stats_within_tier_ranges() {
        for seed in 0..1_000u64 {
            let cow = generate_cow(seed, &[], now());
            if cow.sprite.filters.is_empty() {
                continue;
            }
            let r = stat_ranges(cow.stats.rarity);
            let eat = cow.stats.eat_chance as f64;
            assert!(eat >= r.eat_chance.0 - 0.01 && eat <= r.eat_chance.1 + 0.01);
            let extra = cow.stats.extra_mooney as f64;
            assert!(extra >= r.extra_mooney.0 && extra <= r.extra_mooney.1);
        }
    }

    #[test]
    fn test_new_cow_defaults() {
        let t = now();
        let cow = generate_cow(7, &[], t);
        assert_eq!(cow.level, 1);
        assert_eq!(cow.xp, 0);
        assert_eq!(cow.hearts, 0);
        assert_eq!(cow.last_pet, t - Duration::days(1));
        assert_eq!(cow.last_decay_check, cow.last_pet);
        assert!((0.8..=1.6).contains(&cow.pitch));
    }

    #[test]
    fn test_name_avoids_siblings() {
        let t = now();
        let mut herd: Vec<Cow> = Vec::new();
        for seed in 0..COW_NAMES.len() as u64 {
            let cow = generate_cow(seed, &herd, t);
            assert!(herd.iter().all(|c| c.name != cow.name), "duplicate {}", cow.name);
            herd.push(cow);
        }
        // Pool is now exhausted; the next names get numeric suffixes.
        let extra = generate_cow(999, &herd, t);
        assert!(herd.iter().all(|c| c.name != extra.name));
        assert!(extra.name.ends_with(" 2"));
    }

    #[test]
    fn test_suffix_skips_taken_numbers() {
        let mut siblings: Vec<Cow> = COW_NAMES
            .iter()
            .map(|n| Cow {
                name: n.to_string(),
                ..Default::default()
            })
            .collect();
        for n in COW_NAMES {
            siblings.push(Cow {
                name: format!("{} 2", n),
                ..Default::default()
            });
        }
        let name = roll_name(&mut SeededStream::new(1), &siblings);
        assert!(name.ends_with(" 3"), "got {}", name);
    }
}
