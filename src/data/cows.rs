//! Cow design tables: palette, layers, name pool, rarity weights, stat ranges
//! and the xp curve.

use crate::shared::Rarity;

/// Base coat colors and their relative weights. Layer names are `base_<color>`.
pub const BASE_COLORS: &[(&str, u32)] = &[
    ("base_black", 30),
    ("base_brown", 30),
    ("base_white", 20),
    ("base_grey", 15),
    ("base_gold", 5),
];

/// The neutral coat: the only base layer eligible for a color transform.
pub const GREY_LAYER: &str = "base_grey";

/// Added to every cow.
pub const TONGUE_LAYER: &str = "tongue";

pub const HORN_LAYER: &str = "horns";
pub const HORN_CHANCE: f64 = 0.3;

pub const SPOT_LAYERS: &[&str] = &["spots_patches", "spots_dots", "spots_belt"];
pub const SPOT_CHANCE: f64 = 0.35;

/// Chance a grey coat gets recolored.
pub const COLOUR_MUTATE_CHANCE: f64 = 0.5;

pub const HUE_RANGE: (f64, f64) = (0.0, 360.0);
pub const SATURATE_RANGE: (f64, f64) = (0.6, 1.4);
pub const CONTRAST_RANGE: (f64, f64) = (0.8, 1.2);
pub const BRIGHTNESS_RANGE: (f64, f64) = (0.8, 1.2);

/// Pitch range for the moo sound, drawn after stats.
pub const PITCH_RANGE: (f64, f64) = (0.8, 1.6);

pub const RARITY_WEIGHTS: &[(Rarity, u32)] = &[
    (Rarity::Common, 55),
    (Rarity::Uncommon, 25),
    (Rarity::Rare, 12),
    (Rarity::Epic, 6),
    (Rarity::Legendary, 2),
];

/// Inclusive-low / exclusive-high ranges for one rarity tier.
#[derive(Debug, Clone, Copy)]
pub struct StatRanges {
    pub eat_chance: (f64, f64),
    pub extra_mooney: (f64, f64),
    pub value_multiplier: (f64, f64),
}

pub fn stat_ranges(rarity: Rarity) -> StatRanges {
    match rarity {
        Rarity::Common => StatRanges {
            eat_chance: (1.0, 1.2),
            extra_mooney: (0.0, 1.0),
            value_multiplier: (1.0, 1.2),
        },
        Rarity::Uncommon => StatRanges {
            eat_chance: (1.1, 1.4),
            extra_mooney: (1.0, 2.0),
            value_multiplier: (1.2, 1.5),
        },
        Rarity::Rare => StatRanges {
            eat_chance: (1.3, 1.7),
            extra_mooney: (2.0, 4.0),
            value_multiplier: (1.5, 2.0),
        },
        Rarity::Epic => StatRanges {
            eat_chance: (1.6, 2.1),
            extra_mooney: (4.0, 7.0),
            value_multiplier: (2.0, 3.0),
        },
        Rarity::Legendary => StatRanges {
            eat_chance: (2.0, 2.5),
            extra_mooney: (7.0, 12.0),
            value_multiplier: (3.0, 5.0),
        },
    }
}

pub const COW_NAMES: &[&str] = &[
    "Bessie", "Daisy", "Rosie", "Mocha", "Cream", "Buttercup", "Clover",
    "Marigold", "Pumpkin", "Biscuit", "Hazel", "Maple", "Peaches", "Dolly",
    "Moomoo", "Honey", "Toffee", "Nutmeg", "Willow", "Pepper", "Oreo",
    "Cocoa", "Truffle", "Bluebell", "Poppy", "Tilly", "Magnolia", "Juniper",
    "Waffles", "Brownie",
];

pub const MAX_LEVEL: u32 = 10;
pub const MAX_HEARTS: u8 = 10;

/// Xp needed to advance from level `i + 1` to `i + 2`.
pub const XP_PER_LEVEL: [u32; 9] = [10, 25, 50, 90, 150, 240, 370, 550, 800];

/// Xp needed to leave `level`, or `None` at the terminal level (and for the
/// nonexistent level 0).
pub fn level_threshold(level: u32) -> Option<u32> {
    if level == 0 || level >= MAX_LEVEL {
        return None;
    }
    XP_PER_LEVEL.get(level as usize - 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_cover_levels_one_to_nine() {
        for level in 1..MAX_LEVEL {
            assert!(level_threshold(level).is_some(), "level {} needs a threshold", level);
        }
        assert_eq!(level_threshold(0), None);
        assert_eq!(level_threshold(MAX_LEVEL), None);
    }

    #[test]
    fn test_thresholds_strictly_increase() {
        for pair in XP_PER_LEVEL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_every_rarity_has_positive_weight() {
        assert!(RARITY_WEIGHTS.iter().all(|(_, w)| *w > 0));
    }

    #[test]
    fn test_grey_is_in_palette() {
        assert!(BASE_COLORS.iter().any(|(name, _)| *name == GREY_LAYER));
    }

    #[test]
    fn test_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for name in COW_NAMES {
            assert!(seen.insert(*name), "Duplicate cow name: {}", name);
        }
    }
}
