//! Shop tables: cow prices, upgrade prices and harvest-window constants.

use crate::shared::UpgradeKey;

/// Price of the n-th cow (index 0 = first cow). The herd is further capped by
/// the farm level.
pub const COW_PRICES: &[u64] = &[
    0, 50, 150, 400, 900, 1_800, 3_500, 6_500, 12_000, 20_000, 35_000, 60_000,
    100_000, 160_000, 250_000, 400_000, 650_000, 1_000_000, 1_600_000, 2_500_000,
];

const FARM_LEVEL_PRICES: &[u64] = &[250, 1_500, 6_000, 20_000, 75_000, 250_000, 800_000, 2_000_000, 5_000_000];
const CLICK_LEVEL_PRICES: &[u64] = &[100, 400, 1_200, 4_000, 12_000, 40_000, 120_000, 400_000, 1_200_000];
const HARVEST_COOLDOWN_PRICES: &[u64] = &[500, 2_500, 10_000, 40_000, 150_000];
const HARVEST_DURATION_PRICES: &[u64] = &[400, 2_000, 8_000, 30_000, 120_000];
const HARVEST_MULTIPLIER_PRICES: &[u64] = &[1_000, 6_000, 30_000, 150_000];

/// Herd capacity per farm level.
pub const COWS_PER_FARM_LEVEL: usize = 2;

pub const HARVEST_COOLDOWN_MINUTES: i64 = 30;
pub const HARVEST_COOLDOWN_DECREASE_PER_UPGRADE: i64 = 5;
pub const HARVEST_DURATION_SECONDS: i64 = 10;
pub const HARVEST_DURATION_INCREASE_PER_UPGRADE: i64 = 10;
pub const HARVEST_MULTIPLIER: u64 = 2;
pub const HARVEST_MULTIPLIER_INCREASE_PER_UPGRADE: u64 = 1;

/// Days between "export your save" reminders.
pub const EXPORT_REMINDER_DAYS: i64 = 7;

pub const MAX_NAME_LEN: usize = 16;

fn price_table(key: UpgradeKey) -> &'static [u64] {
    match key {
        UpgradeKey::FarmLevel => FARM_LEVEL_PRICES,
        UpgradeKey::ClickLevel => CLICK_LEVEL_PRICES,
        UpgradeKey::HarvestCooldownLevel => HARVEST_COOLDOWN_PRICES,
        UpgradeKey::HarvestDurationLevel => HARVEST_DURATION_PRICES,
        UpgradeKey::HarvestMultiplierLevel => HARVEST_MULTIPLIER_PRICES,
    }
}

/// Price to move `key` from `current_level` to the next, or `None` when maxed.
pub fn upgrade_price(key: UpgradeKey, current_level: u32) -> Option<u64> {
    if current_level == 0 {
        return None;
    }
    price_table(key).get(current_level as usize - 1).copied()
}

/// Highest level `key` can reach.
pub fn max_upgrade_level(key: UpgradeKey) -> u32 {
    price_table(key).len() as u32 + 1
}

/// Price of the next cow for a herd of `herd_size`, or `None` past the table.
pub fn cow_price(herd_size: usize) -> Option<u64> {
    COW_PRICES.get(herd_size).copied()
}
