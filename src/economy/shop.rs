use bevy::prelude::*;
use rand::Rng;

use crate::cows::generate_cow;
use crate::data::cows::level_threshold;
use crate::data::shop::*;
use crate::shared::*;

use super::mooney::format_mooney;

// ─────────────────────────────────────────────────────────────────────────────
// Pricing rules
// ─────────────────────────────────────────────────────────────────────────────

/// Cows the farm can hold at its current level.
pub fn herd_capacity(farm: &Farm) -> usize {
    farm.upgrades.level(UpgradeKey::FarmLevel) as usize * COWS_PER_FARM_LEVEL
}

/// Why a cow can't be bought right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyBlock {
    HerdFull,
    SoldOut,
    TooExpensive(u64),
}

/// Price of the next cow, or why it can't be bought.
pub fn next_cow_price(farm: &Farm) -> Result<u64, BuyBlock> {
    if farm.cows.len() >= herd_capacity(farm) {
        return Err(BuyBlock::HerdFull);
    }
    let price = cow_price(farm.cows.len()).ok_or(BuyBlock::SoldOut)?;
    if farm.mooney < price {
        return Err(BuyBlock::TooExpensive(price));
    }
    Ok(price)
}

/// What a cow fetches at market: the xp it took to reach its level, plus any
/// xp banked since, scaled by its value stat and affection.
pub fn sell_value(cow: &Cow) -> u64 {
    let base = match cow.level {
        0 | 1 => 0,
        level => level_threshold(level - 1).map_or(0, u64::from),
    };
    let banked = if level_threshold(cow.level).is_some() {
        u64::from(cow.xp)
    } else {
        0
    };
    let value = (base + banked) as f64
        * cow.stats.value_multiplier as f64
        * (1.0 + cow.hearts as f64 / 10.0);
    value.round().max(0.0) as u64
}

/// Trims and validates a new cow name.
pub fn clean_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return None;
    }
    Some(name.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Request handlers
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_buy_cow(
    mut buy_events: EventReader<BuyCowEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut farm: ResMut<Farm>,
    clock: Res<WallClock>,
) {
    for _ev in buy_events.read() {
        let price = match next_cow_price(&farm) {
            Ok(price) => price,
            Err(block) => {
                let message = match block {
                    BuyBlock::HerdFull => "Your farm is full. Upgrade it to fit more cows.".to_string(),
                    BuyBlock::SoldOut => "No more cows for sale.".to_string(),
                    BuyBlock::TooExpensive(price) => {
                        format!("You need {} for a new cow.", format_mooney(price))
                    }
                };
                warn!("[Shop] Buy cow refused: {:?}", block);
                toast_writer.send(ToastEvent { message });
                continue;
            }
        };

        let seed = rand::thread_rng().gen_range(0..(1u64 << 48));
        let cow = generate_cow(seed, &farm.cows, clock.now());
        farm.mooney -= price;
        farm.stats.cows_bought += 1;
        info!(
            "[Shop] Bought {} ({:?}) for {}",
            cow.name,
            cow.stats.rarity,
            format_mooney(price)
        );
        farm.add_cow(cow);
    }
}

pub fn handle_sell_cow(
    mut sell_events: EventReader<SellCowEvent>,
    mut earned_writer: EventWriter<MooneyEarnedEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut farm: ResMut<Farm>,
) {
    for ev in sell_events.read() {
        let Some(cow) = farm.remove_cow(ev.id) else {
            warn!("[Shop] Sell for unknown cow {}", ev.id);
            continue;
        };
        let amount = sell_value(&cow);
        farm.earn(amount);
        farm.stats.cows_sold += 1;
        info!("[Shop] Sold {} for {}", cow.name, format_mooney(amount));
        earned_writer.send(MooneyEarnedEvent { cow: None, amount });
        toast_writer.send(ToastEvent {
            message: format!("Sold {} for {}", cow.name, format_mooney(amount)),
        });
    }
}

pub fn handle_rename_cow(
    mut rename_events: EventReader<RenameCowEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut farm: ResMut<Farm>,
) {
    for ev in rename_events.read() {
        let Some(name) = clean_name(&ev.name) else {
            warn!("[Shop] Rejected name {:?}", ev.name);
            toast_writer.send(ToastEvent {
                message: format!("Names must be 1 to {} characters.", MAX_NAME_LEN),
            });
            continue;
        };
        let Some(cow) = farm.cow_mut(ev.id) else {
            warn!("[Shop] Rename for unknown cow {}", ev.id);
            continue;
        };
        if cow.name == name {
            continue;
        }
        info!("[Shop] {} is now called {}", cow.name, name);
        cow.name = name;
        farm.stats.cows_renamed += 1;
    }
}

pub fn handle_purchase_upgrade(
    mut upgrade_events: EventReader<PurchaseUpgradeEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut farm: ResMut<Farm>,
) {
    for ev in upgrade_events.read() {
        let level = farm.upgrades.level(ev.key);
        let Some(price) = upgrade_price(ev.key, level) else {
            toast_writer.send(ToastEvent {
                message: "Already at max level.".to_string(),
            });
            continue;
        };
        if !farm.try_spend(price) {
            warn!(
                "[Shop] Can't afford {} ({} < {})",
                ev.key.as_str(),
                farm.mooney,
                price
            );
            toast_writer.send(ToastEvent {
                message: format!("You need {}.", format_mooney(price)),
            });
            continue;
        }
        farm.upgrades.set_level(ev.key, level + 1);
        farm.stats.upgrades_bought += 1;
        info!(
            "[Shop] {} -> level {} for {}",
            ev.key.as_str(),
            level + 1,
            format_mooney(price)
        );
    }
}
