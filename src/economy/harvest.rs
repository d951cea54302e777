use bevy::prelude::*;
use chrono::{DateTime, Duration, Utc};

use crate::data::shop::*;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Harvest boost window
//
// Pressing harvest opens a short window in which meals pay a multiplier and
// field clicks pay mooney. The window is tracked by its start time plus the
// `is_harvest` flag, so it survives a reload; the flag is cleared by
// `expire_harvest_window` once the duration has elapsed.
// ─────────────────────────────────────────────────────────────────────────────

impl Farm {
    pub fn harvest_cooldown(&self) -> Duration {
        let level = self.upgrades.level(UpgradeKey::HarvestCooldownLevel) as i64;
        let minutes = HARVEST_COOLDOWN_MINUTES
            - (level - 1) * HARVEST_COOLDOWN_DECREASE_PER_UPGRADE;
        Duration::minutes(minutes.max(1))
    }

    pub fn harvest_duration(&self) -> Duration {
        let level = self.upgrades.level(UpgradeKey::HarvestDurationLevel) as i64;
        Duration::seconds(
            HARVEST_DURATION_SECONDS + (level - 1) * HARVEST_DURATION_INCREASE_PER_UPGRADE,
        )
    }

    pub fn harvest_multiplier(&self) -> u64 {
        let level = self.upgrades.level(UpgradeKey::HarvestMultiplierLevel) as u64;
        HARVEST_MULTIPLIER + (level - 1) * HARVEST_MULTIPLIER_INCREASE_PER_UPGRADE
    }

    pub fn harvest_active(&self, now: DateTime<Utc>) -> bool {
        match (self.is_harvest, self.last_harvest) {
            (true, Some(start)) => now < start + self.harvest_duration(),
            _ => false,
        }
    }

    /// The meal multiplier if a window is open right now.
    pub fn active_harvest_multiplier(&self, now: DateTime<Utc>) -> Option<u64> {
        self.harvest_active(now).then(|| self.harvest_multiplier())
    }

    pub fn harvest_ready(&self, now: DateTime<Utc>) -> bool {
        match self.last_harvest {
            Some(last) => now - last >= self.harvest_cooldown(),
            None => true,
        }
    }

    /// Time until the button can be pressed again.
    pub fn harvest_cooldown_remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.last_harvest {
            Some(last) => (last + self.harvest_cooldown() - now).max(Duration::zero()),
            None => Duration::zero(),
        }
    }

    /// Mooney paid per field click during a window.
    pub fn click_value(&self) -> u64 {
        self.upgrades.level(UpgradeKey::ClickLevel) as u64
    }
}

pub fn handle_start_harvest(
    mut start_events: EventReader<StartHarvestEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut farm: ResMut<Farm>,
    clock: Res<WallClock>,
) {
    for _ev in start_events.read() {
        let now = clock.now();
        if !farm.harvest_ready(now) {
            let left = farm.harvest_cooldown_remaining(now);
            warn!("[Harvest] Still cooling down ({}s left)", left.num_seconds());
            toast_writer.send(ToastEvent {
                message: format!("Harvest ready in {}s", left.num_seconds()),
            });
            continue;
        }

        farm.last_harvest = Some(now);
        farm.is_harvest = true;
        info!(
            "[Harvest] Window open for {}s at x{}",
            farm.harvest_duration().num_seconds(),
            farm.harvest_multiplier()
        );
    }
}

pub fn handle_harvest_clicks(
    mut click_events: EventReader<HarvestClickEvent>,
    mut earned_writer: EventWriter<MooneyEarnedEvent>,
    mut farm: ResMut<Farm>,
    clock: Res<WallClock>,
) {
    let now = clock.now();
    for _ev in click_events.read() {
        if !farm.harvest_active(now) {
            continue;
        }
        let amount = farm.click_value();
        farm.earn(amount);
        farm.stats.clicks += 1;
        earned_writer.send(MooneyEarnedEvent { cow: None, amount });
    }
}

pub fn expire_harvest_window(mut farm: ResMut<Farm>, clock: Res<WallClock>) {
    if farm.is_harvest && !farm.harvest_active(clock.now()) {
        farm.is_harvest = false;
        info!("[Harvest] Window closed");
    }
}
