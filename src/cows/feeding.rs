use bevy::prelude::*;

use crate::data::cows::level_threshold;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Eating
//
// A cow that finishes its eat animation earns `level + hearts` xp. Below the
// terminal level that xp is banked and carried across thresholds; the farm
// is paid the same amount plus the cow's flat bonus, boosted while a harvest
// window is open.
// ─────────────────────────────────────────────────────────────────────────────

impl Cow {
    /// Applies one meal and returns the base amount gained.
    pub fn eat(&mut self) -> u32 {
        let gained = self.level + self.hearts as u32;
        if level_threshold(self.level).is_none() {
            return gained;
        }

        self.xp = self.xp.saturating_add(gained);
        while let Some(threshold) = level_threshold(self.level) {
            if self.xp < threshold {
                break;
            }
            self.xp -= threshold;
            self.level += 1;
        }
        gained
    }
}

/// Mooney paid for one meal.
pub fn meal_payout(gained: u32, extra_mooney: u32, multiplier: Option<u64>) -> u64 {
    let base = gained as u64 + extra_mooney as u64;
    match multiplier {
        Some(m) => base * m,
        None => base,
    }
}

/// Pays out for every cow that finished eating this frame.
pub fn apply_eat_rewards(
    mut ate_events: EventReader<CowAteEvent>,
    mut earned_writer: EventWriter<MooneyEarnedEvent>,
    mut farm: ResMut<Farm>,
    clock: Res<WallClock>,
) {
    let multiplier = farm.active_harvest_multiplier(clock.now());
    for ev in ate_events.read() {
        let Some(cow) = farm.cow_mut(ev.id) else {
            // Sold between the animation and the payout.
            continue;
        };
        let level_before = cow.level;
        let gained = cow.eat();
        let amount = meal_payout(gained, cow.stats.extra_mooney, multiplier);
        if cow.level > level_before {
            info!("[Herd] {} reached level {}", cow.name, cow.level);
        }

        farm.earn(amount);
        earned_writer.send(MooneyEarnedEvent {
            cow: Some(ev.id),
            amount,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cows::{MAX_LEVEL, XP_PER_LEVEL};

    fn cow(level: u32, xp: u32, hearts: u8) -> Cow {
        Cow {
            level,
            xp,
            hearts,
            ..Default::default()
        }
    }

    #[test]
    fn test_eat_reward_level_plus_hearts() {
        let mut c = cow(3, 0, 2);
        assert_eq!(c.eat(), 5);
        assert_eq!(c.xp, 5);
        assert_eq!(c.level, 3);
    }

    #[test]
    fn test_eat_carries_into_next_level() {
        let threshold = level_threshold(3).unwrap();
        let mut c = cow(3, threshold - 1, 2);
        c.eat();
        assert_eq!(c.level, 4);
        assert_eq!(c.xp, 4);
    }

    #[test]
    fn test_eat_carries_across_several_levels() {
        let mut c = cow(1, 0, 10);
        // 11 xp per meal, level 1 needs 10
        c.eat();
        assert_eq!(c.level, 2);
        assert_eq!(c.xp, 1);
    }

    #[test]
    fn test_xp_stays_below_threshold() {
        let mut c = cow(1, 0, 7);
        for _ in 0..500 {
            let before = c.level;
            c.eat();
            assert!(c.level >= before);
            if let Some(t) = level_threshold(c.level) {
                assert!(c.xp < t, "level {} xp {}", c.level, c.xp);
            }
        }
        assert_eq!(c.level, MAX_LEVEL);
    }

    #[test]
    fn test_terminal_level_banks_nothing() {
        let mut c = cow(MAX_LEVEL, 3, 4);
        assert_eq!(c.eat(), MAX_LEVEL + 4);
        assert_eq!(c.xp, 3);
        assert_eq!(c.level, MAX_LEVEL);
    }

    #[test]
    fn test_payout_adds_bonus_before_multiplier() {
        assert_eq!(meal_payout(5, 0, None), 5);
        assert_eq!(meal_payout(5, 3, None), 8);
        assert_eq!(meal_payout(5, 3, Some(2)), 16);
    }

    #[test]
    fn test_xp_table_matches_levels() {
        assert_eq!(XP_PER_LEVEL.len() as u32, MAX_LEVEL - 1);
    }
}
