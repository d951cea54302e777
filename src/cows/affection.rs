use bevy::prelude::*;
use chrono::{DateTime, Local, Utc};

use super::{CowBrain, CowTag};
use crate::data::cows::MAX_HEARTS;
use crate::data::Tuning;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Affection
//
// Hearts rise by one per calendar day of petting and fall after more than a
// day of neglect. Day boundaries are the player's local midnight, not 24h
// windows.
// ─────────────────────────────────────────────────────────────────────────────

impl Cow {
    /// Pets the cow. Only the first pet of a local calendar day counts.
    /// Returns the resulting hearts.
    pub fn pet(&mut self, now: DateTime<Utc>) -> u8 {
        if same_local_day(self.last_pet, now) {
            return self.hearts;
        }
        self.hearts = self.hearts.saturating_add(1).min(MAX_HEARTS);
        self.last_pet = now;
        self.hearts
    }

    /// Applies offline decay on restore. The first day without petting is
    /// free; a second restore within the same window decays nothing more.
    pub fn apply_decay(&mut self, now: DateTime<Utc>) {
        let days_since_pet = whole_days(self.last_pet, now);
        let days_since_check = whole_days(self.last_decay_check, now);
        let decay = (days_since_pet - 1).max(0).min(days_since_check);
        let decay = decay.min(u8::MAX as i64) as u8;
        self.hearts = self.hearts.saturating_sub(decay);
        self.last_decay_check = now;
    }
}

fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.with_timezone(&Local).date_naive() == b.with_timezone(&Local).date_naive()
}

/// Full days between two instants, never negative.
fn whole_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days().max(0)
}

/// Routes pet taps to the farm and the tapped cow's brain. A tap while the
/// pet animation is already playing is dropped.
pub fn handle_pet_requests(
    mut pet_events: EventReader<PetCowEvent>,
    mut heart_writer: EventWriter<HeartGainedEvent>,
    mut brains: Query<(&CowTag, &mut CowBrain)>,
    mut farm: ResMut<Farm>,
    clock: Res<WallClock>,
    tuning: Res<Tuning>,
) {
    for ev in pet_events.read() {
        let Some((_, mut brain)) = brains.iter_mut().find(|(tag, _)| tag.0 == ev.id) else {
            warn!("[Herd] Pet for unknown cow {}", ev.id);
            continue;
        };
        if !brain.request_pet(&tuning.behavior) {
            continue;
        }

        let now = clock.now();
        let Some(cow) = farm.cow_mut(ev.id) else {
            continue;
        };
        let before = cow.hearts;
        let hearts = cow.pet(now);
        let name = cow.name.clone();
        farm.stats.cows_pet += 1;

        if hearts > before {
            info!("[Herd] {} now has {} hearts", name, hearts);
            heart_writer.send(HeartGainedEvent { id: ev.id, hearts });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// Local noon today, far from any midnight.
    fn noon() -> DateTime<Utc> {
        Local::now()
            .date_naive()
            .and_hms_opt(12, 0, 0)
            .and_then(|t| t.and_local_timezone(Local).single())
            .map(|t| t.with_timezone(&Utc))
            .unwrap()
    }

    fn cow_with(hearts: u8, last_pet: DateTime<Utc>, last_check: DateTime<Utc>) -> Cow {
        Cow {
            hearts,
            last_pet,
            last_decay_check: last_check,
            ..Default::default()
        }
    }

    #[test]
    fn test_pet_once_per_day() {
        let now = noon();
        let mut cow = cow_with(0, now - Duration::days(1), now);
        assert_eq!(cow.pet(now), 1);
        assert_eq!(cow.pet(now), 1);
        assert_eq!(cow.pet(now + Duration::seconds(1)), 1);
        assert_eq!(cow.last_pet, now);
    }

    #[test]
    fn test_pet_next_day_counts() {
        let now = noon();
        let mut cow = cow_with(3, now - Duration::days(1), now);
        cow.pet(now);
        assert_eq!(cow.pet(now + Duration::days(1)), 5);
    }

    #[test]
    fn test_hearts_cap_at_ten() {
        let start = noon();
        let mut cow = cow_with(9, start - Duration::days(1), start);
        for day in 0..5 {
            cow.pet(start + Duration::days(day));
        }
        assert_eq!(cow.hearts, MAX_HEARTS);
    }

    #[test]
    fn test_pet_over_cap_does_not_overflow() {
        let now = noon();
        let mut cow = cow_with(u8::MAX, now - Duration::days(1), now);
        assert_eq!(cow.pet(now), MAX_HEARTS);
    }

    #[test]
    fn test_offline_decay_first_day_free() {
        let now = Utc::now();
        let mut cow = cow_with(5, now - Duration::days(4), now - Duration::days(4));
        cow.apply_decay(now);
        assert_eq!(cow.hearts, 2);
        assert_eq!(cow.last_decay_check, now);
    }

    #[test]
    fn test_no_decay_within_two_days() {
        let now = Utc::now();
        for days in [0, 1] {
            let mut cow = cow_with(5, now - Duration::days(days), now - Duration::days(days));
            cow.apply_decay(now);
            assert_eq!(cow.hearts, 5, "{} days", days);
        }
        let mut cow = cow_with(5, now - Duration::hours(47), now - Duration::hours(47));
        cow.apply_decay(now);
        assert_eq!(cow.hearts, 5);
    }

    #[test]
    fn test_repeat_restore_same_day_decays_once() {
        let now = Utc::now();
        let mut cow = cow_with(8, now - Duration::days(5), now - Duration::days(5));
        cow.apply_decay(now);
        assert_eq!(cow.hearts, 4);
        cow.apply_decay(now + Duration::hours(3));
        assert_eq!(cow.hearts, 4);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let now = Utc::now();
        let mut cow = cow_with(2, now - Duration::days(30), now - Duration::days(30));
        cow.apply_decay(now);
        assert_eq!(cow.hearts, 0);
    }

    #[test]
    fn test_decay_capped_by_check_gap() {
        let now = Utc::now();
        let mut cow = cow_with(6, now - Duration::days(6), now - Duration::days(1));
        cow.apply_decay(now);
        assert_eq!(cow.hearts, 5);
    }
}
