use bevy::prelude::*;
use crate::shared::*;

/// Format a mooney amount for display (e.g. "1,234 mooney").
pub fn format_mooney(amount: u64) -> String {
    let digits: Vec<char> = amount.to_string().chars().collect();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 7);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }
    result.push_str(" mooney");
    result
}

/// Applies volume and tutorial-progress requests from the settings UI.
pub fn apply_settings(
    mut volume_events: EventReader<SetVolumeEvent>,
    mut tutorial_events: EventReader<SetTutorialStepEvent>,
    mut farm: ResMut<Farm>,
) {
    for ev in volume_events.read() {
        farm.set_volume(ev.volume);
        debug!("[Settings] Volume {:.2}", farm.volume);
    }
    for ev in tutorial_events.read() {
        farm.tutorial = ev.step;
        debug!("[Settings] Tutorial step {}", ev.step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mooney() {
        assert_eq!(format_mooney(0), "0 mooney");
        assert_eq!(format_mooney(999), "999 mooney");
        assert_eq!(format_mooney(1234), "1,234 mooney");
        assert_eq!(format_mooney(1_000_000), "1,000,000 mooney");
    }
}
