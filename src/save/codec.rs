//! Save blob format: the persisted subset of `Farm` as JSON, gzip-compressed
//! and hex-encoded so it can live in text-only stores and export files.

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use thiserror::Error;

use crate::data::cows::{level_threshold, MAX_HEARTS, MAX_LEVEL};
use crate::shared::*;

pub const SAVE_VERSION: u32 = 1;

/// Fresh behavior seeds stay within 48 bits.
const SEED_BITS: u32 = 48;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Everything that survives a reload. Missing keys fall back to a fresh
/// farm's values; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub version: u32,
    pub mooney: u64,
    pub cows: Vec<Cow>,
    pub last_harvest: Option<DateTime<Utc>>,
    pub is_harvest: bool,
    pub upgrades: BTreeMap<String, u32>,
    pub stats: PlayStats,
    pub volume: f32,
    pub tutorial: u32,
    pub last_export_reminder: Option<DateTime<Utc>>,
}

impl Default for SaveData {
    fn default() -> Self {
        snapshot(&Farm::default())
    }
}

pub fn snapshot(farm: &Farm) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        mooney: farm.mooney,
        cows: farm.cows.clone(),
        last_harvest: farm.last_harvest,
        is_harvest: farm.is_harvest,
        upgrades: farm
            .upgrades
            .iter()
            .map(|(key, level)| (key.as_str().to_string(), level))
            .collect(),
        stats: farm.stats.clone(),
        volume: farm.volume,
        tutorial: farm.tutorial,
        last_export_reminder: farm.last_export_reminder,
    }
}

/// Rebuilds a live farm from a snapshot. Shared by boot and import: every cow
/// gets its offline heart decay applied and a fresh behavior seed.
pub fn restore_farm(data: SaveData, now: DateTime<Utc>) -> Farm {
    if data.version != SAVE_VERSION {
        warn!(
            "[Save] Snapshot has version {} but current version is {}. Loading anyway.",
            data.version,
            SAVE_VERSION
        );
    }

    let mut rng = rand::thread_rng();
    let mut farm = Farm {
        mooney: data.mooney,
        cows: data.cows,
        last_harvest: data.last_harvest,
        is_harvest: data.is_harvest,
        stats: data.stats,
        tutorial: data.tutorial,
        last_export_reminder: data.last_export_reminder,
        ..Default::default()
    };
    farm.set_volume(data.volume);

    for (name, level) in data.upgrades {
        match UpgradeKey::parse(&name) {
            Some(key) => farm.upgrades.set_level(key, level),
            None => warn!("[Save] Dropping unknown upgrade {:?}", name),
        }
    }

    for cow in farm.cows.iter_mut() {
        clamp_cow(cow);
        cow.apply_decay(now);
        cow.seed = rng.gen_range(0..(1u64 << SEED_BITS));
    }
    farm
}

/// Pulls hand-edited or stale values back into the ranges the game relies on:
/// level in 1..=10, hearts in 0..=10, xp below the current level's threshold.
fn clamp_cow(cow: &mut Cow) {
    let level = cow.level.clamp(1, MAX_LEVEL);
    let hearts = cow.hearts.min(MAX_HEARTS);
    let xp = match level_threshold(level) {
        Some(threshold) => cow.xp.min(threshold.saturating_sub(1)),
        None => cow.xp,
    };
    if (level, hearts, xp) != (cow.level, cow.hearts, cow.xp) {
        warn!(
            "[Save] Clamping {} from level {} / {} xp / {} hearts",
            cow.name, cow.level, cow.xp, cow.hearts
        );
        cow.level = level;
        cow.hearts = hearts;
        cow.xp = xp;
    }
}

pub fn encode(data: &SaveData) -> Result<String, SaveError> {
    let json = serde_json::to_vec(data)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;
    Ok(hex::encode(compressed))
}

pub fn decode(text: &str) -> Result<SaveData, SaveError> {
    let compressed = hex::decode(text.trim())?;
    let mut json = String::new();
    GzDecoder::new(compressed.as_slice()).read_to_string(&mut json)?;
    Ok(serde_json::from_str(&json)?)
}

/// Filesystem-safe export name, e.g. `pasture-save-2025-01-31T09-15-02-120Z.txt`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        .replace(':', "-")
        .replace('.', "-");
    format!("pasture-save-{}.txt", stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_farm() -> Farm {
        let mut farm = Farm::default();
        farm.mooney = 1_234;
        farm.upgrades.set_level(UpgradeKey::ClickLevel, 3);
        farm.tutorial = 4;
        farm.stats.clicks = 17;
        farm.add_cow(Cow {
            name: "Daisy".into(),
            level: 4,
            xp: 12,
            hearts: 3,
            ..Default::default()
        });
        farm
    }

    #[test]
    fn test_blob_round_trip() {
        let data = snapshot(&sample_farm());
        let text = encode(&data).unwrap();
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(decode(&text).unwrap(), data);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(decode("not hex at all"), Err(SaveError::Hex(_))));
        assert!(matches!(decode("deadbeef"), Err(SaveError::Io(_))));
    }

    #[test]
    fn test_non_json_payload_is_rejected() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"{ broken").unwrap();
        let text = hex::encode(encoder.finish().unwrap());
        assert!(matches!(decode(&text), Err(SaveError::Json(_))));
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let data: SaveData = serde_json::from_str(r#"{"mooney": 50, "shiny": true}"#).unwrap();
        assert_eq!(data.mooney, 50);
        assert_eq!(data.volume, 0.5);
        assert!(data.cows.is_empty());
        let farm = restore_farm(data, Utc::now());
        assert_eq!(farm.upgrades, Upgrades::default());
    }

    #[test]
    fn test_unknown_upgrade_keys_are_dropped() {
        let data: SaveData = serde_json::from_str(
            r#"{"upgrades": {"click_level": 4, "rocket_level": 9}}"#,
        )
        .unwrap();
        let farm = restore_farm(data, Utc::now());
        assert_eq!(farm.upgrades.level(UpgradeKey::ClickLevel), 4);
        assert_eq!(farm.upgrades.iter().count(), UpgradeKey::ALL.len());
    }

    #[test]
    fn test_restore_applies_decay_and_keeps_identity() {
        let now = Utc::now();
        let mut farm = sample_farm();
        farm.cows[0].hearts = 5;
        farm.cows[0].last_pet = now - Duration::days(4);
        farm.cows[0].last_decay_check = now - Duration::days(4);
        farm.cows[0].seed = 42;
        let id = farm.cows[0].id;

        let restored = restore_farm(snapshot(&farm), now);
        let cow = &restored.cows[0];
        assert_eq!(cow.id, id);
        assert_eq!(cow.hearts, 2);
        assert!(cow.seed < 1u64 << SEED_BITS);
        assert_eq!(restored.mooney, farm.mooney);
    }

    #[test]
    fn test_out_of_range_cows_are_clamped() {
        let now = Utc::now();
        let mut farm = Farm::default();
        farm.add_cow(Cow {
            level: 0,
            xp: u32::MAX,
            hearts: 200,
            last_pet: now,
            last_decay_check: now,
            ..Default::default()
        });
        farm.add_cow(Cow {
            level: 99,
            xp: 7,
            hearts: 3,
            last_pet: now,
            last_decay_check: now,
            ..Default::default()
        });

        let restored = restore_farm(snapshot(&farm), now);
        let low = &restored.cows[0];
        assert_eq!(low.level, 1);
        assert_eq!(low.hearts, MAX_HEARTS);
        assert!(low.xp < level_threshold(1).unwrap());
        let high = &restored.cows[1];
        assert_eq!(high.level, MAX_LEVEL);
        assert_eq!(high.hearts, 3);
    }

    #[test]
    fn test_volume_out_of_range_is_clamped() {
        let data = SaveData {
            volume: 7.0,
            ..Default::default()
        };
        assert_eq!(restore_farm(data, Utc::now()).volume, 1.0);
    }

    #[test]
    fn test_export_file_name_is_filesystem_safe() {
        let at = Utc.with_ymd_and_hms(2025, 1, 31, 9, 15, 2).unwrap() + Duration::milliseconds(120);
        assert_eq!(export_file_name(at), "pasture-save-2025-01-31T09-15-02-120Z.txt");
    }
}
