//! Data layer — hard-coded design tables plus the tunable knobs.
//!
//! Design tables (palette, names, rarities, xp curve, prices) live in
//! submodules as constants. Behavior and persistence knobs live in
//! [`Tuning`], read from a RON file in `OnEnter(GameState::Loading)`; once
//! it is in place the game advances to `GameState::Playing`.

pub mod cows;
pub mod shop;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shared::*;

/// Env var naming an alternate tuning file.
pub const TUNING_ENV: &str = "PASTURE_TUNING";
pub const DEFAULT_TUNING_PATH: &str = "config/pasture.ron";

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Tuning>()
            .add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TUNING
// ═══════════════════════════════════════════════════════════════════════

/// Knobs for the cow state machine. Tick counts are 60 Hz frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorTuning {
    /// Pixels per 60 Hz frame.
    pub speed: f32,
    /// Per-axis direction wobble applied while walking.
    pub jitter: f32,
    /// Base per-tick chance of starting to eat, scaled by the cow's stat.
    pub eat_probability: f64,
    pub idle_walk_probability: f64,
    pub min_idle_ticks: u32,
    pub min_walk_ticks: u32,
    pub eat_cooldown_ticks: u32,
    /// Animation frames advanced per 60 Hz tick.
    pub anim_speed: f32,
}

impl Default for BehaviorTuning {
    fn default() -> Self {
        Self {
            speed: 0.5,
            jitter: 0.1,
            eat_probability: 0.002,
            idle_walk_probability: 0.01,
            min_idle_ticks: 120,
            min_walk_ticks: 180,
            eat_cooldown_ticks: 600,
            anim_speed: 0.1,
        }
    }
}

/// Sprite sizing relative to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaTuning {
    /// Edge length of one square sprite frame, in pixels.
    pub frame_size: f32,
    pub min_area: f32,
    pub max_area: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Share of the scene height covered by grass (measured from the bottom).
    pub land_ratio: f32,
}

impl Default for AreaTuning {
    fn default() -> Self {
        Self {
            frame_size: 64.0,
            min_area: 200_000.0,
            max_area: 2_000_000.0,
            min_scale: 1.0,
            max_scale: 2.5,
            land_ratio: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveTuning {
    pub autosave_secs: f32,
    /// Every n-th autosave also reaches the durable store.
    pub durable_every: u32,
    pub save_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl Default for SaveTuning {
    fn default() -> Self {
        Self {
            autosave_secs: 10.0,
            durable_every: 3,
            save_dir: PathBuf::from("saves"),
            export_dir: PathBuf::from("exports"),
        }
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub behavior: BehaviorTuning,
    pub area: AreaTuning,
    pub save: SaveTuning,
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl Tuning {
    pub fn from_ron(text: &str) -> Result<Self, TuningError> {
        Ok(ron::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, TuningError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }
}

fn tuning_path() -> PathBuf {
    std::env::var_os(TUNING_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TUNING_PATH))
}

/// Reads the tuning file, falling back to defaults when it is missing or
/// malformed.
pub fn read_tuning(path: &Path) -> Tuning {
    match Tuning::from_path(path) {
        Ok(tuning) => {
            info!("[Data] Tuning loaded from {}", path.display());
            tuning
        }
        Err(TuningError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("[Data] No tuning file at {}, using defaults", path.display());
            Tuning::default()
        }
        Err(e) => {
            warn!("[Data] {} ({}), using defaults", e, path.display());
            Tuning::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
fn load_all_data(mut tuning: ResMut<Tuning>, mut next_state: ResMut<NextState<GameState>>) {
    *tuning = read_tuning(&tuning_path());
    info!(
        "DataPlugin: {} base colors, {} names, {} rarity tiers",
        cows::BASE_COLORS.len(),
        cows::COW_NAMES.len(),
        cows::RARITY_WEIGHTS.len()
    );
    next_state.set(GameState::Playing);
}

#[cfg(target_arch = "wasm32")]
fn load_all_data(mut next_state: ResMut<NextState<GameState>>) {
    info!("DataPlugin: browser build, using built-in tuning");
    next_state.set(GameState::Playing);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_fills_defaults() {
        let tuning = Tuning::from_ron("(behavior: (speed: 2.0))").unwrap();
        assert_eq!(tuning.behavior.speed, 2.0);
        assert_eq!(tuning.behavior.min_walk_ticks, BehaviorTuning::default().min_walk_ticks);
        assert_eq!(tuning.save, SaveTuning::default());
    }

    #[test]
    fn test_malformed_ron_is_an_error() {
        assert!(matches!(
            Tuning::from_ron("(behavior: (speed: \"fast\"))"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("pasture-missing-{}.ron", uuid::Uuid::new_v4()));
        assert_eq!(read_tuning(&path), Tuning::default());
    }

    #[test]
    fn test_shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_TUNING_PATH);
        assert!(Tuning::from_path(&path).is_ok());
    }
}
