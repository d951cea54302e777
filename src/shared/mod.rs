//! Shared components, resources, events, and states for Pasture.
//!
//! This is the type contract. Every domain plugin imports from here, and
//! domains talk to each other through these events and resources.

use bevy::prelude::*;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK & LAYOUT
// ═══════════════════════════════════════════════════════════════════════

/// Source of wall-clock time for day-boundary rules and timestamps.
/// Tests freeze it; the game leaves it running.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct WallClock {
    pub frozen: Option<DateTime<Utc>>,
}

impl WallClock {
    pub fn frozen_at(at: DateTime<Utc>) -> Self {
        Self { frozen: Some(at) }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.frozen.unwrap_or_else(Utc::now)
    }

    pub fn advance(&mut self, by: ChronoDuration) {
        if let Some(at) = self.frozen.as_mut() {
            *at += by;
        }
    }
}

/// Size of the scene the herd wanders in, in screen pixels (y grows
/// downward). Written by the layout collaborator on resize.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 640.0,
        }
    }
}

/// Pre-rounding position, the cow's authoritative location in the scene.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct LogicalPosition(pub Vec2);

// ═══════════════════════════════════════════════════════════════════════
// COWS
// ═══════════════════════════════════════════════════════════════════════

pub type CowId = Uuid;

/// Per-layer color transform applied by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerFilter {
    pub hue: f32,
    pub saturate: f32,
    pub contrast: f32,
    pub brightness: f32,
}

/// Ordered sprite layers (bottom to top) and optional per-layer filters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteInfo {
    pub layers: Vec<String>,
    pub filters: BTreeMap<String, LayerFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CowStats {
    pub rarity: Rarity,
    /// Multiplier on the per-tick chance to start eating.
    pub eat_chance: f32,
    /// Flat mooney added to every meal before the harvest multiplier.
    pub extra_mooney: u32,
    /// Multiplier on the sell price.
    pub value_multiplier: f32,
}

impl Default for CowStats {
    fn default() -> Self {
        Self {
            rarity: Rarity::Common,
            eat_chance: 1.0,
            extra_mooney: 0,
            value_multiplier: 1.0,
        }
    }
}

/// A cow owned by the farm. Everything here is persisted; runtime movement
/// state lives on the herd entity, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cow {
    pub id: CowId,
    pub seed: u64,
    pub sprite: SpriteInfo,
    pub name: String,
    pub level: u32,
    pub xp: u32,
    pub hearts: u8,
    pub pitch: f32,
    pub last_pet: DateTime<Utc>,
    pub last_decay_check: DateTime<Utc>,
    pub stats: CowStats,
}

impl Default for Cow {
    fn default() -> Self {
        let yesterday = Utc::now() - ChronoDuration::days(1);
        Self {
            id: Uuid::new_v4(),
            seed: 0,
            sprite: SpriteInfo::default(),
            name: String::from("Cow"),
            level: 1,
            xp: 0,
            hearts: 0,
            pitch: 1.0,
            last_pet: yesterday,
            last_decay_check: yesterday,
            stats: CowStats::default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPGRADES & STATISTICS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKey {
    FarmLevel,
    ClickLevel,
    HarvestCooldownLevel,
    HarvestDurationLevel,
    HarvestMultiplierLevel,
}

impl UpgradeKey {
    pub const ALL: [UpgradeKey; 5] = [
        UpgradeKey::FarmLevel,
        UpgradeKey::ClickLevel,
        UpgradeKey::HarvestCooldownLevel,
        UpgradeKey::HarvestDurationLevel,
        UpgradeKey::HarvestMultiplierLevel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UpgradeKey::FarmLevel => "farm_level",
            UpgradeKey::ClickLevel => "click_level",
            UpgradeKey::HarvestCooldownLevel => "harvest_cooldown_level",
            UpgradeKey::HarvestDurationLevel => "harvest_duration_level",
            UpgradeKey::HarvestMultiplierLevel => "harvest_multiplier_level",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

/// Upgrade levels. Every upgrade starts at level 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upgrades {
    levels: BTreeMap<UpgradeKey, u32>,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            levels: UpgradeKey::ALL.into_iter().map(|k| (k, 1)).collect(),
        }
    }
}

impl Upgrades {
    pub fn level(&self, key: UpgradeKey) -> u32 {
        self.levels.get(&key).copied().unwrap_or(1)
    }

    pub fn set_level(&mut self, key: UpgradeKey, level: u32) {
        self.levels.insert(key, level.max(1));
    }

    pub fn iter(&self) -> impl Iterator<Item = (UpgradeKey, u32)> + '_ {
        self.levels.iter().map(|(k, v)| (*k, *v))
    }
}

/// Cumulative play counters shown on the statistics screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayStats {
    pub clicks: u64,
    pub mooney_earned: u64,
    pub upgrades_bought: u64,
    pub cows_bought: u64,
    pub cows_sold: u64,
    pub cows_renamed: u64,
    pub cows_pet: u64,
}

// ═══════════════════════════════════════════════════════════════════════
// FARM — the game state store
// ═══════════════════════════════════════════════════════════════════════

/// The whole mutable game state. Owned by the ECS world as a resource and
/// passed explicitly to every system that reads or mutates it.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Farm {
    pub mooney: u64,
    pub cows: Vec<Cow>,
    pub upgrades: Upgrades,
    pub last_harvest: Option<DateTime<Utc>>,
    pub is_harvest: bool,
    pub stats: PlayStats,
    pub volume: f32,
    pub tutorial: u32,
    pub last_export_reminder: Option<DateTime<Utc>>,
}

impl Default for Farm {
    fn default() -> Self {
        Self {
            mooney: 0,
            cows: Vec::new(),
            upgrades: Upgrades::default(),
            last_harvest: None,
            is_harvest: false,
            stats: PlayStats::default(),
            volume: 0.5,
            tutorial: 0,
            last_export_reminder: None,
        }
    }
}

impl Farm {
    pub fn cow(&self, id: CowId) -> Option<&Cow> {
        self.cows.iter().find(|c| c.id == id)
    }

    pub fn cow_mut(&mut self, id: CowId) -> Option<&mut Cow> {
        self.cows.iter_mut().find(|c| c.id == id)
    }

    pub fn add_cow(&mut self, cow: Cow) {
        self.cows.push(cow);
    }

    pub fn remove_cow(&mut self, id: CowId) -> Option<Cow> {
        let idx = self.cows.iter().position(|c| c.id == id)?;
        Some(self.cows.remove(idx))
    }

    /// Credits mooney and counts it towards the lifetime total.
    pub fn earn(&mut self, amount: u64) {
        self.mooney = self.mooney.saturating_add(amount);
        self.stats.mooney_earned = self.stats.mooney_earned.saturating_add(amount);
    }

    /// Debits `amount` if affordable. Returns whether the spend happened.
    pub fn try_spend(&mut self, amount: u64) -> bool {
        if self.mooney < amount {
            return false;
        }
        self.mooney -= amount;
        true
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.5
        };
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — requests from UI collaborators
// ═══════════════════════════════════════════════════════════════════════

/// Player tapped a cow.
#[derive(Event, Debug, Clone)]
pub struct PetCowEvent {
    pub id: CowId,
}

#[derive(Event, Debug, Clone, Default)]
pub struct BuyCowEvent;

#[derive(Event, Debug, Clone)]
pub struct SellCowEvent {
    pub id: CowId,
}

#[derive(Event, Debug, Clone)]
pub struct RenameCowEvent {
    pub id: CowId,
    pub name: String,
}

#[derive(Event, Debug, Clone)]
pub struct PurchaseUpgradeEvent {
    pub key: UpgradeKey,
}

/// Player pressed the harvest button.
#[derive(Event, Debug, Clone, Default)]
pub struct StartHarvestEvent;

/// Player clicked the field while the harvest window is open.
#[derive(Event, Debug, Clone, Default)]
pub struct HarvestClickEvent;

#[derive(Event, Debug, Clone)]
pub struct SetVolumeEvent {
    pub volume: f32,
}

#[derive(Event, Debug, Clone)]
pub struct SetTutorialStepEvent {
    pub step: u32,
}

#[derive(Event, Debug, Clone, Default)]
pub struct ExportRequestEvent;

/// Restore from an exported save. Browsers hand over the file's text; native
/// front ends may pass a path instead.
#[derive(Event, Debug, Clone)]
pub enum ImportRequestEvent {
    Path(PathBuf),
    Contents(String),
}

/// Wipe the save and start over.
#[derive(Event, Debug, Clone, Default)]
pub struct DeleteSaveEvent;

/// Page/window lifecycle signals that should flush the save.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Hidden,
    Closing,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — outputs for UI collaborators
// ═══════════════════════════════════════════════════════════════════════

/// A cow finished its eat animation (internal to the herd → economy flow).
#[derive(Event, Debug, Clone)]
pub struct CowAteEvent {
    pub id: CowId,
}

/// Mooney credited; `cow` is `None` for harvest clicks and sales.
#[derive(Event, Debug, Clone)]
pub struct MooneyEarnedEvent {
    pub cow: Option<CowId>,
    pub amount: u64,
}

/// Petting raised a cow's hearts.
#[derive(Event, Debug, Clone)]
pub struct HeartGainedEvent {
    pub id: CowId,
    pub hearts: u8,
}

#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
}

/// `path` is set when the export landed on disk; in the browser the file is
/// offered as a download named `file_name` instead.
#[derive(Event, Debug, Clone)]
pub struct ExportCompleteEvent {
    pub file_name: String,
    pub path: Option<PathBuf>,
    pub error_message: Option<String>,
}

#[derive(Event, Debug, Clone)]
pub struct ImportCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}
