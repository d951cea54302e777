//! Save domain — snapshots the `Farm` into the cache and durable stores,
//! restores it on boot, and handles manual export, import and wipe.

pub mod codec;
#[cfg(target_arch = "wasm32")]
mod download;
pub mod store;

use bevy::prelude::*;
use chrono::Duration as ChronoDuration;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::shop::EXPORT_REMINDER_DAYS;
use crate::data::Tuning;
use crate::shared::*;

pub use codec::{decode, encode, restore_farm, snapshot, SaveData, SaveError, SAVE_VERSION};
pub use store::*;

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// Interval timer for background saves. Every `durable_every`-th save also
/// reaches the durable store.
#[derive(Resource, Debug, Clone)]
pub struct AutosaveTimer {
    pub timer: Timer,
    pub count: u32,
}

impl AutosaveTimer {
    pub fn from_secs(secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(secs.max(0.1), TimerMode::Repeating),
            count: 0,
        }
    }
}

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self::from_secs(10.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutosaveTimer>()
            // Boot: pick the stores, then restore before anything plays.
            .add_systems(
                OnExit(GameState::Loading),
                (install_save_sinks, restore_on_boot).chain(),
            )
            .add_systems(OnEnter(GameState::Playing), remind_export)
            .add_systems(
                Update,
                (
                    autosave,
                    save_on_lifecycle,
                    handle_export_request,
                    handle_import_request,
                    handle_delete_save,
                )
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Last, save_on_exit.run_if(in_state(GameState::Playing)));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════

/// Encodes the farm and hands it to the sinks. Failures are logged only.
fn persist_farm(farm: &Farm, sinks: &SaveSinks, durable: bool) {
    match encode(&snapshot(farm)) {
        Ok(blob) => sinks.persist(blob, durable),
        Err(e) => warn!("[Save] Could not encode snapshot: {}", e),
    }
}

/// Hands the export to the platform: a file under `export_dir` natively.
#[cfg(not(target_arch = "wasm32"))]
fn deliver_export(blob: &str, name: &str, tuning: &Tuning) -> Result<Option<PathBuf>, SaveError> {
    let dir = &tuning.save.export_dir;
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, blob)?;
    Ok(Some(path))
}

/// In the browser the blob is offered as a download.
#[cfg(target_arch = "wasm32")]
fn deliver_export(blob: &str, name: &str, _tuning: &Tuning) -> Result<Option<PathBuf>, SaveError> {
    download::offer(blob, name)?;
    Ok(None)
}

fn read_import(request: &ImportRequestEvent) -> Result<SaveData, SaveError> {
    match request {
        ImportRequestEvent::Contents(text) => decode(text),
        ImportRequestEvent::Path(path) => read_import_file(path),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_import_file(path: &Path) -> Result<SaveData, SaveError> {
    decode(&fs::read_to_string(path)?)
}

#[cfg(target_arch = "wasm32")]
fn read_import_file(path: &Path) -> Result<SaveData, SaveError> {
    Err(SaveError::Unavailable(format!(
        "cannot open {} from the browser, send the file contents instead",
        path.display()
    )))
}

fn describe_import(request: &ImportRequestEvent) -> String {
    match request {
        ImportRequestEvent::Path(path) => path.display().to_string(),
        ImportRequestEvent::Contents(text) => format!("uploaded save ({} bytes)", text.len()),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Installs the platform stores unless some were provided up front.
fn install_save_sinks(
    mut commands: Commands,
    existing: Option<Res<SaveSinks>>,
    tuning: Res<Tuning>,
) {
    commands.insert_resource(AutosaveTimer::from_secs(tuning.save.autosave_secs));
    if existing.is_some() {
        return;
    }
    #[cfg(not(target_arch = "wasm32"))]
    let sinks = SaveSinks::on_disk(&tuning.save.save_dir);
    #[cfg(target_arch = "wasm32")]
    let sinks = SaveSinks::browser();
    info!(
        "[Save] Using stores {} and {}",
        sinks.cache.label(),
        sinks.durable.label()
    );
    commands.insert_resource(sinks);
}

fn restore_on_boot(sinks: Res<SaveSinks>, mut farm: ResMut<Farm>, clock: Res<WallClock>) {
    match sinks.load() {
        Some(data) => {
            *farm = restore_farm(data, clock.now());
            info!(
                "[Save] Welcome back: {} cows, {} mooney",
                farm.cows.len(),
                farm.mooney
            );
        }
        None => info!("[Save] No save found, starting a fresh farm"),
    }
}

fn autosave(
    time: Res<Time>,
    mut autosave: ResMut<AutosaveTimer>,
    sinks: Res<SaveSinks>,
    farm: Res<Farm>,
    tuning: Res<Tuning>,
) {
    autosave.timer.tick(time.delta());
    if !autosave.timer.just_finished() {
        return;
    }
    autosave.count = autosave.count.wrapping_add(1);
    let durable = autosave.count % tuning.save.durable_every.max(1) == 0;
    debug!("[Save] Autosave #{} (durable: {})", autosave.count, durable);
    persist_farm(&farm, &sinks, durable);
}

fn save_on_lifecycle(
    mut lifecycle_events: EventReader<LifecycleEvent>,
    sinks: Res<SaveSinks>,
    farm: Res<Farm>,
) {
    // Several signals in one frame still need only one write.
    if let Some(ev) = lifecycle_events.read().last() {
        info!("[Save] Flushing on {:?}", ev);
        persist_farm(&farm, &sinks, true);
    }
}

fn save_on_exit(mut exit_events: EventReader<AppExit>, sinks: Res<SaveSinks>, farm: Res<Farm>) {
    if exit_events.read().last().is_some() {
        info!("[Save] Flushing before exit");
        // The task pool may not outlive this frame.
        let inline = SaveSinks {
            background: false,
            ..(*sinks).clone()
        };
        persist_farm(&farm, &inline, true);
    }
}

fn handle_export_request(
    mut export_events: EventReader<ExportRequestEvent>,
    mut complete_writer: EventWriter<ExportCompleteEvent>,
    farm: Res<Farm>,
    clock: Res<WallClock>,
    tuning: Res<Tuning>,
) {
    for _ev in export_events.read() {
        let file_name = codec::export_file_name(clock.now());
        let result = encode(&snapshot(&farm))
            .and_then(|blob| deliver_export(&blob, &file_name, &tuning));
        match result {
            Ok(path) => {
                info!("[Save] Exported {}", file_name);
                complete_writer.send(ExportCompleteEvent {
                    file_name,
                    path,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Export FAILED: {}", e);
                complete_writer.send(ExportCompleteEvent {
                    file_name,
                    path: None,
                    error_message: Some(e.to_string()),
                });
            }
        }
    }
}

fn handle_import_request(
    mut import_events: EventReader<ImportRequestEvent>,
    mut complete_writer: EventWriter<ImportCompleteEvent>,
    mut farm: ResMut<Farm>,
    sinks: Res<SaveSinks>,
    clock: Res<WallClock>,
) {
    for ev in import_events.read() {
        let source = describe_import(ev);
        match read_import(ev) {
            Ok(data) => {
                *farm = restore_farm(data, clock.now());
                persist_farm(&farm, &sinks, true);
                info!("[Save] Imported {} ({} cows)", source, farm.cows.len());
                complete_writer.send(ImportCompleteEvent {
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Import of {} FAILED: {}", source, e);
                complete_writer.send(ImportCompleteEvent {
                    success: false,
                    error_message: Some(e.to_string()),
                });
            }
        }
    }
}

fn handle_delete_save(
    mut delete_events: EventReader<DeleteSaveEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut farm: ResMut<Farm>,
    sinks: Res<SaveSinks>,
) {
    if delete_events.read().last().is_none() {
        return;
    }
    *farm = Farm::default();
    sinks.clear();
    info!("[Save] Save deleted, farm reset");
    toast_writer.send(ToastEvent {
        message: "Save deleted. Starting over.".to_string(),
    });
}

/// Nudges the player to back up their farm once a week.
fn remind_export(
    mut farm: ResMut<Farm>,
    mut toast_writer: EventWriter<ToastEvent>,
    clock: Res<WallClock>,
) {
    let now = clock.now();
    let due = match farm.last_export_reminder {
        Some(last) => now - last >= ChronoDuration::days(EXPORT_REMINDER_DAYS),
        None => true,
    };
    if !due {
        return;
    }
    farm.last_export_reminder = Some(now);
    toast_writer.send(ToastEvent {
        message: "Remember to export your save now and then!".to_string(),
    });
}
