use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::time::Duration;

use pasture::shared::*;
use pasture::{cows, data, economy, save};

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(StatesPlugin)
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<Farm>()
        .init_resource::<WallClock>()
        .init_resource::<PlayArea>()
        // Request events
        .add_event::<PetCowEvent>()
        .add_event::<BuyCowEvent>()
        .add_event::<SellCowEvent>()
        .add_event::<RenameCowEvent>()
        .add_event::<PurchaseUpgradeEvent>()
        .add_event::<StartHarvestEvent>()
        .add_event::<HarvestClickEvent>()
        .add_event::<SetVolumeEvent>()
        .add_event::<SetTutorialStepEvent>()
        .add_event::<ExportRequestEvent>()
        .add_event::<ImportRequestEvent>()
        .add_event::<DeleteSaveEvent>()
        .add_event::<LifecycleEvent>()
        // Output events
        .add_event::<CowAteEvent>()
        .add_event::<MooneyEarnedEvent>()
        .add_event::<HeartGainedEvent>()
        .add_event::<ToastEvent>()
        .add_event::<ExportCompleteEvent>()
        .add_event::<ImportCompleteEvent>()
        // Domain plugins
        .add_plugins(cows::CowPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(save::SavePlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        .add_systems(Update, log_toasts)
        .run();
}

/// Without a UI, toasts go to the log.
fn log_toasts(mut toasts: EventReader<ToastEvent>) {
    for toast in toasts.read() {
        info!("[Toast] {}", toast.message);
    }
}
