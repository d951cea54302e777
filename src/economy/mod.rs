//! Economy domain — cow trading, upgrades, the harvest boost window and
//! player settings.
//!
//! Every handler mutates the `Farm` resource directly. Requests that can't be
//! honoured (too poor, herd full, unknown cow) are logged and answered with a
//! `ToastEvent`; nothing here fails hard.

use bevy::prelude::*;
use crate::shared::*;

pub mod harvest;
pub mod mooney;
pub mod shop;

use harvest::{expire_harvest_window, handle_harvest_clicks, handle_start_harvest};
use mooney::apply_settings;
use shop::{handle_buy_cow, handle_purchase_upgrade, handle_rename_cow, handle_sell_cow};

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                handle_buy_cow,
                handle_sell_cow,
                handle_rename_cow,
                handle_purchase_upgrade,
                handle_start_harvest,
                handle_harvest_clicks,
                expire_harvest_window,
                apply_settings,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
