//! Cows domain: creation, the per-frame behavior engine and the render
//! snapshot handed to the sprite layer.

use bevy::prelude::*;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Sub-modules
// ─────────────────────────────────────────────────────────────────────────────
mod affection;
mod behavior;
mod feeding;
mod generator;
mod herd;
mod movement;

pub use affection::*;
pub use behavior::*;
pub use feeding::*;
pub use generator::*;
pub use herd::*;
pub use movement::*;

// ─────────────────────────────────────────────────────────────────────────────
// Components & resources
// ─────────────────────────────────────────────────────────────────────────────

/// Links a herd entity to the cow it animates.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CowTag(pub CowId);

/// What the renderer needs to draw one cow this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CowFrame {
    pub id: CowId,
    pub position: Vec2,
    pub scale: f32,
    /// `1.0` facing right, `-1.0` mirrored.
    pub facing: f32,
    pub animation: &'static str,
}

/// Per-frame herd snapshot, sorted by y so later entries paint on top.
#[derive(Resource, Debug, Clone, Default)]
pub struct HerdFrame {
    pub cows: Vec<CowFrame>,
}

impl HerdFrame {
    pub fn get(&self, id: CowId) -> Option<&CowFrame> {
        self.cows.iter().find(|c| c.id == id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct CowPlugin;

impl Plugin for CowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HerdFrame>()
            .init_resource::<PlayArea>()
            .add_systems(
                Update,
                (
                    sync_herd,
                    handle_pet_requests,
                    tick_herd,
                    apply_eat_rewards,
                    publish_herd_frame,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
