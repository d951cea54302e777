use bevy::prelude::*;
use std::collections::HashSet;

use super::{
    cow_scale, Bounds, BehaviorEvent, CowBrain, CowFrame, CowTag, HerdFrame,
};
use crate::data::Tuning;
use crate::rng::SeededStream;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Herd runtime
//
// One entity per owned cow, keyed by the cow's id. The farm's cow list is the
// source of truth; entities (and the brain timers they carry) are spawned and
// despawned to match it. A cow whose seed no longer matches its brain (the
// farm was reloaded from an import) gets a fresh entity.
// ─────────────────────────────────────────────────────────────────────────────

/// Spawns entities for new cows and despawns those no longer owned.
pub fn sync_herd(
    mut commands: Commands,
    farm: Res<Farm>,
    herd: Query<(Entity, &CowTag, &CowBrain)>,
    area: Res<PlayArea>,
    tuning: Res<Tuning>,
) {
    if !farm.is_changed() {
        return;
    }

    let owned: HashSet<(CowId, u64)> = farm.cows.iter().map(|c| (c.id, c.seed)).collect();
    let mut present: HashSet<CowId> = HashSet::new();

    for (entity, tag, brain) in herd.iter() {
        if owned.contains(&(tag.0, brain.seed())) {
            present.insert(tag.0);
        } else {
            commands.entity(entity).despawn();
            debug!("[Herd] Despawned cow {}", tag.0);
        }
    }

    let bounds = Bounds::for_area(&area, &tuning.area);
    for cow in farm.cows.iter().filter(|c| !present.contains(&c.id)) {
        // Placement uses its own stream so it doesn't shift the brain's draws.
        let mut placement = SeededStream::new(cow.seed.wrapping_add(1));
        let pos = Vec2::new(
            placement.range(bounds.min.x as f64, bounds.max.x as f64) as f32,
            placement.range(bounds.min.y as f64, bounds.max.y as f64) as f32,
        );
        commands.spawn((
            CowTag(cow.id),
            CowBrain::new(cow.seed, cow.stats.eat_chance),
            LogicalPosition(pos),
        ));
        debug!("[Herd] Spawned {} at {:?}", cow.name, pos);
    }
}

/// Advances every brain by this frame's delta.
pub fn tick_herd(
    time: Res<Time>,
    area: Res<PlayArea>,
    tuning: Res<Tuning>,
    mut herd: Query<(&CowTag, &mut CowBrain, &mut LogicalPosition)>,
    mut ate_writer: EventWriter<CowAteEvent>,
) {
    let bounds = Bounds::for_area(&area, &tuning.area);
    let dt = time.delta_secs();

    for (tag, mut brain, mut pos) in herd.iter_mut() {
        // Keep cows on the grass when the scene shrinks.
        pos.0 = pos.0.clamp(bounds.min, bounds.max);
        match brain.tick(dt, &mut pos.0, &bounds, &tuning.behavior) {
            Some(BehaviorEvent::FinishedEating) => {
                ate_writer.send(CowAteEvent { id: tag.0 });
            }
            Some(BehaviorEvent::FinishedPetting) | None => {}
        }
    }
}

/// Rebuilds the render snapshot, back to front.
pub fn publish_herd_frame(
    area: Res<PlayArea>,
    tuning: Res<Tuning>,
    herd: Query<(&CowTag, &CowBrain, &LogicalPosition)>,
    mut frame: ResMut<HerdFrame>,
) {
    let scale = cow_scale(&area, &tuning.area);
    frame.cows.clear();
    frame.cows.extend(herd.iter().map(|(tag, brain, pos)| CowFrame {
        id: tag.0,
        position: pos.0,
        scale,
        facing: brain.facing(),
        animation: brain.activity().animation_key(),
    }));
    frame
        .cows
        .sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
}
