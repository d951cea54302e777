use bevy::prelude::*;

use crate::data::AreaTuning;
use crate::shared::PlayArea;

// ─────────────────────────────────────────────────────────────────────────────
// Play-area geometry
// Cows live on the grass strip at the bottom of the scene. Screen space, so y
// grows downward and the strip's top edge is the smaller y.
// ─────────────────────────────────────────────────────────────────────────────

/// Sprite scale for a scene of this size: linear between the configured
/// extremes, clamped outside them.
pub fn cow_scale(area: &PlayArea, tuning: &AreaTuning) -> f32 {
    let size = area.width * area.height;
    if size <= tuning.min_area {
        return tuning.min_scale;
    }
    if size >= tuning.max_area {
        return tuning.max_scale;
    }
    tuning.min_scale
        + (size - tuning.min_area) * (tuning.max_scale - tuning.min_scale)
            / (tuning.max_area - tuning.min_area)
}

/// Allowed range for a cow's center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn for_area(area: &PlayArea, tuning: &AreaTuning) -> Self {
        let scale = cow_scale(area, tuning);
        let sprite = tuning.frame_size * scale;
        let half = sprite / 2.0;
        let land = area.height * (1.0 - tuning.land_ratio) - sprite;
        let min = Vec2::new(half, land + half);
        let max = Vec2::new(area.width - half, area.height - half);
        // A scene smaller than one sprite would invert the edges.
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Moves `pos` along `dir` and bounces off the bounds: a clamped axis has its
/// direction component pointed back inside.
pub fn step_with_bounce(pos: &mut Vec2, dir: &mut Vec2, distance: f32, bounds: &Bounds) {
    *pos += *dir * distance;

    if pos.x < bounds.min.x {
        pos.x = bounds.min.x;
        dir.x = dir.x.abs();
    } else if pos.x > bounds.max.x {
        pos.x = bounds.max.x;
        dir.x = -dir.x.abs();
    }

    if pos.y < bounds.min.y {
        pos.y = bounds.min.y;
        dir.y = dir.y.abs();
    } else if pos.y > bounds.max.y {
        pos.y = bounds.max.y;
        dir.y = -dir.y.abs();
    }
}
