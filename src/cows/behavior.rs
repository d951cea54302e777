//! Per-cow behavior state machine.
//!
//! Each runtime cow owns a [`CowBrain`] seeded from the cow's seed. Timed
//! activities (transitions, eating, petting) hold an explicit `remaining`
//! countdown in seconds; open-ended ones (idle, walk) count ticks and roll
//! the stream to decide when to move on.

use bevy::prelude::*;

use super::movement::{step_with_bounce, Bounds};
use crate::data::BehaviorTuning;
use crate::rng::SeededStream;

/// Nominal tick rate movement speeds are expressed in.
pub const FRAMES_PER_SECOND: f32 = 60.0;

pub const EAT_FRAMES: u32 = 7;
pub const IDLE_TO_WALK_FRAMES: u32 = 3;
pub const PET_FRAMES: u32 = 5;
pub const WALK_TO_IDLE_FRAMES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Activity {
    #[default]
    Idle,
    IdleToWalk,
    Walk,
    WalkToIdle,
    Eat,
    Pet,
}

impl Activity {
    /// Animation the renderer should play.
    pub fn animation_key(self) -> &'static str {
        match self {
            Activity::Idle => "idle",
            Activity::IdleToWalk => "idleToWalk",
            Activity::Walk => "walk",
            Activity::WalkToIdle => "walkToIdle",
            Activity::Eat => "eat",
            Activity::Pet => "pet",
        }
    }

    /// Frames in this activity's one-shot animation, `None` for looping ones.
    pub fn frame_count(self) -> Option<u32> {
        match self {
            Activity::IdleToWalk => Some(IDLE_TO_WALK_FRAMES),
            Activity::WalkToIdle => Some(WALK_TO_IDLE_FRAMES),
            Activity::Eat => Some(EAT_FRAMES),
            Activity::Pet => Some(PET_FRAMES),
            Activity::Idle | Activity::Walk => None,
        }
    }
}

/// Something the herd needs to act on after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorEvent {
    FinishedEating,
    FinishedPetting,
}

/// Seconds a one-shot animation of `frames` frames lasts.
pub fn animation_secs(frames: u32, tuning: &BehaviorTuning) -> f32 {
    let per_frame = 1.0 / (tuning.anim_speed.max(f32::EPSILON) * FRAMES_PER_SECOND);
    frames as f32 * per_frame
}

#[derive(Component, Debug, Clone)]
pub struct CowBrain {
    activity: Activity,
    /// Seconds left in a timed activity.
    remaining: f32,
    idle_ticks: u32,
    walk_ticks: u32,
    eat_cooldown: u32,
    direction: Vec2,
    facing: f32,
    eat_chance: f32,
    seed: u64,
    stream: SeededStream,
}

impl CowBrain {
    pub fn new(seed: u64, eat_chance: f32) -> Self {
        let mut stream = SeededStream::new(seed);
        let direction = Vec2::new(
            stream.next_f32() - 0.5,
            stream.next_f32() - 0.5,
        )
        .try_normalize()
        .unwrap_or(Vec2::X);
        Self {
            activity: Activity::Idle,
            remaining: 0.0,
            idle_ticks: 0,
            walk_ticks: 0,
            eat_cooldown: 0,
            direction,
            facing: if direction.x < 0.0 { -1.0 } else { 1.0 },
            eat_chance,
            seed,
            stream,
        }
    }

    /// The seed this brain's draws came from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// `1.0` facing right, `-1.0` facing left.
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    fn enter(&mut self, activity: Activity, tuning: &BehaviorTuning) {
        self.activity = activity;
        self.remaining = activity
            .frame_count()
            .map(|frames| animation_secs(frames, tuning))
            .unwrap_or(0.0);
    }

    /// Starts the pet animation, interrupting whatever the cow was doing.
    /// Returns `false` (and changes nothing) if a pet is already playing.
    pub fn request_pet(&mut self, tuning: &BehaviorTuning) -> bool {
        if self.activity == Activity::Pet {
            return false;
        }
        self.idle_ticks = 0;
        self.walk_ticks = 0;
        self.enter(Activity::Pet, tuning);
        true
    }

    /// Advances one frame of `delta_secs`. Movement is scaled to a 60 Hz
    /// frame so a slow frame covers proportionally more ground.
    pub fn tick(
        &mut self,
        delta_secs: f32,
        pos: &mut Vec2,
        bounds: &Bounds,
        tuning: &BehaviorTuning,
    ) -> Option<BehaviorEvent> {
        self.eat_cooldown = self.eat_cooldown.saturating_sub(1);

        if self.activity.frame_count().is_some() {
            self.remaining -= delta_secs;
            if self.remaining > 0.0 {
                return None;
            }
            return self.finish_timed(tuning);
        }

        match self.activity {
            Activity::Idle => {
                self.tick_idle(tuning);
                None
            }
            Activity::Walk => {
                self.tick_walk(delta_secs, pos, bounds, tuning);
                None
            }
            _ => None,
        }
    }

    fn finish_timed(&mut self, tuning: &BehaviorTuning) -> Option<BehaviorEvent> {
        match self.activity {
            Activity::IdleToWalk => {
                self.enter(Activity::Walk, tuning);
                None
            }
            Activity::WalkToIdle => {
                self.enter(Activity::Idle, tuning);
                None
            }
            Activity::Eat => {
                self.eat_cooldown = tuning.eat_cooldown_ticks;
                self.enter(Activity::Idle, tuning);
                Some(BehaviorEvent::FinishedEating)
            }
            Activity::Pet => {
                self.enter(Activity::Idle, tuning);
                Some(BehaviorEvent::FinishedPetting)
            }
            Activity::Idle | Activity::Walk => None,
        }
    }

    fn tick_idle(&mut self, tuning: &BehaviorTuning) {
        let roll = self.stream.next_f64();
        if self.eat_cooldown == 0 && roll < tuning.eat_probability * self.eat_chance as f64 {
            self.idle_ticks = 0;
            self.enter(Activity::Eat, tuning);
            return;
        }

        self.idle_ticks += 1;
        if self.idle_ticks > tuning.min_idle_ticks
            && self.stream.chance(tuning.idle_walk_probability)
        {
            self.idle_ticks = 0;
            self.enter(Activity::IdleToWalk, tuning);
        }
    }

    fn tick_walk(&mut self, delta_secs: f32, pos: &mut Vec2, bounds: &Bounds, tuning: &BehaviorTuning) {
        self.walk_ticks += 1;
        if self.walk_ticks > tuning.min_walk_ticks
            && self.stream.chance(tuning.idle_walk_probability)
        {
            self.walk_ticks = 0;
            self.enter(Activity::WalkToIdle, tuning);
            return;
        }

        let wobble = Vec2::new(
            self.stream.next_f32() - 0.5,
            self.stream.next_f32() - 0.5,
        ) * tuning.jitter;
        self.direction = (self.direction + wobble)
            .try_normalize()
            .unwrap_or(self.direction);

        let frames = delta_secs * FRAMES_PER_SECOND;
        step_with_bounce(pos, &mut self.direction, tuning.speed * frames, bounds);

        if self.direction.x.abs() > 0.05 {
            self.facing = self.direction.x.signum();
        }
    }
}
