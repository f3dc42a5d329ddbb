//! Knockback and the death tumble shared by the creature enemies.

use crate::config::ReactionConfig;
use crate::vector::{Vec2, VecExt};

/// Below this speed knockback is dropped entirely.
const KNOCKBACK_REST_SPEED: f32 = 1.0;

#[derive(Clone, Debug, Default)]
pub struct Knockback {
    velocity: Vec2,
}

impl Knockback {
    /// Push away from `source`. A hit from exactly on top of the target has
    /// no direction and only resets the velocity.
    pub fn apply(&mut self, source: Vec2, target: Vec2, speed: f32) {
        self.velocity = match (target - source).try_normalize_guarded() {
            Some(dir) => dir * speed,
            None => Vec2::ZERO,
        };
    }

    /// Displacement for this frame; friction is applied once per call.
    pub fn step(&mut self, dt: f32, friction: f32) -> Vec2 {
        let delta = self.velocity * dt;
        self.velocity *= friction;
        if self.velocity.length() < KNOCKBACK_REST_SPEED {
            self.velocity = Vec2::ZERO;
        }
        delta
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// Pop up, spin, fall back to the ground height the creature died at, then
/// fade out.
#[derive(Clone, Debug)]
pub struct DeathTumble {
    height: f32,
    vertical_velocity: f32,
    rotation: f32,
    spin: f32,
    gravity: f32,
    grounded: bool,
    fade_elapsed: f32,
    fade_duration: f32,
}

impl DeathTumble {
    pub fn start(cfg: &ReactionConfig) -> Self {
        DeathTumble {
            height: 0.0,
            vertical_velocity: cfg.death_pop,
            rotation: 0.0,
            spin: cfg.death_spin,
            gravity: cfg.gravity,
            grounded: cfg.death_pop <= 0.0,
            fade_elapsed: 0.0,
            fade_duration: cfg.fade_duration,
        }
    }

    /// Returns true once the fade has finished.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.grounded {
            self.vertical_velocity -= self.gravity * dt;
            self.height += self.vertical_velocity * dt;
            self.rotation += self.spin * dt;
            if self.height <= 0.0 {
                self.height = 0.0;
                self.vertical_velocity = 0.0;
                self.grounded = true;
            }
            return false;
        }
        self.fade_elapsed += dt;
        self.fade_elapsed >= self.fade_duration
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn alpha(&self) -> f32 {
        if !self.grounded {
            return 1.0;
        }
        if self.fade_duration <= 0.0 {
            return 0.0;
        }
        (1.0 - self.fade_elapsed / self.fade_duration).clamp(0.0, 1.0)
    }
}
