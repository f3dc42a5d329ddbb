//! Lobbed projectiles: the mortar shell (`Bomb`) and the thrower's
//! `PetrolBomb`.
//!
//! Both integrate explicitly: ground position moves at constant velocity,
//! height follows `v -= g·dt; h += v·dt`. When height comes back to zero the
//! projectile lands, goes inactive and reports the impact point. Spawning
//! the resulting explosion is the orchestrator's job.

use rand::Rng;

use crate::capability::{Renderable, WorldObject};
use crate::config::LobConfig;
use crate::random::range_f32;
use crate::vector::Vec2;

#[derive(Clone, Debug)]
pub struct Lob {
    position: Vec2,
    horizontal_velocity: Vec2,
    vertical_velocity: f32,
    height: f32,
    gravity: f32,
    landed: bool,
}

impl Lob {
    pub fn new(position: Vec2, horizontal_velocity: Vec2, vertical_velocity: f32, gravity: f32) -> Self {
        Lob {
            position,
            horizontal_velocity,
            vertical_velocity,
            height: 0.0,
            gravity,
            landed: false,
        }
    }

    /// Launch so the projectile comes down on `target`.
    pub fn aimed(from: Vec2, target: Vec2, cfg: &LobConfig) -> Self {
        let flight = cfg.flight_time();
        let horizontal = if flight > 0.0 {
            (target - from) / flight
        } else {
            Vec2::ZERO
        };
        Lob::new(from, horizontal, cfg.launch_speed, cfg.gravity)
    }

    /// One Euler step. Returns the impact point on the frame it lands.
    pub fn update(&mut self, dt: f32) -> Option<Vec2> {
        if self.landed {
            return None;
        }
        self.position += self.horizontal_velocity * dt;
        self.vertical_velocity -= self.gravity * dt;
        self.height += self.vertical_velocity * dt;
        if self.height <= 0.0 {
            self.height = 0.0;
            self.landed = true;
            return Some(self.position);
        }
        None
    }

    pub fn ground_position(&self) -> Vec2 {
        self.position
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn horizontal_velocity(&self) -> Vec2 {
        self.horizontal_velocity
    }

    pub fn is_landed(&self) -> bool {
        self.landed
    }

    fn drawn_position(&self) -> Vec2 {
        self.position + Vec2::new(0.0, self.height)
    }
}

// ── Mortar shell ─────────────────────────────────────────────────────────────

/// Mortar shell. Drawn lifted by its height, with a shadow on the ground.
#[derive(Clone, Debug)]
pub struct Bomb {
    arc: Lob,
}

impl Bomb {
    pub fn lob(from: Vec2, target: Vec2, cfg: &LobConfig) -> Self {
        Bomb {
            arc: Lob::aimed(from, target, cfg),
        }
    }

    pub fn update(&mut self, dt: f32) -> Option<Vec2> {
        self.arc.update(dt)
    }

    pub fn arc(&self) -> &Lob {
        &self.arc
    }

    pub fn shadow_position(&self) -> Vec2 {
        self.arc.ground_position()
    }

    pub fn shadow_key(&self) -> &'static str {
        "shadow"
    }
}

impl WorldObject for Bomb {
    fn position(&self) -> Vec2 {
        self.arc.drawn_position()
    }

    fn is_active(&self) -> bool {
        !self.arc.is_landed()
    }
}

impl Renderable for Bomb {
    fn texture_key(&self) -> String {
        if self.arc.vertical_velocity() > 0.0 {
            "mortar_shell_up".to_string()
        } else {
            "mortar_shell_down".to_string()
        }
    }

    fn render_depth(&self) -> f32 {
        // airborne: always on top of ground objects
        f32::MAX
    }
}

// ── Petrol bomb ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct PetrolBomb {
    arc: Lob,
    rotation: f32,
}

impl PetrolBomb {
    /// Thrown at `target` with up to `cfg.scatter` of error on each axis.
    pub fn throw<R: Rng + ?Sized>(from: Vec2, target: Vec2, cfg: &LobConfig, rng: &mut R) -> Self {
        let scatter = if cfg.scatter > 0.0 {
            Vec2::new(
                range_f32(rng, -cfg.scatter, cfg.scatter),
                range_f32(rng, -cfg.scatter, cfg.scatter),
            )
        } else {
            Vec2::ZERO
        };
        PetrolBomb {
            arc: Lob::aimed(from, target + scatter, cfg),
            rotation: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) -> Option<Vec2> {
        if !self.arc.is_landed() {
            self.rotation += 720.0 * dt;
        }
        self.arc.update(dt)
    }

    pub fn arc(&self) -> &Lob {
        &self.arc
    }
}

impl WorldObject for PetrolBomb {
    fn position(&self) -> Vec2 {
        self.arc.drawn_position()
    }

    fn is_active(&self) -> bool {
        !self.arc.is_landed()
    }
}

impl Renderable for PetrolBomb {
    fn texture_key(&self) -> String {
        let frame = (self.rotation.rem_euclid(360.0) / 90.0) as u32 % 4;
        format!("petrol_bomb_{frame}")
    }

    fn render_depth(&self) -> f32 {
        f32::MAX
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }
}
