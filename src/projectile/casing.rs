use rand::Rng;

use crate::capability::{Renderable, WorldObject};
use crate::config::CasingConfig;
use crate::vector::{self, Vec2};

/// Spent shell casing. Purely cosmetic: it never collides.
#[derive(Clone, Debug)]
pub struct Casing {
    position: Vec2,
    velocity: Vec2,
    rotation: f32,
    age: f32,
    lifetime: f32,
    fade: f32,
    friction: f32,
    active: bool,
}

impl Casing {
    /// Eject sideways from a shot fired at `shot_degrees`.
    pub fn eject<R: Rng + ?Sized>(position: Vec2, shot_degrees: f32, cfg: &CasingConfig, rng: &mut R) -> Self {
        let side = if rng.gen_bool(0.5) { 90.0 } else { -90.0 };
        let jitter = rng.gen_range(-20.0..20.0);
        let velocity = vector::from_degrees(shot_degrees + side + jitter) * cfg.eject_speed;
        Casing {
            position,
            velocity,
            rotation: rng.gen_range(0.0..360.0),
            age: 0.0,
            lifetime: cfg.lifetime,
            fade: cfg.fade,
            friction: cfg.friction,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.age += dt;
        self.position += self.velocity * dt;
        self.rotation += self.velocity.length() * 4.0 * dt;
        self.velocity *= self.friction;
        if self.age >= self.lifetime {
            self.active = false;
        }
    }
}

impl WorldObject for Casing {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Renderable for Casing {
    fn texture_key(&self) -> String {
        let frame = (self.rotation.rem_euclid(360.0) / 90.0) as u32 % 4;
        format!("casing_{frame}")
    }

    /// 1.0 until the fade window, then linearly down to 0.0.
    fn alpha(&self) -> f32 {
        let remaining = self.lifetime - self.age;
        if self.fade <= 0.0 || remaining >= self.fade {
            1.0
        } else {
            (remaining / self.fade).clamp(0.0, 1.0)
        }
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }
}
