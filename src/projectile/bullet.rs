use crate::capability::{Renderable, WorldObject};
use crate::direction::Direction;
use crate::vector::{self, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// Straight-line, short-lived projectile. Velocity never changes after
/// construction.
#[derive(Clone, Debug)]
pub struct Bullet {
    position: Vec2,
    velocity: Vec2,
    owner: BulletOwner,
    created_at: f64,
    lifetime: f32,
    active: bool,
}

impl Bullet {
    pub fn new(owner: BulletOwner, position: Vec2, velocity: Vec2, now: f64, lifetime: f32) -> Self {
        Bullet {
            position,
            velocity,
            owner,
            created_at: now,
            lifetime,
            active: true,
        }
    }

    /// Fire along a compass direction. Diagonals keep the 0.7-scaled compass
    /// vector, so diagonal bullets are slightly slower.
    pub fn from_direction(
        owner: BulletOwner,
        position: Vec2,
        direction: Direction,
        speed: f32,
        now: f64,
        lifetime: f32,
    ) -> Self {
        Bullet::new(owner, position, direction.vector() * speed, now, lifetime)
    }

    /// Fire at an arbitrary angle in degrees (0 = right, 90 = up).
    pub fn from_angle(
        owner: BulletOwner,
        position: Vec2,
        degrees: f32,
        speed: f32,
        now: f64,
        lifetime: f32,
    ) -> Self {
        Bullet::new(owner, position, vector::from_degrees(degrees) * speed, now, lifetime)
    }

    pub fn update(&mut self, dt: f32) {
        if self.active {
            self.position += self.velocity * dt;
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now - self.created_at > f64::from(self.lifetime)
    }

    pub fn owner(&self) -> BulletOwner {
        self.owner
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn created_at(&self) -> f64 {
        self.created_at
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

impl WorldObject for Bullet {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Renderable for Bullet {
    fn texture_key(&self) -> String {
        match self.owner {
            BulletOwner::Player => "bullet_player".to_string(),
            BulletOwner::Enemy => "bullet_enemy".to_string(),
        }
    }
}
