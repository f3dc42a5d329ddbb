use crate::capability::{Renderable, WorldObject};
use crate::config::ExplosionConfig;
use crate::enemy::EnemyId;
use crate::hitbox::Aabb;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionKind {
    /// Grenades, mortar shells, destroyed machines.
    Blast,
    /// Petrol bomb impact; lower and longer-lived.
    Fire,
}

/// Who set the explosion off. Player explosions also hurt enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionSource {
    Hostile,
    Player,
}

/// Animated hazard. Hurts the player on every frame of overlap until its
/// last animation frame has played.
#[derive(Clone, Debug)]
pub struct Explosion {
    position: Vec2,
    kind: ExplosionKind,
    source: ExplosionSource,
    frame_index: u32,
    frame_timer: f32,
    frame_count: u32,
    frame_duration: f32,
    size: Vec2,
    /// Enemies already damaged by this explosion.
    hit_enemies: Vec<EnemyId>,
    active: bool,
}

impl Explosion {
    pub fn new(position: Vec2, kind: ExplosionKind, source: ExplosionSource, cfg: &ExplosionConfig) -> Self {
        let (frame_count, frame_duration, size) = match kind {
            ExplosionKind::Blast => (cfg.blast_frames, cfg.blast_frame_duration, cfg.blast_size),
            ExplosionKind::Fire => (cfg.fire_frames, cfg.fire_frame_duration, cfg.fire_size),
        };
        Explosion {
            position,
            kind,
            source,
            frame_index: 0,
            frame_timer: 0.0,
            frame_count: frame_count.max(1),
            frame_duration,
            size,
            hit_enemies: Vec::new(),
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.frame_timer += dt;
        while self.active && self.frame_timer >= self.frame_duration {
            self.frame_timer -= self.frame_duration;
            self.frame_index += 1;
            if self.frame_index >= self.frame_count {
                self.active = false;
            }
        }
    }

    /// Static box centred on the explosion, valid while active.
    pub fn hazard_box(&self) -> Aabb {
        Aabb::from_center(self.position, self.size)
    }

    pub fn kind(&self) -> ExplosionKind {
        self.kind
    }

    pub fn source(&self) -> ExplosionSource {
        self.source
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Records a hit on `id`; false if this explosion already hit it.
    pub fn mark_enemy_hit(&mut self, id: EnemyId) -> bool {
        if self.hit_enemies.contains(&id) {
            false
        } else {
            self.hit_enemies.push(id);
            true
        }
    }
}

impl WorldObject for Explosion {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Renderable for Explosion {
    fn texture_key(&self) -> String {
        match self.kind {
            ExplosionKind::Blast => format!("explosion_{}", self.frame_index),
            ExplosionKind::Fire => format!("fire_{}", self.frame_index),
        }
    }
}
