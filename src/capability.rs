//! Capability traits shared by everything that lives in the arena.
//!
//! Concrete types implement whichever subset applies: a bullet is only a
//! `WorldObject` + `Renderable`, a turret is all of them. The orchestrator
//! talks to enemies through the closed `Enemy` enum and to these traits
//! where it needs a capability rather than a type.

use crate::direction::Direction;
use crate::hitbox::Aabb;
use crate::sight::BlockerView;
use crate::vector::Vec2;

/// Position plus the one-way `active` flag.
pub trait WorldObject {
    fn position(&self) -> Vec2;

    /// Goes false exactly once, when the object expires or is destroyed.
    fn is_active(&self) -> bool;
}

pub trait Renderable: WorldObject {
    /// Opaque key the rendering collaborator maps to a texture/frame.
    fn texture_key(&self) -> String;

    /// Draw order: lower depth is drawn first. Objects further up the
    /// screen (larger y) sit behind those below them.
    fn render_depth(&self) -> f32 {
        -self.position().y
    }

    /// Offset from `position()` to where the sprite is drawn (airborne
    /// bodies are lifted by their height).
    fn draw_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn alpha(&self) -> f32 {
        1.0
    }

    /// Sprite rotation in degrees, counter-clockwise.
    fn rotation(&self) -> f32 {
        0.0
    }
}

pub trait Collidable: WorldObject {
    /// Full visual bounds; used for bullet and explosion contact.
    fn sprite_hitbox(&self) -> Aabb;

    /// Lower half of the visual bounds; used for locomotion blocking.
    fn movement_hitbox(&self) -> Aabb;
}

/// Result of a single damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DamageOutcome {
    /// False when the target ignored the hit (already dying/destroyed).
    pub applied: bool,
    /// True only on the hit that pushed health to zero.
    pub destroyed_now: bool,
}

impl DamageOutcome {
    pub const IGNORED: DamageOutcome = DamageOutcome {
        applied: false,
        destroyed_now: false,
    };
}

pub trait Damageable {
    fn health(&self) -> f32;
    fn max_health(&self) -> f32;

    /// True once the death sequence has started. Never reverts.
    fn is_destroyed(&self) -> bool;

    /// Apply `amount` damage arriving from `source` (used for knockback).
    fn take_damage(&mut self, amount: f32, source: Vec2) -> DamageOutcome;
}

pub trait Trackable: WorldObject {
    fn facing(&self) -> Direction;

    /// Whether the target is inside sight range with a clear line of sight.
    fn can_see(&self, target: Vec2, blockers: &BlockerView<'_>) -> bool;
}

pub trait Shooter {
    /// Cooldown and liveness check; aim is checked separately.
    fn can_shoot(&self) -> bool;
}

pub trait Positionable: WorldObject {
    /// Muzzle / hand point projectiles are launched from.
    fn barrel_point(&self) -> Vec2;
}
