//! Enemy AI state machines.
//!
//! Each enemy type is a self-contained state machine. The orchestrator
//! drives them in two passes per frame: `update` (sense, move, re-aim) and
//! then `act` (attack decisions). Attacks come back as `EnemyAction`s; the
//! enemy never constructs projectiles itself.

mod bear;
mod mortar;
mod reaction;
mod thrower;
mod turret;

use rand::Rng;

pub use bear::{Bear, BearState};
pub use mortar::{Mortar, MortarState};
pub use reaction::{DeathTumble, Knockback};
pub use thrower::{Thrower, ThrowerState};
pub use turret::{Turret, TurretState};

use crate::capability::{Collidable, DamageOutcome, Damageable, Renderable, Trackable, WorldObject};
use crate::direction::Direction;
use crate::hitbox::Aabb;
use crate::sight::BlockerView;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Turret,
    Mortar,
    Bear,
    Thrower,
}

impl EnemyKind {
    /// Machines blow up when destroyed; creatures just fall over.
    pub fn explodes_on_death(self) -> bool {
        match self {
            EnemyKind::Turret | EnemyKind::Mortar => true,
            EnemyKind::Bear | EnemyKind::Thrower => false,
        }
    }
}

/// What an enemy wants to happen this frame.
#[derive(Clone, Debug, PartialEq)]
pub enum EnemyAction {
    Fire { origin: Vec2, direction: Direction },
    LaunchShell { origin: Vec2, target: Vec2 },
    ThrowPetrol { origin: Vec2, target: Vec2 },
    Swipe { damage: f32 },
}

/// Per-frame read-only inputs to every enemy.
#[derive(Clone, Copy, Debug)]
pub struct EnemyContext<'a> {
    pub player_position: Vec2,
    pub blockers: BlockerView<'a>,
}

impl<'a> EnemyContext<'a> {
    pub fn new(player_position: Vec2, blockers: BlockerView<'a>) -> Self {
        EnemyContext {
            player_position,
            blockers,
        }
    }
}

/// Closed set of enemy types.
#[derive(Clone, Debug)]
pub enum Enemy {
    Turret(Turret),
    Mortar(Mortar),
    Bear(Bear),
    Thrower(Thrower),
}

impl Enemy {
    pub fn id(&self) -> EnemyId {
        match self {
            Enemy::Turret(e) => e.id(),
            Enemy::Mortar(e) => e.id(),
            Enemy::Bear(e) => e.id(),
            Enemy::Thrower(e) => e.id(),
        }
    }

    /// Used by the orchestrator when the enemy is added to the world.
    pub(crate) fn set_id(&mut self, id: EnemyId) {
        match self {
            Enemy::Turret(e) => e.set_id(id),
            Enemy::Mortar(e) => e.set_id(id),
            Enemy::Bear(e) => e.set_id(id),
            Enemy::Thrower(e) => e.set_id(id),
        }
    }

    pub fn kind(&self) -> EnemyKind {
        match self {
            Enemy::Turret(_) => EnemyKind::Turret,
            Enemy::Mortar(_) => EnemyKind::Mortar,
            Enemy::Bear(_) => EnemyKind::Bear,
            Enemy::Thrower(_) => EnemyKind::Thrower,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, ctx: &EnemyContext<'_>, rng: &mut R) {
        match self {
            Enemy::Turret(e) => e.update(dt, ctx),
            Enemy::Mortar(e) => e.update(dt, ctx),
            Enemy::Bear(e) => e.update(dt, ctx),
            Enemy::Thrower(e) => e.update(dt, ctx, rng),
        }
    }

    pub fn act(&mut self, ctx: &EnemyContext<'_>) -> Option<EnemyAction> {
        match self {
            Enemy::Turret(e) => e.act(ctx),
            Enemy::Mortar(e) => e.act(),
            Enemy::Bear(e) => e.act(ctx),
            Enemy::Thrower(e) => e.act(),
        }
    }

    /// Short state name for logs and the viewer.
    pub fn state_name(&self) -> &'static str {
        match self {
            Enemy::Turret(e) => e.state().name(),
            Enemy::Mortar(e) => e.state().name(),
            Enemy::Bear(e) => e.state().name(),
            Enemy::Thrower(e) => e.state().name(),
        }
    }
}

impl From<Turret> for Enemy {
    fn from(e: Turret) -> Self {
        Enemy::Turret(e)
    }
}

impl From<Mortar> for Enemy {
    fn from(e: Mortar) -> Self {
        Enemy::Mortar(e)
    }
}

impl From<Bear> for Enemy {
    fn from(e: Bear) -> Self {
        Enemy::Bear(e)
    }
}

impl From<Thrower> for Enemy {
    fn from(e: Thrower) -> Self {
        Enemy::Thrower(e)
    }
}

impl WorldObject for Enemy {
    fn position(&self) -> Vec2 {
        match self {
            Enemy::Turret(e) => e.position(),
            Enemy::Mortar(e) => e.position(),
            Enemy::Bear(e) => e.position(),
            Enemy::Thrower(e) => e.position(),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Enemy::Turret(e) => e.is_active(),
            Enemy::Mortar(e) => e.is_active(),
            Enemy::Bear(e) => e.is_active(),
            Enemy::Thrower(e) => e.is_active(),
        }
    }
}

impl Collidable for Enemy {
    fn sprite_hitbox(&self) -> Aabb {
        match self {
            Enemy::Turret(e) => e.sprite_hitbox(),
            Enemy::Mortar(e) => e.sprite_hitbox(),
            Enemy::Bear(e) => e.sprite_hitbox(),
            Enemy::Thrower(e) => e.sprite_hitbox(),
        }
    }

    fn movement_hitbox(&self) -> Aabb {
        match self {
            Enemy::Turret(e) => e.movement_hitbox(),
            Enemy::Mortar(e) => e.movement_hitbox(),
            Enemy::Bear(e) => e.movement_hitbox(),
            Enemy::Thrower(e) => e.movement_hitbox(),
        }
    }
}

impl Damageable for Enemy {
    fn health(&self) -> f32 {
        match self {
            Enemy::Turret(e) => e.health(),
            Enemy::Mortar(e) => e.health(),
            Enemy::Bear(e) => e.health(),
            Enemy::Thrower(e) => e.health(),
        }
    }

    fn max_health(&self) -> f32 {
        match self {
            Enemy::Turret(e) => e.max_health(),
            Enemy::Mortar(e) => e.max_health(),
            Enemy::Bear(e) => e.max_health(),
            Enemy::Thrower(e) => e.max_health(),
        }
    }

    fn is_destroyed(&self) -> bool {
        match self {
            Enemy::Turret(e) => e.is_destroyed(),
            Enemy::Mortar(e) => e.is_destroyed(),
            Enemy::Bear(e) => e.is_destroyed(),
            Enemy::Thrower(e) => e.is_destroyed(),
        }
    }

    fn take_damage(&mut self, amount: f32, source: Vec2) -> DamageOutcome {
        match self {
            Enemy::Turret(e) => e.take_damage(amount, source),
            Enemy::Mortar(e) => e.take_damage(amount, source),
            Enemy::Bear(e) => e.take_damage(amount, source),
            Enemy::Thrower(e) => e.take_damage(amount, source),
        }
    }
}

impl Trackable for Enemy {
    fn facing(&self) -> Direction {
        match self {
            Enemy::Turret(e) => e.facing(),
            Enemy::Mortar(e) => e.facing(),
            Enemy::Bear(e) => e.facing(),
            Enemy::Thrower(e) => e.facing(),
        }
    }

    fn can_see(&self, target: Vec2, blockers: &BlockerView<'_>) -> bool {
        match self {
            Enemy::Turret(e) => e.can_see(target, blockers),
            Enemy::Mortar(e) => e.can_see(target, blockers),
            Enemy::Bear(e) => e.can_see(target, blockers),
            Enemy::Thrower(e) => e.can_see(target, blockers),
        }
    }
}

impl Renderable for Enemy {
    fn texture_key(&self) -> String {
        match self {
            Enemy::Turret(e) => e.texture_key(),
            Enemy::Mortar(e) => e.texture_key(),
            Enemy::Bear(e) => e.texture_key(),
            Enemy::Thrower(e) => e.texture_key(),
        }
    }

    fn draw_offset(&self) -> Vec2 {
        match self {
            Enemy::Turret(e) => e.draw_offset(),
            Enemy::Mortar(e) => e.draw_offset(),
            Enemy::Bear(e) => e.draw_offset(),
            Enemy::Thrower(e) => e.draw_offset(),
        }
    }

    fn alpha(&self) -> f32 {
        match self {
            Enemy::Turret(e) => e.alpha(),
            Enemy::Mortar(e) => e.alpha(),
            Enemy::Bear(e) => e.alpha(),
            Enemy::Thrower(e) => e.alpha(),
        }
    }

    fn rotation(&self) -> f32 {
        match self {
            Enemy::Turret(e) => e.rotation(),
            Enemy::Mortar(e) => e.rotation(),
            Enemy::Bear(e) => e.rotation(),
            Enemy::Thrower(e) => e.rotation(),
        }
    }
}

/// Sight test shared by every enemy: range first, then a raycast that
/// ignores the enemy's own box.
pub(crate) fn sees(
    me: EnemyId,
    from: Vec2,
    target: Vec2,
    range: f32,
    blockers: &BlockerView<'_>,
) -> bool {
    from.distance(target) <= range && blockers.line_of_sight(from, target, Some(me))
}
