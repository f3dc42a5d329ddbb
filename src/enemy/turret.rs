use tracing::debug;

use super::{sees, EnemyAction, EnemyContext, EnemyId};
use crate::capability::{
    Collidable, DamageOutcome, Damageable, Positionable, Renderable, Shooter, Trackable, WorldObject,
};
use crate::config::TurretConfig;
use crate::direction::Direction;
use crate::hitbox::Aabb;
use crate::sight::BlockerView;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurretState {
    /// Rotating one compass step every scan interval.
    Idle,
    /// Facing the player every frame.
    Tracking,
    /// Wreck; despawns after the wreck duration.
    Destroyed,
}

impl TurretState {
    pub fn name(self) -> &'static str {
        match self {
            TurretState::Idle => "idle",
            TurretState::Tracking => "tracking",
            TurretState::Destroyed => "destroyed",
        }
    }
}

/// Stationary gun emplacement.
#[derive(Clone, Debug)]
pub struct Turret {
    id: EnemyId,
    position: Vec2,
    health: f32,
    max_health: f32,
    facing: Direction,
    state: TurretState,
    state_timer: f32,
    cooldown: f32,
    player_position: Vec2,
    cfg: TurretConfig,
    active: bool,
}

impl Turret {
    pub fn new(position: Vec2, facing: Direction, cfg: &TurretConfig) -> Self {
        Turret {
            id: EnemyId(0),
            position,
            health: cfg.health,
            max_health: cfg.health,
            facing,
            state: TurretState::Idle,
            state_timer: 0.0,
            cooldown: 0.0,
            player_position: position,
            cfg: cfg.clone(),
            active: true,
        }
    }

    pub fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EnemyId) {
        self.id = id;
    }

    pub fn state(&self) -> TurretState {
        self.state
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown
    }

    pub fn update(&mut self, dt: f32, ctx: &EnemyContext<'_>) {
        if !self.active {
            return;
        }
        self.player_position = ctx.player_position;
        self.cooldown = (self.cooldown - dt).max(0.0);

        match self.state {
            TurretState::Destroyed => {
                self.state_timer += dt;
                if self.state_timer >= self.cfg.wreck_duration {
                    self.active = false;
                }
            }
            TurretState::Idle => {
                if self.can_see(ctx.player_position, &ctx.blockers) {
                    debug!(id = self.id.0, "turret acquired player");
                    self.state = TurretState::Tracking;
                    self.state_timer = 0.0;
                    self.face_player();
                } else {
                    self.state_timer += dt;
                    if self.cfg.scan_interval > 0.0 && self.state_timer >= self.cfg.scan_interval {
                        self.state_timer -= self.cfg.scan_interval;
                        self.facing = self.facing.rotate_ccw();
                    }
                }
            }
            TurretState::Tracking => {
                if self.position.distance(ctx.player_position) > self.cfg.sight_range {
                    debug!(id = self.id.0, "turret lost player");
                    self.state = TurretState::Idle;
                    self.state_timer = 0.0;
                } else {
                    self.face_player();
                }
            }
        }
    }

    /// Fire if alive, the player is in range and inside the current facing
    /// cone, and the cooldown has run out.
    pub fn act(&mut self, ctx: &EnemyContext<'_>) -> Option<EnemyAction> {
        if !self.can_shoot() || !self.can_see_player_in_current_direction(ctx.player_position) {
            return None;
        }
        self.cooldown = self.cfg.fire_cooldown;
        Some(EnemyAction::Fire {
            origin: self.barrel_point(),
            direction: self.facing,
        })
    }

    pub fn can_see_player_in_current_direction(&self, player: Vec2) -> bool {
        !self.is_destroyed()
            && self.position.distance(player) <= self.cfg.sight_range
            && self.facing.cone_contains(player - self.position)
    }

    fn face_player(&mut self) {
        let delta = self.player_position - self.position;
        if delta != Vec2::ZERO {
            self.facing = Direction::from_delta(delta);
        }
    }
}

impl WorldObject for Turret {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Collidable for Turret {
    fn sprite_hitbox(&self) -> Aabb {
        Aabb::from_center(self.position, self.cfg.sprite_size)
    }

    fn movement_hitbox(&self) -> Aabb {
        Aabb::lower_half(self.position, self.cfg.sprite_size)
    }
}

impl Damageable for Turret {
    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn is_destroyed(&self) -> bool {
        self.state == TurretState::Destroyed
    }

    fn take_damage(&mut self, amount: f32, _source: Vec2) -> DamageOutcome {
        if self.is_destroyed() || !self.active {
            return DamageOutcome::IGNORED;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.state = TurretState::Destroyed;
            self.state_timer = 0.0;
            return DamageOutcome {
                applied: true,
                destroyed_now: true,
            };
        }
        if self.state == TurretState::Idle {
            self.state = TurretState::Tracking;
            self.state_timer = 0.0;
        }
        DamageOutcome {
            applied: true,
            destroyed_now: false,
        }
    }
}

impl Trackable for Turret {
    fn facing(&self) -> Direction {
        self.facing
    }

    fn can_see(&self, target: Vec2, blockers: &BlockerView<'_>) -> bool {
        sees(self.id, self.position, target, self.cfg.sight_range, blockers)
    }
}

impl Shooter for Turret {
    fn can_shoot(&self) -> bool {
        self.active && !self.is_destroyed() && self.cooldown <= 0.0
    }
}

impl Positionable for Turret {
    fn barrel_point(&self) -> Vec2 {
        self.position + self.facing.vector() * self.cfg.barrel_length
    }
}

impl Renderable for Turret {
    fn texture_key(&self) -> String {
        match self.state {
            TurretState::Destroyed => "turret_destroyed".to_string(),
            _ => format!("turret_{}", self.facing.key()),
        }
    }
}
