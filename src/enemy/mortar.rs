use tracing::debug;

use super::{sees, EnemyAction, EnemyContext, EnemyId};
use crate::capability::{
    Collidable, DamageOutcome, Damageable, Positionable, Renderable, Shooter, Trackable, WorldObject,
};
use crate::config::MortarConfig;
use crate::direction::Direction;
use crate::hitbox::Aabb;
use crate::sight::BlockerView;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MortarState {
    Patrol,
    Engaged,
    Firing,
    Destroyed,
}

impl MortarState {
    pub fn name(self) -> &'static str {
        match self {
            MortarState::Patrol => "patrol",
            MortarState::Engaged => "engaged",
            MortarState::Firing => "firing",
            MortarState::Destroyed => "destroyed",
        }
    }
}

/// Mortar emplacement. Lobs one shell per firing cycle at where the player
/// stood when the release frame came up.
#[derive(Clone, Debug)]
pub struct Mortar {
    id: EnemyId,
    position: Vec2,
    health: f32,
    max_health: f32,
    facing: Direction,
    state: MortarState,
    state_timer: f32,
    sweep_timer: f32,
    fire_frame: u32,
    frame_timer: f32,
    released: bool,
    player_position: Vec2,
    cfg: MortarConfig,
    active: bool,
}

impl Mortar {
    pub fn new(position: Vec2, cfg: &MortarConfig) -> Self {
        Mortar {
            id: EnemyId(0),
            position,
            health: cfg.health,
            max_health: cfg.health,
            facing: Direction::Down,
            state: MortarState::Patrol,
            state_timer: 0.0,
            sweep_timer: 0.0,
            fire_frame: 0,
            frame_timer: 0.0,
            released: false,
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

    pub fn state(&self) -> MortarState {
        self.state
    }

    pub fn fire_frame(&self) -> u32 {
        self.fire_frame
    }

    pub fn update(&mut self, dt: f32, ctx: &EnemyContext<'_>) {
        if !self.active {
            return;
        }
        self.player_position = ctx.player_position;

        match self.state {
            MortarState::Destroyed => {
                self.state_timer += dt;
                if self.state_timer >= self.cfg.wreck_duration {
                    self.active = false;
                }
            }
            MortarState::Patrol => {
                if self.can_see(ctx.player_position, &ctx.blockers) {
                    debug!(id = self.id.0, "mortar engaged");
                    self.enter(MortarState::Engaged);
                    self.face_player();
                } else {
                    self.sweep_timer += dt;
                    if self.cfg.sweep_interval > 0.0 && self.sweep_timer >= self.cfg.sweep_interval {
                        self.sweep_timer -= self.cfg.sweep_interval;
                        self.facing = self.facing.rotate_ccw();
                    }
                }
            }
            MortarState::Engaged => {
                self.face_player();
                if self.position.distance(ctx.player_position) > self.cfg.look_distance {
                    debug!(id = self.id.0, "mortar back to patrol");
                    self.enter(MortarState::Patrol);
                    return;
                }
                self.state_timer += dt;
                if self.state_timer >= self.cfg.fire_interval {
                    self.enter(MortarState::Firing);
                    self.fire_frame = 0;
                    self.frame_timer = 0.0;
                    self.released = false;
                }
            }
            MortarState::Firing => {
                self.face_player();
                // one frame per update at most, so the release frame is
                // always observed by `act`
                self.frame_timer += dt;
                if self.frame_timer >= self.cfg.frame_duration {
                    self.frame_timer -= self.cfg.frame_duration;
                    self.fire_frame += 1;
                    if self.fire_frame >= self.cfg.fire_frames {
                        self.fire_frame = 0;
                        self.enter(MortarState::Engaged);
                    }
                }
            }
        }
    }

    /// Releases the shell exactly once per firing cycle, on the release
    /// frame.
    pub fn act(&mut self) -> Option<EnemyAction> {
        if self.state != MortarState::Firing
            || self.fire_frame != self.cfg.release_frame
            || self.released
        {
            return None;
        }
        self.released = true;
        debug!(id = self.id.0, "mortar shell released");
        Some(EnemyAction::LaunchShell {
            origin: self.barrel_point(),
            target: self.player_position,
        })
    }

    fn enter(&mut self, state: MortarState) {
        self.state = state;
        self.state_timer = 0.0;
    }

    fn face_player(&mut self) {
        let delta = self.player_position - self.position;
        if delta != Vec2::ZERO {
            self.facing = Direction::from_delta(delta);
        }
    }
}

impl WorldObject for Mortar {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Collidable for Mortar {
    fn sprite_hitbox(&self) -> Aabb {
        Aabb::from_center(self.position, self.cfg.sprite_size)
    }

    fn movement_hitbox(&self) -> Aabb {
        Aabb::lower_half(self.position, self.cfg.sprite_size)
    }
}

impl Damageable for Mortar {
    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn is_destroyed(&self) -> bool {
        self.state == MortarState::Destroyed
    }

    fn take_damage(&mut self, amount: f32, _source: Vec2) -> DamageOutcome {
        if self.is_destroyed() || !self.active {
            return DamageOutcome::IGNORED;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.enter(MortarState::Destroyed);
            return DamageOutcome {
                applied: true,
                destroyed_now: true,
            };
        }
        if self.state == MortarState::Patrol {
            self.enter(MortarState::Engaged);
        }
        DamageOutcome {
            applied: true,
            destroyed_now: false,
        }
    }
}

impl Trackable for Mortar {
    fn facing(&self) -> Direction {
        self.facing
    }

    fn can_see(&self, target: Vec2, blockers: &BlockerView<'_>) -> bool {
        sees(self.id, self.position, target, self.cfg.look_distance, blockers)
    }
}

impl Shooter for Mortar {
    fn can_shoot(&self) -> bool {
        self.active && self.state == MortarState::Firing && !self.released
    }
}

impl Positionable for Mortar {
    fn barrel_point(&self) -> Vec2 {
        // the tube points up out of the pit
        self.position + Vec2::new(0.0, self.cfg.sprite_size.y * 0.25)
    }
}

impl Renderable for Mortar {
    fn texture_key(&self) -> String {
        match self.state {
            MortarState::Destroyed => "mortar_destroyed".to_string(),
            MortarState::Firing => format!("mortar_fire_{}", self.fire_frame),
            MortarState::Patrol | MortarState::Engaged => format!("mortar_{}", self.facing.key()),
        }
    }
}
