use tracing::debug;

use super::reaction::{DeathTumble, Knockback};
use super::{sees, EnemyAction, EnemyContext, EnemyId};
use crate::capability::{Collidable, DamageOutcome, Damageable, Renderable, Trackable, WorldObject};
use crate::config::BearConfig;
use crate::direction::Direction;
use crate::hitbox::Aabb;
use crate::sight::BlockerView;
use crate::steering::{slide, Steering};
use crate::vector::{Vec2, VecExt};

const IDLE_FRAMES: u32 = 4;
const WAKE_FRAMES: u32 = 6;
const RUN_FRAMES: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BearState {
    Idle,
    WakingUp,
    Running,
    Hit,
    Dying,
}

impl BearState {
    pub fn name(self) -> &'static str {
        match self {
            BearState::Idle => "idle",
            BearState::WakingUp => "waking_up",
            BearState::Running => "running",
            BearState::Hit => "hit",
            BearState::Dying => "dying",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Bear {
    id: EnemyId,
    position: Vec2,
    health: f32,
    max_health: f32,
    facing: Direction,
    state: BearState,
    state_timer: f32,
    anim_timer: f32,
    attack_cooldown: f32,
    player_position: Vec2,
    steering: Steering,
    knockback: Knockback,
    tumble: Option<DeathTumble>,
    cfg: BearConfig,
    active: bool,
}

impl Bear {
    pub fn new(position: Vec2, cfg: &BearConfig) -> Self {
        Bear {
            id: EnemyId(0),
            position,
            health: cfg.health,
            max_health: cfg.health,
            facing: Direction::Down,
            state: BearState::Idle,
            state_timer: 0.0,
            anim_timer: 0.0,
            attack_cooldown: 0.0,
            player_position: position,
            steering: Steering::new(),
            knockback: Knockback::default(),
            tumble: None,
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

    pub fn state(&self) -> BearState {
        self.state
    }

    pub fn tumble(&self) -> Option<&DeathTumble> {
        self.tumble.as_ref()
    }

    pub fn update(&mut self, dt: f32, ctx: &EnemyContext<'_>) {
        if !self.active {
            return;
        }
        self.player_position = ctx.player_position;
        self.state_timer += dt;
        self.anim_timer += dt;
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);

        match self.state {
            BearState::Idle => {
                if self.can_see(ctx.player_position, &ctx.blockers) {
                    debug!(id = self.id.0, "bear waking up");
                    self.enter(BearState::WakingUp);
                }
            }
            BearState::WakingUp => {
                if self.state_timer >= self.cfg.wake_duration {
                    self.enter(BearState::Running);
                }
            }
            BearState::Running => self.pursue(dt, &ctx.blockers),
            BearState::Hit => {
                self.apply_knockback(dt, &ctx.blockers);
                if self.state_timer >= self.cfg.reaction.hit_duration {
                    self.enter(BearState::Running);
                }
            }
            BearState::Dying => {
                self.apply_knockback(dt, &ctx.blockers);
                let done = match self.tumble.as_mut() {
                    Some(tumble) => tumble.update(dt),
                    None => true,
                };
                if done {
                    debug!(id = self.id.0, "bear removed");
                    self.active = false;
                }
            }
        }
    }

    /// Swipe when running, within reach and off cooldown.
    pub fn act(&mut self, ctx: &EnemyContext<'_>) -> Option<EnemyAction> {
        if !self.active
            || self.state != BearState::Running
            || self.attack_cooldown > 0.0
            || self.position.distance(ctx.player_position) > self.cfg.attack_range
        {
            return None;
        }
        self.attack_cooldown = self.cfg.attack_cooldown;
        Some(EnemyAction::Swipe {
            damage: self.cfg.swipe_damage,
        })
    }

    fn pursue(&mut self, dt: f32, blockers: &BlockerView<'_>) {
        let to_player = self.player_position - self.position;
        if to_player != Vec2::ZERO {
            self.facing = Direction::from_delta(to_player);
        }
        if to_player.length() <= self.cfg.attack_range {
            return;
        }
        let Some(dir) = to_player.try_normalize_guarded() else {
            return;
        };
        let step = self.steering.step(
            self.movement_hitbox(),
            dir * self.cfg.speed * dt,
            dt,
            self.cfg.commit_duration,
            blockers,
            self.id,
        );
        self.position += step.delta;
    }

    fn apply_knockback(&mut self, dt: f32, blockers: &BlockerView<'_>) {
        let delta = self.knockback.step(dt, self.cfg.reaction.knockback_friction);
        let size = self.cfg.sprite_size;
        self.position = slide(
            self.position,
            delta,
            |p| Aabb::lower_half(p, size),
            blockers,
            self.id,
        );
    }

    fn enter(&mut self, state: BearState) {
        self.state = state;
        self.state_timer = 0.0;
        self.anim_timer = 0.0;
    }

    fn frame(&self, frames: u32) -> u32 {
        if self.cfg.frame_duration <= 0.0 {
            return 0;
        }
        (self.anim_timer / self.cfg.frame_duration) as u32 % frames
    }
}

impl WorldObject for Bear {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Collidable for Bear {
    fn sprite_hitbox(&self) -> Aabb {
        Aabb::from_center(self.position, self.cfg.sprite_size)
    }

    fn movement_hitbox(&self) -> Aabb {
        Aabb::lower_half(self.position, self.cfg.sprite_size)
    }
}

impl Damageable for Bear {
    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn is_destroyed(&self) -> bool {
        self.state == BearState::Dying
    }

    fn take_damage(&mut self, amount: f32, source: Vec2) -> DamageOutcome {
        if self.is_destroyed() || !self.active {
            return DamageOutcome::IGNORED;
        }
        self.health = (self.health - amount).max(0.0);
        self.knockback
            .apply(source, self.position, self.cfg.reaction.knockback_speed);
        if self.health <= 0.0 {
            debug!(id = self.id.0, "bear dying");
            self.enter(BearState::Dying);
            self.tumble = Some(DeathTumble::start(&self.cfg.reaction));
            return DamageOutcome {
                applied: true,
                destroyed_now: true,
            };
        }
        self.enter(BearState::Hit);
        DamageOutcome {
            applied: true,
            destroyed_now: false,
        }
    }
}

impl Trackable for Bear {
    fn facing(&self) -> Direction {
        self.facing
    }

    fn can_see(&self, target: Vec2, blockers: &BlockerView<'_>) -> bool {
        sees(self.id, self.position, target, self.cfg.sight_range, blockers)
    }
}

impl Renderable for Bear {
    fn texture_key(&self) -> String {
        match self.state {
            BearState::Idle => format!("bear_idle_{}", self.frame(IDLE_FRAMES)),
            BearState::WakingUp => format!("bear_wake_{}", self.frame(WAKE_FRAMES)),
            BearState::Running => {
                format!("bear_run_{}_{}", self.facing.key(), self.frame(RUN_FRAMES))
            }
            BearState::Hit => format!("bear_hit_{}", self.facing.key()),
            BearState::Dying => "bear_dead".to_string(),
        }
    }

    fn draw_offset(&self) -> Vec2 {
        match &self.tumble {
            Some(tumble) => Vec2::new(0.0, tumble.height()),
            None => Vec2::ZERO,
        }
    }

    fn alpha(&self) -> f32 {
        self.tumble.as_ref().map_or(1.0, DeathTumble::alpha)
    }

    fn rotation(&self) -> f32 {
        self.tumble.as_ref().map_or(0.0, DeathTumble::rotation)
    }
}
