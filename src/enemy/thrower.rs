use std::f32::consts::TAU;

use rand::Rng;
use tracing::debug;

use super::reaction::{DeathTumble, Knockback};
use super::{sees, EnemyAction, EnemyContext, EnemyId};
use crate::capability::{Collidable, DamageOutcome, Damageable, Renderable, Trackable, WorldObject};
use crate::config::ThrowerConfig;
use crate::direction::Direction;
use crate::hitbox::Aabb;
use crate::random::range_f32;
use crate::sight::BlockerView;
use crate::steering::{slide, Steering};
use crate::vector::{Vec2, VecExt};

const WALK_FRAMES: u32 = 4;
const THROW_FRAMES: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrowerState {
    Idle,
    Chase,
    Throwing,
    BackingOff,
    Hit,
    Dying,
}

impl ThrowerState {
    pub fn name(self) -> &'static str {
        match self {
            ThrowerState::Idle => "idle",
            ThrowerState::Chase => "chase",
            ThrowerState::Throwing => "throwing",
            ThrowerState::BackingOff => "backing_off",
            ThrowerState::Hit => "hit",
            ThrowerState::Dying => "dying",
        }
    }
}

/// Sideways weave laid over the chase direction.
#[derive(Clone, Debug)]
struct Zigzag {
    frequency: f32,
    amplitude: f32,
    time: f32,
    reroll_timer: f32,
}

impl Zigzag {
    fn rolled<R: Rng + ?Sized>(cfg: &ThrowerConfig, rng: &mut R) -> Self {
        Zigzag {
            frequency: range_f32(rng, cfg.zigzag_freq_min, cfg.zigzag_freq_max),
            amplitude: range_f32(rng, cfg.zigzag_amp_min, cfg.zigzag_amp_max),
            time: 0.0,
            reroll_timer: 0.0,
        }
    }

    /// Lateral speed along the perpendicular of the chase direction.
    fn advance<R: Rng + ?Sized>(&mut self, dt: f32, cfg: &ThrowerConfig, rng: &mut R) -> f32 {
        self.time += dt;
        self.reroll_timer += dt;
        if self.reroll_timer >= cfg.zigzag_reroll {
            *self = Zigzag::rolled(cfg, rng);
        }
        self.amplitude * (TAU * self.frequency * self.time).sin()
    }
}

/// Petrol-bomb thrower. Closes in on a weave, lobs one bomb, backs off,
/// and repeats.
#[derive(Clone, Debug)]
pub struct Thrower {
    id: EnemyId,
    position: Vec2,
    health: f32,
    max_health: f32,
    facing: Direction,
    state: ThrowerState,
    state_timer: f32,
    anim_timer: f32,
    released: bool,
    player_position: Vec2,
    zigzag: Option<Zigzag>,
    steering: Steering,
    knockback: Knockback,
    tumble: Option<DeathTumble>,
    cfg: ThrowerConfig,
    active: bool,
}

impl Thrower {
    pub fn new(position: Vec2, cfg: &ThrowerConfig) -> Self {
        Thrower {
            id: EnemyId(0),
            position,
            health: cfg.health,
            max_health: cfg.health,
            facing: Direction::Down,
            state: ThrowerState::Idle,
            state_timer: 0.0,
            anim_timer: 0.0,
            released: false,
            player_position: position,
            zigzag: None,
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

    pub fn state(&self) -> ThrowerState {
        self.state
    }

    pub fn has_released(&self) -> bool {
        self.released
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, ctx: &EnemyContext<'_>, rng: &mut R) {
        if !self.active {
            return;
        }
        self.player_position = ctx.player_position;
        self.state_timer += dt;
        self.anim_timer += dt;

        match self.state {
            ThrowerState::Idle => {
                if self.can_see(ctx.player_position, &ctx.blockers) {
                    debug!(id = self.id.0, "thrower spotted player");
                    self.enter(ThrowerState::Chase);
                }
            }
            ThrowerState::Chase => {
                self.face_player();
                if self.position.distance(ctx.player_position) <= self.cfg.throw_range {
                    debug!(id = self.id.0, "thrower winding up");
                    self.enter(ThrowerState::Throwing);
                    self.released = false;
                } else {
                    self.chase(dt, &ctx.blockers, rng);
                }
            }
            ThrowerState::Throwing => {
                self.face_player();
                // the release happens in `act`; never leave before it
                if self.released && self.state_timer >= self.cfg.throw_duration {
                    self.enter(ThrowerState::BackingOff);
                }
            }
            ThrowerState::BackingOff => {
                self.back_off(dt, &ctx.blockers);
                if self.state_timer >= self.cfg.backoff_duration {
                    self.enter(ThrowerState::Chase);
                }
            }
            ThrowerState::Hit => {
                self.apply_knockback(dt, &ctx.blockers);
                if self.state_timer >= self.cfg.reaction.hit_duration {
                    self.enter(ThrowerState::Chase);
                }
            }
            ThrowerState::Dying => {
                self.apply_knockback(dt, &ctx.blockers);
                let done = match self.tumble.as_mut() {
                    Some(tumble) => tumble.update(dt),
                    None => true,
                };
                if done {
                    debug!(id = self.id.0, "thrower removed");
                    self.active = false;
                }
            }
        }
    }

    /// Releases the petrol bomb once, halfway through the throw.
    pub fn act(&mut self) -> Option<EnemyAction> {
        if !self.active
            || self.state != ThrowerState::Throwing
            || self.released
            || self.state_timer < self.cfg.throw_duration * 0.5
        {
            return None;
        }
        self.released = true;
        debug!(id = self.id.0, "thrower released petrol bomb");
        Some(EnemyAction::ThrowPetrol {
            origin: self.position,
            target: self.player_position,
        })
    }

    fn chase<R: Rng + ?Sized>(&mut self, dt: f32, blockers: &BlockerView<'_>, rng: &mut R) {
        let Some(dir) = (self.player_position - self.position).try_normalize_guarded() else {
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

        if self.zigzag.is_none() {
            self.zigzag = Some(Zigzag::rolled(&self.cfg, rng));
        }
        let lateral_speed = match self.zigzag.as_mut() {
            Some(zigzag) => zigzag.advance(dt, &self.cfg, rng),
            None => 0.0,
        };
        if !step.obstructed {
            let lateral = dir.perp() * lateral_speed * dt;
            let size = self.cfg.sprite_size;
            self.position = slide(
                self.position,
                lateral,
                |p| Aabb::lower_half(p, size),
                blockers,
                self.id,
            );
        }
    }

    fn back_off(&mut self, dt: f32, blockers: &BlockerView<'_>) {
        let Some(away) = (self.position - self.player_position).try_normalize_guarded() else {
            return;
        };
        let step = self.steering.step(
            self.movement_hitbox(),
            away * self.cfg.backoff_speed * dt,
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

    fn face_player(&mut self) {
        let delta = self.player_position - self.position;
        if delta != Vec2::ZERO {
            self.facing = Direction::from_delta(delta);
        }
    }

    fn enter(&mut self, state: ThrowerState) {
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

impl WorldObject for Thrower {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Collidable for Thrower {
    fn sprite_hitbox(&self) -> Aabb {
        Aabb::from_center(self.position, self.cfg.sprite_size)
    }

    fn movement_hitbox(&self) -> Aabb {
        Aabb::lower_half(self.position, self.cfg.sprite_size)
    }
}

impl Damageable for Thrower {
    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn is_destroyed(&self) -> bool {
        self.state == ThrowerState::Dying
    }

    fn take_damage(&mut self, amount: f32, source: Vec2) -> DamageOutcome {
        if self.is_destroyed() || !self.active {
            return DamageOutcome::IGNORED;
        }
        self.health = (self.health - amount).max(0.0);
        self.knockback
            .apply(source, self.position, self.cfg.reaction.knockback_speed);
        if self.health <= 0.0 {
            debug!(id = self.id.0, "thrower dying");
            self.enter(ThrowerState::Dying);
            self.tumble = Some(DeathTumble::start(&self.cfg.reaction));
            return DamageOutcome {
                applied: true,
                destroyed_now: true,
            };
        }
        self.enter(ThrowerState::Hit);
        DamageOutcome {
            applied: true,
            destroyed_now: false,
        }
    }
}

impl Trackable for Thrower {
    fn facing(&self) -> Direction {
        self.facing
    }

    fn can_see(&self, target: Vec2, blockers: &BlockerView<'_>) -> bool {
        sees(self.id, self.position, target, self.cfg.sight_range, blockers)
    }
}

impl Renderable for Thrower {
    fn texture_key(&self) -> String {
        match self.state {
            ThrowerState::Idle => "thrower_idle".to_string(),
            ThrowerState::Chase | ThrowerState::BackingOff => {
                format!("thrower_walk_{}_{}", self.facing.key(), self.frame(WALK_FRAMES))
            }
            ThrowerState::Throwing => {
                format!("thrower_throw_{}_{}", self.facing.key(), self.frame(THROW_FRAMES))
            }
            ThrowerState::Hit => format!("thrower_hit_{}", self.facing.key()),
            ThrowerState::Dying => "thrower_dead".to_string(),
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
