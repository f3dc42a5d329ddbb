use rand::Rng;

use crate::capability::{Renderable, WorldObject};
use crate::config::GrenadeConfig;
use crate::hitbox::Aabb;
use crate::random::range_f32;
use crate::sight::BlockerView;
use crate::vector::{Vec2, VecExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrenadePhase {
    Flying,
    Bouncing,
    Resting,
}

/// Player-thrown grenade: parabolic flight to a range-clamped target, a
/// short bounce along the throw direction, then a fuse.
#[derive(Clone, Debug)]
pub struct Grenade {
    start: Vec2,
    target: Vec2,
    /// Ground velocity during flight.
    velocity: Vec2,
    flight_elapsed: f32,
    flight_duration: f32,
    arc_height: f32,
    ground: Vec2,
    height: f32,
    rotation: f32,
    rotation_speed: f32,
    phase: GrenadePhase,
    landed_at: Option<f64>,
    land_position: Option<Vec2>,
    bounce_distance: f32,
    bounce_direction: Vec2,
    bounce_progress: f32,
    bounce_duration: f32,
    fuse: f32,
    fuse_elapsed: f32,
    size: Vec2,
    active: bool,
}

impl Grenade {
    /// Throw from `start` toward `raw_target`. The target is pulled into the
    /// `[min_range, max_range]` annulus around `start` once, here.
    pub fn throw<R: Rng + ?Sized>(
        start: Vec2,
        raw_target: Vec2,
        cfg: &GrenadeConfig,
        rng: &mut R,
    ) -> Self {
        let target = raw_target.clamp_to_annulus(start, cfg.min_range, cfg.max_range, Vec2::X);
        let distance = start.distance(target);
        let flight_duration = if cfg.throw_speed > 0.0 {
            (distance / cfg.throw_speed).max(cfg.min_flight)
        } else {
            cfg.min_flight
        }
        .max(f32::EPSILON);
        let velocity = (target - start) / flight_duration;

        let spin = range_f32(rng, cfg.spin_min, cfg.spin_max);
        let rotation_speed = if rng.gen_bool(0.5) { spin } else { -spin };
        let bounce_distance = range_f32(rng, cfg.bounce_min, cfg.bounce_max);

        Grenade {
            start,
            target,
            velocity,
            flight_elapsed: 0.0,
            flight_duration,
            arc_height: cfg.arc_height,
            ground: start,
            height: 0.0,
            rotation: 0.0,
            rotation_speed,
            phase: GrenadePhase::Flying,
            landed_at: None,
            land_position: None,
            bounce_distance,
            bounce_direction: (target - start).try_normalize_guarded().unwrap_or(Vec2::ZERO),
            bounce_progress: 0.0,
            bounce_duration: cfg.bounce_duration,
            fuse: cfg.fuse,
            fuse_elapsed: 0.0,
            size: cfg.size,
            active: true,
        }
    }

    /// Height of the arc at flight progress `p` in [0, 1].
    pub fn arc_offset(arc_height: f32, p: f32) -> f32 {
        4.0 * arc_height * p * (1.0 - p)
    }

    pub fn update(&mut self, dt: f32, now: f64, blockers: &BlockerView<'_>) {
        if !self.active {
            return;
        }
        match self.phase {
            GrenadePhase::Flying => {
                self.flight_elapsed += dt;
                self.rotation += self.rotation_speed * dt;
                let progress = (self.flight_elapsed / self.flight_duration).min(1.0);
                if progress >= 1.0 {
                    self.ground = self.target;
                    self.height = 0.0;
                    self.phase = GrenadePhase::Bouncing;
                    self.landed_at = Some(now);
                    self.land_position = Some(self.target);
                    if self.bounce_direction == Vec2::ZERO || self.bounce_distance <= 0.0 {
                        self.phase = GrenadePhase::Resting;
                    }
                } else {
                    self.ground = self.start.lerp(self.target, progress);
                    self.height = Grenade::arc_offset(self.arc_height, progress);
                }
            }
            GrenadePhase::Bouncing => {
                self.fuse_elapsed += dt;
                self.rotation += self.rotation_speed * 0.5 * dt;
                let progress = if self.bounce_duration > 0.0 {
                    (self.bounce_progress + dt / self.bounce_duration).min(1.0)
                } else {
                    1.0
                };
                let land = self.land_position.unwrap_or(self.target);
                let next = land + self.bounce_direction * self.bounce_distance * progress;
                if blockers.is_blocked(&Aabb::from_center(next, self.size), None) {
                    self.phase = GrenadePhase::Resting;
                } else {
                    self.ground = next;
                    self.bounce_progress = progress;
                    if progress >= 1.0 {
                        self.phase = GrenadePhase::Resting;
                    }
                }
            }
            GrenadePhase::Resting => {
                self.fuse_elapsed += dt;
            }
        }
    }

    pub fn should_explode(&self) -> bool {
        self.landed_at.is_some() && self.fuse_elapsed >= self.fuse
    }

    pub fn phase(&self) -> GrenadePhase {
        self.phase
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Where the grenade sits on the ground (shadow position).
    pub fn ground_position(&self) -> Vec2 {
        self.ground
    }

    pub fn height_offset(&self) -> f32 {
        self.height
    }

    pub fn flight_duration(&self) -> f32 {
        self.flight_duration
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn land_position(&self) -> Option<Vec2> {
        self.land_position
    }

    pub fn landed_at(&self) -> Option<f64> {
        self.landed_at
    }

    pub fn bounce_distance(&self) -> f32 {
        self.bounce_distance
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

impl WorldObject for Grenade {
    /// Drawn position: ground point lifted by the arc.
    fn position(&self) -> Vec2 {
        self.ground + Vec2::new(0.0, self.height)
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Renderable for Grenade {
    fn texture_key(&self) -> String {
        let frame = (self.rotation.rem_euclid(360.0) / 45.0) as u32 % 8;
        format!("grenade_{frame}")
    }

    fn render_depth(&self) -> f32 {
        -self.ground.y
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }
}
