//! Tuning tables for every entity type.
//!
//! `CombatConfig::default()` is the built-in balance. A TOML file can
//! override any subset of it: every section and every field falls back to
//! its default when missing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::vector::Vec2;

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub player_speed: f32,
    pub enemy_speed: f32,
    /// Seconds of simulation time before a bullet expires.
    pub lifetime: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        BulletConfig {
            player_speed: 480.0,
            enemy_speed: 260.0,
            lifetime: 1.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrenadeConfig {
    pub min_range: f32,
    pub max_range: f32,
    pub arc_height: f32,
    /// Ground speed used to derive flight duration from throw distance.
    pub throw_speed: f32,
    pub min_flight: f32,
    pub bounce_min: f32,
    pub bounce_max: f32,
    pub bounce_duration: f32,
    /// Seconds from landing until the grenade asks to explode.
    pub fuse: f32,
    /// Spin range in degrees per second.
    pub spin_min: f32,
    pub spin_max: f32,
    pub size: Vec2,
}

impl Default for GrenadeConfig {
    fn default() -> Self {
        GrenadeConfig {
            min_range: 40.0,
            max_range: 200.0,
            arc_height: 40.0,
            throw_speed: 220.0,
            min_flight: 0.3,
            bounce_min: 8.0,
            bounce_max: 24.0,
            bounce_duration: 0.25,
            fuse: 1.2,
            spin_min: 360.0,
            spin_max: 720.0,
            size: Vec2::new(8.0, 8.0),
        }
    }
}

/// Vertical launch parameters shared by mortar shells and petrol bombs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobConfig {
    /// Initial upward velocity.
    pub launch_speed: f32,
    pub gravity: f32,
    /// Maximum aim error applied on each axis when thrown.
    pub scatter: f32,
}

impl LobConfig {
    fn mortar() -> Self {
        LobConfig {
            launch_speed: 260.0,
            gravity: 400.0,
            scatter: 0.0,
        }
    }

    fn petrol() -> Self {
        LobConfig {
            launch_speed: 180.0,
            gravity: 500.0,
            scatter: 24.0,
        }
    }

    /// Seconds from launch until the projectile is back on the ground.
    pub fn flight_time(&self) -> f32 {
        if self.gravity > 0.0 {
            2.0 * self.launch_speed / self.gravity
        } else {
            0.0
        }
    }
}

impl Default for LobConfig {
    fn default() -> Self {
        LobConfig::mortar()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    pub blast_frames: u32,
    pub blast_frame_duration: f32,
    pub blast_size: Vec2,
    pub fire_frames: u32,
    pub fire_frame_duration: f32,
    pub fire_size: Vec2,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        ExplosionConfig {
            blast_frames: 8,
            blast_frame_duration: 0.06,
            blast_size: Vec2::new(48.0, 48.0),
            fire_frames: 12,
            fire_frame_duration: 0.1,
            fire_size: Vec2::new(40.0, 24.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasingConfig {
    pub eject_speed: f32,
    /// Per-frame velocity multiplier.
    pub friction: f32,
    pub lifetime: f32,
    /// Trailing part of the lifetime spent fading out.
    pub fade: f32,
}

impl Default for CasingConfig {
    fn default() -> Self {
        CasingConfig {
            eject_speed: 60.0,
            friction: 0.9,
            lifetime: 2.0,
            fade: 0.5,
        }
    }
}

// ── Player & damage ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Fixed hitbox used for every contact test against the player.
    pub hitbox: Vec2,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            hitbox: Vec2::new(16.0, 24.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub player_bullet: f32,
    pub enemy_bullet: f32,
    /// Applied on every frame of overlap.
    pub explosion: f32,
    /// Applied once per grenade blast per enemy.
    pub grenade_vs_enemy: f32,
}

impl Default for DamageConfig {
    fn default() -> Self {
        DamageConfig {
            player_bullet: 25.0,
            enemy_bullet: 10.0,
            explosion: 1.0,
            grenade_vs_enemy: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SightConfig {
    /// Sample spacing of line-of-sight raycasts.
    pub ray_step: f32,
}

impl Default for SightConfig {
    fn default() -> Self {
        SightConfig { ray_step: 8.0 }
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretConfig {
    pub health: f32,
    pub sight_range: f32,
    /// Seconds between one-step facing rotations while scanning.
    pub scan_interval: f32,
    pub fire_cooldown: f32,
    pub sprite_size: Vec2,
    /// Distance from the centre to the muzzle along the facing.
    pub barrel_length: f32,
    /// Seconds the wreck stays on the field before despawning.
    pub wreck_duration: f32,
}

impl Default for TurretConfig {
    fn default() -> Self {
        TurretConfig {
            health: 100.0,
            sight_range: 220.0,
            scan_interval: 1.0,
            fire_cooldown: 0.8,
            sprite_size: Vec2::new(32.0, 32.0),
            barrel_length: 16.0,
            wreck_duration: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortarConfig {
    pub health: f32,
    pub look_distance: f32,
    /// Seconds engaged before each firing cycle.
    pub fire_interval: f32,
    pub fire_frames: u32,
    pub frame_duration: f32,
    /// The one firing frame on which the shell leaves the tube.
    pub release_frame: u32,
    /// Seconds between facing steps while patrolling.
    pub sweep_interval: f32,
    pub sprite_size: Vec2,
    pub wreck_duration: f32,
}

impl Default for MortarConfig {
    fn default() -> Self {
        MortarConfig {
            health: 120.0,
            look_distance: 320.0,
            fire_interval: 2.5,
            fire_frames: 6,
            frame_duration: 0.1,
            release_frame: 3,
            sweep_interval: 1.5,
            sprite_size: Vec2::new(36.0, 28.0),
            wreck_duration: 0.5,
        }
    }
}

/// Hit and death reaction of the creature enemies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionConfig {
    pub hit_duration: f32,
    pub knockback_speed: f32,
    /// Per-frame knockback velocity multiplier.
    pub knockback_friction: f32,
    /// Upward speed of the death pop.
    pub death_pop: f32,
    /// Degrees per second of spin while tumbling.
    pub death_spin: f32,
    pub gravity: f32,
    pub fade_duration: f32,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        ReactionConfig {
            hit_duration: 0.3,
            knockback_speed: 220.0,
            knockback_friction: 0.85,
            death_pop: 160.0,
            death_spin: 540.0,
            gravity: 600.0,
            fade_duration: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BearConfig {
    pub health: f32,
    pub sight_range: f32,
    pub wake_duration: f32,
    pub speed: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub swipe_damage: f32,
    /// Seconds a cardinal probe direction is kept once chosen.
    pub commit_duration: f32,
    pub sprite_size: Vec2,
    pub frame_duration: f32,
    pub reaction: ReactionConfig,
}

impl Default for BearConfig {
    fn default() -> Self {
        BearConfig {
            health: 150.0,
            sight_range: 200.0,
            wake_duration: 0.8,
            speed: 90.0,
            attack_range: 28.0,
            attack_cooldown: 1.0,
            swipe_damage: 15.0,
            commit_duration: 0.5,
            sprite_size: Vec2::new(40.0, 40.0),
            frame_duration: 0.12,
            reaction: ReactionConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowerConfig {
    pub health: f32,
    pub sight_range: f32,
    pub speed: f32,
    pub throw_range: f32,
    pub throw_duration: f32,
    pub backoff_duration: f32,
    pub backoff_speed: f32,
    /// Seconds between zigzag re-rolls.
    pub zigzag_reroll: f32,
    pub zigzag_freq_min: f32,
    pub zigzag_freq_max: f32,
    /// Lateral speed range of the zigzag.
    pub zigzag_amp_min: f32,
    pub zigzag_amp_max: f32,
    pub commit_duration: f32,
    pub sprite_size: Vec2,
    pub frame_duration: f32,
    pub reaction: ReactionConfig,
}

impl Default for ThrowerConfig {
    fn default() -> Self {
        ThrowerConfig {
            health: 60.0,
            sight_range: 260.0,
            speed: 70.0,
            throw_range: 150.0,
            throw_duration: 0.6,
            backoff_duration: 0.8,
            backoff_speed: 60.0,
            zigzag_reroll: 2.0,
            zigzag_freq_min: 0.5,
            zigzag_freq_max: 1.5,
            zigzag_amp_min: 20.0,
            zigzag_amp_max: 50.0,
            commit_duration: 0.5,
            sprite_size: Vec2::new(24.0, 32.0),
            frame_duration: 0.12,
            reaction: ReactionConfig::default(),
        }
    }
}

// ── Root ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub bullet: BulletConfig,
    pub grenade: GrenadeConfig,
    pub bomb: LobConfig,
    pub petrol_bomb: LobConfig,
    pub explosion: ExplosionConfig,
    pub casing: CasingConfig,
    pub player: PlayerConfig,
    pub damage: DamageConfig,
    pub sight: SightConfig,
    pub turret: TurretConfig,
    pub mortar: MortarConfig,
    pub bear: BearConfig,
    pub thrower: ThrowerConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        CombatConfig {
            bullet: BulletConfig::default(),
            grenade: GrenadeConfig::default(),
            bomb: LobConfig::mortar(),
            petrol_bomb: LobConfig::petrol(),
            explosion: ExplosionConfig::default(),
            casing: CasingConfig::default(),
            player: PlayerConfig::default(),
            damage: DamageConfig::default(),
            sight: SightConfig::default(),
            turret: TurretConfig::default(),
            mortar: MortarConfig::default(),
            bear: BearConfig::default(),
            thrower: ThrowerConfig::default(),
        }
    }
}

impl CombatConfig {
    /// Read and validate a TOML tuning file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded combat config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: CombatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(name) = self.first_non_finite() {
            return Err(invalid(format!("{name} must be a finite number")));
        }
        if self.sight.ray_step <= 0.0 {
            return Err(invalid("sight ray_step must be positive"));
        }
        let g = &self.grenade;
        if g.min_range < 0.0 || g.min_range > g.max_range {
            return Err(invalid(format!(
                "grenade range [{}, {}] is empty",
                g.min_range, g.max_range
            )));
        }
        if g.bounce_min > g.bounce_max {
            return Err(invalid("grenade bounce_min exceeds bounce_max"));
        }
        if self.bullet.lifetime <= 0.0 {
            return Err(invalid("bullet lifetime must be positive"));
        }
        let e = &self.explosion;
        if e.blast_frames == 0 || e.fire_frames == 0 {
            return Err(invalid("explosions need at least one frame"));
        }
        if e.blast_frame_duration <= 0.0 || e.fire_frame_duration <= 0.0 {
            return Err(invalid("explosion frame durations must be positive"));
        }
        let m = &self.mortar;
        if m.frame_duration <= 0.0 || m.fire_frames == 0 {
            return Err(invalid("mortar firing animation is empty"));
        }
        if m.release_frame >= m.fire_frames {
            return Err(invalid(format!(
                "mortar release_frame {} is outside {} firing frames",
                m.release_frame, m.fire_frames
            )));
        }
        for (name, gravity) in [
            ("bomb", self.bomb.gravity),
            ("petrol_bomb", self.petrol_bomb.gravity),
            ("bear.reaction", self.bear.reaction.gravity),
            ("thrower.reaction", self.thrower.reaction.gravity),
        ] {
            if gravity <= 0.0 {
                return Err(invalid(format!("{name} gravity must be positive")));
            }
        }
        let t = &self.thrower;
        if t.zigzag_freq_min > t.zigzag_freq_max || t.zigzag_amp_min > t.zigzag_amp_max {
            return Err(invalid("thrower zigzag ranges are inverted"));
        }
        Ok(())
    }

    /// Name of the first range, timing or speed field that is NaN or infinite.
    fn first_non_finite(&self) -> Option<&'static str> {
        let (g, b, e, c) = (&self.grenade, &self.bullet, &self.explosion, &self.casing);
        let (t, m, bear, th) = (&self.turret, &self.mortar, &self.bear, &self.thrower);
        let scalars = [
            ("bullet.player_speed", b.player_speed),
            ("bullet.enemy_speed", b.enemy_speed),
            ("bullet.lifetime", b.lifetime),
            ("grenade.min_range", g.min_range),
            ("grenade.max_range", g.max_range),
            ("grenade.arc_height", g.arc_height),
            ("grenade.throw_speed", g.throw_speed),
            ("grenade.min_flight", g.min_flight),
            ("grenade.bounce_min", g.bounce_min),
            ("grenade.bounce_max", g.bounce_max),
            ("grenade.bounce_duration", g.bounce_duration),
            ("grenade.fuse", g.fuse),
            ("grenade.spin_min", g.spin_min),
            ("grenade.spin_max", g.spin_max),
            ("bomb.launch_speed", self.bomb.launch_speed),
            ("bomb.gravity", self.bomb.gravity),
            ("bomb.scatter", self.bomb.scatter),
            ("petrol_bomb.launch_speed", self.petrol_bomb.launch_speed),
            ("petrol_bomb.gravity", self.petrol_bomb.gravity),
            ("petrol_bomb.scatter", self.petrol_bomb.scatter),
            ("explosion.blast_frame_duration", e.blast_frame_duration),
            ("explosion.fire_frame_duration", e.fire_frame_duration),
            ("casing.eject_speed", c.eject_speed),
            ("casing.friction", c.friction),
            ("casing.lifetime", c.lifetime),
            ("casing.fade", c.fade),
            ("sight.ray_step", self.sight.ray_step),
            ("turret.sight_range", t.sight_range),
            ("turret.scan_interval", t.scan_interval),
            ("turret.fire_cooldown", t.fire_cooldown),
            ("turret.wreck_duration", t.wreck_duration),
            ("mortar.look_distance", m.look_distance),
            ("mortar.fire_interval", m.fire_interval),
            ("mortar.frame_duration", m.frame_duration),
            ("mortar.sweep_interval", m.sweep_interval),
            ("mortar.wreck_duration", m.wreck_duration),
            ("bear.sight_range", bear.sight_range),
            ("bear.wake_duration", bear.wake_duration),
            ("bear.speed", bear.speed),
            ("bear.attack_range", bear.attack_range),
            ("bear.attack_cooldown", bear.attack_cooldown),
            ("bear.commit_duration", bear.commit_duration),
            ("bear.frame_duration", bear.frame_duration),
            ("thrower.sight_range", th.sight_range),
            ("thrower.speed", th.speed),
            ("thrower.throw_range", th.throw_range),
            ("thrower.throw_duration", th.throw_duration),
            ("thrower.backoff_duration", th.backoff_duration),
            ("thrower.backoff_speed", th.backoff_speed),
            ("thrower.zigzag_reroll", th.zigzag_reroll),
            ("thrower.zigzag_freq_min", th.zigzag_freq_min),
            ("thrower.zigzag_freq_max", th.zigzag_freq_max),
            ("thrower.zigzag_amp_min", th.zigzag_amp_min),
            ("thrower.zigzag_amp_max", th.zigzag_amp_max),
            ("thrower.commit_duration", th.commit_duration),
            ("thrower.frame_duration", th.frame_duration),
        ];
        let reactions = [("bear.reaction", &bear.reaction), ("thrower.reaction", &th.reaction)];
        scalars
            .into_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| name)
            .or_else(|| {
                reactions
                    .into_iter()
                    .find(|(_, r)| {
                        ![
                            r.hit_duration,
                            r.knockback_speed,
                            r.knockback_friction,
                            r.death_pop,
                            r.death_spin,
                            r.gravity,
                            r.fade_duration,
                        ]
                        .iter()
                        .all(|v| v.is_finite())
                    })
                    .map(|(name, _)| name)
            })
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}
