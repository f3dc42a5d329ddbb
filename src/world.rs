//! Frame orchestrator.
//!
//! `CombatWorld` owns every live collection and advances them in a fixed
//! order once per frame:
//!
//! 1. clock and blocker view
//! 2. enemy updates (sense, move, re-aim)
//! 3. enemy attack decisions and their spawns
//! 4. projectile and effect updates, landings spawn explosions
//! 5. collision pass
//! 6. sweep of everything that went inactive
//!
//! Entities never spawn or remove anything themselves; they hand back
//! actions or landing points and the world does the bookkeeping.

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::camera::Camera;
use crate::capability::{Collidable, Damageable, Renderable, WorldObject};
use crate::clock::SimClock;
use crate::collision::{self, CollisionReport};
use crate::config::CombatConfig;
use crate::direction::Direction;
use crate::enemy::{Enemy, EnemyAction, EnemyContext, EnemyId};
use crate::obstacle::Obstacle;
use crate::player::PlayerTarget;
use crate::projectile::{
    Bomb, Bullet, BulletOwner, Casing, Explosion, ExplosionKind, ExplosionSource, Grenade,
    PetrolBomb,
};
use crate::sight::{Blocker, BlockerOwner, BlockerView};
use crate::vector::{Vec2, VecExt};

const DEFAULT_VIEWPORT: Vec2 = Vec2::new(640.0, 360.0);

// ── Render output ────────────────────────────────────────────────────────────

/// One thing to draw this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderItem {
    pub key: String,
    /// Where the sprite is drawn, draw offset included.
    pub position: Vec2,
    pub depth: f32,
    pub alpha: f32,
    /// Sprite rotation in degrees.
    pub rotation: f32,
}

impl RenderItem {
    fn of<T: Renderable + ?Sized>(obj: &T) -> Self {
        RenderItem {
            key: obj.texture_key(),
            position: obj.position() + obj.draw_offset(),
            depth: obj.render_depth(),
            alpha: obj.alpha(),
            rotation: obj.rotation(),
        }
    }
}

/// Everything the renderer needs for one frame, back to front.
#[derive(Clone, Debug)]
pub struct FrameView {
    pub camera: Camera,
    pub items: Vec<RenderItem>,
}

// ── World ────────────────────────────────────────────────────────────────────

pub struct CombatWorld {
    config: CombatConfig,
    clock: SimClock,
    camera: Camera,
    obstacles: Vec<Obstacle>,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    grenades: Vec<Grenade>,
    bombs: Vec<Bomb>,
    petrol_bombs: Vec<PetrolBomb>,
    explosions: Vec<Explosion>,
    casings: Vec<Casing>,
    /// Shots fired since the last tick, waiting for their casing.
    pending_casings: Vec<(Vec2, f32)>,
    blockers: Vec<Blocker>,
    next_id: u32,
}

impl CombatWorld {
    /// Builds an empty world. A config that fails [`CombatConfig::validate`]
    /// is still accepted; degenerate ranges are tolerated where they are used.
    pub fn new(config: CombatConfig, obstacles: Vec<Obstacle>) -> Self {
        if let Err(err) = config.validate() {
            warn!(%err, "combat world built from an invalid config");
        }
        debug!(obstacles = obstacles.len(), "combat world created");
        CombatWorld {
            config,
            clock: SimClock::new(),
            camera: Camera::new(DEFAULT_VIEWPORT, None),
            obstacles,
            enemies: Vec::new(),
            bullets: Vec::new(),
            grenades: Vec::new(),
            bombs: Vec::new(),
            petrol_bombs: Vec::new(),
            explosions: Vec::new(),
            casings: Vec::new(),
            pending_casings: Vec::new(),
            blockers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn add_enemy(&mut self, enemy: impl Into<Enemy>) -> EnemyId {
        let mut enemy = enemy.into();
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        enemy.set_id(id);
        debug!(id = id.0, kind = ?enemy.kind(), "enemy added");
        self.enemies.push(enemy);
        id
    }

    // ── Player commands ──────────────────────────────────────────────────────

    pub fn player_fire(&mut self, origin: Vec2, direction: Direction) {
        let bullet = Bullet::from_direction(
            BulletOwner::Player,
            origin,
            direction,
            self.config.bullet.player_speed,
            self.clock.now(),
            self.config.bullet.lifetime,
        );
        self.push_bullet(bullet, direction.degrees());
    }

    pub fn player_fire_at_angle(&mut self, origin: Vec2, degrees: f32) {
        let bullet = Bullet::from_angle(
            BulletOwner::Player,
            origin,
            degrees,
            self.config.bullet.player_speed,
            self.clock.now(),
            self.config.bullet.lifetime,
        );
        self.push_bullet(bullet, degrees);
    }

    pub fn player_throw_grenade<R: Rng + ?Sized>(&mut self, origin: Vec2, target: Vec2, rng: &mut R) {
        let grenade = Grenade::throw(origin, target, &self.config.grenade, rng);
        debug!(target = ?grenade.target(), "grenade thrown");
        self.grenades.push(grenade);
    }

    /// Drop an explosion straight into the world.
    pub fn spawn_explosion(&mut self, position: Vec2, kind: ExplosionKind, source: ExplosionSource) {
        self.explosions
            .push(Explosion::new(position, kind, source, &self.config.explosion));
    }

    fn push_bullet(&mut self, bullet: Bullet, degrees: f32) {
        self.pending_casings.push((bullet.position(), degrees));
        self.bullets.push(bullet);
    }

    // ── Per-frame tick ───────────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds. All randomness comes through
    /// `rng` so callers control determinism.
    pub fn tick<P, R>(&mut self, dt: f32, player: &mut P, rng: &mut R) -> CollisionReport
    where
        P: PlayerTarget + ?Sized,
        R: Rng + ?Sized,
    {
        // ── 1. Clock and blockers ────────────────────────────────────────────
        self.clock.advance(dt);
        let now = self.clock.now();
        self.rebuild_blockers();
        let player_position = player.position();

        let view = BlockerView::new(&self.blockers, self.config.sight.ray_step);
        let ctx = EnemyContext::new(player_position, view);

        // ── 2. Enemy updates ─────────────────────────────────────────────────
        for enemy in self.enemies.iter_mut() {
            enemy.update(dt, &ctx, rng);
        }

        // ── 3. Enemy attacks ─────────────────────────────────────────────────
        let mut actions = Vec::new();
        for enemy in self.enemies.iter_mut() {
            if let Some(action) = enemy.act(&ctx) {
                actions.push((enemy.id(), action));
            }
        }
        for (id, action) in actions {
            self.apply_action(id, action, player, rng);
        }
        for (origin, degrees) in self.pending_casings.drain(..) {
            self.casings
                .push(Casing::eject(origin, degrees, &self.config.casing, rng));
        }

        // ── 4. Projectiles and effects ───────────────────────────────────────
        let view = BlockerView::new(&self.blockers, self.config.sight.ray_step);
        let mut spawned = Vec::new();

        for bullet in self.bullets.iter_mut() {
            bullet.update(dt);
        }
        for grenade in self.grenades.iter_mut().filter(|g| g.is_active()) {
            grenade.update(dt, now, &view);
            if grenade.should_explode() {
                debug!(at = ?grenade.ground_position(), "grenade exploded");
                spawned.push((grenade.ground_position(), ExplosionKind::Blast, ExplosionSource::Player));
                grenade.deactivate();
            }
        }
        for bomb in self.bombs.iter_mut() {
            if let Some(impact) = bomb.update(dt) {
                debug!(at = ?impact, "mortar shell landed");
                spawned.push((impact, ExplosionKind::Blast, ExplosionSource::Hostile));
            }
        }
        for petrol in self.petrol_bombs.iter_mut() {
            if let Some(impact) = petrol.update(dt) {
                debug!(at = ?impact, "petrol bomb landed");
                spawned.push((impact, ExplosionKind::Fire, ExplosionSource::Hostile));
            }
        }
        for casing in self.casings.iter_mut() {
            casing.update(dt);
        }
        for explosion in self.explosions.iter_mut() {
            explosion.update(dt);
        }
        for (position, kind, source) in spawned {
            self.spawn_explosion(position, kind, source);
        }

        // ── 5. Collisions ────────────────────────────────────────────────────
        let report = collision::resolve(
            &mut self.bullets,
            &mut self.explosions,
            &mut self.enemies,
            &self.obstacles,
            player,
            &self.config,
            now,
        );
        for &position in &report.death_blasts {
            self.spawn_explosion(position, ExplosionKind::Blast, ExplosionSource::Hostile);
        }

        // ── 6. Sweep ─────────────────────────────────────────────────────────
        self.enemies.retain(|e| e.is_active());
        self.bullets.retain(|b| b.is_active());
        self.grenades.retain(|g| g.is_active());
        self.bombs.retain(|b| b.is_active());
        self.petrol_bombs.retain(|p| p.is_active());
        self.explosions.retain(|e| e.is_active());
        self.casings.retain(|c| c.is_active());

        self.camera.follow(player.position());

        trace!(
            frame = self.clock.frame(),
            enemies = self.enemies.len(),
            bullets = self.bullets.len(),
            explosions = self.explosions.len(),
            "tick"
        );
        report
    }

    fn rebuild_blockers(&mut self) {
        self.blockers.clear();
        self.blockers
            .extend(self.obstacles.iter().enumerate().map(|(i, o)| Blocker {
                owner: BlockerOwner::Obstacle(i),
                movement: o.movement_hitbox(),
            }));
        self.blockers.extend(
            self.enemies
                .iter()
                .filter(|e| e.is_active() && !e.is_destroyed())
                .map(|e| Blocker {
                    owner: BlockerOwner::Enemy(e.id()),
                    movement: e.movement_hitbox(),
                }),
        );
    }

    fn apply_action<P, R>(&mut self, id: EnemyId, action: EnemyAction, player: &mut P, rng: &mut R)
    where
        P: PlayerTarget + ?Sized,
        R: Rng + ?Sized,
    {
        match action {
            EnemyAction::Fire { origin, direction } => {
                let bullet = Bullet::from_direction(
                    BulletOwner::Enemy,
                    origin,
                    direction,
                    self.config.bullet.enemy_speed,
                    self.clock.now(),
                    self.config.bullet.lifetime,
                );
                debug!(id = id.0, ?direction, "enemy fired");
                self.push_bullet(bullet, direction.degrees());
            }
            EnemyAction::LaunchShell { origin, target } => {
                debug!(id = id.0, ?target, "shell launched");
                self.bombs.push(Bomb::lob(origin, target, &self.config.bomb));
            }
            EnemyAction::ThrowPetrol { origin, target } => {
                debug!(id = id.0, ?target, "petrol bomb thrown");
                self.petrol_bombs
                    .push(PetrolBomb::throw(origin, target, &self.config.petrol_bomb, rng));
            }
            EnemyAction::Swipe { damage } => {
                debug!(id = id.0, damage, "swipe landed");
                player.take_damage(damage);
            }
        }
    }

    // ── Render view ──────────────────────────────────────────────────────────

    /// Camera plus every renderable, sorted back to front.
    pub fn frame_view(&self) -> FrameView {
        let mut items: Vec<RenderItem> = Vec::new();
        items.extend(self.obstacles.iter().map(RenderItem::of));
        items.extend(self.casings.iter().map(RenderItem::of));
        items.extend(self.enemies.iter().map(RenderItem::of));
        items.extend(self.grenades.iter().map(RenderItem::of));
        items.extend(self.bullets.iter().map(RenderItem::of));
        for bomb in &self.bombs {
            let shadow = bomb.shadow_position();
            items.push(RenderItem {
                key: bomb.shadow_key().to_string(),
                position: shadow,
                depth: -shadow.y,
                alpha: 1.0,
                rotation: 0.0,
            });
            items.push(RenderItem::of(bomb));
        }
        items.extend(self.petrol_bombs.iter().map(RenderItem::of));
        items.extend(self.explosions.iter().map(RenderItem::of));
        items.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        FrameView {
            camera: self.camera,
            items,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id() == id)
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn grenades(&self) -> &[Grenade] {
        &self.grenades
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn petrol_bombs(&self) -> &[PetrolBomb] {
        &self.petrol_bombs
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn casings(&self) -> &[Casing] {
        &self.casings
    }

    /// Nearest living enemy to `from`, for aim assist in the viewer.
    pub fn nearest_enemy(&self, from: Vec2) -> Option<&Enemy> {
        self.enemies
            .iter()
            .filter(|e| !e.is_destroyed())
            .min_by(|a, b| {
                a.position()
                    .distance_squared(from)
                    .total_cmp(&b.position().distance_squared(from))
            })
    }

    /// Direction from `from` to the nearest living enemy, in degrees.
    pub fn aim_at_nearest(&self, from: Vec2) -> Option<f32> {
        self.nearest_enemy(from)
            .and_then(|e| (e.position() - from).try_normalize_guarded())
            .map(VecExt::angle_degrees)
    }
}
