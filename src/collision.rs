//! Per-frame contact pass.
//!
//! Runs once after everything has moved. Bullets are resolved first (at
//! most one hit each), then explosion hazards. Destroyed machines come back
//! as blast positions for the orchestrator to spawn; nothing here creates
//! entities.

use tracing::{debug, info};

use crate::capability::{Collidable, Damageable, WorldObject};
use crate::config::CombatConfig;
use crate::enemy::{Enemy, EnemyId, EnemyKind};
use crate::obstacle::Obstacle;
use crate::player::{player_hitbox, PlayerTarget};
use crate::projectile::{Bullet, BulletOwner, Explosion, ExplosionSource};
use crate::vector::Vec2;

/// What happened during one collision pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionReport {
    pub bullets_stopped: u32,
    pub enemy_hits: u32,
    pub player_hits: u32,
    /// Enemies whose death sequence started this frame.
    pub kills: Vec<(EnemyId, EnemyKind)>,
    /// Where a destroyed machine should blow up.
    pub death_blasts: Vec<Vec2>,
}

pub fn resolve<P: PlayerTarget + ?Sized>(
    bullets: &mut [Bullet],
    explosions: &mut [Explosion],
    enemies: &mut [Enemy],
    obstacles: &[Obstacle],
    player: &mut P,
    cfg: &CombatConfig,
    now: f64,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    for bullet in bullets.iter_mut().filter(|b| b.is_active()) {
        resolve_bullet(bullet, enemies, obstacles, player, cfg, now, &mut report);
    }

    let player_box = player_hitbox(player.position(), cfg.player.hitbox);
    for explosion in explosions.iter_mut().filter(|e| e.is_active()) {
        let hazard = explosion.hazard_box();
        if hazard.intersects(&player_box) {
            player.take_damage(cfg.damage.explosion);
            report.player_hits += 1;
        }
        if explosion.source() != ExplosionSource::Player {
            continue;
        }
        for enemy in enemies.iter_mut() {
            if !enemy.is_active() || enemy.is_destroyed() {
                continue;
            }
            if !hazard.intersects(&enemy.sprite_hitbox()) || !explosion.mark_enemy_hit(enemy.id()) {
                continue;
            }
            let outcome = enemy.take_damage(cfg.damage.grenade_vs_enemy, explosion.position());
            if outcome.applied {
                report.enemy_hits += 1;
            }
            if outcome.destroyed_now {
                record_kill(enemy, &mut report);
            }
        }
    }

    report
}

fn resolve_bullet<P: PlayerTarget + ?Sized>(
    bullet: &mut Bullet,
    enemies: &mut [Enemy],
    obstacles: &[Obstacle],
    player: &mut P,
    cfg: &CombatConfig,
    now: f64,
    report: &mut CollisionReport,
) {
    let at = bullet.position();

    if obstacles.iter().any(|o| o.sprite_hitbox().contains_point(at)) {
        bullet.deactivate();
        report.bullets_stopped += 1;
        return;
    }

    match bullet.owner() {
        BulletOwner::Player => {
            let target = enemies
                .iter_mut()
                .find(|e| e.is_active() && !e.is_destroyed() && e.sprite_hitbox().contains_point(at));
            if let Some(enemy) = target {
                // knockback pushes along the bullet's travel
                let source = at - bullet.velocity();
                let outcome = enemy.take_damage(cfg.damage.player_bullet, source);
                if outcome.applied {
                    report.enemy_hits += 1;
                }
                if outcome.destroyed_now {
                    record_kill(enemy, report);
                }
                bullet.deactivate();
                return;
            }
        }
        BulletOwner::Enemy => {
            if player_hitbox(player.position(), cfg.player.hitbox).contains_point(at) {
                player.take_damage(cfg.damage.enemy_bullet);
                report.player_hits += 1;
                bullet.deactivate();
                return;
            }
        }
    }

    if bullet.is_expired(now) {
        bullet.deactivate();
    }
}

fn record_kill(enemy: &Enemy, report: &mut CollisionReport) {
    let kind = enemy.kind();
    info!(id = enemy.id().0, ?kind, "enemy destroyed");
    report.kills.push((enemy.id(), kind));
    if kind.explodes_on_death() {
        debug!(id = enemy.id().0, "death blast queued");
        report.death_blasts.push(enemy.position());
    }
}
