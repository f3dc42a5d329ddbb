use rand::rngs::StdRng;
use rand::SeedableRng;

use topdown_combat::capability::{Renderable, WorldObject};
use topdown_combat::config::{CasingConfig, CombatConfig, ExplosionConfig, GrenadeConfig, LobConfig};
use topdown_combat::direction::Direction;
use topdown_combat::enemy::EnemyId;
use topdown_combat::hitbox::Aabb;
use topdown_combat::projectile::{
    Bomb, Bullet, BulletOwner, Casing, Explosion, ExplosionKind, ExplosionSource, Grenade,
    GrenadePhase, Lob, PetrolBomb,
};
use topdown_combat::sight::{Blocker, BlockerOwner, BlockerView};
use topdown_combat::vector::Vec2;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

const DT: f32 = 1.0 / 60.0;

// ── Bullet ────────────────────────────────────────────────────────────────────

#[test]
fn bullet_moves_at_constant_velocity() {
    let mut b = Bullet::from_direction(BulletOwner::Player, Vec2::ZERO, Direction::Right, 300.0, 0.0, 5.0);
    for _ in 0..30 {
        b.update(1.0 / 30.0);
    }
    assert!(approx(b.position().x, 300.0, 1e-2));
    assert!(approx(b.position().y, 0.0, 1e-6));
    assert_eq!(b.velocity(), Vec2::new(300.0, 0.0));
}

#[test]
fn bullet_from_angle_points_along_angle() {
    let b = Bullet::from_angle(BulletOwner::Enemy, Vec2::ZERO, 270.0, 100.0, 0.0, 1.0);
    assert!(approx(b.velocity().x, 0.0, 1e-3));
    assert!(approx(b.velocity().y, -100.0, 1e-3));
    assert_eq!(b.owner(), BulletOwner::Enemy);
}

#[test]
fn bullet_expires_strictly_after_lifetime() {
    let b = Bullet::new(BulletOwner::Player, Vec2::ZERO, Vec2::X, 2.0, 1.0);
    assert!(!b.is_expired(2.5));
    assert!(!b.is_expired(3.0));
    assert!(b.is_expired(3.0001));
}

#[test]
fn bullet_texture_depends_on_owner() {
    let p = Bullet::new(BulletOwner::Player, Vec2::ZERO, Vec2::X, 0.0, 1.0);
    let e = Bullet::new(BulletOwner::Enemy, Vec2::ZERO, Vec2::X, 0.0, 1.0);
    assert_eq!(p.texture_key(), "bullet_player");
    assert_eq!(e.texture_key(), "bullet_enemy");
}

// ── Grenade ───────────────────────────────────────────────────────────────────

#[test]
fn grenade_target_clamped_to_max_range() {
    let cfg = GrenadeConfig::default();
    let g = Grenade::throw(Vec2::ZERO, Vec2::new(1000.0, 0.0), &cfg, &mut seeded_rng());
    assert!(approx(g.target().x, 200.0, 1e-3));
    assert!(approx(g.target().y, 0.0, 1e-6));
}

#[test]
fn grenade_target_pushed_out_to_min_range() {
    let cfg = GrenadeConfig::default();
    let g = Grenade::throw(Vec2::ZERO, Vec2::new(0.0, 5.0), &cfg, &mut seeded_rng());
    assert!(approx(g.target().distance(Vec2::ZERO), cfg.min_range, 1e-3));
    assert!(g.target().y > 0.0);
}

#[test]
fn grenade_target_always_in_annulus() {
    let cfg = GrenadeConfig::default();
    let mut rng = seeded_rng();
    let start = Vec2::new(50.0, -20.0);
    let raws = [
        start,
        Vec2::new(51.0, -20.0),
        Vec2::new(-400.0, 300.0),
        Vec2::new(120.0, 10.0),
        Vec2::new(50.0, 1e6),
    ];
    for raw in raws {
        let g = Grenade::throw(start, raw, &cfg, &mut rng);
        let d = g.target().distance(start);
        assert!(d >= cfg.min_range - 1e-2 && d <= cfg.max_range + 1e-2, "distance {d}");
    }
}

#[test]
fn arc_peaks_at_half_flight() {
    assert!(approx(Grenade::arc_offset(40.0, 0.5), 40.0, 1e-6));
    assert_eq!(Grenade::arc_offset(40.0, 0.0), 0.0);
    assert_eq!(Grenade::arc_offset(40.0, 1.0), 0.0);
}

#[test]
fn grenade_height_follows_arc_during_flight() {
    let cfg = GrenadeConfig::default();
    let mut g = Grenade::throw(Vec2::ZERO, Vec2::new(1000.0, 0.0), &cfg, &mut seeded_rng());
    let half = g.flight_duration() * 0.5;
    g.update(half, half as f64, &BlockerView::empty());
    assert!(approx(g.height_offset(), cfg.arc_height, 1e-2));
    assert!(approx(g.ground_position().x, 100.0, 1e-2));
    assert_eq!(g.phase(), GrenadePhase::Flying);
}

#[test]
fn grenade_lands_bounces_then_explodes_after_fuse() {
    let cfg = GrenadeConfig::default();
    let mut g = Grenade::throw(Vec2::ZERO, Vec2::new(100.0, 0.0), &cfg, &mut seeded_rng());
    let view = BlockerView::empty();
    let mut now = 0.0_f64;
    while g.landed_at().is_none() {
        now += f64::from(DT);
        g.update(DT, now, &view);
    }
    assert_eq!(g.land_position(), Some(g.target()));
    assert!(!g.should_explode());

    let landed = now;
    while !g.should_explode() {
        now += f64::from(DT);
        g.update(DT, now, &view);
        assert!(now - landed < f64::from(cfg.fuse) + 0.1, "fuse never ran out");
    }
    assert_eq!(g.phase(), GrenadePhase::Resting);
    let rolled = g.ground_position().x - g.target().x;
    assert!(approx(rolled, g.bounce_distance(), 1e-2));
}

#[test]
fn grenade_bounce_stops_at_blocker() {
    let cfg = GrenadeConfig::default();
    let mut g = Grenade::throw(Vec2::ZERO, Vec2::new(100.0, 0.0), &cfg, &mut seeded_rng());
    // wall right next to the landing point
    let blockers = [Blocker {
        owner: BlockerOwner::Obstacle(0),
        movement: Aabb::new(Vec2::new(105.0, -50.0), Vec2::new(140.0, 50.0)),
    }];
    let view = BlockerView::new(&blockers, 8.0);
    let mut now = 0.0_f64;
    for _ in 0..200 {
        now += f64::from(DT);
        g.update(DT, now, &view);
    }
    assert_eq!(g.phase(), GrenadePhase::Resting);
    assert!(g.ground_position().x < 105.0 - cfg.size.x * 0.5 + 1e-3);
}

// ── Lobs ──────────────────────────────────────────────────────────────────────

#[test]
fn lob_lands_near_target_in_about_flight_time() {
    let cfg = LobConfig::default();
    let target = Vec2::new(200.0, -100.0);
    let mut lob = Lob::aimed(Vec2::ZERO, target, &cfg);
    let mut elapsed = 0.0;
    let impact = loop {
        elapsed += DT;
        if let Some(p) = lob.update(DT) {
            break p;
        }
        assert!(elapsed < 10.0, "never landed");
    };
    assert!(lob.is_landed());
    assert!(approx(elapsed, cfg.flight_time(), 2.0 * DT));
    assert!(impact.distance(target) < lob.horizontal_velocity().length() * 2.0 * DT + 1e-3);
    // landing is reported once
    assert_eq!(lob.update(DT), None);
}

#[test]
fn lob_height_rises_then_falls() {
    let cfg = LobConfig::default();
    let mut lob = Lob::aimed(Vec2::ZERO, Vec2::new(100.0, 0.0), &cfg);
    lob.update(DT);
    let early = lob.height();
    assert!(early > 0.0);
    assert!(lob.vertical_velocity() > 0.0);
    for _ in 0..((cfg.flight_time() * 0.75 / DT) as usize) {
        lob.update(DT);
    }
    assert!(lob.vertical_velocity() < 0.0);
}

#[test]
fn bomb_goes_inactive_on_landing_and_keeps_shadow_on_ground() {
    let cfg = CombatConfig::default();
    let mut bomb = Bomb::lob(Vec2::ZERO, Vec2::new(0.0, 150.0), &cfg.bomb);
    bomb.update(0.2);
    assert!(bomb.is_active());
    assert!(bomb.position().y > bomb.shadow_position().y);
    assert_eq!(bomb.shadow_key(), "shadow");
    assert_eq!(bomb.texture_key(), "mortar_shell_up");

    let mut landed = None;
    for _ in 0..1000 {
        if let Some(p) = bomb.update(DT) {
            landed = Some(p);
            break;
        }
    }
    assert!(landed.is_some());
    assert!(!bomb.is_active());
}

#[test]
fn petrol_bomb_scatter_stays_within_bounds() {
    let cfg = CombatConfig::default().petrol_bomb;
    let mut rng = seeded_rng();
    let target = Vec2::new(120.0, 0.0);
    for _ in 0..20 {
        let mut bomb = PetrolBomb::throw(Vec2::ZERO, target, &cfg, &mut rng);
        let impact = loop {
            if let Some(p) = bomb.update(DT) {
                break p;
            }
        };
        let slack = bomb.arc().horizontal_velocity().length() * 2.0 * DT;
        assert!((impact.x - target.x).abs() <= cfg.scatter + slack);
        assert!((impact.y - target.y).abs() <= cfg.scatter + slack);
    }
}

// ── Explosion ─────────────────────────────────────────────────────────────────

#[test]
fn explosion_plays_every_frame_then_goes_inactive() {
    let cfg = ExplosionConfig::default();
    let mut e = Explosion::new(Vec2::ZERO, ExplosionKind::Blast, ExplosionSource::Hostile, &cfg);
    assert_eq!(e.texture_key(), "explosion_0");
    for frame in 1..cfg.blast_frames {
        e.update(cfg.blast_frame_duration);
        assert_eq!(e.frame_index(), frame);
        assert!(e.is_active());
    }
    e.update(cfg.blast_frame_duration);
    assert!(!e.is_active());
}

#[test]
fn fire_uses_its_own_hazard_box() {
    let cfg = ExplosionConfig::default();
    let e = Explosion::new(Vec2::new(10.0, 10.0), ExplosionKind::Fire, ExplosionSource::Hostile, &cfg);
    assert_eq!(e.hazard_box().size(), cfg.fire_size);
    assert_eq!(e.texture_key(), "fire_0");
}

#[test]
fn explosion_hits_each_enemy_once() {
    let cfg = ExplosionConfig::default();
    let mut e = Explosion::new(Vec2::ZERO, ExplosionKind::Blast, ExplosionSource::Player, &cfg);
    assert!(e.mark_enemy_hit(EnemyId(3)));
    assert!(!e.mark_enemy_hit(EnemyId(3)));
    assert!(e.mark_enemy_hit(EnemyId(4)));
}

// ── Casing ────────────────────────────────────────────────────────────────────

#[test]
fn casing_slows_fades_and_expires() {
    let cfg = CasingConfig::default();
    let mut c = Casing::eject(Vec2::ZERO, 0.0, &cfg, &mut seeded_rng());
    assert_eq!(c.alpha(), 1.0);
    let mut frames = 0;
    while c.is_active() {
        c.update(DT);
        frames += 1;
        assert!(frames < 1000);
    }
    let expected = (cfg.lifetime / DT).ceil() as i32;
    assert!((frames - expected).abs() <= 1);
    assert_eq!(c.alpha(), 0.0);
}
