use rand::rngs::StdRng;
use rand::SeedableRng;

use topdown_combat::camera::Camera;
use topdown_combat::capability::{Damageable, Renderable, WorldObject};
use topdown_combat::collision::CollisionReport;
use topdown_combat::direction::Direction;
use topdown_combat::enemy::{Bear, EnemyKind, Mortar, Thrower, Turret};
use topdown_combat::hitbox::Aabb;
use topdown_combat::obstacle::Obstacle;
use topdown_combat::player::Player;
use topdown_combat::projectile::{ExplosionKind, ExplosionSource};
use topdown_combat::vector::Vec2;
use topdown_combat::{CombatConfig, CombatWorld};

const DT: f32 = 1.0 / 60.0;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn empty_world() -> CombatWorld {
    CombatWorld::new(CombatConfig::default(), Vec::new())
}

/// Somewhere no enemy can see.
fn far_player() -> Player {
    Player::new(Vec2::new(0.0, -500.0), 100.0)
}

fn run(world: &mut CombatWorld, player: &mut Player, rng: &mut StdRng, seconds: f32) -> Vec<CollisionReport> {
    let mut reports = Vec::new();
    let mut t = 0.0;
    while t < seconds {
        reports.push(world.tick(DT, player, rng));
        t += DT;
    }
    reports
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn add_enemy_hands_out_distinct_ids() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    let a = world.add_enemy(Turret::new(Vec2::ZERO, Direction::Up, &cfg.turret));
    let b = world.add_enemy(Bear::new(Vec2::new(50.0, 0.0), &cfg.bear));
    assert_ne!(a, b);
    assert_eq!(world.enemy(a).map(|e| e.kind()), Some(EnemyKind::Turret));
    assert_eq!(world.enemy(b).map(|e| e.kind()), Some(EnemyKind::Bear));
    assert_eq!(world.enemy(b).map(|e| e.id()), Some(b));
}

#[test]
fn player_shot_ejects_a_casing_on_next_tick() {
    let mut world = empty_world();
    let mut player = far_player();
    let mut rng = seeded_rng();
    world.player_fire(Vec2::ZERO, Direction::Left);
    assert_eq!(world.bullets().len(), 1);
    assert!(world.casings().is_empty());
    world.tick(DT, &mut player, &mut rng);
    assert_eq!(world.casings().len(), 1);
}

// ── Collisions ────────────────────────────────────────────────────────────────

#[test]
fn bullet_damages_only_the_first_enemy_it_touches() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    let first = world.add_enemy(Bear::new(Vec2::new(100.0, 0.0), &cfg.bear));
    let second = world.add_enemy(Bear::new(Vec2::new(100.0, 0.0), &cfg.bear));
    let mut player = far_player();

    world.player_fire(Vec2::new(80.0, 0.0), Direction::Right);
    let report = world.tick(DT, &mut player, &mut seeded_rng());

    assert_eq!(report.enemy_hits, 1);
    assert!(world.bullets().is_empty());
    let health = |id| world.enemy(id).map(|e| e.health());
    assert_eq!(health(first), Some(cfg.bear.health - cfg.damage.player_bullet));
    assert_eq!(health(second), Some(cfg.bear.health));
}

#[test]
fn enemy_bullet_hits_player_once() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    world.add_enemy(Turret::new(Vec2::ZERO, Direction::Right, &cfg.turret));
    let mut player = Player::new(Vec2::new(24.0, 0.0), 100.0);
    let mut rng = seeded_rng();

    let first = world.tick(DT, &mut player, &mut rng);
    assert_eq!(first.player_hits, 1);
    assert_eq!(player.health, 100.0 - cfg.damage.enemy_bullet);
    assert!(world.bullets().is_empty());

    // still cooling down on the next frame
    let second = world.tick(DT, &mut player, &mut rng);
    assert_eq!(second.player_hits, 0);
}

#[test]
fn walls_stop_bullets() {
    let wall = Obstacle::wall(Vec2::new(20.0, -50.0), Vec2::new(40.0, 50.0));
    let mut world = CombatWorld::new(CombatConfig::default(), vec![wall]);
    let mut player = far_player();
    world.player_fire(Vec2::new(15.0, 0.0), Direction::Right);
    let report = world.tick(DT, &mut player, &mut seeded_rng());
    assert_eq!(report.bullets_stopped, 1);
    assert!(world.bullets().is_empty());
}

#[test]
fn explosion_hurts_player_on_every_overlapping_frame() {
    let mut world = empty_world();
    let mut player = Player::new(Vec2::new(10.0, 10.0), 100.0);
    let mut rng = seeded_rng();
    world.spawn_explosion(player.position, ExplosionKind::Blast, ExplosionSource::Hostile);
    for _ in 0..3 {
        world.tick(0.01, &mut player, &mut rng);
    }
    let per_frame = world.config().damage.explosion;
    assert!((player.health - (100.0 - 3.0 * per_frame)).abs() < 1e-4);
}

#[test]
fn destroyed_turret_blows_up() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    let id = world.add_enemy(Turret::new(Vec2::new(100.0, 0.0), Direction::Right, &cfg.turret));
    if let Some(turret) = world.enemy_mut(id) {
        turret.take_damage(cfg.turret.health - 1.0, Vec2::ZERO);
    }
    let mut player = far_player();

    world.player_fire(Vec2::new(80.0, 0.0), Direction::Right);
    let report = world.tick(DT, &mut player, &mut seeded_rng());

    assert_eq!(report.kills, vec![(id, EnemyKind::Turret)]);
    assert_eq!(report.death_blasts, vec![Vec2::new(100.0, 0.0)]);
    assert_eq!(world.explosions().len(), 1);
    assert_eq!(world.explosions()[0].position(), Vec2::new(100.0, 0.0));
}

#[test]
fn killed_bear_does_not_blow_up() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    let id = world.add_enemy(Bear::new(Vec2::new(100.0, 0.0), &cfg.bear));
    if let Some(bear) = world.enemy_mut(id) {
        bear.take_damage(cfg.bear.health - 1.0, Vec2::new(100.0, -10.0));
    }
    let mut player = far_player();

    world.player_fire(Vec2::new(80.0, 0.0), Direction::Right);
    let report = world.tick(DT, &mut player, &mut seeded_rng());

    assert_eq!(report.kills, vec![(id, EnemyKind::Bear)]);
    assert!(report.death_blasts.is_empty());
    assert!(world.explosions().is_empty());
    // the body stays around for its death tumble
    assert!(world.enemy(id).is_some_and(|e| e.is_destroyed()));
}

#[test]
fn grenade_blast_damages_each_enemy_once() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    let id = world.add_enemy(Bear::new(Vec2::new(110.0, 0.0), &cfg.bear));
    let mut player = far_player();
    let mut rng = seeded_rng();

    world.player_throw_grenade(Vec2::ZERO, Vec2::new(100.0, 0.0), &mut rng);
    let reports = run(&mut world, &mut player, &mut rng, 3.0);

    let hits: u32 = reports.iter().map(|r| r.enemy_hits).sum();
    assert_eq!(hits, 1);
    assert_eq!(
        world.enemy(id).map(|e| e.health()),
        Some(cfg.bear.health - cfg.damage.grenade_vs_enemy)
    );
    assert!(world.grenades().is_empty());
    assert_eq!(player.health, 100.0);
}

#[test]
fn bear_swipe_goes_through_the_player() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    world.add_enemy(Bear::new(Vec2::ZERO, &cfg.bear));
    let mut player = Player::new(Vec2::new(0.0, 20.0), 100.0);
    let mut rng = seeded_rng();

    run(&mut world, &mut player, &mut rng, 1.5);
    assert_eq!(player.health, 100.0 - cfg.bear.swipe_damage);
}

#[test]
fn mortar_shell_lands_where_the_player_stood() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    world.add_enemy(Mortar::new(Vec2::ZERO, &cfg.mortar));
    let mut player = Player::new(Vec2::new(0.0, -150.0), 100.0);
    let mut rng = seeded_rng();

    let mut frames = 0;
    while world.explosions().is_empty() {
        world.tick(DT, &mut player, &mut rng);
        frames += 1;
        assert!(frames < 600, "no shell ever landed");
    }
    let blast = &world.explosions()[0];
    assert_eq!(blast.texture_key(), "explosion_0");
    assert!(blast.position().distance(player.position) < 10.0);
}

#[test]
fn petrol_bomb_leaves_fire() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    world.add_enemy(Thrower::new(Vec2::ZERO, &cfg.thrower));
    let mut player = Player::new(Vec2::new(100.0, 0.0), 100.0);
    let mut rng = seeded_rng();

    let mut frames = 0;
    while world.explosions().is_empty() {
        world.tick(DT, &mut player, &mut rng);
        frames += 1;
        assert!(frames < 600, "no petrol bomb ever landed");
    }
    assert!(world.explosions()[0].texture_key().starts_with("fire_"));
}

// ── Sweep ─────────────────────────────────────────────────────────────────────

#[test]
fn inactive_objects_are_swept() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    let id = world.add_enemy(Turret::new(Vec2::new(300.0, 300.0), Direction::Up, &cfg.turret));
    if let Some(turret) = world.enemy_mut(id) {
        turret.take_damage(cfg.turret.health, Vec2::ZERO);
    }
    let mut player = far_player();
    let mut rng = seeded_rng();
    world.player_fire(Vec2::ZERO, Direction::Left);

    run(&mut world, &mut player, &mut rng, cfg.casing.lifetime + 0.5);

    assert!(world.bullets().is_empty());
    assert!(world.casings().is_empty());
    assert!(world.enemies().is_empty());
    assert!(world.enemy(id).is_none());
}

// ── Render view ───────────────────────────────────────────────────────────────

#[test]
fn frame_view_is_sorted_and_includes_shell_shadow() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    world.add_enemy(Mortar::new(Vec2::ZERO, &cfg.mortar));
    world.add_enemy(Bear::new(Vec2::new(-200.0, 100.0), &cfg.bear));
    let mut player = Player::new(Vec2::new(0.0, -150.0), 100.0);
    let mut rng = seeded_rng();

    let mut frames = 0;
    while world.bombs().is_empty() {
        world.tick(DT, &mut player, &mut rng);
        frames += 1;
        assert!(frames < 600, "mortar never fired");
    }
    world.tick(DT, &mut player, &mut rng);

    let view = world.frame_view();
    assert!(view.items.windows(2).all(|w| w[0].depth <= w[1].depth));
    assert!(view.items.iter().any(|i| i.key == "shadow"));
    assert!(view.items.iter().any(|i| i.key.starts_with("mortar_shell_")));
    assert!(view.items.iter().any(|i| i.key.starts_with("bear_")));
}

#[test]
fn frame_view_carries_sprite_rotation() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    let id = world.add_enemy(Bear::new(Vec2::new(100.0, 0.0), &cfg.bear));
    if let Some(bear) = world.enemy_mut(id) {
        bear.take_damage(cfg.bear.health + 1.0, Vec2::new(90.0, 0.0));
    }
    let mut player = far_player();
    let mut rng = seeded_rng();
    world.player_throw_grenade(Vec2::new(-100.0, 0.0), Vec2::new(-200.0, 0.0), &mut rng);
    world.player_fire(Vec2::new(0.0, -200.0), Direction::Left);
    run(&mut world, &mut player, &mut rng, 0.1);

    let view = world.frame_view();
    let spinning = |prefix: &str| {
        view.items
            .iter()
            .any(|i| i.key.starts_with(prefix) && i.rotation != 0.0)
    };
    assert!(spinning("bear"));
    assert!(spinning("grenade"));
    assert!(view.items.iter().any(|i| i.key == "bullet_player"));
    assert!(!spinning("bullet"));
}

// ── Camera ────────────────────────────────────────────────────────────────────

#[test]
fn camera_follows_player_inside_arena() {
    let mut world = empty_world();
    let arena = Aabb::new(Vec2::ZERO, Vec2::new(1000.0, 500.0));
    world.set_camera(Camera::new(Vec2::new(200.0, 100.0), Some(arena)));
    let mut rng = seeded_rng();

    let mut player = Player::new(Vec2::new(10.0, 10.0), 100.0);
    world.tick(DT, &mut player, &mut rng);
    assert_eq!(world.camera().center, Vec2::new(100.0, 50.0));

    player.position = Vec2::new(500.0, 250.0);
    world.tick(DT, &mut player, &mut rng);
    assert_eq!(world.camera().center, Vec2::new(500.0, 250.0));

    player.position = Vec2::new(990.0, 490.0);
    world.tick(DT, &mut player, &mut rng);
    assert_eq!(world.camera().center, Vec2::new(900.0, 450.0));
}

#[test]
fn small_arena_pins_camera_to_its_centre() {
    let mut camera = Camera::new(
        Vec2::new(200.0, 100.0),
        Some(Aabb::new(Vec2::ZERO, Vec2::new(100.0, 50.0))),
    );
    camera.follow(Vec2::new(90.0, 5.0));
    assert_eq!(camera.center, Vec2::new(50.0, 25.0));
}

#[test]
fn view_coordinates_grow_downwards() {
    let mut camera = Camera::new(Vec2::new(200.0, 100.0), None);
    camera.follow(Vec2::new(100.0, 50.0));
    assert_eq!(camera.to_view(Vec2::new(0.0, 100.0)), Vec2::ZERO);
    assert_eq!(camera.to_view(Vec2::new(200.0, 0.0)), Vec2::new(200.0, 100.0));
}

// ── Aim assist and determinism ────────────────────────────────────────────────

#[test]
fn aim_points_at_nearest_living_enemy() {
    let mut world = empty_world();
    let cfg = world.config().clone();
    world.add_enemy(Turret::new(Vec2::new(100.0, 0.0), Direction::Up, &cfg.turret));
    world.add_enemy(Turret::new(Vec2::new(0.0, -300.0), Direction::Up, &cfg.turret));
    let angle = world.aim_at_nearest(Vec2::ZERO);
    assert!(angle.is_some_and(|a| a.abs() < 1e-3));
    assert!(empty_world().aim_at_nearest(Vec2::ZERO).is_none());
}

#[test]
fn same_seed_same_battle() {
    let play = || {
        let mut world = empty_world();
        let cfg = world.config().clone();
        world.add_enemy(Thrower::new(Vec2::ZERO, &cfg.thrower));
        world.add_enemy(Turret::new(Vec2::new(-60.0, 0.0), Direction::Right, &cfg.turret));
        let mut player = Player::new(Vec2::new(180.0, 40.0), 100.0);
        let mut rng = seeded_rng();
        run(&mut world, &mut player, &mut rng, 4.0);
        let enemies: Vec<Vec2> = world.enemies().iter().map(|e| e.position()).collect();
        let casings: Vec<Vec2> = world.casings().iter().map(|c| c.position()).collect();
        (enemies, casings, player.health, world.clock().frame())
    };
    assert_eq!(play(), play());
}
