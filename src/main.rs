mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use topdown_combat::camera::Camera;
use topdown_combat::capability::{Collidable, WorldObject};
use topdown_combat::direction::Direction;
use topdown_combat::enemy::{Bear, Mortar, Thrower, Turret};
use topdown_combat::hitbox::Aabb;
use topdown_combat::obstacle::Obstacle;
use topdown_combat::player::{player_hitbox, Player};
use topdown_combat::vector::{Vec2, VecExt};
use topdown_combat::{CombatConfig, CombatWorld};

use display::Hud;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS
const LOG_FILE: &str = "topdown_combat.log";

// ── Arena ─────────────────────────────────────────────────────────────────────

const ARENA_MIN: Vec2 = Vec2::new(0.0, 0.0);
const ARENA_MAX: Vec2 = Vec2::new(960.0, 640.0);
const WALL: f32 = 16.0;
const PLAYER_START: Vec2 = Vec2::new(480.0, 80.0);
const PLAYER_HEALTH: f32 = 100.0;
/// World units per second.
const PLAYER_SPEED: f32 = 140.0;

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Min frames between shots while an arrow key is held.
const SHOOT_COOLDOWN: u32 = 6;

/// Min frames between grenade throws.
const GRENADE_COOLDOWN: u32 = 30;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn build_obstacles() -> Vec<Obstacle> {
    let mut obstacles = vec![
        // border
        Obstacle::wall(ARENA_MIN, Vec2::new(ARENA_MAX.x, ARENA_MIN.y + WALL)),
        Obstacle::wall(Vec2::new(ARENA_MIN.x, ARENA_MAX.y - WALL), ARENA_MAX),
        Obstacle::wall(ARENA_MIN, Vec2::new(ARENA_MIN.x + WALL, ARENA_MAX.y)),
        Obstacle::wall(Vec2::new(ARENA_MAX.x - WALL, ARENA_MIN.y), ARENA_MAX),
        // cover in the middle
        Obstacle::wall(Vec2::new(400.0, 300.0), Vec2::new(560.0, 316.0)),
        Obstacle::wall(Vec2::new(200.0, 420.0), Vec2::new(216.0, 540.0)),
    ];
    for x in [120.0, 260.0, 700.0, 840.0] {
        obstacles.push(Obstacle::foliage(Vec2::new(x, 220.0)));
    }
    for pos in [
        Vec2::new(340.0, 180.0),
        Vec2::new(620.0, 200.0),
        Vec2::new(760.0, 460.0),
        Vec2::new(480.0, 480.0),
    ] {
        obstacles.push(Obstacle::rock(pos));
    }
    obstacles
}

fn build_arena(config: &CombatConfig, viewport: Vec2) -> (CombatWorld, Player) {
    let mut world = CombatWorld::new(config.clone(), build_obstacles());
    world.set_camera(Camera::new(viewport, Some(Aabb::new(ARENA_MIN, ARENA_MAX))));

    world.add_enemy(Turret::new(Vec2::new(160.0, 560.0), Direction::Down, &config.turret));
    world.add_enemy(Turret::new(Vec2::new(800.0, 560.0), Direction::Down, &config.turret));
    world.add_enemy(Mortar::new(Vec2::new(480.0, 580.0), &config.mortar));
    world.add_enemy(Bear::new(Vec2::new(120.0, 360.0), &config.bear));
    world.add_enemy(Bear::new(Vec2::new(860.0, 340.0), &config.bear));
    world.add_enemy(Thrower::new(Vec2::new(320.0, 500.0), &config.thrower));
    world.add_enemy(Thrower::new(Vec2::new(660.0, 380.0), &config.thrower));

    info!(enemies = world.enemies().len(), "arena built");
    (world, Player::new(PLAYER_START, PLAYER_HEALTH))
}

/// Move the player one axis at a time so walls can be slid along.
fn move_player(player: &mut Player, delta: Vec2, world: &CombatWorld) {
    let size = world.config().player.hitbox;
    let blocked = |p: Vec2| {
        let hitbox = player_hitbox(p, size);
        world
            .obstacles()
            .iter()
            .any(|o| o.movement_hitbox().intersects(&hitbox))
    };
    let along_x = player.position + Vec2::new(delta.x, 0.0);
    if delta.x != 0.0 && !blocked(along_x) {
        player.position = along_x;
    }
    let along_y = player.position + Vec2::new(0.0, delta.y);
    if delta.y != 0.0 && !blocked(along_y) {
        player.position = along_y;
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program, `false` → restart the arena.
///
/// Input follows the held-key model: every key remembers the frame of its
/// last press/repeat, and each frame applies all keys that are still fresh.
/// That lets movement and firing be held at the same time.
fn game_loop<W: Write>(
    out: &mut W,
    config: &CombatConfig,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let (cols, rows) = terminal::size()?;
    let (mut world, mut player) = build_arena(config, display::viewport_for(cols, rows));
    let dt = FRAME.as_secs_f32();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shoot_cooldown: u32 = 0;
    let mut grenade_cooldown: u32 = 0;
    let mut facing = Direction::Up;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if player.is_dead() => {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if !player.is_dead() {
            // ── Movement ──────────────────────────────────────────────────────
            let held = |keys: &[KeyCode]| any_held(&key_frame, keys, frame);
            let mut step = Vec2::ZERO;
            if held(&[KeyCode::Char('w'), KeyCode::Char('W')]) {
                step.y += 1.0;
            }
            if held(&[KeyCode::Char('s'), KeyCode::Char('S')]) {
                step.y -= 1.0;
            }
            if held(&[KeyCode::Char('a'), KeyCode::Char('A')]) {
                step.x -= 1.0;
            }
            if held(&[KeyCode::Char('d'), KeyCode::Char('D')]) {
                step.x += 1.0;
            }
            if let Some(dir) = step.try_normalize_guarded() {
                facing = Direction::from_delta(dir);
                move_player(&mut player, dir * PLAYER_SPEED * dt, &world);
            }

            // ── Firing ────────────────────────────────────────────────────────
            let mut aim = Vec2::ZERO;
            if held(&[KeyCode::Up]) {
                aim.y += 1.0;
            }
            if held(&[KeyCode::Down]) {
                aim.y -= 1.0;
            }
            if held(&[KeyCode::Left]) {
                aim.x -= 1.0;
            }
            if held(&[KeyCode::Right]) {
                aim.x += 1.0;
            }
            if aim != Vec2::ZERO && shoot_cooldown == 0 {
                world.player_fire(player.position, Direction::from_delta(aim));
                shoot_cooldown = SHOOT_COOLDOWN;
            }

            if held(&[KeyCode::Char('g'), KeyCode::Char('G')]) && grenade_cooldown == 0 {
                let target = world
                    .nearest_enemy(player.position)
                    .map(|e| e.position())
                    .unwrap_or(player.position + facing.vector() * config.grenade.max_range);
                world.player_throw_grenade(player.position, target, &mut rng);
                grenade_cooldown = GRENADE_COOLDOWN;
            }
        }

        shoot_cooldown = shoot_cooldown.saturating_sub(1);
        grenade_cooldown = grenade_cooldown.saturating_sub(1);

        if !player.is_dead() {
            let report = world.tick(dt, &mut player, &mut rng);
            if player.is_dead() {
                info!(seconds = world.clock().now(), "player died");
            } else if !report.kills.is_empty() && world.enemies().is_empty() {
                info!("arena cleared");
            }
        }

        let hud = Hud {
            enemies_left: world.enemies().len(),
            seconds: world.clock().now(),
            game_over: player.is_dead(),
            nearest: world
                .nearest_enemy(player.position)
                .map(|e| format!("{:?} {}", e.kind(), e.state_name())),
        };
        display::render(out, &world.frame_view(), world.obstacles(), &player, &hud)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Log to a file; the terminal belongs to the viewer while it runs.
fn init_logging() -> std::io::Result<()> {
    let file = File::create(LOG_FILE)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("topdown_combat=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

fn load_config() -> CombatConfig {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        return CombatConfig::default();
    };
    match CombatConfig::load(&path) {
        Ok(config) => {
            info!(path = %path.display(), "using tuning file");
            config
        }
        Err(err) => {
            error!(%err, "falling back to built-in tuning");
            CombatConfig::default()
        }
    }
}

fn main() -> std::io::Result<()> {
    init_logging()?;
    let config = load_config();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release events; terminals without the protocol fall back
    // to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the loop never waits
    // on input.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &config, &rx);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, config: &CombatConfig, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    loop {
        if game_loop(out, config, rx)? {
            break;
        }
        info!("restarting arena");
    }
    Ok(())
}
