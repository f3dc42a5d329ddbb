//! Terminal rendering of a `FrameView`.
//!
//! The core hands over opaque texture keys; this module maps each key family
//! to a coloured glyph and places it on the character grid. No game logic is
//! performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use topdown_combat::obstacle::{Obstacle, ObstacleKind};
use topdown_combat::player::Player;
use topdown_combat::vector::Vec2;
use topdown_combat::{FrameView, RenderItem};

/// World units covered by one terminal cell. Cells are about twice as tall
/// as they are wide.
pub const CELL: Vec2 = Vec2::new(8.0, 16.0);

/// Rows reserved above (HUD) and below (hint) the play field.
const HUD_ROWS: u16 = 1;
const HINT_ROWS: u16 = 1;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_INFO: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_WALL: Color = Color::DarkBlue;
const C_FADED: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

/// Extra HUD figures not carried by the frame view.
pub struct Hud {
    pub enemies_left: usize,
    pub seconds: f64,
    pub game_over: bool,
    /// Kind and state of the enemy closest to the player, e.g. "Bear chase".
    pub nearest: Option<String>,
}

/// Play-field size in world units for a terminal of `cols` x `rows`.
pub fn viewport_for(cols: u16, rows: u16) -> Vec2 {
    let field_rows = rows.saturating_sub(HUD_ROWS + HINT_ROWS).max(1);
    Vec2::new(f32::from(cols) * CELL.x, f32::from(field_rows) * CELL.y)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    view: &FrameView,
    obstacles: &[Obstacle],
    player: &Player,
    hud: &Hud,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let grid = Grid::new(view, cols, rows);

    draw_walls(out, &grid, obstacles)?;
    for item in &view.items {
        draw_item(out, &grid, item)?;
    }
    if let Some((col, row)) = grid.cell(player.position) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(C_PLAYER))?;
        out.queue(Print("@"))?;
    }

    draw_hud(out, player, hud, cols)?;
    draw_controls_hint(out, rows)?;
    if hud.game_over {
        draw_game_over(out, hud, cols, rows)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── World → cell mapping ──────────────────────────────────────────────────────

struct Grid<'a> {
    view: &'a FrameView,
    cols: u16,
    field_rows: u16,
}

impl<'a> Grid<'a> {
    fn new(view: &'a FrameView, cols: u16, rows: u16) -> Self {
        Grid {
            view,
            cols,
            field_rows: rows.saturating_sub(HUD_ROWS + HINT_ROWS),
        }
    }

    fn cell(&self, world: Vec2) -> Option<(u16, u16)> {
        if !self.view.camera.view_box().contains_point(world) {
            return None;
        }
        let local = self.view.camera.to_view(world);
        let col = (local.x / CELL.x).floor();
        let row = (local.y / CELL.y).floor();
        if col < 0.0 || row < 0.0 || col >= f32::from(self.cols) || row >= f32::from(self.field_rows) {
            return None;
        }
        Some((col as u16, row as u16 + HUD_ROWS))
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Glyph and colour for a texture key, matched on its family prefix.
fn glyph_for(key: &str) -> (&'static str, Color) {
    let dead = key.ends_with("destroyed") || key.ends_with("dead");
    if dead {
        return ("x", C_FADED);
    }
    if key.starts_with("tree") {
        ("♣", Color::Green)
    } else if key.starts_with("rock") {
        ("o", Color::Grey)
    } else if key.starts_with("turret") {
        ("T", Color::Red)
    } else if key.starts_with("mortar_shell") {
        ("◆", Color::Red)
    } else if key.starts_with("mortar") {
        ("M", Color::Red)
    } else if key.starts_with("bear") {
        ("B", Color::DarkYellow)
    } else if key.starts_with("thrower") {
        ("P", Color::Magenta)
    } else if key == "bullet_player" {
        ("•", Color::Cyan)
    } else if key == "bullet_enemy" {
        ("•", Color::Magenta)
    } else if key.starts_with("grenade") {
        ("ó", Color::Green)
    } else if key == "shadow" {
        ("·", C_FADED)
    } else if key.starts_with("petrol_bomb") {
        ("¤", Color::DarkRed)
    } else if key.starts_with("explosion") {
        ("✸", Color::Yellow)
    } else if key.starts_with("fire") {
        ("^", Color::Red)
    } else if key.starts_with("casing") {
        (",", Color::DarkYellow)
    } else {
        ("?", Color::White)
    }
}

/// Creatures spinning through their death tumble are drawn as a turning bar.
fn tumble_glyph(item: &RenderItem) -> Option<&'static str> {
    let creature = item.key.starts_with("bear") || item.key.starts_with("thrower");
    if !creature || item.rotation == 0.0 {
        return None;
    }
    const BARS: [&str; 4] = ["-", "/", "|", "\\"];
    let step = (item.rotation.rem_euclid(180.0) / 45.0) as usize % BARS.len();
    Some(BARS[step])
}

fn draw_item<W: Write>(out: &mut W, grid: &Grid<'_>, item: &RenderItem) -> std::io::Result<()> {
    // walls are drawn from their footprint instead
    if item.key == "wall" {
        return Ok(());
    }
    let Some((col, row)) = grid.cell(item.position) else {
        return Ok(());
    };
    let (glyph, color) = match tumble_glyph(item) {
        Some(glyph) => (glyph, C_FADED),
        None => glyph_for(&item.key),
    };
    let color = if item.alpha < 0.5 { C_FADED } else { color };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_walls<W: Write>(out: &mut W, grid: &Grid<'_>, obstacles: &[Obstacle]) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_WALL))?;
    for wall in obstacles.iter().filter(|o| o.kind == ObstacleKind::Wall) {
        let half = wall.size * 0.5;
        let mut y = wall.position.y - half.y + CELL.y * 0.5;
        while y < wall.position.y + half.y {
            let mut x = wall.position.x - half.x + CELL.x * 0.5;
            while x < wall.position.x + half.x {
                if let Some((col, row)) = grid.cell(Vec2::new(x, y)) {
                    out.queue(cursor::MoveTo(col, row))?;
                    out.queue(Print("█"))?;
                }
                x += CELL.x;
            }
            y += CELL.y;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, player: &Player, hud: &Hud, cols: u16) -> std::io::Result<()> {
    const BAR: usize = 20;
    let ratio = if player.max_health > 0.0 {
        (player.health / player.max_health).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * BAR as f32).round() as usize;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!(
        "HP [{}{}] {:>3.0}",
        "█".repeat(filled),
        " ".repeat(BAR - filled),
        player.health
    )))?;

    let mut info = format!("Enemies:{:>3}  Time:{:>6.1}s", hud.enemies_left, hud.seconds);
    if let Some(nearest) = &hud.nearest {
        info = format!("Near: {nearest}  {info}");
    }
    let x = cols.saturating_sub(info.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(x, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_INFO))?;
    out.queue(Print(info))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("W A S D : Move   ← ↑ → ↓ : Fire   G : Grenade   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, hud: &Hud, cols: u16, rows: u16) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    YOU  DIED       ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let survived = format!("Survived {:.1}s", hud.seconds);
    let hint = "R - Restart  Q - Quit";

    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(3);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let row = start_row + lines.len() as u16;
    out.queue(cursor::MoveTo(cx.saturating_sub(survived.chars().count() as u16 / 2), row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&survived))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(hint.chars().count() as u16 / 2), row + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;
    Ok(())
}
