//! Rendering layer.  All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands.  World coordinates are mapped onto the
//! terminal grid through a [`Viewport`].

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use quick_draw::compute::GameState;
use quick_draw::enemy::{BehaviorMode, Enemy};
use quick_draw::entities::{Arena, GameStatus};
use quick_draw::shooter::ShooterState;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkYellow;
const C_HUD_WALLET: Color = Color::Yellow;
const C_HUD_AMMO: Color = Color::White;
const C_HUD_RELOAD: Color = Color::Red;
const C_HUD_CLOCK: Color = Color::Cyan;
const C_PACKAGE: Color = Color::DarkRed;
const C_HEALTH_OK: Color = Color::Green;
const C_HEALTH_LOW: Color = Color::Red;
const C_ENEMY_MELEE: Color = Color::Red;
const C_ENEMY_RANGED: Color = Color::Magenta;
const C_ENEMY_IDLE: Color = Color::DarkGrey;
const C_PROJECTILE: Color = Color::Magenta;
const C_PICKUP: Color = Color::Green;
const C_SHOP: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Columns reserved on the right for the upgrade shop.
pub const SHOP_WIDTH: u16 = 36;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps the arena's world rectangle onto a block of terminal cells.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub arena: Arena,
    pub col: u16,
    pub row: u16,
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    /// Fit `arena` into a `width` x `height` terminal, leaving room for the
    /// HUD (row 0), the border and the shop panel.
    pub fn fit(arena: Arena, width: u16, height: u16) -> Self {
        Self {
            arena,
            col: 1,
            row: 2,
            cols: width.saturating_sub(SHOP_WIDTH + 2).max(1),
            rows: height.saturating_sub(4).max(1),
        }
    }

    fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.arena.width / self.cols as f32,
            self.arena.height / self.rows as f32,
        )
    }

    /// Cell under a world point, or `None` when it falls outside the arena.
    pub fn to_cell(&self, p: Vec2) -> Option<(u16, u16)> {
        if !self.arena.contains_point(p) {
            return None;
        }
        let cell = self.cell_size();
        let c = ((p.x - self.arena.x) / cell.x) as u16;
        let r = ((p.y - self.arena.y) / cell.y) as u16;
        Some((self.col + c.min(self.cols - 1), self.row + r.min(self.rows - 1)))
    }

    /// World point at the centre of a terminal cell.
    pub fn to_world(&self, col: u16, row: u16) -> Vec2 {
        let cell = self.cell_size();
        let c = col.saturating_sub(self.col) as f32 + 0.5;
        let r = row.saturating_sub(self.row) as f32 + 0.5;
        Vec2::new(self.arena.x + c * cell.x, self.arena.y + r * cell.y)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
    message: &str,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, state)?;
    draw_package(out, state, view)?;

    for item in state.items.items.iter().filter(|i| !i.destroyed) {
        if let Some((c, r)) = view.to_cell(item.bounds().center()) {
            out.queue(cursor::MoveTo(c, r))?;
            out.queue(style::SetForegroundColor(C_PICKUP))?;
            out.queue(Print("+"))?;
        }
    }
    for enemy in &state.enemies.enemies {
        draw_enemy(out, enemy, view)?;
    }

    draw_shop(out, state, view)?;
    draw_message(out, view, message)?;

    match state.status {
        GameStatus::Paused => draw_banner(out, view, &["PAUSED", "ESC/P - Resume   Q - Save & Menu"])?,
        GameStatus::PackageLost => {
            let summary = survived(state);
            draw_banner(out, view, &["PACKAGE DESTROYED", summary.as_str(), "ENTER - Menu   Q - Quit"])?
        }
        _ => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.row + view.rows + 2))?;
    out.flush()?;
    Ok(())
}

fn survived(state: &GameState) -> String {
    format!("Survived {}", clock(state.session_time))
}

fn clock(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let top = view.row - 1;
    let bottom = view.row + view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(view.col - 1, top))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
    out.queue(cursor::MoveTo(view.col - 1, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in view.row..bottom {
        out.queue(cursor::MoveTo(view.col - 1, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.col + view.cols, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let shooter = &state.shooter;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WALLET))?;
    out.queue(Print(format!("{:>6}$  ", shooter.wallet)))?;

    if shooter.state() == ShooterState::Reloading {
        out.queue(style::SetForegroundColor(C_HUD_RELOAD))?;
        out.queue(Print(format!("RELOADING {}/{}  ", shooter.ammo, shooter.max_ammo)))?;
    } else {
        out.queue(style::SetForegroundColor(C_HUD_AMMO))?;
        out.queue(Print(format!("Ammo {}/{}  ", shooter.ammo, shooter.max_ammo)))?;
    }

    out.queue(style::SetForegroundColor(C_HUD_CLOCK))?;
    out.queue(Print(format!(
        "{}  Level {}  ",
        clock(state.session_time),
        state.difficulty.level
    )))?;

    let package = &state.package;
    let ratio = if package.max_health > 0.0 {
        package.health / package.max_health
    } else {
        0.0
    };
    out.queue(style::SetForegroundColor(if ratio > 0.3 { C_HEALTH_OK } else { C_HEALTH_LOW }))?;
    out.queue(Print(format!(
        "Package {:.0}/{:.0}  Armor {}",
        package.health, package.max_health, package.armor
    )))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_package<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let bounds = state.package.bounds();
    let top_left = Vec2::new(bounds.left(), bounds.top());
    let bottom_right = Vec2::new(bounds.right() - 0.01, bounds.bottom() - 0.01);
    let (Some((c0, r0)), Some((c1, r1))) = (view.to_cell(top_left), view.to_cell(bottom_right))
    else {
        return Ok(());
    };

    out.queue(style::SetForegroundColor(C_PACKAGE))?;
    let width = (c1 - c0 + 1) as usize;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print("▓".repeat(width)))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, view: &Viewport) -> std::io::Result<()> {
    if enemy.destroyed {
        return Ok(());
    }

    // Projectiles stay drawn even while their owner is still off-screen.
    out.queue(style::SetForegroundColor(C_PROJECTILE))?;
    for projectile in &enemy.projectiles {
        if let Some((c, r)) = view.to_cell(projectile.position) {
            out.queue(cursor::MoveTo(c, r))?;
            out.queue(Print("•"))?;
        }
    }

    if !enemy.visible {
        return Ok(());
    }
    let Some((c, r)) = view.to_cell(enemy.position) else {
        return Ok(());
    };
    let (glyph, color) = match enemy.behavior {
        BehaviorMode::Melee => ("M", C_ENEMY_MELEE),
        BehaviorMode::Ranged => ("R", C_ENEMY_RANGED),
        BehaviorMode::Idle => ("i", C_ENEMY_IDLE),
    };
    out.queue(cursor::MoveTo(c, r))?;
    out.queue(style::SetForegroundColor(color))?;
    if enemy.health < enemy.max_health {
        out.queue(style::SetAttribute(style::Attribute::Dim))?;
        out.queue(Print(glyph))?;
        out.queue(style::SetAttribute(style::Attribute::Reset))?;
    } else {
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Shop panel ────────────────────────────────────────────────────────────────

fn draw_shop<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let col = view.col + view.cols + 2;

    out.queue(cursor::MoveTo(col, view.row))?;
    out.queue(style::SetForegroundColor(C_SHOP))?;
    out.queue(Print("── UPGRADES ──"))?;

    for (i, entry) in state.shop.entries().iter().enumerate() {
        let current = entry.current(&state.shooter, &state.package);
        let affordable = state.shooter.wallet >= entry.cost;
        out.queue(cursor::MoveTo(col, view.row + 2 + i as u16))?;
        out.queue(style::SetForegroundColor(if affordable { Color::White } else { C_HINT }))?;
        out.queue(Print(format!(
            "[{}] {}: {} (+{}) ${}",
            i + 1,
            entry.label,
            current,
            entry.increment,
            entry.cost
        )))?;
    }
    Ok(())
}

// ── Status line & hints ───────────────────────────────────────────────────────

fn draw_message<W: Write>(out: &mut W, view: &Viewport, message: &str) -> std::io::Result<()> {
    let row = view.row + view.rows + 1;
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("CLICK : Shoot   R : Reload   1-9 : Upgrade   ESC : Pause   Q : Menu"))?;
    if !message.is_empty() {
        // Below the shop entries.
        out.queue(cursor::MoveTo(view.col + view.cols + 2, view.row + 12))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(message))?;
    }
    Ok(())
}

// ── Overlay ───────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, view: &Viewport, lines: &[&str]) -> std::io::Result<()> {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    let cx = view.col + view.cols / 2;
    let start_row = (view.row + view.rows / 2).saturating_sub(lines.len() as u16 / 2 + 1);
    let left = cx.saturating_sub(width as u16 / 2);

    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(cursor::MoveTo(left, start_row))?;
    out.queue(Print(format!("╔{}╗", "═".repeat(width))))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(left, start_row + 1 + i as u16))?;
        out.queue(Print(format!("║{:^w$}║", line, w = width)))?;
    }
    out.queue(cursor::MoveTo(left, start_row + 1 + lines.len() as u16))?;
    out.queue(Print(format!("╚{}╝", "═".repeat(width))))?;
    Ok(())
}
