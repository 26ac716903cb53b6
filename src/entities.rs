//! Shared game data: arena geometry, the defended package, frame input and
//! session status.  Actors with behaviour live in their own modules.

use glam::Vec2;

use crate::upgrade::StatKey;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world units.  `x`/`y` is the top-left corner,
/// y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of `size` centred on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let min = center - size * 0.5;
        Self::new(min.x, min.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Half-open point test: the right and bottom edges are outside.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// True when `other` lies entirely inside `self` (edges may touch).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Strict overlap; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// The bounded play region.  Supplied once by the caller and never mutated
/// during a session.
pub type Arena = Rect;

// ── Defended target ───────────────────────────────────────────────────────────

pub const PACKAGE_SIZE: Vec2 = Vec2::new(125.0, 75.0);
pub const PACKAGE_MAX_HEALTH: f32 = 100.0;

/// The package every enemy attacks and every pickup heals.
#[derive(Clone, Debug, PartialEq)]
pub struct Package {
    pub position: Vec2,
    pub size: Vec2,
    pub max_health: f32,
    pub health: f32,
    /// Purchasable, but no damage path reads it yet.
    pub armor: f32,
}

impl Package {
    /// A fresh package centred in the arena.
    pub fn new(arena: &Arena) -> Self {
        Self {
            position: arena.center(),
            size: PACKAGE_SIZE,
            max_health: PACKAGE_MAX_HEALTH,
            health: PACKAGE_MAX_HEALTH,
            armor: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.size)
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Heal by `fraction` of max health, truncated to whole points.  Returns
    /// the amount actually restored.
    pub fn heal_fraction(&mut self, fraction: f32) -> f32 {
        let amount = (self.max_health * fraction).trunc();
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }
}

// ── Session status & input ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    /// The package's health reached zero.
    PackageLost,
    /// The player asked to leave the session.
    Quit,
}

/// One already-normalized input event.  The core never touches a device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Primary click at a world-space position.
    PointerDown(Vec2),
    Reload,
    Pause,
    Quit,
    Purchase(StatKey),
}

/// The hit-test a successful trigger pull produces for this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub position: Vec2,
    pub damage: f32,
    pub critical: bool,
}
