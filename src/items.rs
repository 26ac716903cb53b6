//! Heal pickups and their spawner.

use glam::Vec2;
use rand::Rng;

use crate::context::{SimContext, SimEvent};
use crate::entities::{Package, Rect};

pub const PICKUP_SIZE: Vec2 = Vec2::new(50.0, 50.0);
/// Fraction of the package's max health restored per pickup.
pub const HEAL_FRACTION: f32 = 0.05;
pub const DEFAULT_ITEM_INTERVAL: f32 = 2.0;
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Inset from the arena's top/left edges for pickup placement.
const NEAR_INSET: f32 = 10.0;
/// Inset from the arena's bottom/right edges, leaves room for the box.
const FAR_INSET: f32 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    /// Top-left corner of the bounding box.
    pub position: Vec2,
    pub size: Vec2,
    pub heal_fraction: f32,
    pub destroyed: bool,
}

impl Pickup {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            size: PICKUP_SIZE,
            heal_fraction: HEAL_FRACTION,
            destroyed: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    /// Heal the package and consume the pickup.  A consumed pickup does
    /// nothing and returns `None`.
    pub fn activate(&mut self, package: &mut Package) -> Option<f32> {
        if self.destroyed {
            return None;
        }
        let healed = package.heal_fraction(self.heal_fraction);
        self.destroyed = true;
        Some(healed)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemSpawner {
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub max_items: usize,
    pub items: Vec<Pickup>,
}

impl Default for ItemSpawner {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_INTERVAL, DEFAULT_MAX_ITEMS)
    }
}

impl ItemSpawner {
    pub fn new(spawn_interval: f32, max_items: usize) -> Self {
        Self {
            spawn_timer: 0.0,
            spawn_interval,
            max_items,
            items: Vec::new(),
        }
    }

    /// Same cadence rules as the enemy spawner, without difficulty scaling.
    pub fn advance(&mut self, dt: f32, ctx: &mut SimContext) -> bool {
        self.spawn_timer += dt;
        if self.spawn_timer < self.spawn_interval {
            return false;
        }
        self.spawn_timer = 0.0;
        if self.items.len() >= self.max_items {
            return false;
        }
        self.spawn_item(ctx);
        true
    }

    fn spawn_item(&mut self, ctx: &mut SimContext) {
        let arena = *ctx.arena();
        let (min_x, max_x) = (arena.left() + NEAR_INSET, arena.right() - FAR_INSET);
        let (min_y, max_y) = (arena.top() + NEAR_INSET, arena.bottom() - FAR_INSET);
        // Degenerate arenas collapse the range onto its lower bound.
        let x = if max_x > min_x { ctx.rng.gen_range(min_x..=max_x) } else { min_x };
        let y = if max_y > min_y { ctx.rng.gen_range(min_y..=max_y) } else { min_y };

        let position = Vec2::new(x, y);
        ctx.emit(SimEvent::ItemSpawned { position });
        self.items.push(Pickup::new(position));
    }

    pub fn cull_destroyed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|i| !i.destroyed);
        before - self.items.len()
    }
}
