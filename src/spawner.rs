//! Timer-driven enemy population.
//!
//! The spawner owns every live enemy.  Difficulty compounds into its cadence
//! and cap on every call to [`EnemySpawner::advance`], not only when a level
//! is gained, so pressure keeps accelerating once the multiplier exceeds 1.

use glam::Vec2;
use rand::Rng;

use crate::context::{SimContext, SimEvent};
use crate::enemy::{BehaviorMode, Enemy};
use crate::entities::Arena;

pub const DEFAULT_SPAWN_INTERVAL: f32 = 5.0;
pub const DEFAULT_MAX_ENEMIES: usize = 10;
/// Distance outside the arena edge at which edge spawns appear.
pub const SPAWN_MARGIN: f32 = 200.0;

/// Where a new enemy may appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnSide {
    Inside,
    Top,
    Bottom,
    Left,
    Right,
}

const SPAWN_SIDES: [SpawnSide; 5] = [
    SpawnSide::Inside,
    SpawnSide::Top,
    SpawnSide::Bottom,
    SpawnSide::Left,
    SpawnSide::Right,
];

/// Point for `side`: uniform inside the arena, or `margin` beyond one edge
/// with the other coordinate uniform along that edge.
pub fn spawn_point_on(side: SpawnSide, arena: &Arena, margin: f32, rng: &mut impl Rng) -> Vec2 {
    let along_x = rng.gen_range(arena.left()..=arena.right());
    let along_y = rng.gen_range(arena.top()..=arena.bottom());
    match side {
        SpawnSide::Inside => Vec2::new(along_x, along_y),
        SpawnSide::Top => Vec2::new(along_x, arena.top() - margin),
        SpawnSide::Bottom => Vec2::new(along_x, arena.bottom() + margin),
        SpawnSide::Left => Vec2::new(arena.left() - margin, along_y),
        SpawnSide::Right => Vec2::new(arena.right() + margin, along_y),
    }
}

/// Pick one of the five placement modes uniformly and return its point.
pub fn random_spawn_point(arena: &Arena, margin: f32, rng: &mut impl Rng) -> Vec2 {
    let side = SPAWN_SIDES[rng.gen_range(0..SPAWN_SIDES.len())];
    spawn_point_on(side, arena, margin, rng)
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemySpawner {
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub max_enemies: usize,
    pub enemies: Vec<Enemy>,
}

impl Default for EnemySpawner {
    fn default() -> Self {
        Self::new(DEFAULT_SPAWN_INTERVAL, DEFAULT_MAX_ENEMIES)
    }
}

impl EnemySpawner {
    pub fn new(spawn_interval: f32, max_enemies: usize) -> Self {
        Self {
            spawn_timer: 0.0,
            spawn_interval,
            max_enemies,
            enemies: Vec::new(),
        }
    }

    /// Tick the spawn timer, spawn at most one enemy, then compound the
    /// multiplier into interval and cap.  Returns whether a spawn happened.
    ///
    /// The timer resets whenever it reaches the interval, even when the
    /// population is already at capacity.
    pub fn advance(&mut self, dt: f32, multiplier: f32, ctx: &mut SimContext) -> bool {
        self.spawn_timer += dt;

        let mut spawned = false;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0.0;
            if self.enemies.len() < self.max_enemies {
                self.spawn_enemy(multiplier, ctx);
                spawned = true;
            }
        }

        self.spawn_interval /= multiplier;
        // Float-to-int casts saturate, so a runaway cap pins at usize::MAX.
        self.max_enemies = (self.max_enemies as f64 * multiplier as f64) as usize;
        spawned
    }

    fn spawn_enemy(&mut self, multiplier: f32, ctx: &mut SimContext) {
        let arena = *ctx.arena();
        let position = random_spawn_point(&arena, SPAWN_MARGIN, &mut ctx.rng);
        let behavior = if ctx.rng.gen_bool(0.5) {
            BehaviorMode::Melee
        } else {
            BehaviorMode::Ranged
        };

        let mut enemy = Enemy::new(position, behavior);
        enemy.apply_difficulty(multiplier);
        log::debug!(
            "spawned {:?} enemy at ({:.0}, {:.0}), x{:.3}",
            behavior,
            position.x,
            position.y,
            multiplier
        );
        ctx.emit(SimEvent::EnemySpawned { position });
        self.enemies.push(enemy);
    }

    pub fn live_count(&self) -> usize {
        self.enemies.iter().filter(|e| !e.destroyed).count()
    }

    /// Remove destroyed enemies (and their projectiles).  Returns how many
    /// were removed.
    pub fn cull_destroyed(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.destroyed);
        before - self.enemies.len()
    }
}
