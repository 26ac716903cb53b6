//! Per-session simulation context passed into every update call.
//!
//! Holds what would otherwise be global: the arena bounds, the random
//! source and the outgoing event stream consumed by the renderer/sound layer.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::entities::Arena;
use crate::upgrade::StatKey;

/// Something a front-end may want to draw, play or print.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    LevelUp { level: u32 },
    EnemySpawned { position: Vec2 },
    ItemSpawned { position: Vec2 },
    ShotFired { position: Vec2, damage: f32, critical: bool },
    /// Trigger pulled during cooldown or reload.
    ShotBlocked,
    ReloadStarted,
    ReloadFinished,
    EnemyKilled { bounty: u32 },
    PackageStruck { damage: f32 },
    ProjectileFired { position: Vec2 },
    ProjectileHit { damage: f32 },
    PickupCollected { healed: f32 },
    UpgradePurchased { stat: StatKey, value: f32, next_cost: u32 },
    PurchaseFailed { stat: String, reason: String },
    PackageLost,
}

pub struct SimContext {
    arena: Arena,
    pub rng: StdRng,
    events: Vec<SimEvent>,
}

impl SimContext {
    /// Deterministic context; the same seed replays the same session.
    pub fn new(arena: Arena, seed: u64) -> Self {
        Self {
            arena,
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn from_entropy(arena: Arena) -> Self {
        Self {
            arena,
            rng: StdRng::from_entropy(),
            events: Vec::new(),
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Hand over everything emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
