//! The per-frame simulation loop.
//!
//! `tick` takes an immutable reference to the current `GameState` and returns
//! a brand-new one.  Side effects are limited to the injected `SimContext`
//! (its RNG and event sink), so a seeded context replays a session exactly.

use crate::config::GameConfig;
use crate::context::{SimContext, SimEvent};
use crate::difficulty::DifficultyModel;
use crate::enemy::EnemyAction;
use crate::entities::{Arena, GameStatus, InputEvent, Package, Shot};
use crate::items::ItemSpawner;
use crate::shooter::{FireBlocked, Shooter};
use crate::spawner::EnemySpawner;
use crate::upgrade::UpgradeShop;

// ── Game state ───────────────────────────────────────────────────────────────

/// Everything that changes during a session.  The arena and RNG live in the
/// `SimContext` instead.
#[derive(Clone, Debug)]
pub struct GameState {
    pub package: Package,
    pub shooter: Shooter,
    pub enemies: EnemySpawner,
    pub items: ItemSpawner,
    pub difficulty: DifficultyModel,
    pub shop: UpgradeShop,
    pub status: GameStatus,
    /// Simulated frames since the session started (paused frames excluded).
    pub frame: u64,
    /// Total seconds survived, for the HUD clock.
    pub session_time: f32,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session for `arena` using the tunables in `config`.
pub fn init_state(config: &GameConfig, arena: &Arena) -> GameState {
    GameState {
        package: Package::new(arena),
        shooter: Shooter::default(),
        enemies: EnemySpawner::new(config.enemy_spawn.interval, config.enemy_spawn.capacity),
        items: ItemSpawner::new(config.item_spawn.interval, config.item_spawn.capacity),
        difficulty: DifficultyModel::new(config.difficulty_interval, config.difficulty_scale),
        shop: UpgradeShop::default(),
        status: GameStatus::Playing,
        frame: 0,
        session_time: 0.0,
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the session by `dt` seconds given this frame's input batch.
///
/// Order: session controls → difficulty → spawners → enemy AI and
/// projectiles → shooter → hit resolution → cull → purchases → end check.
pub fn tick(state: &GameState, input: &[InputEvent], dt: f32, ctx: &mut SimContext) -> GameState {
    let mut next = state.clone();

    // ── 1. Session controls ──────────────────────────────────────────────────
    for event in input {
        match event {
            InputEvent::Quit => {
                next.status = GameStatus::Quit;
                return next;
            }
            InputEvent::Pause => {
                next.status = match next.status {
                    GameStatus::Playing => GameStatus::Paused,
                    GameStatus::Paused => GameStatus::Playing,
                    other => other,
                };
            }
            _ => {}
        }
    }
    if next.status != GameStatus::Playing {
        return next;
    }
    next.frame += 1;
    next.session_time += dt;

    // ── 2. Difficulty ────────────────────────────────────────────────────────
    if next.difficulty.advance(dt) > 0 {
        let level = next.difficulty.level;
        log::info!("difficulty level {} (x{:.3})", level, next.difficulty.current_multiplier());
        ctx.emit(SimEvent::LevelUp { level });
    }
    let multiplier = next.difficulty.current_multiplier();

    // ── 3. Spawners ──────────────────────────────────────────────────────────
    next.enemies.advance(dt, multiplier, ctx);
    next.items.advance(dt, ctx);

    // ── 4. Enemy AI, movement and projectiles ────────────────────────────────
    let arena = *ctx.arena();
    for enemy in &mut next.enemies.enemies {
        match enemy.update(&mut next.package, dt, &arena) {
            Some(EnemyAction::Struck { damage }) => ctx.emit(SimEvent::PackageStruck { damage }),
            Some(EnemyAction::Fired { origin }) => {
                ctx.emit(SimEvent::ProjectileFired { position: origin })
            }
            None => {}
        }
        enemy.advance_projectiles(dt);
    }

    // ── 5. Shooter ───────────────────────────────────────────────────────────
    if next.shooter.update(dt) {
        ctx.emit(SimEvent::ReloadFinished);
    }
    let mut shot: Option<Shot> = None;
    for event in input {
        match *event {
            InputEvent::Reload => {
                if next.shooter.start_reload() {
                    ctx.emit(SimEvent::ReloadStarted);
                }
            }
            InputEvent::PointerDown(pointer) if shot.is_none() => {
                match next.shooter.fire(pointer, &mut ctx.rng) {
                    Ok(s) => {
                        ctx.emit(SimEvent::ShotFired {
                            position: s.position,
                            damage: s.damage,
                            critical: s.critical,
                        });
                        shot = Some(s);
                    }
                    Err(FireBlocked::Empty) => ctx.emit(SimEvent::ReloadStarted),
                    Err(_) => ctx.emit(SimEvent::ShotBlocked),
                }
            }
            _ => {}
        }
    }

    // ── 6. Hit resolution ────────────────────────────────────────────────────
    if let Some(shot) = shot {
        resolve_shot(&mut next, &shot, ctx);
    }
    for enemy in &mut next.enemies.enemies {
        for damage in enemy.resolve_projectile_hits(&mut next.package) {
            ctx.emit(SimEvent::ProjectileHit { damage });
        }
    }

    // ── 7. Cull ──────────────────────────────────────────────────────────────
    let killed = next.enemies.cull_destroyed();
    if killed > 0 {
        let bounty = next.shooter.bounty;
        let earned = bounty.saturating_mul(killed as u32);
        next.shooter.wallet = next.shooter.wallet.saturating_add(earned);
        log::debug!("{} enemies down, +{} (wallet {})", killed, earned, next.shooter.wallet);
        for _ in 0..killed {
            ctx.emit(SimEvent::EnemyKilled { bounty });
        }
    }
    next.items.cull_destroyed();

    // ── 8. Purchases ─────────────────────────────────────────────────────────
    for event in input {
        if let InputEvent::Purchase(stat) = *event {
            match next.shop.purchase(stat, &mut next.shooter, &mut next.package) {
                Ok(receipt) => ctx.emit(SimEvent::UpgradePurchased {
                    stat,
                    value: receipt.value,
                    next_cost: receipt.next_cost,
                }),
                Err(err) => ctx.emit(SimEvent::PurchaseFailed {
                    stat: stat.to_string(),
                    reason: err.to_string(),
                }),
            }
        }
    }

    // ── 9. End conditions ────────────────────────────────────────────────────
    if next.package.is_destroyed() {
        log::info!("package destroyed after {:.1}s", next.session_time);
        next.status = GameStatus::PackageLost;
        ctx.emit(SimEvent::PackageLost);
    }

    next
}

/// Apply one pointer shot: every live pickup under the pointer heals the
/// package, every live enemy under it takes the shot's damage.
fn resolve_shot(state: &mut GameState, shot: &Shot, ctx: &mut SimContext) {
    for item in &mut state.items.items {
        if item.destroyed || !item.bounds().contains_point(shot.position) {
            continue;
        }
        if let Some(healed) = item.activate(&mut state.package) {
            ctx.emit(SimEvent::PickupCollected { healed });
        }
    }

    for enemy in &mut state.enemies.enemies {
        if !enemy.destroyed && enemy.bounds().contains_point(shot.position) {
            enemy.take_damage(shot.damage);
        }
    }
}
