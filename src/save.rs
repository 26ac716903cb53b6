//! Save/load boundary.
//!
//! Every persisted entity has an explicit record type listing its fields and
//! implements [`Serializable`] to convert to and from it.  Records are written
//! as RON text and passed through a [`SaveCipher`] before hitting disk, so an
//! external encryption layer can be slotted in without touching the schema.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::compute::GameState;
use crate::config::GameConfig;
use crate::difficulty::{DifficultyModel, MIN_INTERVAL};
use crate::enemy::{BehaviorMode, Enemy};
use crate::entities::{Arena, GameStatus, Package};
use crate::error::{SaveError, SaveResult};
use crate::items::{ItemSpawner, Pickup};
use crate::projectile::Projectile;
use crate::shooter::Shooter;
use crate::spawner::EnemySpawner;
use crate::upgrade::{StatKey, UpgradeShop};

pub const SAVE_VERSION: u32 = 1;

/// Conversion between a live entity and its persisted record.
pub trait Serializable: Sized {
    type Record;

    fn encode(&self) -> Self::Record;
    fn decode(record: Self::Record) -> SaveResult<Self>;
}

fn finite(field: &'static str, v: f32) -> SaveResult<f32> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SaveError::InvalidRecord {
            field,
            reason: format!("is not finite ({})", v),
        })
    }
}

fn finite_vec(field: &'static str, v: [f32; 2]) -> SaveResult<Vec2> {
    Ok(Vec2::new(finite(field, v[0])?, finite(field, v[1])?))
}

fn non_negative(field: &'static str, v: f32) -> SaveResult<f32> {
    let v = finite(field, v)?;
    if v < 0.0 {
        return Err(SaveError::InvalidRecord {
            field,
            reason: format!("is negative ({})", v),
        });
    }
    Ok(v)
}

// ── Projectile ───────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectileRecord {
    pub pos: [f32; 2],
    pub vel: [f32; 2],
    pub dmg: f32,
    pub radius: f32,
}

impl Serializable for Projectile {
    type Record = ProjectileRecord;

    fn encode(&self) -> ProjectileRecord {
        ProjectileRecord {
            pos: self.position.to_array(),
            vel: self.velocity.to_array(),
            dmg: self.damage,
            radius: self.radius,
        }
    }

    fn decode(r: ProjectileRecord) -> SaveResult<Self> {
        Ok(Self {
            position: finite_vec("projectile.pos", r.pos)?,
            velocity: finite_vec("projectile.vel", r.vel)?,
            damage: finite("projectile.dmg", r.dmg)?,
            radius: non_negative("projectile.radius", r.radius)?,
        })
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnemyRecord {
    pub pos: [f32; 2],
    pub size: [f32; 2],
    pub vel: [f32; 2],
    pub acc: [f32; 2],
    pub max_hp: f32,
    pub hp: f32,
    pub dmg: f32,
    pub attk_spd: f32,
    pub spd: f32,
    pub max_spd: f32,
    pub crit_rate: f32,
    pub crit_dmg: f32,
    pub enemy_type: BehaviorMode,
    pub attack_timer: f32,
    pub visible: bool,
    pub destroyed: bool,
    pub bullets: Vec<ProjectileRecord>,
}

impl Serializable for Enemy {
    type Record = EnemyRecord;

    fn encode(&self) -> EnemyRecord {
        EnemyRecord {
            pos: self.position.to_array(),
            size: self.size.to_array(),
            vel: self.velocity.to_array(),
            acc: self.acceleration.to_array(),
            max_hp: self.max_health,
            hp: self.health,
            dmg: self.damage,
            attk_spd: self.attack_speed,
            spd: self.speed,
            max_spd: self.max_speed,
            crit_rate: self.crit_rate,
            crit_dmg: self.crit_damage,
            enemy_type: self.behavior,
            attack_timer: self.attack_timer,
            visible: self.visible,
            destroyed: self.destroyed,
            bullets: self.projectiles.iter().map(|e| e.encode()).collect(),
        }
    }

    fn decode(r: EnemyRecord) -> SaveResult<Self> {
        let max_health = non_negative("enemy.max_hp", r.max_hp)?;
        let health = finite("enemy.hp", r.hp)?;
        if health > max_health {
            return Err(SaveError::InvalidRecord {
                field: "enemy.hp",
                reason: format!("{} exceeds max_hp {}", health, max_health),
            });
        }
        let projectiles = r
            .bullets
            .into_iter()
            .map(Projectile::decode)
            .collect::<SaveResult<Vec<_>>>()?;

        Ok(Self {
            position: finite_vec("enemy.pos", r.pos)?,
            size: finite_vec("enemy.size", r.size)?,
            velocity: finite_vec("enemy.vel", r.vel)?,
            acceleration: finite_vec("enemy.acc", r.acc)?,
            max_health,
            health,
            damage: finite("enemy.dmg", r.dmg)?,
            attack_speed: finite("enemy.attk_spd", r.attk_spd)?,
            speed: finite("enemy.spd", r.spd)?,
            max_speed: non_negative("enemy.max_spd", r.max_spd)?,
            crit_rate: finite("enemy.crit_rate", r.crit_rate)?,
            crit_damage: finite("enemy.crit_dmg", r.crit_dmg)?,
            behavior: r.enemy_type,
            attack_timer: finite("enemy.attack_timer", r.attack_timer)?,
            visible: r.visible,
            destroyed: r.destroyed || health <= 0.0,
            projectiles,
        })
    }
}

// ── Enemy spawner ────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnemySpawnerRecord {
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub max_enemies: usize,
    pub spawned_enemies: Vec<EnemyRecord>,
}

impl Serializable for EnemySpawner {
    type Record = EnemySpawnerRecord;

    fn encode(&self) -> EnemySpawnerRecord {
        EnemySpawnerRecord {
            spawn_timer: self.spawn_timer,
            spawn_interval: self.spawn_interval,
            max_enemies: self.max_enemies,
            spawned_enemies: self.enemies.iter().map(|e| e.encode()).collect(),
        }
    }

    fn decode(r: EnemySpawnerRecord) -> SaveResult<Self> {
        let enemies = r
            .spawned_enemies
            .into_iter()
            .map(Enemy::decode)
            .collect::<SaveResult<Vec<_>>>()?;
        Ok(Self {
            spawn_timer: non_negative("spawners.spawn_timer", r.spawn_timer)?,
            spawn_interval: non_negative("spawners.spawn_interval", r.spawn_interval)?,
            max_enemies: r.max_enemies,
            enemies,
        })
    }
}

// ── Pickups ──────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PickupRecord {
    pub pos: [f32; 2],
    pub size: [f32; 2],
    pub heal_percent: f32,
    pub destroyed: bool,
}

impl Serializable for Pickup {
    type Record = PickupRecord;

    fn encode(&self) -> PickupRecord {
        PickupRecord {
            pos: self.position.to_array(),
            size: self.size.to_array(),
            heal_percent: self.heal_fraction,
            destroyed: self.destroyed,
        }
    }

    fn decode(r: PickupRecord) -> SaveResult<Self> {
        Ok(Self {
            position: finite_vec("item.pos", r.pos)?,
            size: finite_vec("item.size", r.size)?,
            heal_fraction: non_negative("item.heal_percent", r.heal_percent)?,
            destroyed: r.destroyed,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemSpawnerRecord {
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub max_item: usize,
    pub spawned_items: Vec<PickupRecord>,
}

impl Serializable for ItemSpawner {
    type Record = ItemSpawnerRecord;

    fn encode(&self) -> ItemSpawnerRecord {
        ItemSpawnerRecord {
            spawn_timer: self.spawn_timer,
            spawn_interval: self.spawn_interval,
            max_item: self.max_items,
            spawned_items: self.items.iter().map(|e| e.encode()).collect(),
        }
    }

    fn decode(r: ItemSpawnerRecord) -> SaveResult<Self> {
        let items = r
            .spawned_items
            .into_iter()
            .map(Pickup::decode)
            .collect::<SaveResult<Vec<_>>>()?;
        Ok(Self {
            spawn_timer: non_negative("items.spawn_timer", r.spawn_timer)?,
            spawn_interval: non_negative("items.spawn_interval", r.spawn_interval)?,
            max_items: r.max_item,
            items,
        })
    }
}

// ── Shooter ──────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShooterRecord {
    pub max_ammo: u32,
    pub num_of_bullets: u32,
    pub dmg: f32,
    pub attk_spd: f32,
    pub reload_spd: f32,
    pub crit_rate: f32,
    pub crit_dmg: f32,
    pub wallet: u32,
    pub mny_bnty: u32,
    pub cooldown: f32,
    pub reload_remaining: Option<f32>,
}

impl Serializable for Shooter {
    type Record = ShooterRecord;

    fn encode(&self) -> ShooterRecord {
        ShooterRecord {
            max_ammo: self.max_ammo,
            num_of_bullets: self.ammo,
            dmg: self.damage,
            attk_spd: self.attack_speed,
            reload_spd: self.reload_speed,
            crit_rate: self.crit_rate,
            crit_dmg: self.crit_damage,
            wallet: self.wallet,
            mny_bnty: self.bounty,
            cooldown: self.cooldown,
            reload_remaining: self.reload_remaining,
        }
    }

    fn decode(r: ShooterRecord) -> SaveResult<Self> {
        if r.num_of_bullets > r.max_ammo {
            return Err(SaveError::InvalidRecord {
                field: "player.num_of_bullets",
                reason: format!("{} exceeds max_ammo {}", r.num_of_bullets, r.max_ammo),
            });
        }
        let attack_speed = non_negative("player.attk_spd", r.attk_spd)?;
        let reload_speed = non_negative("player.reload_spd", r.reload_spd)?;
        let reload_remaining = r
            .reload_remaining
            .map(|t| non_negative("player.reload_remaining", t))
            .transpose()?;
        Ok(Self {
            max_ammo: r.max_ammo,
            ammo: r.num_of_bullets,
            damage: finite("player.dmg", r.dmg)?,
            attack_speed,
            reload_speed,
            crit_rate: finite("player.crit_rate", r.crit_rate)?.clamp(0.0, 1.0),
            crit_damage: finite("player.crit_dmg", r.crit_dmg)?,
            wallet: r.wallet,
            bounty: r.mny_bnty,
            cooldown: non_negative("player.cooldown", r.cooldown)?,
            reload_remaining,
        })
    }
}

// ── Package & difficulty ─────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageRecord {
    pub max_hp: f32,
    pub hp: f32,
    pub armor: f32,
}

impl PackageRecord {
    /// Restore onto a package freshly placed in `arena`.
    fn restore(self, arena: &Arena) -> SaveResult<Package> {
        let mut package = Package::new(arena);
        package.max_health = non_negative("package.max_hp", self.max_hp)?;
        package.health = non_negative("package.hp", self.hp)?;
        if package.health > package.max_health {
            return Err(SaveError::InvalidRecord {
                field: "package.hp",
                reason: format!("{} exceeds max_hp {}", package.health, package.max_health),
            });
        }
        package.armor = finite("package.armor", self.armor)?;
        Ok(package)
    }
}

impl From<&Package> for PackageRecord {
    fn from(p: &Package) -> Self {
        Self {
            max_hp: p.max_health,
            hp: p.health,
            armor: p.armor,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DifficultyRecord {
    pub elapsed_time: f64,
    pub level: u32,
    pub interval: f32,
    pub scale: f32,
}

impl Serializable for DifficultyModel {
    type Record = DifficultyRecord;

    fn encode(&self) -> DifficultyRecord {
        DifficultyRecord {
            elapsed_time: self.elapsed_time,
            level: self.level,
            interval: self.interval,
            scale: self.scale,
        }
    }

    fn decode(r: DifficultyRecord) -> SaveResult<Self> {
        let interval = finite("difficulty.interval", r.interval)?;
        if interval < MIN_INTERVAL {
            return Err(SaveError::InvalidRecord {
                field: "difficulty.interval",
                reason: format!("must be at least {} ({})", MIN_INTERVAL, interval),
            });
        }
        let scale = finite("difficulty.scale", r.scale)?;
        if scale <= 1.0 {
            return Err(SaveError::InvalidRecord {
                field: "difficulty.scale",
                reason: format!("must be greater than 1 ({})", scale),
            });
        }
        if !(r.elapsed_time.is_finite() && r.elapsed_time >= 0.0) {
            return Err(SaveError::InvalidRecord {
                field: "difficulty.elapsed_time",
                reason: format!("must be a non-negative number ({})", r.elapsed_time),
            });
        }
        Ok(Self {
            elapsed_time: r.elapsed_time,
            level: r.level,
            interval,
            scale,
        })
    }
}

// ── Whole session ────────────────────────────────────────────────────────────

/// Top-level save file.  `player`, `spawners` and `items` are required; the
/// rest fall back to fresh values when absent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SaveRecord {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub player: Option<ShooterRecord>,
    #[serde(default)]
    pub spawners: Option<EnemySpawnerRecord>,
    #[serde(default)]
    pub items: Option<ItemSpawnerRecord>,
    #[serde(default)]
    pub package: Option<PackageRecord>,
    #[serde(default)]
    pub difficulty: Option<DifficultyRecord>,
    #[serde(default)]
    pub upgrade_costs: Vec<(StatKey, u32)>,
    #[serde(default)]
    pub session_time: f32,
}

impl SaveRecord {
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            player: Some(state.shooter.encode()),
            spawners: Some(state.enemies.encode()),
            items: Some(state.items.encode()),
            package: Some(PackageRecord::from(&state.package)),
            difficulty: Some(state.difficulty.encode()),
            upgrade_costs: state
                .shop
                .entries()
                .iter()
                .map(|e| (e.stat, e.cost))
                .collect(),
            session_time: state.session_time,
        }
    }

    /// Rebuild a playable session in `arena`.  Sections the record omits are
    /// taken from a fresh session built from `config`.
    pub fn restore(self, config: &GameConfig, arena: &Arena) -> SaveResult<GameState> {
        let player = self.player.ok_or(SaveError::MissingField("player"))?;
        let spawners = self.spawners.ok_or(SaveError::MissingField("spawners"))?;
        let items = self.items.ok_or(SaveError::MissingField("items"))?;

        let fresh = crate::compute::init_state(config, arena);
        let package = match self.package {
            Some(p) => p.restore(arena)?,
            None => fresh.package,
        };
        let difficulty = match self.difficulty {
            Some(d) => DifficultyModel::decode(d)?,
            None => fresh.difficulty,
        };
        let mut shop = UpgradeShop::default();
        for (stat, cost) in self.upgrade_costs {
            shop.set_cost(stat, cost);
        }

        Ok(GameState {
            package,
            shooter: Shooter::decode(player)?,
            enemies: EnemySpawner::decode(spawners)?,
            items: ItemSpawner::decode(items)?,
            difficulty,
            shop,
            status: GameStatus::Playing,
            frame: 0,
            session_time: non_negative("session_time", self.session_time)?,
        })
    }

    pub fn to_ron(&self) -> SaveResult<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn from_ron(text: &str) -> SaveResult<Self> {
        Ok(ron::from_str(text)?)
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

/// Transform applied to the serialized bytes on their way to and from disk.
pub trait SaveCipher {
    fn seal(&self, plain: &[u8]) -> Vec<u8>;
    fn open(&self, sealed: &[u8]) -> SaveResult<Vec<u8>>;
}

/// Stores the RON text as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl SaveCipher for PlainText {
    fn seal(&self, plain: &[u8]) -> Vec<u8> {
        plain.to_vec()
    }

    fn open(&self, sealed: &[u8]) -> SaveResult<Vec<u8>> {
        Ok(sealed.to_vec())
    }
}

pub fn save_game(path: &Path, state: &GameState, cipher: &impl SaveCipher) -> SaveResult<()> {
    let text = SaveRecord::capture(state).to_ron()?;
    std::fs::write(path, cipher.seal(text.as_bytes()))?;
    log::info!("game saved to {:?}", path);
    Ok(())
}

/// Read, open and validate the save at `path`.  Any failure leaves the
/// caller free to start a fresh session instead.
pub fn load_save_data(path: &Path, cipher: &impl SaveCipher) -> SaveResult<SaveRecord> {
    if !path.exists() {
        return Err(SaveError::NotFound(path.to_path_buf()));
    }
    let sealed = std::fs::read(path)?;
    let plain = cipher.open(&sealed)?;
    let text = String::from_utf8(plain).map_err(|e| SaveError::Decrypt(e.to_string()))?;
    let record = SaveRecord::from_ron(&text)?;
    if record.player.is_none() {
        return Err(SaveError::MissingField("player"));
    }
    Ok(record)
}

/// Load and restore a full session from `path`.
pub fn load_game(
    path: &Path,
    cipher: &impl SaveCipher,
    config: &GameConfig,
    arena: &Arena,
) -> SaveResult<GameState> {
    let state = load_save_data(path, cipher)?.restore(config, arena)?;
    log::info!(
        "loaded save from {:?}: {} enemies, {} items",
        path,
        state.enemies.enemies.len(),
        state.items.items.len()
    );
    Ok(state)
}
