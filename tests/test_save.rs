use quick_draw::compute::*;
use quick_draw::config::GameConfig;
use quick_draw::enemy::*;
use quick_draw::entities::*;
use quick_draw::error::{SaveError, SaveResult};
use quick_draw::items::Pickup;
use quick_draw::projectile::Projectile;
use quick_draw::save::*;
use quick_draw::shooter::Shooter;
use quick_draw::upgrade::StatKey;

use glam::Vec2;
use std::path::PathBuf;

fn arena() -> Arena {
    Arena::new(0.0, 0.0, 1200.0, 700.0)
}

/// Unique per test so parallel runs never share a file.
fn temp_save(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "quick_draw_{}_{}.ron",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn armed_enemy() -> Enemy {
    let mut e = Enemy::new(Vec2::new(320.5, 210.25), BehaviorMode::Ranged);
    e.visible = true;
    e.health = 42.0;
    e.velocity = Vec2::new(-3.0, 4.0);
    e.attack_timer = 0.4;
    e.projectiles.push(Projectile::new(e.position, Vec2::new(600.0, 350.0), 2.5));
    e.projectiles.push(Projectile::new(e.position, Vec2::ZERO, 1.0));
    e
}

/// XOR every byte; stands in for a real cipher.
struct Xor(u8);

impl SaveCipher for Xor {
    fn seal(&self, plain: &[u8]) -> Vec<u8> {
        plain.iter().map(|b| b ^ self.0).collect()
    }

    fn open(&self, sealed: &[u8]) -> SaveResult<Vec<u8>> {
        Ok(self.seal(sealed))
    }
}

// ── Entity records ────────────────────────────────────────────────────────────

#[test]
fn enemy_round_trips_with_projectiles() {
    let enemy = armed_enemy();
    let back = Enemy::decode(enemy.encode()).expect("valid record");

    assert_eq!(back.position, enemy.position);
    assert_eq!(back.health, enemy.health);
    assert_eq!(back.behavior, BehaviorMode::Ranged);
    assert_eq!(back.projectiles.len(), 2);
    for (a, b) in back.projectiles.iter().zip(&enemy.projectiles) {
        assert_eq!(a.damage, b.damage);
        assert_eq!(a.velocity, b.velocity);
    }
    assert_eq!(back, enemy);
}

#[test]
fn enemy_record_survives_ron_text() {
    let enemy = armed_enemy();
    let text = ron::to_string(&enemy.encode()).expect("encodes");
    let record: EnemyRecord = ron::from_str(&text).expect("parses");
    assert_eq!(Enemy::decode(record).expect("valid"), enemy);
}

#[test]
fn enemy_with_health_above_max_is_rejected() {
    let mut record = armed_enemy().encode();
    record.hp = 500.0;
    assert!(matches!(
        Enemy::decode(record),
        Err(SaveError::InvalidRecord { field: "enemy.hp", .. })
    ));
}

#[test]
fn non_finite_projectile_is_rejected() {
    let mut record = armed_enemy().encode();
    record.bullets[0].vel = [f32::NAN, 0.0];
    assert!(matches!(
        Enemy::decode(record),
        Err(SaveError::InvalidRecord { field: "projectile.vel", .. })
    ));
}

#[test]
fn dead_enemy_decodes_as_destroyed() {
    let mut record = armed_enemy().encode();
    record.hp = 0.0;
    record.destroyed = false;
    assert!(Enemy::decode(record).expect("valid").destroyed);
}

#[test]
fn shooter_round_trips_mid_reload() {
    let mut shooter = Shooter::default();
    shooter.ammo = 0;
    shooter.wallet = 70;
    shooter.reload_remaining = Some(0.4);
    assert_eq!(Shooter::decode(shooter.encode()).expect("valid"), shooter);
}

#[test]
fn shooter_with_more_rounds_than_capacity_is_rejected() {
    let mut record = Shooter::default().encode();
    record.num_of_bullets = 9;
    assert!(matches!(
        Shooter::decode(record),
        Err(SaveError::InvalidRecord { field: "player.num_of_bullets", .. })
    ));
}

#[test]
fn pickup_round_trips() {
    let mut item = Pickup::new(Vec2::new(60.0, 70.0));
    item.destroyed = true;
    assert_eq!(Pickup::decode(item.encode()).expect("valid"), item);
}

// ── Whole session ─────────────────────────────────────────────────────────────

fn busy_state() -> GameState {
    let config = GameConfig::default();
    let mut state = init_state(&config, &arena());
    state.enemies.enemies.push(armed_enemy());
    state.enemies.spawn_timer = 1.5;
    state.items.items.push(Pickup::new(Vec2::new(40.0, 40.0)));
    state.package.health = 64.0;
    state.shooter.wallet = 30;
    state.difficulty.level = 2;
    state.difficulty.elapsed_time = 12.0;
    state.session_time = 612.0;
    state.shooter.wallet -= 10;
    state.shop.set_cost(StatKey::Damage, 20);
    state
}

#[test]
fn session_round_trips_through_disk() {
    let path = temp_save("round_trip");
    let state = busy_state();
    save_game(&path, &state, &PlainText).expect("saves");

    let loaded = load_game(&path, &PlainText, &GameConfig::default(), &arena()).expect("loads");
    assert_eq!(loaded.shooter, state.shooter);
    assert_eq!(loaded.enemies, state.enemies);
    assert_eq!(loaded.items, state.items);
    assert_eq!(loaded.package, state.package);
    assert_eq!(loaded.difficulty, state.difficulty);
    assert_eq!(loaded.session_time, 612.0);
    assert_eq!(loaded.shop.cost_of(StatKey::Damage), Some(20));
    assert_eq!(loaded.status, GameStatus::Playing);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn cipher_is_applied_both_ways() {
    let path = temp_save("cipher");
    let state = busy_state();
    save_game(&path, &state, &Xor(0x5a)).expect("saves");

    let raw = std::fs::read(&path).expect("file written");
    assert!(ron::from_str::<SaveRecord>(&String::from_utf8_lossy(&raw)).is_err());

    let loaded = load_game(&path, &Xor(0x5a), &GameConfig::default(), &arena()).expect("loads");
    assert_eq!(loaded.enemies, state.enemies);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_is_not_found() {
    let path = temp_save("absent");
    assert!(matches!(
        load_save_data(&path, &PlainText),
        Err(SaveError::NotFound(p)) if p == path
    ));
}

#[test]
fn save_without_player_is_rejected() {
    let path = temp_save("no_player");
    std::fs::write(&path, "(version: 1)").expect("write");
    assert!(matches!(
        load_save_data(&path, &PlainText),
        Err(SaveError::MissingField("player"))
    ));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn garbage_is_a_parse_error() {
    let path = temp_save("garbage");
    std::fs::write(&path, "this is not ron {").expect("write");
    assert!(matches!(
        load_save_data(&path, &PlainText),
        Err(SaveError::Parse(_))
    ));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn restore_requires_spawner_sections() {
    let mut record = SaveRecord::capture(&busy_state());
    record.spawners = None;
    assert!(matches!(
        record.restore(&GameConfig::default(), &arena()),
        Err(SaveError::MissingField("spawners"))
    ));

    let mut record = SaveRecord::capture(&busy_state());
    record.items = None;
    assert!(matches!(
        record.restore(&GameConfig::default(), &arena()),
        Err(SaveError::MissingField("items"))
    ));
}

#[test]
fn optional_sections_fall_back_to_fresh_values() {
    let mut record = SaveRecord::capture(&busy_state());
    record.package = None;
    record.difficulty = None;
    record.upgrade_costs.clear();

    let state = record
        .restore(&GameConfig::default(), &arena())
        .expect("restores");
    assert_eq!(state.package, Package::new(&arena()));
    assert_eq!(state.difficulty.level, 0);
    assert_eq!(state.shop.cost_of(StatKey::Damage), Some(10));
}

#[test]
fn capture_survives_ron_text() {
    let record = SaveRecord::capture(&busy_state());
    let text = record.to_ron().expect("encodes");
    assert!(text.contains("num_of_bullets"));
    assert!(text.contains("spawned_enemies"));
    assert_eq!(SaveRecord::from_ron(&text).expect("parses"), record);
}

// ── Session sections ──────────────────────────────────────────────────────────

fn restore_with(edit: impl FnOnce(&mut SaveRecord)) -> SaveResult<GameState> {
    let mut record = SaveRecord::capture(&busy_state());
    edit(&mut record);
    record.restore(&GameConfig::default(), &arena())
}

#[test]
fn difficulty_scale_must_exceed_one() {
    let result = restore_with(|r| {
        if let Some(d) = r.difficulty.as_mut() {
            d.scale = 0.5;
        }
    });
    assert!(matches!(
        result,
        Err(SaveError::InvalidRecord { field: "difficulty.scale", .. })
    ));
}

#[test]
fn difficulty_interval_below_minimum_is_rejected() {
    let result = restore_with(|r| {
        if let Some(d) = r.difficulty.as_mut() {
            d.interval = 1e-12;
        }
    });
    assert!(matches!(
        result,
        Err(SaveError::InvalidRecord { field: "difficulty.interval", .. })
    ));
}

#[test]
fn package_with_health_above_max_is_rejected() {
    let result = restore_with(|r| {
        if let Some(p) = r.package.as_mut() {
            p.hp = 150.0;
        }
    });
    assert!(matches!(
        result,
        Err(SaveError::InvalidRecord { field: "package.hp", .. })
    ));
}

#[test]
fn package_at_full_health_restores() {
    let state = restore_with(|r| {
        if let Some(p) = r.package.as_mut() {
            p.hp = p.max_hp;
        }
    })
    .expect("restores");
    assert_eq!(state.package.health, state.package.max_health);
}
