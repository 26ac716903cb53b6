use quick_draw::context::*;
use quick_draw::enemy::BehaviorMode;
use quick_draw::entities::*;
use quick_draw::items::*;
use quick_draw::spawner::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn arena() -> Arena {
    Arena::new(0.0, 0.0, 1200.0, 700.0)
}

fn seeded_ctx() -> SimContext {
    SimContext::new(arena(), 42)
}

// ── Spawn placement ───────────────────────────────────────────────────────────

#[test]
fn edge_spawns_sit_one_margin_outside() {
    let mut rng = StdRng::seed_from_u64(42);
    let a = arena();
    for _ in 0..50 {
        let top = spawn_point_on(SpawnSide::Top, &a, SPAWN_MARGIN, &mut rng);
        assert_eq!(top.y, -200.0);
        assert!(top.x >= 0.0 && top.x <= 1200.0);

        let bottom = spawn_point_on(SpawnSide::Bottom, &a, SPAWN_MARGIN, &mut rng);
        assert_eq!(bottom.y, 900.0);

        let left = spawn_point_on(SpawnSide::Left, &a, SPAWN_MARGIN, &mut rng);
        assert_eq!(left.x, -200.0);
        assert!(left.y >= 0.0 && left.y <= 700.0);

        let right = spawn_point_on(SpawnSide::Right, &a, SPAWN_MARGIN, &mut rng);
        assert_eq!(right.x, 1400.0);
    }
}

#[test]
fn inside_spawns_stay_in_the_arena() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let p = spawn_point_on(SpawnSide::Inside, &arena(), SPAWN_MARGIN, &mut rng);
        assert!(p.x >= 0.0 && p.x <= 1200.0);
        assert!(p.y >= 0.0 && p.y <= 700.0);
    }
}

#[test]
fn random_spawn_points_stay_within_margin_box() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let p = random_spawn_point(&arena(), SPAWN_MARGIN, &mut rng);
        assert!(p.x >= -200.0 && p.x <= 1400.0);
        assert!(p.y >= -200.0 && p.y <= 900.0);
    }
}

// ── Enemy spawner ─────────────────────────────────────────────────────────────

#[test]
fn spawns_when_timer_reaches_interval() {
    let mut ctx = seeded_ctx();
    let mut s = EnemySpawner::default();

    assert!(!s.advance(4.0, 1.0, &mut ctx));
    assert!(s.enemies.is_empty());
    assert!(s.advance(1.0, 1.0, &mut ctx));
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.spawn_timer, 0.0);

    let e = &s.enemies[0];
    assert!(!e.visible);
    assert!(matches!(e.behavior, BehaviorMode::Melee | BehaviorMode::Ranged));
    assert!(matches!(ctx.events(), [SimEvent::EnemySpawned { .. }]));
}

#[test]
fn never_exceeds_capacity() {
    let mut ctx = seeded_ctx();
    let mut s = EnemySpawner::new(0.0, 3);
    for _ in 0..20 {
        s.advance(0.1, 1.0, &mut ctx);
        assert!(s.enemies.len() <= s.max_enemies);
    }
    assert_eq!(s.enemies.len(), 3);
    assert_eq!(s.live_count(), 3);
}

#[test]
fn timer_resets_even_when_full() {
    let mut ctx = seeded_ctx();
    let mut s = EnemySpawner::new(5.0, 0);
    assert!(!s.advance(5.0, 1.0, &mut ctx));
    assert_eq!(s.spawn_timer, 0.0);
    assert!(ctx.events().is_empty());
}

#[test]
fn multiplier_compounds_every_call() {
    let mut ctx = seeded_ctx();
    let mut s = EnemySpawner::new(8.0, 10);
    s.advance(0.0, 2.0, &mut ctx);
    assert_eq!(s.spawn_interval, 4.0);
    assert_eq!(s.max_enemies, 20);
    s.advance(0.0, 2.0, &mut ctx);
    assert_eq!(s.spawn_interval, 2.0);
    assert_eq!(s.max_enemies, 40);
}

#[test]
fn spawned_enemies_carry_the_multiplier() {
    let mut ctx = seeded_ctx();
    let mut s = EnemySpawner::new(0.0, 5);
    s.advance(0.0, 1.5, &mut ctx);
    let e = &s.enemies[0];
    assert_eq!(e.max_health, 150.0);
    assert_eq!(e.health, 150.0);
    assert_eq!(e.damage, 1.5);
}

#[test]
fn culling_removes_only_destroyed() {
    let mut ctx = seeded_ctx();
    let mut s = EnemySpawner::new(0.0, 4);
    for _ in 0..4 {
        s.advance(0.0, 1.0, &mut ctx);
    }
    s.enemies[1].take_damage(1000.0);
    s.enemies[3].take_damage(1000.0);
    assert_eq!(s.live_count(), 2);
    assert_eq!(s.cull_destroyed(), 2);
    assert_eq!(s.enemies.len(), 2);
    assert!(s.enemies.iter().all(|e| !e.destroyed));
}

#[test]
fn same_seed_same_spawns() {
    let mut a = EnemySpawner::new(0.0, 5);
    let mut b = EnemySpawner::new(0.0, 5);
    let mut ctx_a = seeded_ctx();
    let mut ctx_b = seeded_ctx();
    for _ in 0..5 {
        a.advance(0.1, 1.0, &mut ctx_a);
        b.advance(0.1, 1.0, &mut ctx_b);
    }
    assert_eq!(a, b);
    assert_eq!(ctx_a.drain_events(), ctx_b.drain_events());
}

// ── Item spawner ──────────────────────────────────────────────────────────────

#[test]
fn items_spawn_inside_inset_box() {
    let mut ctx = seeded_ctx();
    let mut s = ItemSpawner::new(0.0, 50);
    for _ in 0..50 {
        assert!(s.advance(0.0, &mut ctx));
    }
    for item in &s.items {
        assert!(item.position.x >= 10.0 && item.position.x <= 1150.0);
        assert!(item.position.y >= 10.0 && item.position.y <= 650.0);
        assert!(arena().contains_rect(&item.bounds()));
        assert_eq!(item.heal_fraction, HEAL_FRACTION);
    }
}

#[test]
fn items_respect_capacity_and_cadence() {
    let mut ctx = seeded_ctx();
    let mut s = ItemSpawner::default();
    assert!(!s.advance(1.0, &mut ctx));
    assert!(s.advance(1.0, &mut ctx));
    for _ in 0..20 {
        s.advance(2.0, &mut ctx);
    }
    assert_eq!(s.items.len(), DEFAULT_MAX_ITEMS);

    s.items[0].destroyed = true;
    assert_eq!(s.cull_destroyed(), 1);
    assert!(s.advance(2.0, &mut ctx));
    assert_eq!(s.items.len(), DEFAULT_MAX_ITEMS);
}

#[test]
fn degenerate_arena_pins_items_to_the_inset() {
    let mut ctx = SimContext::new(Arena::new(0.0, 0.0, 40.0, 40.0), 1);
    let mut s = ItemSpawner::new(0.0, 1);
    assert!(s.advance(0.0, &mut ctx));
    assert_eq!(s.items[0].position.x, 10.0);
    assert_eq!(s.items[0].position.y, 10.0);
}
