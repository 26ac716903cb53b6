use quick_draw::difficulty::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn starts_at_level_zero() {
    let d = DifficultyModel::default();
    assert_eq!(d.level, 0);
    assert_eq!(d.interval, 300.0);
    assert_eq!(d.scale, 1.1);
    assert_eq!(d.current_multiplier(), 1.0);
}

#[test]
fn level_rises_on_interval_boundary() {
    let mut d = DifficultyModel::new(10.0, 2.0);
    assert_eq!(d.advance(9.5), 0);
    assert_eq!(d.level, 0);
    assert_eq!(d.advance(0.5), 1);
    assert_eq!(d.level, 1);
    assert_eq!(d.elapsed_time, 0.0);
    assert_eq!(d.current_multiplier(), 2.0);
}

#[test]
fn one_long_frame_counts_every_interval() {
    let mut d = DifficultyModel::new(10.0, 2.0);
    assert_eq!(d.advance(35.0), 3);
    assert_eq!(d.level, 3);
    assert_eq!(d.elapsed_time, 5.0);
    assert_eq!(d.current_multiplier(), 8.0);
}

#[test]
fn zero_dt_changes_nothing() {
    let mut d = DifficultyModel::default();
    assert_eq!(d.advance(0.0), 0);
    assert_eq!(d, DifficultyModel::default());
}

#[test]
fn chunking_does_not_change_the_level() {
    let chunks = [100.0, 250.0, 0.0, 310.0, 240.0];
    let mut split = DifficultyModel::default();
    for dt in chunks {
        split.advance(dt);
    }
    let mut whole = DifficultyModel::default();
    whole.advance(chunks.iter().sum());

    // 900 / 300
    assert_eq!(split.level, 3);
    assert_eq!(whole.level, 3);
    assert_eq!(split.current_multiplier(), 1.1f32.powi(3));
}

#[test]
fn random_chunks_match_floor_of_total() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let mut d = DifficultyModel::new(4.0, 1.5);
        let mut total = 0.0f64;
        for _ in 0..rng.gen_range(1..40) {
            // Quarter-second steps keep the sums exact.
            let dt = rng.gen_range(0..8) as f32 * 0.25;
            total += dt as f64;
            d.advance(dt);
        }
        let expected = (total / 4.0).floor() as u32;
        assert_eq!(d.level, expected);
        assert_eq!(d.current_multiplier(), 1.5f32.powi(expected as i32));
        assert!(d.elapsed_time < d.interval as f64);
    }
}

#[test]
fn sixty_hertz_frames_level_up_on_time() {
    let mut d = DifficultyModel::default();
    let mut first_level = None;
    for frame in 1..=40_000u32 {
        if d.advance(1.0 / 60.0) > 0 && first_level.is_none() {
            first_level = Some(frame);
        }
    }
    let frame = first_level.expect("levelled within 40 000 frames");
    assert!((17_999..=18_001).contains(&frame), "first level at frame {}", frame);
}

#[test]
fn three_hours_of_frames_reach_the_exact_level() {
    let mut d = DifficultyModel::default();
    for _ in 0..(3 * 60 * 60 * 60) {
        d.advance(1.0 / 60.0);
    }
    // 10 800 s / 300 s
    assert_eq!(d.level, 36);
}

#[test]
fn tiny_interval_saturates_instead_of_spinning() {
    let mut d = DifficultyModel::new(1e-12, 1.1);
    d.advance(1.0 / 60.0);
    assert_eq!(d.level, u32::MAX);
    assert_eq!(d.advance(1.0 / 60.0), 0);
    assert_eq!(d.level, u32::MAX);
    assert!(d.current_multiplier().is_infinite());
}

#[test]
fn many_intervals_in_one_step_are_counted_at_once() {
    let mut d = DifficultyModel::new(MIN_INTERVAL, 2.0);
    assert_eq!(d.advance(1_000_000.5), 1_000_000);
    assert_eq!(d.level, 1_000_000);
    assert!((d.elapsed_time - 0.5).abs() < 1e-6);
}
