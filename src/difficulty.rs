//! Time-driven difficulty curve.
//!
//! `level` rises once per `interval` seconds of play and the multiplier is
//! `scale^level`.

pub const DEFAULT_INTERVAL: f32 = 300.0;
pub const DEFAULT_SCALE: f32 = 1.1;
/// Shortest interval accepted from config files and saves.
pub const MIN_INTERVAL: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyModel {
    /// Seconds accumulated toward the next level; always below `interval`.
    /// Kept in f64 so thousands of small frame steps sum without drift.
    pub elapsed_time: f64,
    pub level: u32,
    pub interval: f32,
    pub scale: f32,
}

impl Default for DifficultyModel {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, DEFAULT_SCALE)
    }
}

impl DifficultyModel {
    pub fn new(interval: f32, scale: f32) -> Self {
        Self {
            elapsed_time: 0.0,
            level: 0,
            interval,
            scale,
        }
    }

    /// Accumulate `dt` seconds and return how many levels were gained.
    ///
    /// A long frame that spans several intervals counts each one.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed_time += dt as f64;
        let interval = self.interval as f64;
        if !(interval > 0.0) || self.elapsed_time < interval {
            return 0;
        }

        let crossed = (self.elapsed_time / interval).floor();
        self.elapsed_time = (self.elapsed_time - crossed * interval).max(0.0);
        // Float-to-int casts saturate.
        let gained = crossed as u32;
        let before = self.level;
        self.level = self.level.saturating_add(gained);
        self.level - before
    }

    pub fn current_multiplier(&self) -> f32 {
        self.scale.powi(i32::try_from(self.level).unwrap_or(i32::MAX))
    }
}
