//! The player's revolver: ammo, fire cooldown and reload.
//!
//! All timers count down by the frame's `dt`, so a session replays exactly
//! from the same input and seed.

use glam::Vec2;
use rand::Rng;

use crate::entities::Shot;

pub const DEFAULT_MAX_AMMO: u32 = 6;
pub const DEFAULT_DAMAGE: f32 = 10.0;
pub const DEFAULT_ATTACK_SPEED: f32 = 2.0;
pub const DEFAULT_RELOAD_SPEED: f32 = 1.0;
pub const DEFAULT_CRIT_RATE: f32 = 0.1;
pub const DEFAULT_CRIT_DAMAGE: f32 = 0.5;
pub const DEFAULT_BOUNTY: u32 = 10;
/// The trigger is locked this long at session start.
pub const INITIAL_TRIGGER_DELAY: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShooterState {
    Ready,
    CoolingDown,
    Reloading,
}

/// Why a trigger pull produced no shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireBlocked {
    Reloading,
    CoolingDown,
    /// The cylinder was empty; a reload has been started.
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shooter {
    pub max_ammo: u32,
    pub ammo: u32,
    pub damage: f32,
    pub attack_speed: f32,
    pub reload_speed: f32,
    pub crit_rate: f32,
    pub crit_damage: f32,
    pub wallet: u32,
    /// Currency paid per enemy kill.
    pub bounty: u32,
    /// Seconds until the next shot is allowed.
    pub cooldown: f32,
    /// Seconds left on the current reload, if one is running.
    pub reload_remaining: Option<f32>,
}

impl Default for Shooter {
    fn default() -> Self {
        Self {
            max_ammo: DEFAULT_MAX_AMMO,
            ammo: DEFAULT_MAX_AMMO,
            damage: DEFAULT_DAMAGE,
            attack_speed: DEFAULT_ATTACK_SPEED,
            reload_speed: DEFAULT_RELOAD_SPEED,
            crit_rate: DEFAULT_CRIT_RATE,
            crit_damage: DEFAULT_CRIT_DAMAGE,
            wallet: 0,
            bounty: DEFAULT_BOUNTY,
            cooldown: INITIAL_TRIGGER_DELAY,
            reload_remaining: None,
        }
    }
}

impl Shooter {
    pub fn state(&self) -> ShooterState {
        if self.reload_remaining.is_some() {
            ShooterState::Reloading
        } else if self.cooldown > 0.0 {
            ShooterState::CoolingDown
        } else {
            ShooterState::Ready
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_remaining.is_some()
    }

    /// Count down timers.  Returns `true` on the frame a reload completes.
    pub fn update(&mut self, dt: f32) -> bool {
        self.cooldown = (self.cooldown - dt).max(0.0);

        let Some(remaining) = self.reload_remaining else {
            return false;
        };
        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.reload_remaining = Some(remaining);
            return false;
        }
        self.ammo = self.max_ammo;
        self.reload_remaining = None;
        log::info!("reload complete ({} rounds)", self.ammo);
        true
    }

    /// Begin a reload of `1 / reload_speed` seconds.  Returns `false` when a
    /// reload is already running.
    pub fn start_reload(&mut self) -> bool {
        if self.is_reloading() {
            return false;
        }
        self.reload_remaining = Some(1.0 / self.reload_speed);
        log::info!("reloading");
        true
    }

    /// Pull the trigger at `pointer`.
    pub fn fire(&mut self, pointer: Vec2, rng: &mut impl Rng) -> Result<Shot, FireBlocked> {
        if self.is_reloading() {
            return Err(FireBlocked::Reloading);
        }
        if self.cooldown > 0.0 {
            return Err(FireBlocked::CoolingDown);
        }
        if self.ammo == 0 {
            self.start_reload();
            return Err(FireBlocked::Empty);
        }

        self.ammo -= 1;
        self.cooldown = 1.0 / self.attack_speed;

        let critical = rng.gen::<f32>() < self.crit_rate;
        let damage = if critical {
            self.damage * (1.0 + self.crit_damage)
        } else {
            self.damage
        };
        Ok(Shot {
            position: pointer,
            damage,
            critical,
        })
    }
}
