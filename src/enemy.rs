//! Enemy actor: stats, behaviour state machine and kinematics.
//!
//! Every frame an enemy picks an acceleration from its behaviour, then runs a
//! single integration step (`velocity += acc·dt`, clamp to max speed,
//! `position += velocity·dt`, acceleration cleared).  Until its bounding box
//! is fully inside the arena it is hidden and simply homes on the package.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entities::{Arena, Package, Rect};
use crate::projectile::Projectile;

pub const ENEMY_SIZE: Vec2 = Vec2::new(50.0, 50.0);
pub const BASE_HEALTH: f32 = 100.0;
pub const BASE_DAMAGE: f32 = 1.0;
pub const BASE_ATTACK_SPEED: f32 = 1.0;
pub const BASE_SPEED: f32 = 50.0;
pub const BASE_CRIT_RATE: f32 = 1.0;
pub const BASE_CRIT_DAMAGE: f32 = 1.0;

/// Distance a ranged enemy tries to hold from the package centre.
pub const STANDOFF_RADIUS: f32 = 250.0;
/// Half-width of the band around `STANDOFF_RADIUS` where it stops and fires.
pub const STANDOFF_TOLERANCE: f32 = 10.0;

/// Below this distance to the package a hidden enemy stops steering.
const ARRIVAL_EPSILON: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorMode {
    Melee,
    Ranged,
    Idle,
}

/// What an enemy did to the package this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyAction {
    /// Melee hit already applied to the package.
    Struck { damage: f32 },
    /// A projectile was appended to the enemy's own list.
    Fired { origin: Vec2 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Centre of the bounding box.
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub max_health: f32,
    pub health: f32,
    pub damage: f32,
    pub attack_speed: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub crit_rate: f32,
    pub crit_damage: f32,
    pub behavior: BehaviorMode,
    pub attack_timer: f32,
    pub visible: bool,
    pub destroyed: bool,
    pub projectiles: Vec<Projectile>,
}

impl Enemy {
    /// A hidden, level-0 enemy centred on `position`.
    pub fn new(position: Vec2, behavior: BehaviorMode) -> Self {
        Self {
            position,
            size: ENEMY_SIZE,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            max_health: BASE_HEALTH,
            health: BASE_HEALTH,
            damage: BASE_DAMAGE,
            attack_speed: BASE_ATTACK_SPEED,
            speed: BASE_SPEED,
            max_speed: BASE_SPEED,
            crit_rate: BASE_CRIT_RATE,
            crit_damage: BASE_CRIT_DAMAGE,
            behavior,
            attack_timer: 0.0,
            visible: false,
            destroyed: false,
            projectiles: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, self.size)
    }

    /// Scale a freshly spawned enemy by the current difficulty multiplier.
    /// Max health is truncated to whole points and health refilled.
    pub fn apply_difficulty(&mut self, multiplier: f32) {
        self.max_health = (self.max_health * multiplier).trunc();
        self.health = self.max_health.max(0.0);
        self.damage *= multiplier;
        self.attack_speed *= multiplier;
        self.speed *= multiplier;
        self.max_speed = self.speed;
        self.crit_rate *= multiplier;
        self.crit_damage *= multiplier;
    }

    /// Seconds between attacks.
    pub fn attack_interval(&self) -> f32 {
        1.0 / self.attack_speed
    }

    /// Run one frame of AI and movement against `package`.
    ///
    /// Melee damage is applied to the package here; projectiles are only
    /// spawned and must be advanced and resolved by the caller.
    pub fn update(&mut self, package: &mut Package, dt: f32, arena: &Arena) -> Option<EnemyAction> {
        self.attack_timer += dt;

        let action = if self.visible {
            match self.behavior {
                BehaviorMode::Melee => self.behave_melee(package),
                BehaviorMode::Ranged => self.behave_ranged(package),
                BehaviorMode::Idle => None,
            }
        } else {
            self.approach(package.position);
            if arena.contains_rect(&self.bounds()) {
                self.visible = true;
            }
            None
        };

        self.integrate(dt);
        action
    }

    fn approach(&mut self, target: Vec2) {
        let offset = target - self.position;
        if offset.length() > ARRIVAL_EPSILON {
            self.acceleration = offset.normalize() * self.max_speed;
        }
    }

    fn retreat(&mut self, target: Vec2) {
        self.acceleration = -(target - self.position).normalize_or_zero() * self.max_speed;
    }

    fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }

    fn attack_ready(&self) -> bool {
        self.attack_timer >= self.attack_interval()
    }

    fn behave_melee(&mut self, package: &mut Package) -> Option<EnemyAction> {
        if !self.bounds().intersects(&package.bounds()) {
            self.approach(package.position);
            return None;
        }

        self.halt();
        if !self.attack_ready() {
            return None;
        }
        package.take_damage(self.damage);
        self.attack_timer = 0.0;
        Some(EnemyAction::Struck { damage: self.damage })
    }

    fn behave_ranged(&mut self, package: &Package) -> Option<EnemyAction> {
        let target = package.position;
        let distance = self.position.distance(target);

        if distance > STANDOFF_RADIUS + STANDOFF_TOLERANCE {
            self.approach(target);
            return None;
        }
        if distance < STANDOFF_RADIUS - STANDOFF_TOLERANCE {
            self.retreat(target);
            return None;
        }

        self.halt();
        if !self.attack_ready() {
            return None;
        }
        self.projectiles
            .push(Projectile::new(self.position, target, self.damage));
        self.attack_timer = 0.0;
        Some(EnemyAction::Fired { origin: self.position })
    }

    /// Single impulse-model integration step.
    fn integrate(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
        self.velocity = self.velocity.clamp_length_max(self.max_speed);
        self.position += self.velocity * dt;
        self.acceleration = Vec2::ZERO;
    }

    pub fn advance_projectiles(&mut self, dt: f32) {
        for projectile in &mut self.projectiles {
            projectile.advance(dt);
        }
    }

    /// Drop every projectile that reached `package`, applying its damage.
    /// Returns the damage of each hit in firing order.
    pub fn resolve_projectile_hits(&mut self, package: &mut Package) -> Vec<f32> {
        let center = package.position;
        let mut hits = Vec::new();
        self.projectiles.retain(|p| {
            if p.hits(center) {
                hits.push(p.damage);
                false
            } else {
                true
            }
        });
        for &damage in &hits {
            package.take_damage(damage);
        }
        hits
    }

    /// Subtract `amount` from health and mark destroyed once it reaches zero.
    /// Callers skip enemies that are already destroyed.
    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
        if self.health <= 0.0 {
            self.destroyed = true;
        }
    }
}
