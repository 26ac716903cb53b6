//! Straight-line enemy projectile.

use glam::Vec2;

pub const PROJECTILE_SPEED: f32 = 400.0;
pub const PROJECTILE_RADIUS: f32 = 4.0;
/// Slack added to the radius when testing against the package centre.
pub const HIT_TOLERANCE: f32 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub radius: f32,
}

impl Projectile {
    /// Launch from `origin` toward the point `aim` as seen right now.  The
    /// heading is fixed at creation; projectiles do not home.
    pub fn new(origin: Vec2, aim: Vec2, damage: f32) -> Self {
        Self {
            position: origin,
            velocity: (aim - origin).normalize_or_zero() * PROJECTILE_SPEED,
            damage,
            radius: PROJECTILE_RADIUS,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn hits(&self, target_center: Vec2) -> bool {
        self.position.distance(target_center) < self.radius + HIT_TOLERANCE
    }
}
