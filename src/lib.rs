//! Quick Draw: defend the package from waves of enemies in a bounded arena.
//!
//! The library is the simulation core.  A front-end feeds [`compute::tick`] a
//! normalized input batch each frame and reads entity state and
//! [`context::SimEvent`]s back out to draw.

pub mod compute;
pub mod config;
pub mod context;
pub mod difficulty;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod items;
pub mod projectile;
pub mod save;
pub mod shooter;
pub mod spawner;
pub mod upgrade;
