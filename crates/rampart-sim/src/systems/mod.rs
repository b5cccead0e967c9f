//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! They hold no state of their own: all state lives in components or is
//! passed in by the engine.

pub mod cleanup;
pub mod damage;
pub mod enemy;
pub mod projectile;
pub mod snapshot;
pub mod tower;
pub mod wave_spawner;
