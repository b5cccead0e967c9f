//! Simulation engine for RAMPART.
//!
//! Owns the hecs ECS world, runs systems in a fixed per-tick order,
//! dispatches game events and produces GameStateSnapshots for readers.

pub mod engine;
pub mod error;
pub mod event_bus;
pub mod levels;
pub mod systems;
pub mod targeting;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use error::{CommandError, ConfigError, PlacementError};
pub use event_bus::{EventBus, SubscriptionId};
pub use rampart_core as core;
