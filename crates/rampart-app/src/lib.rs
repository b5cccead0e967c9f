//! Headless runner for the rampart simulation.
//!
//! Wires the simulation engine to a fixed-rate game loop thread and exposes
//! scripted sessions to the `rampart` binary.

pub mod game_loop;
pub mod logging;
pub mod session;
pub mod state;

pub use rampart_core as core;
