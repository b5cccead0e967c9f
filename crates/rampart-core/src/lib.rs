//! Core types and definitions for the RAMPART tower-defense simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! geometry, components, per-kind stat profiles, commands, events,
//! state snapshots and constants. It has no dependency on the ECS or any
//! runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod profiles;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
