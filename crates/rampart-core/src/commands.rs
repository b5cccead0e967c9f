//! Player commands sent from the presentation layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Towers ---
    /// Build a tower at a position.
    PlaceTower { kind: TowerKind, x: f64, y: f64 },
    /// Upgrade a tower by one level.
    UpgradeTower { tower: EntityId },
    /// Sell a tower for a partial refund.
    SellTower { tower: EntityId },
    /// Change a tower's targeting policy.
    SetTargeting { tower: EntityId, mode: TargetingMode },

    // --- Level ---
    /// Switch to one of the predefined path layouts (clamped to 1..=3).
    SetLevel { level: u32 },

    // --- Debug ---
    /// Spawn an enemy immediately, scaled to `wave`.
    SpawnEnemy { kind: EnemyKind, wave: u32 },

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, 2.0 = double).
    SetTimeScale { scale: f64 },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
