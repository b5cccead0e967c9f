//! Error types for rejected commands and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use rampart_core::types::{EntityId, Vector2D};

/// Why a position cannot host a new tower.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("{position} is {distance:.1} from path waypoint {waypoint} (minimum {minimum})")]
    TooCloseToPath {
        position: Vector2D,
        waypoint: Vector2D,
        distance: f64,
        minimum: f64,
    },

    #[error("{position} is {distance:.1} from tower {tower} (minimum {minimum})")]
    TooCloseToTower {
        position: Vector2D,
        tower: EntityId,
        distance: f64,
        minimum: f64,
    },
}

/// A player command that was refused. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },

    #[error("invalid placement: {0}")]
    InvalidPlacement(#[from] PlacementError),

    #[error("tower {tower} is already at max level {level}")]
    MaxLevel { tower: EntityId, level: u32 },

    #[error("no live tower with id {0}")]
    UnknownTower(EntityId),

    #[error("no live enemy with id {0}")]
    UnknownEnemy(EntityId),

    #[error("the game is over")]
    GameOver,
}

/// Failure to load a [`SimConfig`](crate::engine::SimConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
