//! Events emitted by the simulation for observers (UI, stats, audio).

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Vector2D};

/// Notification of a simulation mutation. Delivered to subscribers of the
/// matching [`EventCategory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    EnemySpawned {
        enemy: EntityId,
        kind: EnemyKind,
        position: Vector2D,
    },
    EnemyKilled {
        enemy: EntityId,
        kind: EnemyKind,
        reward: u32,
        /// Tower credited with the kill, if it is still standing.
        tower: Option<EntityId>,
    },
    EnemyReachedEnd {
        enemy: EntityId,
        kind: EnemyKind,
        damage: i32,
    },
    TowerPlaced {
        tower: EntityId,
        kind: TowerKind,
        position: Vector2D,
        cost: u32,
    },
    TowerUpgraded {
        tower: EntityId,
        level: u32,
        cost: u32,
    },
    TowerSold {
        tower: EntityId,
        refund: u32,
    },
    WaveStarted {
        wave: u32,
        title: String,
        enemy_count: usize,
    },
    WaveCompleted {
        wave: u32,
        bonus: u32,
    },
    GameOver {
        won: bool,
        score: u32,
    },
    PlayerHealthChanged {
        health: i32,
        max_health: i32,
    },
    PlayerMoneyChanged {
        money: u32,
    },
    ProjectileFired {
        projectile: EntityId,
        kind: ProjectileKind,
        source: Option<EntityId>,
        target: Option<EntityId>,
    },
    ProjectileHit {
        projectile: EntityId,
        kind: ProjectileKind,
        enemy: EntityId,
        damage: i32,
        hit: HitKind,
    },
}

impl GameEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            GameEvent::EnemySpawned { .. } => EventCategory::EnemySpawned,
            GameEvent::EnemyKilled { .. } => EventCategory::EnemyKilled,
            GameEvent::EnemyReachedEnd { .. } => EventCategory::EnemyReachedEnd,
            GameEvent::TowerPlaced { .. } => EventCategory::TowerPlaced,
            GameEvent::TowerUpgraded { .. } => EventCategory::TowerUpgraded,
            GameEvent::TowerSold { .. } => EventCategory::TowerSold,
            GameEvent::WaveStarted { .. } => EventCategory::WaveStarted,
            GameEvent::WaveCompleted { .. } => EventCategory::WaveCompleted,
            GameEvent::GameOver { .. } => EventCategory::GameOver,
            GameEvent::PlayerHealthChanged { .. } => EventCategory::PlayerHealthChanged,
            GameEvent::PlayerMoneyChanged { .. } => EventCategory::PlayerMoneyChanged,
            GameEvent::ProjectileFired { .. } => EventCategory::ProjectileFired,
            GameEvent::ProjectileHit { .. } => EventCategory::ProjectileHit,
        }
    }
}
