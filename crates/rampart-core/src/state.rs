//! Game state snapshot: the complete visible state handed to readers.
//!
//! Every field is an owned copy. A snapshot never changes after it has been
//! built, whatever the engine does afterwards.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, SimTime, Vector2D};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub level: u32,
    pub game_duration_secs: f64,
    pub paths: Vec<Vec<Vector2D>>,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub projectiles: Vec<ProjectileView>,
    pub house: HouseView,
    pub wave: WaveView,
    pub economy: EconomyView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub position: Vector2D,
    pub current_hp: i32,
    pub max_hp: i32,
    pub path_progress: f64,
    pub frozen: bool,
    pub poisoned: bool,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerView {
    pub id: EntityId,
    pub kind: TowerKind,
    pub position: Vector2D,
    pub level: u32,
    pub damage: i32,
    pub range: f64,
    pub fire_rate: f64,
    pub targeting: TargetingMode,
    pub current_health: i32,
    pub max_health: i32,
    pub destroyed: bool,
    pub kills: u32,
    pub damage_dealt: u64,
    /// Price of the next upgrade; `None` at max level.
    pub upgrade_price: Option<u32>,
    pub sell_value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub damage_type: DamageType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HouseView {
    pub position: Vector2D,
    pub current_health: i32,
    pub max_health: i32,
    pub destroyed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub current_wave: u32,
    pub phase: WavePhase,
    pub title: String,
    /// 0 while a wave is in progress.
    pub time_until_next_wave: f64,
    pub remaining_to_spawn: usize,
    pub time_until_next_spawn: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyView {
    pub money: u32,
    pub score: u32,
    pub enemies_killed: u32,
}
