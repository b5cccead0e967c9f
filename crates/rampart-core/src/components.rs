//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Vector2D};

/// State shared by every simulated entity: identity, position and the
/// active flag. `active` only ever goes from true to false; inactive
/// entities are skipped by every system and removed in the reap phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub position: Vector2D,
    pub active: bool,
}

/// Per-damage-type resistance scalars. 1.0 = immune, 0.0 = normal,
/// negative = amplified damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resistances {
    pub physical: f64,
    pub magical: f64,
    pub fire: f64,
    pub ice: f64,
    pub poison: f64,
}

/// Freeze and poison state of an enemy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    pub frozen: bool,
    pub freeze_remaining_secs: f64,
    pub poisoned: bool,
    pub poison_remaining_secs: f64,
    /// Already resistance-scaled.
    pub poison_damage_per_sec: i32,
    /// Fractional poison damage not yet applied.
    pub poison_carry: f64,
}

/// Periodic self-heal (regenerating enemies only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regeneration {
    pub interval_secs: f64,
    pub amount: i32,
    pub timer_secs: f64,
}

/// Enemy state. Always paired with a [`Body`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub max_hp: i32,
    /// Never negative.
    pub current_hp: i32,
    /// Pixels per second.
    pub speed: f64,
    /// Money granted on kill.
    pub reward: u32,
    /// Damage dealt to the house on reaching the end of the path.
    pub damage: i32,
    /// Damage dealt to towers (melee; ranged deals half).
    pub tower_damage: i32,
    pub size: f64,
    pub flying: bool,
    /// Waypoints, bound once at spawn.
    pub path: Vec<Vector2D>,
    /// Index of the last waypoint reached.
    pub path_index: usize,
    /// `path_index / (path.len() - 1)`, in [0, 1], non-decreasing.
    pub path_progress: f64,
    pub resistances: Resistances,
    pub status: StatusEffects,
    pub time_since_ranged_shot: f64,
    pub regeneration: Option<Regeneration>,
    /// Tower that last damaged this enemy; credited with the kill.
    pub last_hit_by: Option<EntityId>,
}

/// Tower state. Always paired with a [`Body`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub kind: TowerKind,
    pub damage: i32,
    pub range: f64,
    /// Shots per second.
    pub fire_rate: f64,
    pub time_since_last_shot: f64,
    /// 1..=TOWER_MAX_LEVEL
    pub level: u32,
    /// Base for the next upgrade price (`upgrade_cost * level`).
    pub upgrade_cost: u32,
    /// Base cost plus every upgrade price paid; drives the sell refund.
    pub invested: u32,
    pub targeting: TargetingMode,
    pub can_target_flying: bool,
    pub max_health: i32,
    pub current_health: i32,
    pub destroyed: bool,
    pub kills: u32,
    pub damage_dealt: u64,
}

/// Projectile state. Always paired with a [`Body`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub velocity: Vector2D,
    pub damage: i32,
    pub damage_type: DamageType,
    pub speed: f64,
    pub size: f64,
    /// Homing target, resolved through the engine's entity index each tick.
    pub target: Option<EntityId>,
    /// Tower that fired this projectile, if any.
    pub source: Option<EntityId>,
    pub max_range: f64,
    pub distance_traveled: f64,
}

/// The structure the player protects. One per level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct House {
    pub position: Vector2D,
    pub max_health: i32,
    pub current_health: i32,
}
