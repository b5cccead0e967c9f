//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Closed set of damage types. Each has a matching resistance on enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Physical,
    Magical,
    Fire,
    Ice,
    Poison,
}

/// Enemy variant. Variants differ only in base stats, resistances and size;
/// `Regenerating` additionally heals itself periodically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Armored,
    Flying,
    FireElemental,
    IceElemental,
    Regenerating,
    Boss,
}

/// Tower variant. Each has its own attack effect and upgrade table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Homing arrows, physical damage.
    Archer,
    /// Instant splash around the target, physical damage.
    Cannon,
    /// Bolt carrying the target's current hp as magical damage.
    Lightning,
    /// Ice shards that freeze.
    Ice,
    /// Poison blobs that apply a damage-over-time effect.
    Poison,
}

/// Projectile variant; decides flight parameters and on-hit effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Arrow,
    Cannonball,
    LightningBolt,
    IceShard,
    PoisonBlob,
}

/// Policy a tower uses to pick one enemy among those in range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetingMode {
    /// Furthest along its path.
    #[default]
    First,
    /// Least far along its path.
    Last,
    /// Highest current hp.
    Strongest,
    /// Lowest current hp.
    Weakest,
    /// Nearest to the tower.
    Closest,
}

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
    /// Survived until the game timer ran out.
    Won,
    /// The house was destroyed.
    Lost,
}

/// Wave manager state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// No wave running; the inter-wave countdown is ticking.
    #[default]
    Idle,
    /// Spawn queue non-empty or enemies of the wave still alive.
    Active,
}

/// How a projectile ended up hitting an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    /// Reached its live homing target.
    Target,
    /// Had no live target and collided with whichever enemy it met first.
    Collision,
}

/// Event categories subscribers register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    EnemySpawned,
    EnemyKilled,
    EnemyReachedEnd,
    TowerPlaced,
    TowerUpgraded,
    TowerSold,
    WaveStarted,
    WaveCompleted,
    GameOver,
    PlayerHealthChanged,
    PlayerMoneyChanged,
    ProjectileFired,
    ProjectileHit,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 8] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Armored,
        EnemyKind::Flying,
        EnemyKind::FireElemental,
        EnemyKind::IceElemental,
        EnemyKind::Regenerating,
        EnemyKind::Boss,
    ];
}

impl TowerKind {
    pub const ALL: [TowerKind; 5] = [
        TowerKind::Archer,
        TowerKind::Cannon,
        TowerKind::Lightning,
        TowerKind::Ice,
        TowerKind::Poison,
    ];
}

impl EventCategory {
    pub const ALL: [EventCategory; 13] = [
        EventCategory::EnemySpawned,
        EventCategory::EnemyKilled,
        EventCategory::EnemyReachedEnd,
        EventCategory::TowerPlaced,
        EventCategory::TowerUpgraded,
        EventCategory::TowerSold,
        EventCategory::WaveStarted,
        EventCategory::WaveCompleted,
        EventCategory::GameOver,
        EventCategory::PlayerHealthChanged,
        EventCategory::PlayerMoneyChanged,
        EventCategory::ProjectileFired,
        EventCategory::ProjectileHit,
    ];
}

impl GamePhase {
    /// Won or lost; no further simulation happens.
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}
