//! Per-kind stat tables for enemies, towers and projectiles.
//!
//! Variants share all behavior; what distinguishes them is data looked up
//! here by kind.

use crate::components::Resistances;
use crate::constants::*;
use crate::enums::{DamageType, EnemyKind, ProjectileKind, TowerKind};

/// Base stats of an enemy kind at a given wave number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub max_hp: i32,
    pub speed: f64,
    pub reward: u32,
    pub house_damage: i32,
    pub tower_damage: i32,
    pub size: f64,
    pub flying: bool,
    pub resistances: Resistances,
    pub regenerates: bool,
}

/// Base stats of a freshly placed tower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerProfile {
    pub damage: i32,
    pub range: f64,
    pub fire_rate: f64,
    pub base_cost: u32,
    /// Initial upgrade cost base.
    pub upgrade_cost: u32,
    /// Applied to the upgrade cost base after each upgrade.
    pub upgrade_cost_multiplier: f64,
    pub max_level: u32,
    pub max_health: i32,
    pub can_target_flying: bool,
}

/// Stat delta applied when a tower reaches a level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeStep {
    pub damage: i32,
    pub fire_rate: f64,
    pub range: f64,
}

/// Flight parameters of a projectile kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileProfile {
    pub speed: f64,
    pub size: f64,
    pub max_range: f64,
}

pub fn enemy_profile(kind: EnemyKind, wave: u32) -> EnemyProfile {
    let w = wave as i32;
    let base = EnemyProfile {
        max_hp: 50 + 10 * w,
        speed: 60.0,
        reward: 10 + wave,
        house_damage: ENEMY_DEFAULT_HOUSE_DAMAGE,
        tower_damage: ENEMY_DEFAULT_TOWER_DAMAGE,
        size: 12.0,
        flying: false,
        resistances: Resistances::default(),
        regenerates: false,
    };

    match kind {
        EnemyKind::Basic => base,
        EnemyKind::Fast => EnemyProfile {
            max_hp: 30 + 5 * w,
            speed: 120.0,
            reward: 15 + wave,
            size: 10.0,
            ..base
        },
        EnemyKind::Armored => EnemyProfile {
            max_hp: 100 + 20 * w,
            speed: 30.0,
            reward: 25 + 2 * wave,
            size: 16.0,
            resistances: Resistances {
                physical: 0.5,
                ..Resistances::default()
            },
            ..base
        },
        EnemyKind::Flying => EnemyProfile {
            max_hp: 40 + 8 * w,
            speed: 80.0,
            reward: 20 + wave,
            size: 10.0,
            flying: true,
            ..base
        },
        EnemyKind::FireElemental => EnemyProfile {
            max_hp: 60 + 12 * w,
            speed: 70.0,
            reward: 30 + 2 * wave,
            size: 14.0,
            resistances: Resistances {
                fire: 1.0,
                ice: -0.5,
                ..Resistances::default()
            },
            ..base
        },
        EnemyKind::IceElemental => EnemyProfile {
            max_hp: 60 + 12 * w,
            speed: 50.0,
            reward: 30 + 2 * wave,
            size: 14.0,
            resistances: Resistances {
                ice: 1.0,
                fire: -0.5,
                ..Resistances::default()
            },
            ..base
        },
        EnemyKind::Regenerating => EnemyProfile {
            max_hp: 80 + 15 * w,
            speed: 45.0,
            reward: 35 + 2 * wave,
            size: 15.0,
            resistances: Resistances {
                poison: 0.7,
                ..Resistances::default()
            },
            regenerates: true,
            ..base
        },
        EnemyKind::Boss => EnemyProfile {
            max_hp: 200 + 50 * w,
            speed: 25.0,
            reward: 100 + 10 * wave,
            house_damage: 5,
            size: 24.0,
            resistances: Resistances {
                physical: 0.3,
                magical: 0.3,
                fire: 0.3,
                ice: 0.3,
                poison: 0.3,
            },
            ..base
        },
    }
}

pub fn tower_profile(kind: TowerKind) -> TowerProfile {
    let (damage, range, fire_rate, base_cost, upgrade_cost, upgrade_cost_multiplier) = match kind {
        TowerKind::Archer => (15, 80.0, 2.0, 50, 25, 1.5),
        TowerKind::Cannon => (40, 70.0, 0.5, 120, 75, 1.6),
        TowerKind::Lightning => (25, 90.0, 1.2, 85, 60, 1.4),
        TowerKind::Ice => (20, 75.0, 1.5, 70, 45, 1.3),
        TowerKind::Poison => (15, 65.0, 1.0, 90, 55, 1.4),
    };

    TowerProfile {
        damage,
        range,
        fire_rate,
        base_cost,
        upgrade_cost,
        upgrade_cost_multiplier,
        max_level: TOWER_MAX_LEVEL,
        max_health: TOWER_MAX_HEALTH,
        can_target_flying: true,
    }
}

/// Delta for reaching `level`. `None` for level 1 and anything above the max.
pub fn upgrade_step(kind: TowerKind, level: u32) -> Option<UpgradeStep> {
    // (damage, fire_rate, range) per level 2, 3, 4
    let table: [(i32, f64, f64); 3] = match kind {
        TowerKind::Archer => [(8, 0.5, 0.0), (12, 0.5, 20.0), (20, 1.0, 30.0)],
        TowerKind::Cannon => [(20, 0.2, 0.0), (30, 0.2, 15.0), (50, 0.3, 25.0)],
        TowerKind::Lightning => [(10, 0.3, 0.0), (15, 0.4, 20.0), (25, 0.5, 30.0)],
        TowerKind::Ice => [(8, 0.3, 0.0), (12, 0.4, 15.0), (18, 0.5, 25.0)],
        TowerKind::Poison => [(6, 0.2, 0.0), (10, 0.3, 10.0), (15, 0.4, 20.0)],
    };

    let index = level.checked_sub(2)? as usize;
    table
        .get(index)
        .map(|&(damage, fire_rate, range)| UpgradeStep {
            damage,
            fire_rate,
            range,
        })
}

pub fn projectile_profile(kind: ProjectileKind) -> ProjectileProfile {
    match kind {
        ProjectileKind::Arrow => ProjectileProfile {
            speed: 200.0,
            size: 3.0,
            max_range: PROJECTILE_DEFAULT_MAX_RANGE,
        },
        ProjectileKind::Cannonball => ProjectileProfile {
            speed: 150.0,
            size: 5.0,
            max_range: PROJECTILE_DEFAULT_MAX_RANGE,
        },
        ProjectileKind::LightningBolt => ProjectileProfile {
            speed: 400.0,
            size: 3.0,
            max_range: 120.0,
        },
        ProjectileKind::IceShard => ProjectileProfile {
            speed: 200.0,
            size: 4.0,
            max_range: PROJECTILE_DEFAULT_MAX_RANGE,
        },
        ProjectileKind::PoisonBlob => ProjectileProfile {
            speed: 180.0,
            size: 4.0,
            max_range: PROJECTILE_DEFAULT_MAX_RANGE,
        },
    }
}

/// Damage type carried by each projectile kind.
pub fn projectile_damage_type(kind: ProjectileKind) -> DamageType {
    match kind {
        ProjectileKind::Arrow | ProjectileKind::Cannonball => DamageType::Physical,
        ProjectileKind::LightningBolt => DamageType::Magical,
        ProjectileKind::IceShard => DamageType::Ice,
        ProjectileKind::PoisonBlob => DamageType::Poison,
    }
}

/// Projectile a tower kind fires, if its attack travels at all.
pub fn tower_projectile(kind: TowerKind) -> Option<ProjectileKind> {
    match kind {
        TowerKind::Archer => Some(ProjectileKind::Arrow),
        TowerKind::Cannon => None,
        TowerKind::Lightning => Some(ProjectileKind::LightningBolt),
        TowerKind::Ice => Some(ProjectileKind::IceShard),
        TowerKind::Poison => Some(ProjectileKind::PoisonBlob),
    }
}
