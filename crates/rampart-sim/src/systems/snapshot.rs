//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only: it never modifies the world. Every view is an
//! owned copy sorted by entity id.

use hecs::World;

use rampart_core::components::*;
use rampart_core::constants::SELL_REFUND_RATIO;
use rampart_core::enums::GamePhase;
use rampart_core::state::*;
use rampart_core::types::{SimTime, Vector2D};

use crate::systems::wave_spawner::{wave_title, WaveState};

/// Engine-level state that does not live in the ECS world.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub level: u32,
    pub game_duration_secs: f64,
    pub wave_delay_secs: f64,
    pub paths: &'a [Vec<Vector2D>],
    pub house: &'a House,
    pub waves: &'a WaveState,
    pub money: u32,
    pub score: u32,
    pub kills: u32,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(world: &World, ctx: &SnapshotContext<'_>) -> GameStateSnapshot {
    GameStateSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        level: ctx.level,
        game_duration_secs: ctx.game_duration_secs,
        paths: ctx.paths.to_vec(),
        enemies: build_enemies(world),
        towers: build_towers(world),
        projectiles: build_projectiles(world),
        house: build_house(ctx.house),
        wave: build_wave(ctx.waves, ctx.wave_delay_secs),
        economy: EconomyView {
            money: ctx.money,
            score: ctx.score,
            enemies_killed: ctx.kills,
        },
    }
}

/// EnemyView list for all active enemies.
pub fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Body, &Enemy)>()
        .iter()
        .filter(|(_, (body, _))| body.active)
        .map(|(_, (body, enemy))| EnemyView {
            id: body.id,
            kind: enemy.kind,
            position: body.position,
            current_hp: enemy.current_hp,
            max_hp: enemy.max_hp,
            path_progress: enemy.path_progress,
            frozen: enemy.status.frozen,
            poisoned: enemy.status.poisoned,
            size: enemy.size,
        })
        .collect();

    enemies.sort_by_key(|e| e.id);
    enemies
}

/// TowerView list for all active towers.
pub fn build_towers(world: &World) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<(&Body, &Tower)>()
        .iter()
        .filter(|(_, (body, _))| body.active)
        .map(|(_, (body, tower))| tower_view(body, tower))
        .collect();

    towers.sort_by_key(|t| t.id);
    towers
}

pub fn tower_view(body: &Body, tower: &Tower) -> TowerView {
    let max_level = rampart_core::profiles::tower_profile(tower.kind).max_level;
    TowerView {
        id: body.id,
        kind: tower.kind,
        position: body.position,
        level: tower.level,
        damage: tower.damage,
        range: tower.range,
        fire_rate: tower.fire_rate,
        targeting: tower.targeting,
        current_health: tower.current_health,
        max_health: tower.max_health,
        destroyed: tower.destroyed,
        kills: tower.kills,
        damage_dealt: tower.damage_dealt,
        upgrade_price: (tower.level < max_level).then(|| tower.upgrade_cost * tower.level),
        sell_value: sell_value(tower),
    }
}

/// `trunc(0.7 * invested)`.
pub fn sell_value(tower: &Tower) -> u32 {
    (f64::from(tower.invested) * SELL_REFUND_RATIO) as u32
}

/// ProjectileView list for all active projectiles.
pub fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Body, &Projectile)>()
        .iter()
        .filter(|(_, (body, _))| body.active)
        .map(|(_, (body, projectile))| ProjectileView {
            id: body.id,
            kind: projectile.kind,
            position: body.position,
            velocity: projectile.velocity,
            damage_type: projectile.damage_type,
        })
        .collect();

    projectiles.sort_by_key(|p| p.id);
    projectiles
}

fn build_house(house: &House) -> HouseView {
    HouseView {
        position: house.position,
        current_health: house.current_health,
        max_health: house.max_health,
        destroyed: house.current_health <= 0,
    }
}

fn build_wave(waves: &WaveState, wave_delay_secs: f64) -> WaveView {
    WaveView {
        current_wave: waves.current_wave,
        phase: waves.phase,
        title: wave_title(waves.current_wave),
        time_until_next_wave: waves.time_until_next_wave(wave_delay_secs),
        remaining_to_spawn: waves.manager.remaining(),
        time_until_next_spawn: waves.manager.time_until_next_spawn(),
    }
}
