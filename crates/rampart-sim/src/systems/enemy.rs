//! Enemy system: status effects, path following and attacks on towers.
//!
//! Per enemy, in ascending id order:
//! ranged cooldown -> status effects -> regeneration -> movement (unless
//! frozen) -> reached-end and died checks -> ranged attack -> melee attack.
//! Reaching the end and dying only deactivate the enemy; the engine applies
//! house damage and rewards from the returned outcomes.

use hecs::{Entity, World};
use tracing::debug;

use rampart_core::components::{Body, Enemy, Tower};
use rampart_core::constants::*;
use rampart_core::enums::EnemyKind;
use rampart_core::types::{EntityId, Vector2D};

use crate::systems::damage;
use crate::world_setup::{active_enemies, standing_towers};

/// What happened to an enemy this tick that the engine must settle.
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyOutcome {
    ReachedEnd {
        id: EntityId,
        kind: EnemyKind,
        damage: i32,
    },
    Died {
        id: EntityId,
        kind: EnemyKind,
        reward: u32,
        last_hit_by: Option<EntityId>,
    },
}

/// Advance every active enemy by `dt` seconds.
pub fn run(world: &mut World, dt: f64) -> Vec<EnemyOutcome> {
    let mut outcomes = Vec::new();

    for (entity, _) in active_enemies(world) {
        let (position, tower_damage, ranged_ready) = {
            let Ok((body, enemy)) = world.query_one_mut::<(&mut Body, &mut Enemy)>(entity) else {
                continue;
            };
            advance(body, enemy, dt, &mut outcomes);
            if !body.active {
                continue;
            }
            (
                body.position,
                enemy.tower_damage,
                enemy.time_since_ranged_shot >= 1.0 / ENEMY_RANGED_FIRE_RATE,
            )
        };

        if ranged_ready && ranged_attack(world, position, tower_damage) {
            if let Ok(mut enemy) = world.get::<&mut Enemy>(entity) {
                enemy.time_since_ranged_shot = 0.0;
            }
        }
        melee_attack(world, position, tower_damage);
    }

    outcomes
}

/// Timers, movement and end-of-life checks for one enemy.
fn advance(body: &mut Body, enemy: &mut Enemy, dt: f64, outcomes: &mut Vec<EnemyOutcome>) {
    enemy.time_since_ranged_shot += dt;
    update_status_effects(enemy, dt);
    regenerate(enemy, dt);

    if !enemy.status.frozen {
        move_along_path(body, enemy, dt);
    }

    // Both can hold in one tick: the house is hit and the kill still pays.
    if enemy.path_index >= enemy.path.len().saturating_sub(1) {
        body.active = false;
        debug!("Enemy {} ({:?}) reached the end", body.id, enemy.kind);
        outcomes.push(EnemyOutcome::ReachedEnd {
            id: body.id,
            kind: enemy.kind,
            damage: enemy.damage,
        });
    }
    if enemy.current_hp <= 0 {
        body.active = false;
        debug!("Enemy {} ({:?}) died", body.id, enemy.kind);
        outcomes.push(EnemyOutcome::Died {
            id: body.id,
            kind: enemy.kind,
            reward: enemy.reward,
            last_hit_by: enemy.last_hit_by,
        });
    }
}

fn update_status_effects(enemy: &mut Enemy, dt: f64) {
    let status = &mut enemy.status;

    if status.frozen {
        status.freeze_remaining_secs -= dt;
        if status.freeze_remaining_secs <= 0.0 {
            status.frozen = false;
            status.freeze_remaining_secs = 0.0;
        }
    }

    if status.poisoned {
        status.poison_remaining_secs -= dt;
        if status.poison_remaining_secs <= 0.0 {
            status.poisoned = false;
            status.poison_remaining_secs = 0.0;
            status.poison_carry = 0.0;
        } else {
            // Already resistance-scaled when applied.
            status.poison_carry += f64::from(status.poison_damage_per_sec) * dt;
            let whole = status.poison_carry.floor();
            status.poison_carry -= whole;
            enemy.current_hp = (enemy.current_hp - whole as i32).max(0);
        }
    }
}

fn regenerate(enemy: &mut Enemy, dt: f64) {
    let Some(regen) = enemy.regeneration.as_mut() else {
        return;
    };

    // The timer runs at full health too; only the heal is gated.
    regen.timer_secs += dt;
    if regen.timer_secs >= regen.interval_secs {
        regen.timer_secs = 0.0;
        if enemy.current_hp > 0 && enemy.current_hp < enemy.max_hp {
            enemy.current_hp = (enemy.current_hp + regen.amount).min(enemy.max_hp);
        }
    }
}

fn move_along_path(body: &mut Body, enemy: &mut Enemy, dt: f64) {
    let Some(&waypoint) = enemy.path.get(enemy.path_index + 1) else {
        return;
    };

    let direction = (waypoint - body.position).normalize();
    body.position = body.position + direction * (enemy.speed * dt);

    if body.position.distance_to(&waypoint) < WAYPOINT_EPSILON {
        enemy.path_index += 1;
        enemy.path_progress = path_progress(enemy.path_index, enemy.path.len());
    }
}

/// `index / (len - 1)`; a path with a single point counts as complete.
pub fn path_progress(index: usize, len: usize) -> f64 {
    if len <= 1 {
        return 1.0;
    }
    index as f64 / (len - 1) as f64
}

/// Hit the nearest standing tower within ranged reach. Returns whether a
/// shot was taken.
fn ranged_attack(world: &mut World, position: Vector2D, tower_damage: i32) -> bool {
    let mut nearest: Option<(Entity, f64)> = None;
    for (entity, _, tower_pos) in standing_towers(world) {
        let distance = position.distance_to(&tower_pos);
        if distance <= ENEMY_RANGED_RANGE && nearest.map_or(true, |(_, best)| distance < best) {
            nearest = Some((entity, distance));
        }
    }

    let Some((target, _)) = nearest else {
        return false;
    };
    if let Ok((body, tower)) = world.query_one_mut::<(&mut Body, &mut Tower)>(target) {
        damage::damage_tower(body, tower, (tower_damage / 2).max(1));
    }
    true
}

/// Hit at most one standing tower within melee reach.
fn melee_attack(world: &mut World, position: Vector2D, tower_damage: i32) {
    let target = standing_towers(world)
        .into_iter()
        .find(|(_, _, tower_pos)| position.distance_to(tower_pos) <= ENEMY_MELEE_RANGE)
        .map(|(entity, _, _)| entity);

    if let Some(target) = target {
        if let Ok((body, tower)) = world.query_one_mut::<(&mut Body, &mut Tower)>(target) {
            damage::damage_tower(body, tower, tower_damage);
        }
    }
}
