//! Tower system: cooldowns, target acquisition and per-kind attack effects.

use hecs::World;
use tracing::debug;

use rampart_core::components::{Body, Enemy, Tower};
use rampart_core::constants::*;
use rampart_core::enums::{DamageType, ProjectileKind, TowerKind};
use rampart_core::events::GameEvent;
use rampart_core::profiles::tower_projectile;
use rampart_core::types::{EntityId, Vector2D};

use crate::event_bus::EventBus;
use crate::systems::damage;
use crate::targeting::{select_target, Candidate};
use crate::world_setup::{self, standing_towers, EntityIndex};

/// Advance every standing tower by `dt` and fire those whose cooldown has
/// elapsed and that have a target.
pub fn run(world: &mut World, index: &mut EntityIndex, bus: &mut EventBus, dt: f64) {
    for (entity, tower_id, position) in standing_towers(world) {
        let tower = {
            let Ok(tower) = world.query_one_mut::<&mut Tower>(entity) else {
                continue;
            };
            tower.time_since_last_shot += dt;
            if !cooldown_elapsed(tower) {
                continue;
            }
            tower.clone()
        };

        let candidates = enemies_in_range(world, position, tower.range, tower.can_target_flying);
        let Some(target) = select_target(tower.targeting, position, &candidates) else {
            continue;
        };

        let dealt = perform_attack(world, index, bus, tower_id, position, &tower, &target);

        if let Ok(tower) = world.query_one_mut::<&mut Tower>(entity) {
            tower.time_since_last_shot = 0.0;
            tower.damage_dealt += u64::try_from(dealt).unwrap_or(0);
        }
    }
}

/// At least `1 / fire_rate` seconds since the last shot.
pub fn cooldown_elapsed(tower: &Tower) -> bool {
    tower.fire_rate > 0.0 && tower.time_since_last_shot >= 1.0 / tower.fire_rate
}

/// Active, living enemies within `range` that this tower may shoot, in
/// ascending id order.
pub fn enemies_in_range(
    world: &World,
    position: Vector2D,
    range: f64,
    can_target_flying: bool,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = world
        .query::<(&Body, &Enemy)>()
        .iter()
        .filter(|(_, (body, enemy))| {
            body.active
                && enemy.current_hp > 0
                && (can_target_flying || !enemy.flying)
                && position.distance_to(&body.position) <= range
        })
        .map(|(entity, (body, enemy))| Candidate {
            entity,
            id: body.id,
            position: body.position,
            path_progress: enemy.path_progress,
            current_hp: enemy.current_hp,
        })
        .collect();
    candidates.sort_by_key(|c| c.id);
    candidates
}

/// Run the kind-specific attack. Returns the raw damage to record.
fn perform_attack(
    world: &mut World,
    index: &mut EntityIndex,
    bus: &mut EventBus,
    tower_id: EntityId,
    position: Vector2D,
    tower: &Tower,
    target: &Candidate,
) -> i32 {
    debug!(
        "Tower {} ({:?}) attacks enemy {}",
        tower_id, tower.kind, target.id
    );

    let Some(projectile_kind) = tower_projectile(tower.kind) else {
        // Cannon: instant splash, no travel time.
        damage::splash(
            world,
            target.position,
            CANNON_SPLASH_RADIUS,
            tower.damage,
            DamageType::Physical,
            Some(tower_id),
        );
        return tower.damage;
    };

    // Lightning carries the target's remaining hp.
    let damage = match tower.kind {
        TowerKind::Lightning => target.current_hp,
        _ => tower.damage,
    };
    fire(world, index, bus, projectile_kind, position, tower_id, target, damage);

    // The status is applied directly as well, in case the projectile ends up
    // hitting something else.
    if let Ok(mut enemy) = world.get::<&mut Enemy>(target.entity) {
        match tower.kind {
            TowerKind::Ice => {
                damage::apply_freeze(&mut enemy, FREEZE_DURATION_SECS);
            }
            TowerKind::Poison => {
                damage::apply_poison(&mut enemy, POISON_DURATION_SECS, tower.damage / 2);
            }
            _ => {}
        }
    }

    damage
}

#[allow(clippy::too_many_arguments)]
fn fire(
    world: &mut World,
    index: &mut EntityIndex,
    bus: &mut EventBus,
    kind: ProjectileKind,
    origin: Vector2D,
    tower_id: EntityId,
    target: &Candidate,
    damage: i32,
) {
    let projectile = world_setup::spawn_projectile(
        world,
        index,
        kind,
        origin,
        target.position,
        Some(target.id),
        Some(tower_id),
        damage,
    );
    bus.queue(GameEvent::ProjectileFired {
        projectile,
        kind,
        source: Some(tower_id),
        target: Some(target.id),
    });
}
