//! Projectile system: homing flight, range expiry and hit resolution.
//!
//! Checked in order after moving:
//! 1. no live target and flown at least `max_range` -> expire
//! 2. live target within `size + 6` -> hit it
//! 3. no live target -> hit the first active enemy within `size + 6`

use hecs::{Entity, World};
use tracing::debug;

use rampart_core::components::{Body, Enemy, Projectile};
use rampart_core::constants::*;
use rampart_core::enums::{HitKind, ProjectileKind};
use rampart_core::events::GameEvent;
use rampart_core::types::{EntityId, Vector2D};

use crate::event_bus::EventBus;
use crate::systems::damage;
use crate::world_setup::{active_enemies, EntityIndex};

/// Advance every active projectile by `dt` seconds.
pub fn run(world: &mut World, index: &EntityIndex, bus: &mut EventBus, dt: f64) {
    for (entity, projectile_id) in active_projectiles(world) {
        let target = live_target(world, index, entity);

        let (position, projectile) = {
            let Ok((body, projectile)) =
                world.query_one_mut::<(&mut Body, &mut Projectile)>(entity)
            else {
                continue;
            };

            if let Some((_, target_pos)) = target {
                projectile.velocity = (target_pos - body.position).normalize() * projectile.speed;
            }
            let movement = projectile.velocity * dt;
            body.position = body.position + movement;
            projectile.distance_traveled += movement.magnitude();

            if target.is_none() && projectile.distance_traveled >= projectile.max_range {
                body.active = false;
                debug!("Projectile {} expired out of range", projectile_id);
                continue;
            }
            (body.position, projectile.clone())
        };

        let hit_radius = projectile.size + PROJECTILE_HIT_MARGIN;
        let hit = match target {
            Some((target_entity, target_pos)) => (position.distance_to(&target_pos) <= hit_radius)
                .then_some((target_entity, HitKind::Target)),
            None => first_enemy_within(world, position, hit_radius)
                .map(|enemy| (enemy, HitKind::Collision)),
        };

        let Some((enemy_entity, hit_kind)) = hit else {
            continue;
        };

        let enemy_id = on_hit(world, &projectile, enemy_entity);
        if let Ok(mut body) = world.get::<&mut Body>(entity) {
            body.active = false;
        }
        if let Some(enemy_id) = enemy_id {
            debug!(
                "Projectile {} ({:?}) hit enemy {} ({:?})",
                projectile_id, projectile.kind, enemy_id, hit_kind
            );
            bus.queue(GameEvent::ProjectileHit {
                projectile: projectile_id,
                kind: projectile.kind,
                enemy: enemy_id,
                damage: projectile.damage,
                hit: hit_kind,
            });
        }
    }
}

fn active_projectiles(world: &World) -> Vec<(Entity, EntityId)> {
    let mut projectiles: Vec<(Entity, EntityId)> = world
        .query::<(&Body, &Projectile)>()
        .iter()
        .filter(|(_, (body, _))| body.active)
        .map(|(entity, (body, _))| (entity, body.id))
        .collect();
    projectiles.sort_by_key(|(_, id)| *id);
    projectiles
}

/// The projectile's homing target, if it still resolves to an active enemy.
fn live_target(world: &World, index: &EntityIndex, projectile: Entity) -> Option<(Entity, Vector2D)> {
    let target_id = world.get::<&Projectile>(projectile).ok()?.target?;
    let target = index.get(target_id)?;
    let mut query = world.query_one::<(&Body, &Enemy)>(target).ok()?;
    let (body, _) = query.get()?;
    body.active.then_some((target, body.position))
}

fn first_enemy_within(world: &World, position: Vector2D, radius: f64) -> Option<Entity> {
    active_enemies(world).into_iter().find_map(|(entity, _)| {
        let body = world.get::<&Body>(entity).ok()?;
        (position.distance_to(&body.position) <= radius).then_some(entity)
    })
}

/// Apply the kind-specific on-hit effect. Returns the struck enemy's id.
fn on_hit(world: &mut World, projectile: &Projectile, enemy_entity: Entity) -> Option<EntityId> {
    let (enemy_id, enemy_pos) = {
        let body = world.get::<&Body>(enemy_entity).ok()?;
        (body.id, body.position)
    };

    if projectile.kind == ProjectileKind::Cannonball {
        damage::splash(
            world,
            enemy_pos,
            CANNON_SPLASH_RADIUS,
            projectile.damage,
            projectile.damage_type,
            projectile.source,
        );
        return Some(enemy_id);
    }

    let mut enemy = world.get::<&mut Enemy>(enemy_entity).ok()?;
    damage::strike(
        &mut enemy,
        projectile.damage,
        projectile.damage_type,
        projectile.source,
    );
    match projectile.kind {
        ProjectileKind::IceShard => {
            damage::apply_freeze(&mut enemy, FREEZE_DURATION_SECS);
        }
        ProjectileKind::PoisonBlob => {
            damage::apply_poison(&mut enemy, POISON_DURATION_SECS, projectile.damage / 2);
        }
        _ => {}
    }
    Some(enemy_id)
}
