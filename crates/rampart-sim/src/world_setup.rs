//! Entity spawn factories and the live-entity index.
//!
//! Creates enemy, tower and projectile entities with their component
//! bundles, assigning each a fresh [`EntityId`].

use std::collections::HashMap;

use hecs::{Entity, World};

use rampart_core::components::*;
use rampart_core::constants::*;
use rampart_core::enums::*;
use rampart_core::profiles::{enemy_profile, projectile_damage_type, projectile_profile, tower_profile};
use rampart_core::types::{EntityId, Vector2D};

/// Maps stable entity ids to hecs handles and hands out new ids.
///
/// Ids are never reused, so a stale id simply fails to resolve once its
/// entity has been reaped.
#[derive(Debug, Default)]
pub struct EntityIndex {
    entities: HashMap<EntityId, Entity>,
    next_id: u64,
}

impl EntityIndex {
    /// Reserve the next id.
    pub fn allocate(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    pub fn insert(&mut self, id: EntityId, entity: Entity) {
        self.entities.insert(id, entity);
    }

    pub fn get(&self, id: EntityId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Spawn an enemy of `kind` scaled to `wave`, standing on the first
/// waypoint of `path`.
pub fn spawn_enemy(
    world: &mut World,
    index: &mut EntityIndex,
    kind: EnemyKind,
    wave: u32,
    path: Vec<Vector2D>,
) -> EntityId {
    let profile = enemy_profile(kind, wave);
    let id = index.allocate();
    let position = path.first().copied().unwrap_or_default();

    let regeneration = profile.regenerates.then(|| Regeneration {
        interval_secs: REGEN_INTERVAL_SECS,
        amount: REGEN_AMOUNT,
        timer_secs: 0.0,
    });

    let enemy = Enemy {
        kind,
        max_hp: profile.max_hp,
        current_hp: profile.max_hp,
        speed: profile.speed,
        reward: profile.reward,
        damage: profile.house_damage,
        tower_damage: profile.tower_damage,
        size: profile.size,
        flying: profile.flying,
        path,
        path_index: 0,
        path_progress: 0.0,
        resistances: profile.resistances,
        status: StatusEffects::default(),
        time_since_ranged_shot: 0.0,
        regeneration,
        last_hit_by: None,
    };

    let entity = world.spawn((
        Body {
            id,
            position,
            active: true,
        },
        enemy,
    ));
    index.insert(id, entity);
    id
}

/// Spawn a level-1 tower of `kind` at `position`.
pub fn spawn_tower(
    world: &mut World,
    index: &mut EntityIndex,
    kind: TowerKind,
    position: Vector2D,
) -> EntityId {
    let profile = tower_profile(kind);
    let id = index.allocate();

    // Starts ready to fire so the first enemy in range is engaged at once.
    let time_since_last_shot = if profile.fire_rate > 0.0 {
        1.0 / profile.fire_rate
    } else {
        0.0
    };

    let tower = Tower {
        kind,
        damage: profile.damage,
        range: profile.range,
        fire_rate: profile.fire_rate,
        time_since_last_shot,
        level: 1,
        upgrade_cost: profile.upgrade_cost,
        invested: profile.base_cost,
        targeting: TargetingMode::default(),
        can_target_flying: profile.can_target_flying,
        max_health: profile.max_health,
        current_health: profile.max_health,
        destroyed: false,
        kills: 0,
        damage_dealt: 0,
    };

    let entity = world.spawn((
        Body {
            id,
            position,
            active: true,
        },
        tower,
    ));
    index.insert(id, entity);
    id
}

/// Spawn a projectile of `kind` at `origin`, initially heading for `aim`.
#[allow(clippy::too_many_arguments)]
pub fn spawn_projectile(
    world: &mut World,
    index: &mut EntityIndex,
    kind: ProjectileKind,
    origin: Vector2D,
    aim: Vector2D,
    target: Option<EntityId>,
    source: Option<EntityId>,
    damage: i32,
) -> EntityId {
    let profile = projectile_profile(kind);
    let id = index.allocate();

    let projectile = Projectile {
        kind,
        velocity: (aim - origin).normalize() * profile.speed,
        damage,
        damage_type: projectile_damage_type(kind),
        speed: profile.speed,
        size: profile.size,
        target,
        source,
        max_range: profile.max_range,
        distance_traveled: 0.0,
    };

    let entity = world.spawn((
        Body {
            id,
            position: origin,
            active: true,
        },
        projectile,
    ));
    index.insert(id, entity);
    id
}

/// Live (active) enemies in ascending id order.
pub fn active_enemies(world: &World) -> Vec<(Entity, EntityId)> {
    let mut enemies: Vec<(Entity, EntityId)> = world
        .query::<(&Body, &Enemy)>()
        .iter()
        .filter(|(_, (body, _))| body.active)
        .map(|(entity, (body, _))| (entity, body.id))
        .collect();
    enemies.sort_by_key(|(_, id)| *id);
    enemies
}

/// Standing towers (active, not destroyed) with their positions, in
/// ascending id order.
pub fn standing_towers(world: &World) -> Vec<(Entity, EntityId, Vector2D)> {
    let mut towers: Vec<(Entity, EntityId, Vector2D)> = world
        .query::<(&Body, &Tower)>()
        .iter()
        .filter(|(_, (body, tower))| body.active && !tower.destroyed)
        .map(|(entity, (body, _))| (entity, body.id, body.position))
        .collect();
    towers.sort_by_key(|(_, id, _)| *id);
    towers
}
