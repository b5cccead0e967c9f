//! Damage, resistance and status-effect rules.
//!
//! Actual damage is `round(raw * (1 - resistance))`. Resistance may be
//! negative, which amplifies damage; hit points are clamped at zero after
//! subtraction. Freeze and poison only take hold while the matching
//! resistance is below 1.0 and are scaled by `1 - resistance`.

use hecs::World;
use tracing::debug;

use rampart_core::components::{Body, Enemy, Resistances, Tower};
use rampart_core::enums::DamageType;
use rampart_core::types::{EntityId, Vector2D};

/// Resistance scalar matching `damage_type`.
pub fn resistance(resistances: &Resistances, damage_type: DamageType) -> f64 {
    match damage_type {
        DamageType::Physical => resistances.physical,
        DamageType::Magical => resistances.magical,
        DamageType::Fire => resistances.fire,
        DamageType::Ice => resistances.ice,
        DamageType::Poison => resistances.poison,
    }
}

/// Damage left after applying resistance `r` to `raw`.
pub fn mitigate(raw: i32, r: f64) -> i32 {
    (f64::from(raw) * (1.0 - r)).round() as i32
}

/// Apply `raw` damage of `damage_type`. Returns the damage actually dealt.
pub fn take_damage(enemy: &mut Enemy, raw: i32, damage_type: DamageType) -> i32 {
    let actual = mitigate(raw, resistance(&enemy.resistances, damage_type));
    enemy.current_hp = (enemy.current_hp - actual).max(0);
    actual
}

/// Damage dealt by a tower or its projectile: like [`take_damage`], and the
/// tower is remembered for kill credit.
pub fn strike(
    enemy: &mut Enemy,
    raw: i32,
    damage_type: DamageType,
    source: Option<EntityId>,
) -> i32 {
    if source.is_some() {
        enemy.last_hit_by = source;
    }
    take_damage(enemy, raw, damage_type)
}

/// Strike every active enemy within `radius` of `center`. Returns how many
/// were hit.
pub fn splash(
    world: &mut World,
    center: Vector2D,
    radius: f64,
    raw: i32,
    damage_type: DamageType,
    source: Option<EntityId>,
) -> usize {
    let mut hit = 0;
    for (_, (body, enemy)) in world.query_mut::<(&Body, &mut Enemy)>() {
        if body.active && body.position.distance_to(&center) <= radius {
            strike(enemy, raw, damage_type, source);
            hit += 1;
        }
    }
    hit
}

/// Freeze for `duration` seconds (scaled by ice resistance). Returns whether
/// the effect took hold.
pub fn apply_freeze(enemy: &mut Enemy, duration: f64) -> bool {
    let r = enemy.resistances.ice;
    if r >= 1.0 {
        return false;
    }
    enemy.status.frozen = true;
    enemy.status.freeze_remaining_secs = duration * (1.0 - r);
    true
}

/// Poison for `duration` seconds at `damage_per_sec`, both scaled by poison
/// resistance. Reapplying replaces the previous poison.
pub fn apply_poison(enemy: &mut Enemy, duration: f64, damage_per_sec: i32) -> bool {
    let r = enemy.resistances.poison;
    if r >= 1.0 {
        return false;
    }
    enemy.status.poisoned = true;
    enemy.status.poison_remaining_secs = duration * (1.0 - r);
    enemy.status.poison_damage_per_sec = (f64::from(damage_per_sec) * (1.0 - r)) as i32;
    true
}

/// Damage a tower. At zero health it is marked destroyed and deactivated.
/// Returns true if this hit destroyed it.
pub fn damage_tower(body: &mut Body, tower: &mut Tower, amount: i32) -> bool {
    if tower.destroyed {
        return false;
    }
    tower.current_health -= amount;
    if tower.current_health > 0 {
        return false;
    }

    tower.current_health = 0;
    tower.destroyed = true;
    body.active = false;
    debug!("Tower {} ({:?}) destroyed", body.id, tower.kind);
    true
}
