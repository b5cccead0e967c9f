//! Reap phase: removes every inactive enemy, tower and projectile.

use hecs::{Entity, World};

use rampart_core::components::Body;

use crate::world_setup::EntityIndex;

/// Despawn all entities whose `Body` is inactive and drop them from the
/// index. Uses a pre-allocated buffer to avoid per-tick allocation.
/// Returns how many entities were removed.
pub fn run(world: &mut World, index: &mut EntityIndex, despawn_buffer: &mut Vec<Entity>) -> usize {
    despawn_buffer.clear();

    for (entity, body) in world.query_mut::<&Body>() {
        if !body.active {
            index.remove(body.id);
            despawn_buffer.push(entity);
        }
    }

    let removed = despawn_buffer.len();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    removed
}
