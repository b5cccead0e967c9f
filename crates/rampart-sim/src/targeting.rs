//! Target selection strategies.
//!
//! A tower hands the strategy every eligible enemy in range; the strategy
//! picks at most one. Candidates must be supplied in ascending id order:
//! on ties the earliest candidate keeps the slot.

use hecs::Entity;

use rampart_core::enums::TargetingMode;
use rampart_core::types::{EntityId, Vector2D};

/// An enemy a tower could shoot at.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub entity: Entity,
    pub id: EntityId,
    pub position: Vector2D,
    pub path_progress: f64,
    pub current_hp: i32,
}

/// Pick a target according to `mode`. `None` only when `candidates` is empty.
pub fn select_target(
    mode: TargetingMode,
    tower_position: Vector2D,
    candidates: &[Candidate],
) -> Option<Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        let replace = match best {
            None => true,
            Some(current) => beats(mode, tower_position, candidate, current),
        };
        if replace {
            best = Some(candidate);
        }
    }
    best.copied()
}

/// Strictly better than the current pick.
fn beats(mode: TargetingMode, tower_position: Vector2D, a: &Candidate, b: &Candidate) -> bool {
    match mode {
        TargetingMode::First => a.path_progress > b.path_progress,
        TargetingMode::Last => a.path_progress < b.path_progress,
        TargetingMode::Strongest => a.current_hp > b.current_hp,
        TargetingMode::Weakest => a.current_hp < b.current_hp,
        TargetingMode::Closest => {
            tower_position.distance_to(&a.position) < tower_position.distance_to(&b.position)
        }
    }
}
