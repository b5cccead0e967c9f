//! Wave system: composition generation, spawn pacing and the wave cycle.
//!
//! The cycle alternates between an idle countdown and an active wave. A
//! wave ends once its spawn queue is empty and no enemy is left in the
//! world; the next one starts after the configured delay.

use std::collections::VecDeque;

use hecs::World;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use rampart_core::components::Enemy;
use rampart_core::constants::*;
use rampart_core::enums::{EnemyKind, WavePhase};
use rampart_core::events::GameEvent;
use rampart_core::types::Vector2D;

use crate::event_bus::EventBus;
use crate::world_setup::{self, EntityIndex};

/// An enemy waiting in the spawn queue: its kind and the wave level its
/// stats are scaled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyBlueprint {
    pub kind: EnemyKind,
    pub level: u32,
}

/// Spawn queue and pacing for the wave in progress.
#[derive(Debug, Clone)]
pub struct WaveManager {
    queue: VecDeque<EnemyBlueprint>,
    time_since_last_spawn: f64,
    spawn_interval: f64,
    active: bool,
    current_wave: u32,
}

impl Default for WaveManager {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            time_since_last_spawn: 0.0,
            spawn_interval: BASE_SPAWN_INTERVAL_SECS,
            active: false,
            current_wave: 0,
        }
    }
}

impl WaveManager {
    /// Generate and enqueue the composition for `wave`.
    pub fn start_wave(&mut self, wave: u32, rng: &mut ChaCha8Rng) {
        self.current_wave = wave;
        self.active = true;
        self.time_since_last_spawn = 0.0;
        self.spawn_interval = spawn_interval(wave);

        let composition = if is_boss_wave(wave) {
            generate_boss(wave)
        } else {
            generate_regular(wave, rng)
        };
        self.queue = composition.into();
    }

    /// Accumulate `dt` and dequeue one blueprint once the spawn interval
    /// has elapsed.
    pub fn next_enemy(&mut self, dt: f64) -> Option<EnemyBlueprint> {
        if !self.active || self.queue.is_empty() {
            return None;
        }

        self.time_since_last_spawn += dt;
        if self.time_since_last_spawn >= self.spawn_interval {
            self.time_since_last_spawn = 0.0;
            return self.queue.pop_front();
        }
        None
    }

    pub fn has_more_enemies(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn end_wave(&mut self) {
        self.active = false;
        self.queue.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn time_until_next_spawn(&self) -> f64 {
        (self.spawn_interval - self.time_since_last_spawn).max(0.0)
    }
}

/// Wave counter and the idle/active cycle driven by the engine.
#[derive(Debug, Clone, Default)]
pub struct WaveState {
    pub phase: WavePhase,
    pub current_wave: u32,
    pub time_since_wave_end: f64,
    pub manager: WaveManager,
}

impl WaveState {
    pub fn in_progress(&self) -> bool {
        self.phase == WavePhase::Active
    }

    /// Seconds until the next wave starts; 0 while a wave is in progress.
    pub fn time_until_next_wave(&self, wave_delay: f64) -> f64 {
        match self.phase {
            WavePhase::Active => 0.0,
            WavePhase::Idle => (wave_delay - self.time_since_wave_end).max(0.0),
        }
    }
}

/// Every `BOSS_WAVE_INTERVAL`th wave is a boss wave.
pub fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_INTERVAL == 0
}

/// `max(0.2, 1.0 - 0.05 * wave)` seconds.
pub fn spawn_interval(wave: u32) -> f64 {
    (BASE_SPAWN_INTERVAL_SECS - SPAWN_INTERVAL_STEP_SECS * f64::from(wave))
        .max(MIN_SPAWN_INTERVAL_SECS)
}

pub fn wave_title(wave: u32) -> String {
    if is_boss_wave(wave) {
        "Boss Wave".to_string()
    } else if wave > 0 && wave % 5 == 0 {
        "Elite Wave".to_string()
    } else {
        format!("Wave {wave}")
    }
}

/// Per-kind counts of a regular wave before elemental resolution and
/// shuffling: (basic, fast, armored, flying, elemental, regenerating).
///
/// Percentages are truncated independently, so the counts need not add up
/// to the nominal wave size.
pub fn regular_counts(wave: u32) -> (u32, u32, u32, u32, u32, u32) {
    let total = (REGULAR_WAVE_BASE + wave).min(REGULAR_WAVE_MAX);
    let share = |pct: u32| total * pct / 100;

    let basic = share(40);
    let mut fast = share(25);
    let mut armored = share(15);
    let mut flying = share(10);
    let mut elemental = share(10);

    if wave >= 5 {
        fast += 2;
    }
    if wave >= 10 {
        armored += 2;
        flying += 2;
    }
    if wave >= 15 {
        elemental += 3;
    }
    let regenerating = if wave >= REGEN_FIRST_WAVE {
        (wave / 4).min(REGEN_WAVE_CAP)
    } else {
        0
    };

    (basic, fast, armored, flying, elemental, regenerating)
}

/// Shuffled regular composition for `wave`. Each elemental slot is fire or
/// ice with equal probability.
pub fn generate_regular(wave: u32, rng: &mut ChaCha8Rng) -> Vec<EnemyBlueprint> {
    let (basic, fast, armored, flying, elemental, regenerating) = regular_counts(wave);
    let mut kinds = Vec::new();

    let mut push = |kind: EnemyKind, count: u32| {
        kinds.extend(std::iter::repeat(kind).take(count as usize));
    };
    push(EnemyKind::Basic, basic);
    push(EnemyKind::Fast, fast);
    push(EnemyKind::Armored, armored);
    push(EnemyKind::Flying, flying);
    for _ in 0..elemental {
        let kind = if rng.gen_bool(0.5) {
            EnemyKind::FireElemental
        } else {
            EnemyKind::IceElemental
        };
        push(kind, 1);
    }
    push(EnemyKind::Regenerating, regenerating);

    let mut composition: Vec<EnemyBlueprint> = kinds
        .into_iter()
        .map(|kind| EnemyBlueprint { kind, level: wave })
        .collect();
    composition.shuffle(rng);
    composition
}

/// Boss composition: the boss first, then `min(15, wave / 2)` supporters
/// cycling armored, fast, flying, two levels below the wave.
pub fn generate_boss(wave: u32) -> Vec<EnemyBlueprint> {
    const SUPPORT: [EnemyKind; 3] = [EnemyKind::Armored, EnemyKind::Fast, EnemyKind::Flying];

    let support_count = (wave / 2).min(BOSS_SUPPORT_MAX) as usize;
    let support_level = wave.saturating_sub(2);

    std::iter::once(EnemyBlueprint {
        kind: EnemyKind::Boss,
        level: wave,
    })
    .chain((0..support_count).map(|i| EnemyBlueprint {
        kind: SUPPORT[i % SUPPORT.len()],
        level: support_level,
    }))
    .collect()
}

/// Drive the wave cycle by `dt`. Returns the number of a wave that was
/// completed this tick, so the engine can pay the bonus.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    index: &mut EntityIndex,
    rng: &mut ChaCha8Rng,
    waves: &mut WaveState,
    paths: &[Vec<Vector2D>],
    wave_delay: f64,
    bus: &mut EventBus,
    dt: f64,
) -> Option<u32> {
    let mut completed = None;

    match waves.phase {
        WavePhase::Idle => {
            waves.time_since_wave_end += dt;
            if waves.time_since_wave_end >= wave_delay {
                start_next_wave(waves, rng, bus);
            }
        }
        WavePhase::Active => {
            let enemies_left = world.query::<&Enemy>().iter().count();
            if enemies_left == 0 && !waves.manager.has_more_enemies() {
                waves.phase = WavePhase::Idle;
                waves.manager.end_wave();
                info!("Wave {} completed", waves.current_wave);
                completed = Some(waves.current_wave);
            }
        }
    }

    if waves.phase == WavePhase::Active {
        if let Some(blueprint) = waves.manager.next_enemy(dt) {
            if let Some(event) = spawn_on_random_path(world, index, rng, paths, blueprint) {
                bus.queue(event);
            }
        }
    }

    completed
}

fn start_next_wave(waves: &mut WaveState, rng: &mut ChaCha8Rng, bus: &mut EventBus) {
    waves.current_wave += 1;
    waves.phase = WavePhase::Active;
    waves.time_since_wave_end = 0.0;
    waves.manager.start_wave(waves.current_wave, rng);

    let title = wave_title(waves.current_wave);
    let enemy_count = waves.manager.remaining();
    info!("{} started: {} enemies", title, enemy_count);
    bus.queue(GameEvent::WaveStarted {
        wave: waves.current_wave,
        title,
        enemy_count,
    });
}

/// Bind the enemy to a randomly chosen path of the level and spawn it.
/// Returns the spawn event for the caller to deliver.
pub fn spawn_on_random_path(
    world: &mut World,
    index: &mut EntityIndex,
    rng: &mut ChaCha8Rng,
    paths: &[Vec<Vector2D>],
    blueprint: EnemyBlueprint,
) -> Option<GameEvent> {
    let Some(path) = paths.choose(rng) else {
        warn!("No path to spawn {:?} on", blueprint.kind);
        return None;
    };

    let position = path.first().copied().unwrap_or_default();
    let enemy = world_setup::spawn_enemy(world, index, blueprint.kind, blueprint.level, path.clone());
    Some(GameEvent::EnemySpawned {
        enemy,
        kind: blueprint.kind,
        position,
    })
}
