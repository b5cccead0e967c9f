//! Simulation engine: the coordinator of a tower-defense session.
//!
//! `SimulationEngine` owns the hecs ECS world, the house, the economy and the
//! wave cycle. It processes player commands, runs all systems in a fixed
//! order and produces `GameStateSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;
use std::path::Path;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rampart_core::commands::PlayerCommand;
use rampart_core::components::{Body, Enemy, House, Tower};
use rampart_core::constants::*;
use rampart_core::enums::*;
use rampart_core::events::GameEvent;
use rampart_core::profiles::{tower_profile, upgrade_step};
use rampart_core::state::{EnemyView, GameStateSnapshot, ProjectileView, TowerView};
use rampart_core::types::{EntityId, SimTime, Vector2D};

use crate::error::{CommandError, ConfigError, PlacementError};
use crate::event_bus::{EventBus, SubscriptionId};
use crate::levels;
use crate::systems;
use crate::systems::enemy::EnemyOutcome;
use crate::systems::snapshot::SnapshotContext;
use crate::systems::wave_spawner::{EnemyBlueprint, WaveState};
use crate::world_setup::{self, EntityIndex};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Path layout, 1..=3.
    pub level: u32,
    pub starting_money: u32,
    /// Surviving this long wins the game.
    pub game_duration_secs: f64,
    /// Pause between the end of one wave and the start of the next.
    pub wave_delay_secs: f64,
    pub house_max_health: i32,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            level: 1,
            starting_money: STARTING_MONEY,
            game_duration_secs: GAME_DURATION_SECS,
            wave_delay_secs: WAVE_DELAY_SECS,
            house_max_health: HOUSE_MAX_HEALTH,
            time_scale: 1.0,
        }
    }
}

impl SimConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    index: EntityIndex,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    bus: EventBus,
    /// True while systems run; events are deferred to the flush step.
    in_update: bool,

    level: u32,
    paths: Vec<Vec<Vector2D>>,
    house: House,
    waves: WaveState,

    money: u32,
    score: u32,
    kills: u32,

    game_duration_secs: f64,
    wave_delay_secs: f64,
    house_max_health: i32,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let level = levels::clamp_level(config.level);
        let paths = levels::paths_for_level(level);
        let house = build_house(&paths, config.house_max_health);

        Self {
            world: World::new(),
            index: EntityIndex::default(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            bus: EventBus::new(),
            in_update: false,
            level,
            paths,
            house,
            waves: WaveState::default(),
            money: config.starting_money,
            score: 0,
            kills: 0,
            game_duration_secs: config.game_duration_secs,
            wave_delay_secs: config.wave_delay_secs,
            house_max_health: config.house_max_health,
        }
    }

    // --- Commands ---

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Process queued commands, advance one nominal step and return the
    /// resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();
        self.update(DT);
        self.snapshot()
    }

    /// Advance the simulation by `dt` seconds (clamped to `[0, MAX_DT]`).
    ///
    /// Order: game timer, enemies, towers, projectiles, house, waves, event
    /// flush, reap, end conditions. No-op once the game is won or lost, and
    /// while paused.
    pub fn update(&mut self, dt: f64) {
        if self.phase != GamePhase::Active {
            return;
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };

        // 1. Game timer
        self.time.advance(dt);
        if self.time.elapsed_secs >= self.game_duration_secs {
            self.phase = GamePhase::Won;
            info!("Game won at {:.2}s, score {}", self.time.elapsed_secs, self.score);
            self.bus.fire(&GameEvent::GameOver {
                won: true,
                score: self.score,
            });
            return;
        }

        self.in_update = true;

        // 2. Enemies
        let outcomes = systems::enemy::run(&mut self.world, dt);
        for outcome in outcomes {
            self.settle_enemy(outcome);
        }
        // 3. Towers (may fire projectiles)
        systems::tower::run(&mut self.world, &mut self.index, &mut self.bus, dt);
        // 4. Projectiles (may damage enemies)
        systems::projectile::run(&mut self.world, &self.index, &mut self.bus, dt);
        // 5. House is passive.
        // 6. Waves (may spawn enemies)
        let completed = systems::wave_spawner::run(
            &mut self.world,
            &mut self.index,
            &mut self.rng,
            &mut self.waves,
            &self.paths,
            self.wave_delay_secs,
            &mut self.bus,
            dt,
        );
        if let Some(wave) = completed {
            let bonus = wave * WAVE_BONUS_PER_WAVE;
            self.add_money(bonus);
            self.emit(GameEvent::WaveCompleted { wave, bonus });
        }

        // 7. Deferred events
        self.in_update = false;
        self.bus.flush();

        // 8. Reap
        self.reap();

        // 9. End conditions
        if self.house.current_health <= 0 {
            self.phase = GamePhase::Lost;
            info!("House destroyed, game lost with score {}", self.score);
            self.bus.fire(&GameEvent::GameOver {
                won: false,
                score: self.score,
            });
        }
    }

    /// Build a snapshot of the current state.
    pub fn snapshot(&self) -> GameStateSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &SnapshotContext {
                time: self.time,
                phase: self.phase,
                level: self.level,
                game_duration_secs: self.game_duration_secs,
                wave_delay_secs: self.wave_delay_secs,
                paths: &self.paths,
                house: &self.house,
                waves: &self.waves,
                money: self.money,
                score: self.score,
                kills: self.kills,
            },
        )
    }

    /// Place a tower. Returns false (leaving state unchanged) if the
    /// position is illegal or funds are short.
    pub fn place_tower(&mut self, kind: TowerKind, x: f64, y: f64) -> bool {
        match self.try_place_tower(kind, x, y) {
            Ok(_) => true,
            Err(e) => {
                warn!("Rejected {:?} tower at ({}, {}): {}", kind, x, y, e);
                false
            }
        }
    }

    pub fn try_place_tower(
        &mut self,
        kind: TowerKind,
        x: f64,
        y: f64,
    ) -> Result<EntityId, CommandError> {
        self.ensure_not_over()?;
        let position = Vector2D::new(x, y);
        self.validate_tower_position(position)?;

        let cost = tower_profile(kind).base_cost;
        if self.money < cost {
            return Err(CommandError::InsufficientFunds {
                needed: cost,
                available: self.money,
            });
        }

        self.subtract_money(cost);
        let tower = world_setup::spawn_tower(&mut self.world, &mut self.index, kind, position);
        debug!("Placed {:?} tower {} at {} for {}", kind, tower, position, cost);
        self.emit(GameEvent::TowerPlaced {
            tower,
            kind,
            position,
            cost,
        });
        Ok(tower)
    }

    /// A position is legal when it keeps `MIN_PATH_CLEARANCE` from every
    /// waypoint of every path and `MIN_TOWER_SPACING` from every standing
    /// tower. Destroyed towers do not block.
    pub fn validate_tower_position(&self, position: Vector2D) -> Result<(), PlacementError> {
        for waypoint in self.paths.iter().flatten() {
            let distance = position.distance_to(waypoint);
            if distance < MIN_PATH_CLEARANCE {
                return Err(PlacementError::TooCloseToPath {
                    position,
                    waypoint: *waypoint,
                    distance,
                    minimum: MIN_PATH_CLEARANCE,
                });
            }
        }

        for (_, tower, tower_pos) in world_setup::standing_towers(&self.world) {
            let distance = position.distance_to(&tower_pos);
            if distance < MIN_TOWER_SPACING {
                return Err(PlacementError::TooCloseToTower {
                    position,
                    tower,
                    distance,
                    minimum: MIN_TOWER_SPACING,
                });
            }
        }
        Ok(())
    }

    /// Upgrade a tower by one level. Returns false at max level or when
    /// funds are short.
    pub fn upgrade_tower(&mut self, tower: EntityId) -> bool {
        match self.try_upgrade_tower(tower) {
            Ok(_) => true,
            Err(e) => {
                warn!("Rejected upgrade of tower {}: {}", tower, e);
                false
            }
        }
    }

    /// Returns the tower's new level.
    pub fn try_upgrade_tower(&mut self, tower_id: EntityId) -> Result<u32, CommandError> {
        self.ensure_not_over()?;
        let entity = self.standing_tower(tower_id)?;

        let (kind, level, price) = {
            let tower = self
                .world
                .get::<&Tower>(entity)
                .map_err(|_| CommandError::UnknownTower(tower_id))?;
            (tower.kind, tower.level, tower.upgrade_cost * tower.level)
        };
        let profile = tower_profile(kind);
        let step = match upgrade_step(kind, level + 1) {
            Some(step) if level < profile.max_level => step,
            _ => {
                return Err(CommandError::MaxLevel {
                    tower: tower_id,
                    level,
                })
            }
        };
        if self.money < price {
            return Err(CommandError::InsufficientFunds {
                needed: price,
                available: self.money,
            });
        }

        self.subtract_money(price);
        let new_level = {
            let mut tower = self
                .world
                .get::<&mut Tower>(entity)
                .map_err(|_| CommandError::UnknownTower(tower_id))?;
            tower.level += 1;
            tower.damage += step.damage;
            tower.fire_rate += step.fire_rate;
            tower.range += step.range;
            tower.invested += price;
            tower.upgrade_cost =
                (f64::from(tower.upgrade_cost) * profile.upgrade_cost_multiplier) as u32;
            tower.level
        };

        debug!("Upgraded tower {} to level {} for {}", tower_id, new_level, price);
        self.emit(GameEvent::TowerUpgraded {
            tower: tower_id,
            level: new_level,
            cost: price,
        });
        Ok(new_level)
    }

    /// Sell a tower for 70% of everything invested in it.
    pub fn sell_tower(&mut self, tower: EntityId) -> bool {
        match self.try_sell_tower(tower) {
            Ok(_) => true,
            Err(e) => {
                warn!("Rejected sale of tower {}: {}", tower, e);
                false
            }
        }
    }

    /// Returns the refund.
    pub fn try_sell_tower(&mut self, tower_id: EntityId) -> Result<u32, CommandError> {
        self.ensure_not_over()?;
        let entity = self.standing_tower(tower_id)?;

        let refund = {
            let (body, tower) = self
                .world
                .query_one_mut::<(&mut Body, &Tower)>(entity)
                .map_err(|_| CommandError::UnknownTower(tower_id))?;
            body.active = false;
            systems::snapshot::sell_value(tower)
        };
        self.reap();

        self.add_money(refund);
        debug!("Sold tower {} for {}", tower_id, refund);
        self.emit(GameEvent::TowerSold {
            tower: tower_id,
            refund,
        });
        Ok(refund)
    }

    /// Change a standing tower's targeting strategy.
    pub fn set_targeting(
        &mut self,
        tower_id: EntityId,
        mode: TargetingMode,
    ) -> Result<(), CommandError> {
        let entity = self.standing_tower(tower_id)?;
        let mut tower = self
            .world
            .get::<&mut Tower>(entity)
            .map_err(|_| CommandError::UnknownTower(tower_id))?;
        tower.targeting = mode;
        Ok(())
    }

    /// Switch to another path layout (clamped to 1..=3) and rebuild the
    /// house at its end. Enemies already on the field keep their paths.
    pub fn set_level(&mut self, level: u32) {
        self.level = levels::clamp_level(level);
        self.paths = levels::paths_for_level(self.level);
        self.house = build_house(&self.paths, self.house_max_health);
        info!(
            "Level {} selected, house at {}",
            self.level, self.house.position
        );
    }

    /// Spawn an enemy of `kind` scaled to `wave` on a random path.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, wave: u32) -> Option<EntityId> {
        let event = systems::wave_spawner::spawn_on_random_path(
            &mut self.world,
            &mut self.index,
            &mut self.rng,
            &self.paths,
            EnemyBlueprint { kind, level: wave },
        )?;
        let id = match &event {
            GameEvent::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        };
        self.emit(event);
        id
    }

    /// Launch a projectile from `origin` homing on an active enemy.
    pub fn fire_projectile(
        &mut self,
        kind: ProjectileKind,
        origin: Vector2D,
        target: EntityId,
        damage: i32,
    ) -> Result<EntityId, CommandError> {
        let target_pos = self
            .enemy_entity(target)
            .and_then(|entity| self.world.get::<&Body>(entity).ok().map(|b| b.position))
            .ok_or(CommandError::UnknownEnemy(target))?;

        let projectile = world_setup::spawn_projectile(
            &mut self.world,
            &mut self.index,
            kind,
            origin,
            target_pos,
            Some(target),
            None,
            damage,
        );
        self.emit(GameEvent::ProjectileFired {
            projectile,
            kind,
            source: None,
            target: Some(target),
        });
        Ok(projectile)
    }

    pub fn add_money(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
        self.emit(GameEvent::PlayerMoneyChanged { money: self.money });
    }

    /// Never drops below zero.
    pub fn subtract_money(&mut self, amount: u32) {
        self.money = self.money.saturating_sub(amount);
        self.emit(GameEvent::PlayerMoneyChanged { money: self.money });
    }

    // --- Subscriptions ---

    /// Register a callback for one event category. Callbacks run on the
    /// simulation thread and must return promptly.
    pub fn subscribe<F>(&mut self, category: EventCategory, callback: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.bus.subscribe(category, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // --- Queries ---

    /// Copies of all active enemies, by id.
    pub fn enemies(&self) -> Vec<EnemyView> {
        systems::snapshot::build_enemies(&self.world)
    }

    /// Copies of all active towers, by id.
    pub fn towers(&self) -> Vec<TowerView> {
        systems::snapshot::build_towers(&self.world)
    }

    /// Copies of all active projectiles, by id.
    pub fn projectiles(&self) -> Vec<ProjectileView> {
        systems::snapshot::build_projectiles(&self.world)
    }

    pub fn tower(&self, id: EntityId) -> Option<TowerView> {
        let entity = self.index.get(id)?;
        let mut query = self.world.query_one::<(&Body, &Tower)>(entity).ok()?;
        query
            .get()
            .map(|(body, tower)| systems::snapshot::tower_view(body, tower))
    }

    pub fn enemy(&self, id: EntityId) -> Option<EnemyView> {
        self.enemies().into_iter().find(|e| e.id == id)
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn paths(&self) -> &[Vec<Vector2D>] {
        &self.paths
    }

    pub fn house(&self) -> &House {
        &self.house
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn current_wave(&self) -> u32 {
        self.waves.current_wave
    }

    pub fn wave_in_progress(&self) -> bool {
        self.waves.in_progress()
    }

    pub fn time_until_next_wave(&self) -> f64 {
        self.waves.time_until_next_wave(self.wave_delay_secs)
    }

    pub fn game_duration_secs(&self) -> f64 {
        self.game_duration_secs
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    pub fn is_lost(&self) -> bool {
        self.phase == GamePhase::Lost
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a mutable reference to the ECS world (for tests and tooling).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Resolve an id through the live-entity index.
    pub fn entity(&self, id: EntityId) -> Option<hecs::Entity> {
        self.index.get(id)
    }

    // --- Internals ---

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::PlaceTower { kind, x, y } => {
                self.place_tower(kind, x, y);
            }
            PlayerCommand::UpgradeTower { tower } => {
                self.upgrade_tower(tower);
            }
            PlayerCommand::SellTower { tower } => {
                self.sell_tower(tower);
            }
            PlayerCommand::SetTargeting { tower, mode } => {
                if let Err(e) = self.set_targeting(tower, mode) {
                    warn!("Rejected targeting change on tower {}: {}", tower, e);
                }
            }
            PlayerCommand::SetLevel { level } => {
                self.set_level(level);
            }
            PlayerCommand::SpawnEnemy { kind, wave } => {
                self.spawn_enemy(kind, wave);
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
        }
    }

    /// Deliver now, or at the flush step while systems are running.
    fn emit(&mut self, event: GameEvent) {
        if self.in_update {
            self.bus.queue(event);
        } else {
            self.bus.fire(&event);
        }
    }

    /// Apply house damage or rewards for an enemy that left the field.
    fn settle_enemy(&mut self, outcome: EnemyOutcome) {
        match outcome {
            EnemyOutcome::ReachedEnd { id, kind, damage } => {
                self.house.current_health = (self.house.current_health - damage).max(0);
                self.emit(GameEvent::PlayerHealthChanged {
                    health: self.house.current_health,
                    max_health: self.house.max_health,
                });
                self.emit(GameEvent::EnemyReachedEnd {
                    enemy: id,
                    kind,
                    damage,
                });
            }
            EnemyOutcome::Died {
                id,
                kind,
                reward,
                last_hit_by,
            } => {
                self.add_money(reward);
                self.kills += 1;
                self.score = self
                    .score
                    .saturating_add(reward.saturating_mul(SCORE_PER_REWARD));

                let credited = last_hit_by.filter(|tower_id| self.credit_kill(*tower_id));
                self.emit(GameEvent::EnemyKilled {
                    enemy: id,
                    kind,
                    reward,
                    tower: credited,
                });
            }
        }
    }

    /// Count a kill for a tower that is still standing.
    fn credit_kill(&mut self, tower_id: EntityId) -> bool {
        let Ok(entity) = self.standing_tower(tower_id) else {
            return false;
        };
        match self.world.get::<&mut Tower>(entity) {
            Ok(mut tower) => {
                tower.kills += 1;
                true
            }
            Err(_) => false,
        }
    }

    fn reap(&mut self) {
        systems::cleanup::run(&mut self.world, &mut self.index, &mut self.despawn_buffer);
    }

    fn ensure_not_over(&self) -> Result<(), CommandError> {
        if self.phase.is_over() {
            return Err(CommandError::GameOver);
        }
        Ok(())
    }

    /// Entity of an active, non-destroyed tower.
    fn standing_tower(&self, id: EntityId) -> Result<hecs::Entity, CommandError> {
        let entity = self.index.get(id).ok_or(CommandError::UnknownTower(id))?;
        let mut query = self
            .world
            .query_one::<(&Body, &Tower)>(entity)
            .map_err(|_| CommandError::UnknownTower(id))?;
        match query.get() {
            Some((body, tower)) if body.active && !tower.destroyed => Ok(entity),
            _ => Err(CommandError::UnknownTower(id)),
        }
    }

    /// Entity of an active enemy.
    fn enemy_entity(&self, id: EntityId) -> Option<hecs::Entity> {
        let entity = self.index.get(id)?;
        let mut query = self.world.query_one::<(&Body, &Enemy)>(entity).ok()?;
        let (body, _) = query.get()?;
        body.active.then_some(entity)
    }
}

fn build_house(paths: &[Vec<Vector2D>], max_health: i32) -> House {
    House {
        position: levels::house_position(paths),
        max_health,
        current_health: max_health,
    }
}
