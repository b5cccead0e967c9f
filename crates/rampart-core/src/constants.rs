//! Simulation constants and tuning parameters.

/// Nominal update rate of the game loop (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per nominal update.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Upper bound for a single update step. Larger steps (e.g. after a stall)
/// are clamped so movement and collisions stay stable.
pub const MAX_DT: f64 = 1.0 / 30.0;

// --- Game rules ---

/// Money the player starts with.
pub const STARTING_MONEY: u32 = 200;

/// Game length in seconds; surviving it wins the game.
pub const GAME_DURATION_SECS: f64 = 30.0;

/// Delay between the end of one wave and the start of the next (seconds).
pub const WAVE_DELAY_SECS: f64 = 5.0;

/// Money granted per wave number when a wave is cleared.
pub const WAVE_BONUS_PER_WAVE: u32 = 10;

/// Score granted per unit of kill reward.
pub const SCORE_PER_REWARD: u32 = 10;

/// Number of predefined path layouts.
pub const LEVEL_COUNT: u32 = 3;

// --- House ---

pub const HOUSE_MAX_HEALTH: i32 = 100;

// --- Placement ---

/// Minimum distance between a tower and any path waypoint.
pub const MIN_PATH_CLEARANCE: f64 = 30.0;

/// Minimum distance between two towers.
pub const MIN_TOWER_SPACING: f64 = 35.0;

/// Fraction of the invested money refunded when selling a tower.
pub const SELL_REFUND_RATIO: f64 = 0.7;

// --- Enemies ---

/// Distance at which an enemy snaps to its next waypoint.
pub const WAYPOINT_EPSILON: f64 = 5.0;

/// Range of the enemy ranged attack against towers.
pub const ENEMY_RANGED_RANGE: f64 = 90.0;

/// Enemy ranged attacks per second.
pub const ENEMY_RANGED_FIRE_RATE: f64 = 0.5;

/// Radius of the enemy melee attack against towers.
pub const ENEMY_MELEE_RANGE: f64 = 15.0;

/// Default damage dealt to the house on reaching the end of a path.
pub const ENEMY_DEFAULT_HOUSE_DAMAGE: i32 = 1;

/// Default damage dealt to towers.
pub const ENEMY_DEFAULT_TOWER_DAMAGE: i32 = 5;

/// Regenerating enemies heal every this many seconds...
pub const REGEN_INTERVAL_SECS: f64 = 1.0;

/// ...by this many hit points.
pub const REGEN_AMOUNT: i32 = 5;

// --- Status effects ---

/// Baseline freeze duration before resistance scaling (seconds).
pub const FREEZE_DURATION_SECS: f64 = 2.0;

/// Baseline poison duration before resistance scaling (seconds).
pub const POISON_DURATION_SECS: f64 = 5.0;

// --- Towers ---

pub const TOWER_MAX_LEVEL: u32 = 4;

pub const TOWER_MAX_HEALTH: i32 = 100;

/// Splash radius of cannon shots and cannonballs.
pub const CANNON_SPLASH_RADIUS: f64 = 25.0;

// --- Projectiles ---

/// Flight distance after which a projectile without a live target expires.
pub const PROJECTILE_DEFAULT_MAX_RANGE: f64 = 300.0;

/// Added to the projectile size to get its collision radius.
pub const PROJECTILE_HIT_MARGIN: f64 = 6.0;

// --- Waves ---

/// Every this many waves is a boss wave.
pub const BOSS_WAVE_INTERVAL: u32 = 10;

/// Regular wave size is `min(REGULAR_WAVE_MAX, REGULAR_WAVE_BASE + wave)`.
pub const REGULAR_WAVE_BASE: u32 = 8;
pub const REGULAR_WAVE_MAX: u32 = 30;

/// Boss support count is `min(BOSS_SUPPORT_MAX, wave / 2)`.
pub const BOSS_SUPPORT_MAX: u32 = 15;

/// Regenerating enemies join from this wave on, `min(REGEN_WAVE_CAP, wave / 4)` of them.
pub const REGEN_FIRST_WAVE: u32 = 8;
pub const REGEN_WAVE_CAP: u32 = 3;

/// Spawn interval is `max(MIN_SPAWN_INTERVAL, BASE_SPAWN_INTERVAL - SPAWN_INTERVAL_STEP * wave)`.
pub const BASE_SPAWN_INTERVAL_SECS: f64 = 1.0;
pub const MIN_SPAWN_INTERVAL_SECS: f64 = 0.2;
pub const SPAWN_INTERVAL_STEP_SECS: f64 = 0.05;
