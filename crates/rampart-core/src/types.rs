//! Fundamental geometric and simulation types.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D point or direction in simulation space (pixels).
/// x grows to the right, y grows downward (screen convention).
///
/// Values are treated as immutable: every operation returns a new vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of updates applied so far.
    pub tick: u64,
    /// Elapsed game time in seconds.
    pub elapsed_secs: f64,
}

/// Globally unique, monotonically increasing identity of a simulated entity.
///
/// Two entities are the same entity iff their ids are equal, regardless of
/// their current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiply both components by `scalar`.
    pub fn scale(self, scalar: f64) -> Self {
        (DVec2::from(self) * scalar).into()
    }

    /// Euclidean length.
    pub fn magnitude(self) -> f64 {
        DVec2::from(self).length()
    }

    /// Distance to another point: `(other - self).magnitude()`.
    pub fn distance_to(&self, other: &Vector2D) -> f64 {
        (*other - *self).magnitude()
    }

    /// Unit vector in the same direction. The zero vector normalizes to zero,
    /// so callers never divide by a zero length.
    pub fn normalize(self) -> Self {
        DVec2::from(self).normalize_or_zero().into()
    }

    /// Overwrite in place. Only meant for transient cursors (e.g. a placement
    /// preview), never for entity positions.
    pub fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

impl From<DVec2> for Vector2D {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vector2D> for DVec2 {
    fn from(v: Vector2D) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        (DVec2::from(self) + DVec2::from(rhs)).into()
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        (DVec2::from(self) - DVec2::from(rhs)).into()
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    fn mul(self, rhs: f64) -> Vector2D {
        self.scale(rhs)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl SimTime {
    /// Advance by one update of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
