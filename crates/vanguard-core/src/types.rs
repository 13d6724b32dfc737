//! Fundamental grid and resource types.

use serde::{Deserialize, Serialize};

/// Opaque entity identifier (ships, torpedoes, mines, planets...).
pub type EntityId = String;

/// Integer cell coordinate on a sector or quadrant grid.
/// x grows to the east, y grows to the south.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Offsets of the 8 Chebyshev neighbours, row by row from the north-west.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: max(|dx|, |dy|). Used for every range check.
    pub fn distance_to(&self, other: &Position) -> i32 {
        (other.x - self.x).abs().max((other.y - self.y).abs())
    }

    /// One cell toward `target`.
    ///
    /// Moves along the axis with the larger absolute delta; ties go to x.
    /// Successive calls therefore trace a staircase, not a Bresenham line.
    pub fn step_toward(&self, target: &Position) -> Position {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        if dx == 0 && dy == 0 {
            return *self;
        }
        if dx.abs() >= dy.abs() {
            Position::new(self.x + dx.signum(), self.y)
        } else {
            Position::new(self.x, self.y + dy.signum())
        }
    }

    /// The 8 surrounding cells (unbounded; callers filter by sector bounds).
    pub fn neighbors(&self) -> impl Iterator<Item = Position> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |(dx, dy)| Position::new(self.x + dx, self.y + dy))
    }
}

/// Chebyshev distance between two positions.
pub fn distance(a: &Position, b: &Position) -> i32 {
    a.distance_to(b)
}

/// Advance one cell from `from` toward `to`. See [`Position::step_toward`].
pub fn move_one_step(from: &Position, to: &Position) -> Position {
    from.step_toward(to)
}

/// Grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }
}

/// A bounded quantity with a current and maximum value.
///
/// Every mutation clamps `current` into `[0, max]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub current: f64,
    pub max: f64,
}

impl Gauge {
    /// A full gauge.
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }

    pub fn new(current: f64, max: f64) -> Self {
        let mut g = Self { current, max };
        g.clamp();
        g
    }

    /// current / max, or 0.0 when max is 0.
    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Amount missing to reach max.
    pub fn deficit(&self) -> f64 {
        (self.max - self.current).max(0.0)
    }

    pub fn set(&mut self, value: f64) {
        self.current = value;
        self.clamp();
    }

    /// Add `amount`, returning how much was actually added.
    pub fn add(&mut self, amount: f64) -> f64 {
        let before = self.current;
        self.current += amount;
        self.clamp();
        self.current - before
    }

    /// Remove `amount`, returning how much was actually removed.
    pub fn sub(&mut self, amount: f64) -> f64 {
        let before = self.current;
        self.current -= amount;
        self.clamp();
        before - self.current
    }

    /// Set current to at least `fraction * max`.
    pub fn raise_to_fraction(&mut self, fraction: f64) {
        let floor = self.max * fraction;
        if self.current < floor {
            self.current = floor;
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        if self.max < 0.0 {
            self.max = 0.0;
        }
        self.current = self.current.clamp(0.0, self.max);
    }
}
