use rand::Rng;
use serde::{Deserialize, Serialize};

/// Compass heading of a simulated entity.
///
/// Discriminants are quarter turns clockwise from North, so turning is
/// arithmetic modulo 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Uniformly random heading
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Rotate by `quarter_turns` (positive = clockwise). Always lands on a valid heading.
    pub fn rotate(self, quarter_turns: i32) -> Self {
        let index = (self as i32 + quarter_turns).rem_euclid(4);
        Self::ALL[index as usize]
    }

    /// Unit step (dx, dy) for one move in this direction
    pub fn delta(self) -> (i64, i64) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }
}

/// Turn applied to the current heading on each simulation step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Keep,
    Right,
    Left,
    Reverse,
}

impl Turn {
    pub fn quarter_turns(self) -> i32 {
        match self {
            Turn::Keep => 0,
            Turn::Right => 1,
            Turn::Left => -1,
            Turn::Reverse => 2,
        }
    }
}

/// A simulated point on the toroidal grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub heading: Heading,
    pub x: u32,
    pub y: u32,
}

impl Entity {
    /// Apply `turn`, then move one unit along the resulting heading.
    ///
    /// Coordinates wrap with a Euclidean modulo so they stay in
    /// `[0, width)` x `[0, height)`.
    pub fn step(self, turn: Turn, width: u32, height: u32) -> Self {
        let heading = self.heading.rotate(turn.quarter_turns());
        let (dx, dy) = heading.delta();
        Self {
            heading,
            x: wrap(self.x, dx, width),
            y: wrap(self.y, dy, height),
        }
    }
}

fn wrap(value: u32, delta: i64, bound: u32) -> u32 {
    (i64::from(value) + delta).rem_euclid(i64::from(bound.max(1))) as u32
}
