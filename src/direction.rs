//! Eight-way compass directions and the angle bucketing shared by facing
//! selection, turret tracking and cone tests.

use serde::{Deserialize, Serialize};

use crate::vector::{Vec2, VecExt};

/// Diagonal component of a compass unit vector.
const DIAGONAL: f32 = 0.7;

/// Compass facing, ordered counter-clockwise starting at RIGHT (0°).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Right,
        Direction::UpRight,
        Direction::Up,
        Direction::UpLeft,
        Direction::Left,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    /// Cardinal probe order used by the blocked-path fallback.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::UpRight => 1,
            Direction::Up => 2,
            Direction::UpLeft => 3,
            Direction::Left => 4,
            Direction::DownLeft => 5,
            Direction::Down => 6,
            Direction::DownRight => 7,
        }
    }

    /// Bucket an angle in degrees.
    ///
    /// Buckets are 45° wide and centred on the compass values, so the
    /// boundaries sit at 22.5° + k·45°. A boundary belongs to the bucket
    /// that starts there: 22.5° is `UpRight`, 337.5° is `Right`.
    pub fn from_degrees(degrees: f32) -> Direction {
        let normalized = degrees.rem_euclid(360.0);
        let shifted = (normalized + 22.5).rem_euclid(360.0);
        let bucket = (shifted / 45.0).floor() as usize;
        Direction::ALL[bucket.min(7)]
    }

    /// Bucket the direction of `delta`. A zero delta has angle 0 (`Right`).
    pub fn from_delta(delta: Vec2) -> Direction {
        Direction::from_degrees(delta.angle_degrees())
    }

    /// Centre angle of the bucket in degrees.
    pub fn degrees(self) -> f32 {
        self.index() as f32 * 45.0
    }

    /// Movement vector for this facing. Diagonals are scaled by 0.7 rather
    /// than normalised.
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::UpRight => Vec2::new(DIAGONAL, DIAGONAL),
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::UpLeft => Vec2::new(-DIAGONAL, DIAGONAL),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::DownLeft => Vec2::new(-DIAGONAL, -DIAGONAL),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::DownRight => Vec2::new(DIAGONAL, -DIAGONAL),
        }
    }

    /// One compass step counter-clockwise.
    pub fn rotate_ccw(self) -> Direction {
        Direction::ALL[(self.index() + 1) % 8]
    }

    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 4) % 8]
    }

    /// True if `delta` falls inside this facing's 45° cone.
    pub fn cone_contains(self, delta: Vec2) -> bool {
        Direction::from_delta(delta) == self
    }

    /// Short lowercase name used when building texture keys.
    pub fn key(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::UpRight => "up_right",
            Direction::Up => "up",
            Direction::UpLeft => "up_left",
            Direction::Left => "left",
            Direction::DownLeft => "down_left",
            Direction::Down => "down",
            Direction::DownRight => "down_right",
        }
    }
}
