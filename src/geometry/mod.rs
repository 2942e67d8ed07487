mod obstacle;
mod obstacle_set;

pub use self::obstacle::{Obstacle, path_blocked};
pub use self::obstacle_set::ObstacleSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn angle_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Move exactly `step` along the unit vector towards `target`.
    ///
    /// Returns `None` when `target` coincides with `self`, since there is no direction to step in.
    pub fn steer_towards(&self, target: &Point, step: f64) -> Option<Point> {
        let norm = self.distance(target);
        if norm <= f64::EPSILON {
            return None;
        }
        let s = step / norm;
        Some(Point::new(
            self.x + s * (target.x - self.x),
            self.y + s * (target.y - self.y),
        ))
    }

    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            (1.0 - t) * self.x + t * other.x,
            (1.0 - t) * self.y + t * other.y,
        )
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: &Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Wrap an angle to [-π, π].
pub fn wrap_to_pi(angle: f64) -> f64 {
    use std::f64::consts::PI;
    let a = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if a <= -PI { a + 2.0 * PI } else { a }
}
