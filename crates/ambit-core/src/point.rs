//! Integer and real 2-D coordinates.

use std::fmt;
use std::ops::{Add, Sub};

/// A cell coordinate on a discrete grid.
///
/// `x` is the column and `y` the row. Grids store cells row-major, so
/// cell `(x, y)` lives at flat index `y * width + x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Create a point from its column and row.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A position in continuous space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RealPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl RealPoint {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for RealPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for RealPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Euclidean distance between two real points.
pub fn l2(a: RealPoint, b: RealPoint) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let p = Point::new(2, 3) + Point::new(-1, 4);
        assert_eq!(p, Point::new(1, 7));
        assert_eq!(p - Point::new(1, 7), Point::default());
    }

    #[test]
    fn l2_is_pythagorean() {
        let d = l2(RealPoint::new(0.0, 0.0), RealPoint::new(3.0, 4.0));
        assert!((d - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tuple_conversions() {
        assert_eq!(Point::from((4, 5)), Point::new(4, 5));
        assert_eq!(RealPoint::from((0.5, 1.5)), RealPoint::new(0.5, 1.5));
    }
}
