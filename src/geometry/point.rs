//! Immutable 2D point.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D coordinate. Every transform returns a new point.
///
/// Components are `f64` so that scaled and rotated points keep their
/// fractional part until they are explicitly cast with [`Point::to_int`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Scales both axes. `sy = None` means uniform scaling by `sx`.
    pub fn scale(self, sx: f64, sy: Option<f64>) -> Self {
        let sy = sy.unwrap_or(sx);
        Self::new(self.x * sx, self.y * sy)
    }

    /// Rotates counter-clockwise by `angle_deg` degrees about `origin`
    /// (the coordinate origin when `None`).
    pub fn rotate(self, angle_deg: f64, origin: Option<Point>) -> Self {
        let origin = origin.unwrap_or(Self::ORIGIN);
        let (sin_t, cos_t) = angle_deg.to_radians().sin_cos();
        let tx = self.x - origin.x;
        let ty = self.y - origin.y;
        Self::new(
            tx * cos_t - ty * sin_t + origin.x,
            tx * sin_t + ty * cos_t + origin.y,
        )
    }

    /// Truncates both components toward zero.
    ///
    /// This is the `f64 as i64` cast: `-1.7` becomes `-1`, not `-2`. Pixel
    /// addressing relies on it, so fractional centres always land on the
    /// pixel nearer the origin for positive coordinates.
    pub fn to_int(self) -> Self {
        Self::new(self.x.trunc(), self.y.trunc())
    }

    pub fn to_tuple_x_y(self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn to_tuple_y_x(self) -> (f64, f64) {
        (self.y, self.x)
    }

    /// Integer `(x, y)`, truncated toward zero.
    pub fn to_int_tuple_x_y(self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }

    /// Integer `(y, x)` (row, column), truncated toward zero.
    pub fn to_int_tuple_y_x(self) -> (i64, i64) {
        (self.y as i64, self.x as i64)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x as f64, y as f64)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
