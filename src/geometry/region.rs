//! Axis-aligned rectangular region described by two corners.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Point;
use crate::error::GeometryError;

/// Axis-aligned rectangle. The corners may be in any order but never equal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionCorners", into = "RegionCorners")]
pub struct Region {
    corner1: Point,
    corner2: Point,
}

/// Unchecked serde shape of a [`Region`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RegionCorners {
    corner1: Point,
    corner2: Point,
}

impl TryFrom<RegionCorners> for Region {
    type Error = GeometryError;

    fn try_from(c: RegionCorners) -> Result<Self, Self::Error> {
        Region::new(c.corner1, c.corner2)
    }
}

impl From<Region> for RegionCorners {
    fn from(r: Region) -> Self {
        RegionCorners {
            corner1: r.corner1,
            corner2: r.corner2,
        }
    }
}

impl Region {
    /// Builds a region, rejecting coordinate-identical corners.
    pub fn new(corner1: Point, corner2: Point) -> Result<Self, GeometryError> {
        if corner1 == corner2 {
            return Err(GeometryError::InvalidRegion { corner: corner1 });
        }
        Ok(Self { corner1, corner2 })
    }

    /// Shorthand for `Region::new(Point::new(x1, y1), Point::new(x2, y2))`.
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, GeometryError> {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    pub fn corner1(&self) -> Point {
        self.corner1
    }

    pub fn corner2(&self) -> Point {
        self.corner2
    }

    pub fn width(&self) -> f64 {
        (self.corner2.x - self.corner1.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.corner2.y - self.corner1.y).abs()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.corner1.x + self.corner2.x) / 2.0,
            (self.corner1.y + self.corner2.y) / 2.0,
        )
    }

    fn min_max(&self) -> (Point, Point) {
        (
            Point::new(
                self.corner1.x.min(self.corner2.x),
                self.corner1.y.min(self.corner2.y),
            ),
            Point::new(
                self.corner1.x.max(self.corner2.x),
                self.corner1.y.max(self.corner2.y),
            ),
        )
    }

    /// Returns the region with corner1 = per-axis minimum, corner2 = maximum.
    pub fn normalize(&self) -> Self {
        let (min, max) = self.min_max();
        // Distinct corners stay distinct after reordering per axis.
        Self {
            corner1: min,
            corner2: max,
        }
    }

    /// Normalizes, then clips both corners into `[0, max - 1]` per axis.
    ///
    /// Fails with `InvalidRegion` when both corners collapse onto the same
    /// pixel, e.g. a region lying entirely outside the bounds.
    pub fn clamp(&self, max_width: u32, max_height: u32) -> Result<Self, GeometryError> {
        let r = self.normalize();
        let max_x = max_width as f64 - 1.0;
        let max_y = max_height as f64 - 1.0;
        let clip = |p: Point| Point::new(p.x.max(0.0).min(max_x), p.y.max(0.0).min(max_y));
        Self::new(clip(r.corner1), clip(r.corner2))
    }

    /// Inclusive bounds test.
    pub fn contains(&self, pt: Point) -> bool {
        let (min, max) = self.min_max();
        min.x <= pt.x && pt.x <= max.x && min.y <= pt.y && pt.y <= max.y
    }

    /// Normalized corners as truncated integers `(x1, y1, x2, y2)`.
    pub fn to_tuple_x1_y1_x2_y2(&self) -> (i64, i64, i64, i64) {
        let r = self.normalize();
        (
            r.corner1.x as i64,
            r.corner1.y as i64,
            r.corner2.x as i64,
            r.corner2.y as i64,
        )
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.corner1, self.corner2)
    }
}
