//! Tuning constants for recognition and extraction.
//!
//! Every threshold here was measured on the 1920x1080 reference layout.
//! They are injected into the algorithms rather than inlined so a different
//! resolution or theme only needs a different config.json.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Region};

/// Inclusive HSV range in the 8-bit convention (H in 0..=180, S and V in 0..=255).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}

/// Colour thresholds for the green (on) / grey (off) toggle switch.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleClassifierConfig {
    /// Size (width, height) every toggle crop is resized to before counting
    pub canonical_size: (u32, u32),
    /// Colour of an enabled switch
    pub green: HsvRange,
    /// Colour of a disabled switch
    pub grey: HsvRange,
    /// The dominant colour must cover more than this many pixels
    pub min_pixels: u32,
}

impl Default for ToggleClassifierConfig {
    fn default() -> Self {
        Self {
            canonical_size: (100, 50),
            green: HsvRange::new([40, 50, 50], [80, 255, 255]),
            grey: HsvRange::new([0, 0, 50], [180, 50, 200]),
            min_pixels: 100,
        }
    }
}

/// Parameters of the Hough-gradient circle finder.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleDetectorConfig {
    /// Inverse accumulator resolution: 1.2 means one vote cell per 1.2 px
    pub dp: f32,
    /// Minimum distance between accepted centres (px)
    pub min_dist: f32,
    /// Upper Canny threshold; the lower one is half of it
    pub edge_threshold: f32,
    /// Votes a centre needs to be considered
    pub accumulator_threshold: u32,
    pub min_radius: u32,
    pub max_radius: u32,
}

impl Default for CircleDetectorConfig {
    fn default() -> Self {
        Self {
            dp: 1.2,
            min_dist: 60.0,
            edge_threshold: 80.0,
            accumulator_threshold: 28,
            min_radius: 18,
            max_radius: 45,
        }
    }
}

/// Layout of the filter column on the right-hand side of the airport screen.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterColumnConfig {
    /// Column in frame coordinates. Its top edge is expected to be 0, since
    /// icon centres keep their column-local y.
    pub column_region: Region,
    /// Where the lone filter icon sits (column-local) when the column is collapsed
    pub single_icon_region: Region,
    /// Width of each per-icon crop in the ten-icon palette
    pub icon_crop_width: f64,
    /// Pixels kept above each icon centre
    pub icon_crop_above: f64,
    /// Pixels kept below each icon centre
    pub icon_crop_below: f64,
    /// Frame height the per-icon windows are clamped to
    pub frame_height: f64,
    /// Number of icons in the expanded palette
    pub palette_icon_count: usize,
}

impl Default for FilterColumnConfig {
    fn default() -> Self {
        Self {
            column_region: region(1810.0, 0.0, 1920.0, 1080.0),
            single_icon_region: region(0.0, 0.0, 110.0, 90.0),
            icon_crop_width: 110.0,
            icon_crop_above: 45.0,
            icon_crop_below: 35.0,
            frame_height: 1080.0,
            palette_icon_count: 10,
        }
    }
}

/// All vision tuning in one place.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub toggle: ToggleClassifierConfig,
    pub circles: CircleDetectorConfig,
    pub filter_column: FilterColumnConfig,
}

/// Builds a constant region. Only used with literal, non-degenerate corners.
pub(crate) fn region(x1: f64, y1: f64, x2: f64, y2: f64) -> Region {
    match Region::new(Point::new(x1, y1), Point::new(x2, y2)) {
        Ok(r) => r,
        Err(_) => unreachable!("constant region ({x1}, {y1}) - ({x2}, {y2}) is degenerate"),
    }
}
