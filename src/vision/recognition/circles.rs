//! Circle detection with the Hough gradient method.
//!
//! 1. Canny edges of the intensity image.
//! 2. Every edge pixel votes along its gradient direction (both ways) for
//!    centres between `min_radius` and `max_radius` away, into an accumulator
//!    that is `dp` times coarser than the image.
//! 3. Local accumulator maxima above the threshold become centre candidates,
//!    strongest first. Candidates closer than `min_dist` to an accepted
//!    centre are dropped.
//! 4. The radius of each centre is the distance most supported by edge
//!    pixels, weighted toward tighter circles.

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use super::color::convert_to_grayscale;
use crate::error::RecognitionError;
use crate::vision::config::CircleDetectorConfig;
use crate::vision::preprocess::BgrImage;

/// Same smoothing canny applies internally, so gradients exist on every edge pixel.
const GRADIENT_SIGMA: f32 = 1.4;

/// A circle in pixel-buffer coordinates, rounded to whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectedCircle {
    pub x: i32,
    pub y: i32,
    pub radius: u32,
}

/// Unrounded detector output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoughCircle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub votes: u32,
}

impl HoughCircle {
    fn rounded(&self) -> DetectedCircle {
        DetectedCircle {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            radius: self.radius.round().max(0.0) as u32,
        }
    }
}

struct Accumulator {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl Accumulator {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    fn get(&self, x: usize, y: usize) -> u32 {
        self.cells[y * self.width + x]
    }

    /// Adds a vote at image coordinates scaled by `idp`. Returns `false`
    /// once the position falls outside the accumulator.
    fn vote(&mut self, x: f32, y: f32, idp: f32) -> bool {
        let ax = (x * idp).floor();
        let ay = (y * idp).floor();
        if ax < 0.0 || ay < 0.0 || ax >= self.width as f32 || ay >= self.height as f32 {
            return false;
        }
        self.cells[ay as usize * self.width + ax as usize] += 1;
        true
    }

    /// Cells above `threshold` that beat their 4-neighbourhood, strongest first.
    fn peaks(&self, threshold: u32) -> Vec<(usize, usize, u32)> {
        let mut peaks = Vec::new();
        for y in 1..self.height.saturating_sub(1) {
            for x in 1..self.width.saturating_sub(1) {
                let v = self.get(x, y);
                if v > threshold
                    && v > self.get(x - 1, y)
                    && v >= self.get(x + 1, y)
                    && v > self.get(x, y - 1)
                    && v >= self.get(x, y + 1)
                {
                    peaks.push((x, y, v));
                }
            }
        }
        // Stable: equal votes keep raster order.
        peaks.sort_by(|a, b| b.2.cmp(&a.2));
        peaks
    }
}

/// Picks the best-supported radius around `(cx, cy)`.
///
/// Returns `(radius, support)`, or `None` when no edge pixel lies in range.
fn estimate_radius(
    edge_points: &[(f32, f32)],
    cx: f32,
    cy: f32,
    config: &CircleDetectorConfig,
) -> Option<(f32, u32)> {
    let min_r = config.min_radius as usize;
    let max_r = config.max_radius as usize;
    let mut histogram = vec![0u32; max_r + 2];

    for &(x, y) in edge_points {
        let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt().round() as usize;
        if (min_r..=max_r).contains(&d) {
            histogram[d] += 1;
        }
    }

    let mut best: Option<(usize, u32, f32)> = None;
    for r in min_r..=max_r {
        let support = histogram[r.saturating_sub(1)..=r + 1].iter().sum::<u32>();
        if support == 0 {
            continue;
        }
        // Edge density along the circumference, so an inner ring does not
        // lose to a sparse outer one just for being shorter.
        let density = support as f32 / r.max(1) as f32;
        if best.is_none_or(|(_, _, d)| density > d) {
            best = Some((r, support, density));
        }
    }

    best.map(|(r, support, _)| {
        let lo = r.saturating_sub(1);
        let weighted: u32 = (lo..=r + 1).map(|i| histogram[i] * i as u32).sum();
        (weighted as f32 / support as f32, support)
    })
}

/// Runs the Hough gradient detector on an intensity image.
pub fn hough_circles(gray: &GrayImage, config: &CircleDetectorConfig) -> Vec<HoughCircle> {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 || config.max_radius < config.min_radius || config.dp <= 0.0 {
        return Vec::new();
    }

    let edges = canny(gray, config.edge_threshold / 2.0, config.edge_threshold);
    let blurred = gaussian_blur_f32(gray, GRADIENT_SIGMA);
    let gx = horizontal_sobel(&blurred);
    let gy = vertical_sobel(&blurred);

    let idp = 1.0 / config.dp;
    let mut acc = Accumulator::new(
        (width as f32 * idp).ceil() as usize + 1,
        (height as f32 * idp).ceil() as usize + 1,
    );
    let mut edge_points = Vec::new();

    for (x, y, edge) in edges.enumerate_pixels() {
        if edge[0] == 0 {
            continue;
        }
        let dx = gx.get_pixel(x, y)[0] as f32;
        let dy = gy.get_pixel(x, y)[0] as f32;
        let magnitude = (dx * dx + dy * dy).sqrt();
        if magnitude < f32::EPSILON {
            continue;
        }

        let (px, py) = (x as f32, y as f32);
        edge_points.push((px, py));

        let (nx, ny) = (dx / magnitude, dy / magnitude);
        for direction in [1.0f32, -1.0] {
            for r in config.min_radius..=config.max_radius {
                let step = direction * r as f32;
                if !acc.vote(px + nx * step, py + ny * step, idp) {
                    break;
                }
            }
        }
    }

    let min_dist_sq = config.min_dist * config.min_dist;
    let mut circles: Vec<HoughCircle> = Vec::new();

    for (ax, ay, votes) in acc.peaks(config.accumulator_threshold) {
        let cx = (ax as f32 + 0.5) * config.dp;
        let cy = (ay as f32 + 0.5) * config.dp;

        let too_close = circles
            .iter()
            .any(|c| (c.x - cx).powi(2) + (c.y - cy).powi(2) < min_dist_sq);
        if too_close {
            continue;
        }

        if let Some((radius, support)) = estimate_radius(&edge_points, cx, cy, config) {
            if support > config.accumulator_threshold {
                circles.push(HoughCircle {
                    x: cx,
                    y: cy,
                    radius,
                    votes,
                });
            }
        }
    }

    circles
}

/// Detects circles in a BGR buffer, rounded and sorted top to bottom.
///
/// The ordering matters: callers map the n-th circle to the n-th icon as it
/// appears on screen.
pub fn detect_circles(
    img: &BgrImage,
    config: &CircleDetectorConfig,
) -> Result<Vec<DetectedCircle>, RecognitionError> {
    let gray = convert_to_grayscale(img);
    let mut circles: Vec<DetectedCircle> = hough_circles(&gray, config)
        .iter()
        .map(HoughCircle::rounded)
        .collect();

    if circles.is_empty() {
        return Err(RecognitionError::NoCirclesFound);
    }

    circles.sort_by_key(|c| c.y);
    Ok(circles)
}
