//! Recognition heuristics: circle finding and two-state colour classification.

pub mod circles;
pub mod color;
pub mod toggle;

pub use circles::{detect_circles, hough_circles, DetectedCircle, HoughCircle};
pub use color::{bgr_to_hsv, convert_to_grayscale, convert_to_hsv};
pub use toggle::{classify_toggle_state, is_toggle_switch_on, ColorCounts, ToggleState};
