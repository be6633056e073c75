//! The perception pipeline: frame normalization, cropping, recognition and
//! icon extraction.
//!
//! All functions here are synchronous and pure with respect to their input
//! buffers, which are only ever borrowed immutably.

pub mod config;
pub mod extraction;
pub mod image_utils;
pub mod preprocess;
pub mod recognition;

pub use config::{
    CircleDetectorConfig, FilterColumnConfig, HsvRange, ToggleClassifierConfig, VisionConfig,
};
pub use extraction::{
    classify_is_ramp_agent_toggle_switch_on, extract_filter_column_icons, locate_filter_icons,
    CandidateIcon, FilterColumnIcons, IconLayout,
};
pub use image_utils::{
    draw_circles_on_image, draw_spot_on_image, get_pixel_at_pt, save_image, save_image_list,
};
pub use preprocess::{convert_to_buffer, crop_image, crop_image_and_save, BgrImage};
pub use recognition::{detect_circles, DetectedCircle, ToggleState};
