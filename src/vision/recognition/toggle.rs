//! Green/grey toggle switch classification.
//!
//! The crop is resized to a canonical size, converted to HSV and every pixel
//! is tested against the green (on) and grey (off) ranges. The state is the
//! colour that both outnumbers the other and covers more than the pixel
//! floor. Near ties and mostly-uncoloured crops are rejected instead of
//! guessed.

use image::imageops::{resize, FilterType};
use std::borrow::Cow;

use super::color::convert_to_hsv;
use crate::error::RecognitionError;
use crate::vision::config::ToggleClassifierConfig;
use crate::vision::preprocess::BgrImage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleState {
    On,
    Off,
}

impl ToggleState {
    pub fn is_on(self) -> bool {
        self == ToggleState::On
    }
}

/// Pixel counts for each colour mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorCounts {
    pub green: u32,
    pub grey: u32,
}

/// Counts green and grey pixels after resizing to the canonical size.
pub fn count_toggle_colors(img: &BgrImage, config: &ToggleClassifierConfig) -> ColorCounts {
    let (w, h) = config.canonical_size;
    let resized: Cow<'_, BgrImage> = if img.dimensions() == (w, h) {
        Cow::Borrowed(img)
    } else {
        Cow::Owned(resize(img, w, h, FilterType::Triangle))
    };

    let hsv_image = convert_to_hsv(&resized);
    let mut counts = ColorCounts { green: 0, grey: 0 };
    for pixel in hsv_image.pixels() {
        let hsv = pixel.0;
        if config.green.contains(hsv) {
            counts.green += 1;
        }
        if config.grey.contains(hsv) {
            counts.grey += 1;
        }
    }
    counts
}

/// Applies the dominance-plus-floor rule to the mask counts.
pub fn decide_toggle_state(
    counts: ColorCounts,
    min_pixels: u32,
) -> Result<ToggleState, RecognitionError> {
    let ColorCounts { green, grey } = counts;
    if green > grey && green > min_pixels {
        Ok(ToggleState::On)
    } else if grey > green && grey > min_pixels {
        Ok(ToggleState::Off)
    } else {
        Err(RecognitionError::AmbiguousState {
            green,
            grey,
            floor: min_pixels,
        })
    }
}

/// Classifies a crop of a toggle switch as on (green) or off (grey).
pub fn classify_toggle_state(
    img: &BgrImage,
    config: &ToggleClassifierConfig,
) -> Result<ToggleState, RecognitionError> {
    decide_toggle_state(count_toggle_colors(img, config), config.min_pixels)
}

/// `true` when the cropped toggle switch is on.
pub fn is_toggle_switch_on(
    img: &BgrImage,
    config: &ToggleClassifierConfig,
) -> Result<bool, RecognitionError> {
    classify_toggle_state(img, config).map(ToggleState::is_on)
}
