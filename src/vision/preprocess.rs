//! Frame normalization and cropping.
//!
//! Everything downstream of this module works on [`BgrImage`] buffers.
//! `convert_to_buffer` is the only place where the capture source's RGB
//! ordering is swapped into the canonical BGR ordering.

use image::{DynamicImage, ImageBuffer, Pixel, Rgb, RgbImage};
use std::path::Path;

use crate::error::ImageProcessingError;
use crate::geometry::Region;
use crate::vision::image_utils::save_image;

/// 3-channel, 8-bit buffer whose samples are stored as `[B, G, R]`.
///
/// `Rgb<u8>` is only used as a 3-sample container here; channel 0 is blue.
pub type BgrImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Swaps channels 0 and 2 of every pixel. RGB → BGR and BGR → RGB alike.
pub fn swap_red_blue(img: &RgbImage) -> BgrImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        pixel.0.swap(0, 2);
    }
    out
}

/// Converts a decoded capture (any colour type, typically RGBA from a
/// PNG screencap) into the canonical BGR buffer. Alpha is dropped.
pub fn convert_to_buffer(raw: &DynamicImage) -> BgrImage {
    swap_red_blue(&raw.to_rgb8())
}

/// Converts a BGR buffer back to RGB for display or encoding.
pub fn bgr_to_rgb(img: &BgrImage) -> RgbImage {
    swap_red_blue(img)
}

/// Crops `img` to `region`, like slicing `img[y_min:y_max, x_min:x_max]`.
///
/// The corners may be given in any order. They are truncated to integers
/// and clipped to the buffer, so a region that hangs over an edge yields
/// the overlapping part only; negative coordinates clip to 0. A result with
/// zero area is an [`ImageProcessingError::EmptyCrop`].
///
/// The returned buffer is an owned copy and never aliases `img`.
pub fn crop_image<P>(
    img: &ImageBuffer<P, Vec<P::Subpixel>>,
    region: &Region,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, ImageProcessingError>
where
    P: Pixel + 'static,
{
    let (width, height) = img.dimensions();
    let (x1, y1, x2, y2) = region.to_tuple_x1_y1_x2_y2();

    let x_min = x1.clamp(0, width as i64) as u32;
    let x_max = x2.clamp(0, width as i64) as u32;
    let y_min = y1.clamp(0, height as i64) as u32;
    let y_max = y2.clamp(0, height as i64) as u32;

    if x_max <= x_min || y_max <= y_min {
        return Err(ImageProcessingError::EmptyCrop {
            region: *region,
            width,
            height,
        });
    }

    Ok(image::imageops::crop_imm(img, x_min, y_min, x_max - x_min, y_max - y_min).to_image())
}

/// Crops, then saves the crop to `path`. The crop is validated before
/// anything touches the filesystem.
pub fn crop_image_and_save(
    img: &BgrImage,
    region: &Region,
    path: &Path,
) -> Result<BgrImage, ImageProcessingError> {
    let cropped = crop_image(img, region)?;
    save_image(&cropped, path)?;
    Ok(cropped)
}
