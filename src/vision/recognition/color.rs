//! Colour-space conversions on BGR buffers.

use image::{GrayImage, ImageBuffer, Luma, Rgb};

use crate::vision::preprocess::BgrImage;

/// Converts one `[B, G, R]` sample to 8-bit HSV.
///
/// H is halved to fit a byte (0..180), S and V span 0..=255.
pub fn bgr_to_hsv(bgr: [u8; 3]) -> [u8; 3] {
    let b = bgr[0] as f32;
    let g = bgr[1] as f32;
    let r = bgr[2] as f32;

    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { diff * 255.0 / v } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    [
        (h / 2.0).round().min(180.0) as u8,
        s.round() as u8,
        v as u8,
    ]
}

/// Converts a whole BGR buffer to HSV. The result reuses the 3-channel
/// container with samples `[H, S, V]`.
pub fn convert_to_hsv(img: &BgrImage) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
        Rgb(bgr_to_hsv(img.get_pixel(x, y).0))
    })
}

/// BT.601 luma of a BGR buffer.
pub fn convert_to_grayscale(img: &BgrImage) -> GrayImage {
    ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
        let [b, g, r] = img.get_pixel(x, y).0;
        let luma = 0.114 * b as f32 + 0.587 * g as f32 + 0.299 * r as f32;
        Luma([luma.round().min(255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(bgr_to_hsv([0, 0, 255]), [0, 255, 255]); // red
        assert_eq!(bgr_to_hsv([0, 255, 0]), [60, 255, 255]); // green
        assert_eq!(bgr_to_hsv([255, 0, 0]), [120, 255, 255]); // blue
    }

    #[test]
    fn test_grey_has_no_saturation() {
        assert_eq!(bgr_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(bgr_to_hsv([0, 0, 0]), [0, 0, 0]);
    }

    #[test]
    fn test_magenta_wraps_hue() {
        // R = B = 255 → hue 300°, stored as 150
        assert_eq!(bgr_to_hsv([255, 0, 255])[0], 150);
    }

    #[test]
    fn test_hsv_image_matches_per_pixel_conversion() {
        let img = ImageBuffer::from_fn(2, 1, |x, _| match x {
            0 => Rgb([60u8, 200, 40]),
            _ => Rgb([128u8, 128, 128]),
        });
        let hsv = convert_to_hsv(&img);
        assert_eq!(hsv.dimensions(), (2, 1));
        assert_eq!(hsv.get_pixel(0, 0).0, bgr_to_hsv([60, 200, 40]));
        assert_eq!(hsv.get_pixel(1, 0).0, [0, 0, 128]);
    }

    #[test]
    fn test_grayscale_weights_bgr_order() {
        let img = ImageBuffer::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255u8, 0, 0]),
            1 => Rgb([0u8, 255, 0]),
            _ => Rgb([0u8, 0, 255]),
        });
        let gray = convert_to_grayscale(&img);
        assert_eq!(gray.get_pixel(0, 0)[0], 29); // blue
        assert_eq!(gray.get_pixel(1, 0)[0], 150); // green
        assert_eq!(gray.get_pixel(2, 0)[0], 76); // red
    }
}
