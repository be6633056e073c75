//! Diagnostic helpers: saving buffers and annotating detections.

use image::Rgb;
use imageproc::drawing::{draw_cross_mut, draw_filled_circle_mut, draw_hollow_circle_mut};
use std::path::{Path, PathBuf};

use crate::error::ImageProcessingError;
use crate::geometry::Point;
use crate::vision::preprocess::{bgr_to_rgb, BgrImage};
use crate::vision::recognition::DetectedCircle;

// BGR sample order.
const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const RED: Rgb<u8> = Rgb([0, 0, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Saves a BGR buffer to `path`. The format follows the file extension.
pub fn save_image(img: &BgrImage, path: &Path) -> Result<(), ImageProcessingError> {
    bgr_to_rgb(img)
        .save(path)
        .map_err(|source| ImageProcessingError::Save {
            path: path.to_path_buf(),
            source,
        })?;
    crate::log(&format!("Image saved to {}", path.display()));
    Ok(())
}

/// Path of the `index`-th image of a list: `dir/name.png` → `dir/name_3.png`.
pub fn indexed_path(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    path.with_file_name(name)
}

/// Saves every buffer under an indexed variant of `path`.
pub fn save_image_list(images: &[BgrImage], path: &Path) -> Result<(), ImageProcessingError> {
    for (i, img) in images.iter().enumerate() {
        save_image(img, &indexed_path(path, i))?;
    }
    Ok(())
}

/// Returns a copy with every circle outlined in green and its centre in red.
/// `show_coords` adds a black marker at the label anchor `(x + 10, y - 10)`
/// and logs the coordinates.
pub fn draw_circles_on_image(
    img: &BgrImage,
    circles: &[DetectedCircle],
    show_coords: bool,
) -> BgrImage {
    let mut out = img.clone();
    for c in circles {
        let centre = (c.x, c.y);
        let r = c.radius as i32;
        draw_hollow_circle_mut(&mut out, centre, r, GREEN);
        draw_hollow_circle_mut(&mut out, centre, (r - 1).max(0), GREEN);
        draw_filled_circle_mut(&mut out, centre, 3, RED);

        if show_coords {
            draw_cross_mut(&mut out, BLACK, c.x + 10, c.y - 10);
            crate::log(&format!("Circle at {},{} r={}", c.x, c.y, c.radius));
        }
    }
    out
}

/// Returns a copy with a red spot at `pt`.
pub fn draw_spot_on_image(img: &BgrImage, pt: Point) -> BgrImage {
    let mut out = img.clone();
    let (x, y) = pt.to_int_tuple_x_y();
    draw_filled_circle_mut(&mut out, (x as i32, y as i32), 3, RED);
    out
}

/// Returns the `[B, G, R]` sample at `pt` (truncated to a pixel index).
pub fn get_pixel_at_pt(img: &BgrImage, pt: Point) -> Result<[u8; 3], ImageProcessingError> {
    let (x, y) = pt.to_int_tuple_x_y();
    let (width, height) = img.dimensions();
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return Err(ImageProcessingError::OutOfBounds {
            point: pt,
            width,
            height,
        });
    }
    Ok(img.get_pixel(x as u32, y as u32).0)
}
