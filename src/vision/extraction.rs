//! Locating the filter column icons and reading toggle states from a frame.
//!
//! The filter column on the right of the airport screen is either collapsed
//! (one filter icon at the top) or expanded (the full tag palette). Which of
//! the two is on screen is decided once from the number of circles found,
//! see [`IconLayout`].

use crate::error::ExtractionError;
use crate::geometry::{Point, Region};
use crate::vision::config::{FilterColumnConfig, ToggleClassifierConfig, VisionConfig};
use crate::vision::preprocess::{crop_image, BgrImage};
use crate::vision::recognition::{detect_circles, is_toggle_switch_on, DetectedCircle};

/// An icon crop and its click point in frame coordinates.
#[derive(Clone, Debug)]
pub struct CandidateIcon {
    pub image: BgrImage,
    pub centre: Point,
}

/// Screen layout implied by the number of circles in the filter column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IconLayout {
    /// Collapsed column: only the filter button is visible
    SingleIcon(DetectedCircle),
    /// Expanded column: every filter tag (ten in the reference layout), top to bottom
    FullPalette(Vec<DetectedCircle>),
    /// Neither known layout matches
    Unrecognized(Vec<DetectedCircle>),
}

impl IconLayout {
    pub fn from_circles(mut circles: Vec<DetectedCircle>, palette_icon_count: usize) -> Self {
        match circles.len() {
            1 => IconLayout::SingleIcon(circles.remove(0)),
            n if n == palette_icon_count => IconLayout::FullPalette(circles),
            _ => IconLayout::Unrecognized(circles),
        }
    }
}

/// Icon crops and click points, index-aligned and ordered top to bottom.
#[derive(Clone, Debug, Default)]
pub struct FilterColumnIcons {
    pub images: Vec<BgrImage>,
    pub centres: Vec<Point>,
}

impl FilterColumnIcons {
    pub fn len(&self) -> usize {
        self.centres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centres.is_empty()
    }

    pub fn into_candidates(self) -> Vec<CandidateIcon> {
        self.images
            .into_iter()
            .zip(self.centres)
            .map(|(image, centre)| CandidateIcon { image, centre })
            .collect()
    }
}

fn crop(img: &BgrImage, region: &Region, what: &'static str) -> Result<BgrImage, ExtractionError> {
    crop_image(img, region).map_err(|source| ExtractionError::Crop { what, source })
}

/// Turns already-detected circles of a cropped column into icon crops and
/// frame-space click points.
///
/// Only x is shifted by the column's left edge. y stays column-local, which
/// matches the frame only while the column starts at the top of the screen.
pub fn locate_filter_icons(
    column: &BgrImage,
    circles: Vec<DetectedCircle>,
    config: &FilterColumnConfig,
) -> Result<FilterColumnIcons, ExtractionError> {
    let images = match IconLayout::from_circles(circles.clone(), config.palette_icon_count) {
        IconLayout::SingleIcon(circle) => {
            let centre = Point::new(circle.x as f64, circle.y as f64);
            if !config.single_icon_region.contains(centre) {
                return Err(ExtractionError::UnexpectedIconPosition {
                    centre,
                    expected: config.single_icon_region,
                });
            }
            vec![crop(column, &config.single_icon_region, "filter icon")?]
        }
        IconLayout::FullPalette(palette) => palette
            .iter()
            .map(|circle| {
                let y = circle.y as f64;
                let window = Region::from_coords(
                    0.0,
                    (y - config.icon_crop_above).max(0.0),
                    config.icon_crop_width,
                    (y + config.icon_crop_below).min(config.frame_height),
                )?;
                crop(column, &window, "filter tag icon")
            })
            .collect::<Result<Vec<_>, _>>()?,
        IconLayout::Unrecognized(found) => {
            return Err(ExtractionError::UnrecognizedIconCount { count: found.len() });
        }
    };

    let column_left = config.column_region.normalize().corner1().x;
    let centres = circles
        .iter()
        .map(|c| Point::new(column_left + c.x as f64, c.y as f64))
        .collect();

    Ok(FilterColumnIcons { images, centres })
}

/// Crops the filter column from a full frame, finds its icons and returns
/// their crops and click points.
pub fn extract_filter_column_icons(
    frame: &BgrImage,
    config: &VisionConfig,
) -> Result<FilterColumnIcons, ExtractionError> {
    let column_config = &config.filter_column;
    let column = crop(frame, &column_config.column_region, "filter column")?;

    let circles = detect_circles(&column, &config.circles).map_err(|source| {
        ExtractionError::Recognition {
            what: "filter column circles",
            source,
        }
    })?;
    crate::log(&format!("Filter column: {} circle(s) found", circles.len()));

    locate_filter_icons(&column, circles, column_config)
}

/// Crops the ramp agent toggle from a full frame and reports whether it is on.
pub fn classify_is_ramp_agent_toggle_switch_on(
    frame: &BgrImage,
    toggle_region: &Region,
    config: &ToggleClassifierConfig,
) -> Result<bool, ExtractionError> {
    let toggle = crop(frame, toggle_region, "ramp agent toggle switch")?;
    is_toggle_switch_on(&toggle, config).map_err(|source| ExtractionError::Recognition {
        what: "ramp agent toggle switch",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisionErrorKind;
    use image::{ImageBuffer, Rgb};
    use imageproc::drawing::draw_filled_circle_mut;
    use std::error::Error as _;

    const BACKGROUND: Rgb<u8> = Rgb([240, 240, 240]);
    const ICON: Rgb<u8> = Rgb([120, 70, 30]);

    fn circle(x: i32, y: i32) -> DetectedCircle {
        DetectedCircle { x, y, radius: 25 }
    }

    fn column() -> BgrImage {
        ImageBuffer::from_pixel(110, 1080, BACKGROUND)
    }

    fn palette_ys() -> Vec<i32> {
        (0..10).map(|i| 60 + i * 100).collect()
    }

    #[test]
    fn test_layout_from_count() {
        assert_eq!(
            IconLayout::from_circles(vec![circle(1, 2)], 10),
            IconLayout::SingleIcon(circle(1, 2))
        );
        assert!(matches!(
            IconLayout::from_circles(vec![circle(0, 0); 10], 10),
            IconLayout::FullPalette(v) if v.len() == 10
        ));
        assert!(matches!(
            IconLayout::from_circles(Vec::new(), 10),
            IconLayout::Unrecognized(v) if v.is_empty()
        ));
    }

    #[test]
    fn test_single_icon_in_expected_position() {
        let config = FilterColumnConfig::default();
        let icons = locate_filter_icons(&column(), vec![circle(55, 45)], &config).unwrap();

        assert_eq!(icons.len(), 1);
        assert_eq!(icons.images[0].dimensions(), (110, 90));
        assert_eq!(icons.centres[0], Point::new(1865.0, 45.0));
    }

    #[test]
    fn test_single_icon_out_of_position() {
        let config = FilterColumnConfig::default();
        let err = locate_filter_icons(&column(), vec![circle(55, 500)], &config).unwrap_err();
        assert_eq!(err.kind(), VisionErrorKind::UnexpectedIconPosition);
    }

    #[test]
    fn test_three_circles_is_unrecognized() {
        let config = FilterColumnConfig::default();
        let circles = vec![circle(55, 60), circle(55, 160), circle(55, 260)];
        let err = locate_filter_icons(&column(), circles, &config).unwrap_err();
        assert!(matches!(err, ExtractionError::UnrecognizedIconCount { count: 3 }));
    }

    #[test]
    fn test_palette_windows_are_clamped() {
        let config = FilterColumnConfig::default();
        let mut ys = palette_ys();
        ys[0] = 20; // window would start above the frame
        ys[9] = 1070; // and end below it
        let circles = ys.iter().map(|&y| circle(55, y)).collect();

        let icons = locate_filter_icons(&column(), circles, &config).unwrap();
        assert_eq!(icons.images[0].dimensions(), (110, 55));
        assert_eq!(icons.images[1].dimensions(), (110, 80));
        assert_eq!(icons.images[9].dimensions(), (110, 55));
        for (centre, &y) in icons.centres.iter().zip(&ys) {
            assert_eq!(*centre, Point::new(1865.0, y as f64));
        }
    }

    #[test]
    fn test_collapsed_palette_window_keeps_geometry_cause() {
        let config = FilterColumnConfig {
            icon_crop_width: 0.0,
            icon_crop_above: 0.0,
            icon_crop_below: 0.0,
            ..FilterColumnConfig::default()
        };
        let circles = palette_ys().into_iter().map(|y| circle(55, y)).collect();

        let err = locate_filter_icons(&column(), circles, &config).unwrap_err();
        assert_eq!(err.kind(), VisionErrorKind::InvalidRegion);
        let source = err.source().expect("geometry cause should be kept");
        assert!(source.downcast_ref::<crate::error::GeometryError>().is_some());
    }

    fn palette_frame() -> BgrImage {
        let mut frame = ImageBuffer::from_pixel(1920, 1080, BACKGROUND);
        for y in palette_ys() {
            draw_filled_circle_mut(&mut frame, (1810 + 55, y), 25, ICON);
        }
        frame
    }

    #[test]
    fn test_extract_full_palette_from_frame() {
        let config = VisionConfig::default();
        let icons = extract_filter_column_icons(&palette_frame(), &config).unwrap();

        assert_eq!(icons.len(), 10);
        assert_eq!(icons.images.len(), 10);
        assert!(icons.centres.windows(2).all(|w| w[0].y < w[1].y));
        for (centre, expected_y) in icons.centres.iter().zip(palette_ys()) {
            assert!((centre.x - 1865.0).abs() <= 3.0, "{}", centre);
            assert!((centre.y - expected_y as f64).abs() <= 3.0, "{}", centre);
        }
        for image in &icons.images {
            assert_eq!(image.width(), 110);
            assert!(image.height() >= 78 && image.height() <= 80);
        }

        let candidates = icons.into_candidates();
        assert_eq!(candidates.len(), 10);
    }

    #[test]
    fn test_extract_single_icon_from_frame() {
        let mut frame = ImageBuffer::from_pixel(1920, 1080, BACKGROUND);
        draw_filled_circle_mut(&mut frame, (1810 + 55, 45), 25, ICON);

        let icons = extract_filter_column_icons(&frame, &VisionConfig::default()).unwrap();
        assert_eq!(icons.len(), 1);
        assert_eq!(icons.images[0].dimensions(), (110, 90));
        assert!((icons.centres[0].x - 1865.0).abs() <= 3.0);
    }

    #[test]
    fn test_extract_blank_column_keeps_root_cause() {
        let frame = ImageBuffer::from_pixel(1920, 1080, BACKGROUND);
        let err = extract_filter_column_icons(&frame, &VisionConfig::default()).unwrap_err();

        assert_eq!(err.kind(), VisionErrorKind::NoCirclesFound);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_extract_on_small_frame_is_empty_crop() {
        let frame = ImageBuffer::from_pixel(800, 600, BACKGROUND);
        let err = extract_filter_column_icons(&frame, &VisionConfig::default()).unwrap_err();
        assert_eq!(err.kind(), VisionErrorKind::EmptyCrop);
    }

    #[test]
    fn test_ramp_agent_toggle() {
        let region = Region::from_coords(100.0, 100.0, 200.0, 150.0).unwrap();
        let config = ToggleClassifierConfig::default();

        let mut frame = ImageBuffer::from_pixel(400, 300, BACKGROUND);
        for (x, y, p) in frame.enumerate_pixels_mut() {
            if (100..200).contains(&x) && (100..150).contains(&y) {
                *p = Rgb([60, 200, 40]);
            }
        }
        assert!(classify_is_ramp_agent_toggle_switch_on(&frame, &region, &config).unwrap());

        let grey = ImageBuffer::from_pixel(400, 300, Rgb([128, 128, 128]));
        assert!(!classify_is_ramp_agent_toggle_switch_on(&grey, &region, &config).unwrap());

        let strict = ToggleClassifierConfig {
            min_pixels: 10_000,
            ..config
        };
        let err = classify_is_ramp_agent_toggle_switch_on(&frame, &region, &strict).unwrap_err();
        assert_eq!(err.kind(), VisionErrorKind::AmbiguousState);
    }
}
