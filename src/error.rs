//! Error types for the vision core.
//!
//! Each stage boundary has one outward-facing error type. Lower-layer errors
//! are kept as `#[source]` so the chain stays inspectable, and every type can
//! report the [`VisionErrorKind`] of its root cause.

use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::{Point, Region};

/// Root cause tag shared by all vision errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisionErrorKind {
    InvalidRegion,
    EmptyCrop,
    OutOfBounds,
    ImageIo,
    AmbiguousState,
    NoCirclesFound,
    UnexpectedIconPosition,
    UnrecognizedIconCount,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("region corners must not be identical: {corner}")]
    InvalidRegion { corner: Point },
}

impl GeometryError {
    pub fn kind(&self) -> VisionErrorKind {
        match self {
            GeometryError::InvalidRegion { .. } => VisionErrorKind::InvalidRegion,
        }
    }
}

#[derive(Debug, Error)]
pub enum ImageProcessingError {
    #[error("cropped image is empty for region {region} on a {width}x{height} buffer")]
    EmptyCrop {
        region: Region,
        width: u32,
        height: u32,
    },
    #[error("point {point} is outside a {width}x{height} buffer")]
    OutOfBounds {
        point: Point,
        width: u32,
        height: u32,
    },
    #[error("cannot save image to {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ImageProcessingError {
    pub fn kind(&self) -> VisionErrorKind {
        match self {
            ImageProcessingError::EmptyCrop { .. } => VisionErrorKind::EmptyCrop,
            ImageProcessingError::OutOfBounds { .. } => VisionErrorKind::OutOfBounds,
            ImageProcessingError::Save { .. } => VisionErrorKind::ImageIo,
        }
    }
}

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error(
        "unrecognized toggle switch: no dominant colour (green = {green}, grey = {grey}, floor = {floor})"
    )]
    AmbiguousState { green: u32, grey: u32, floor: u32 },
    #[error("the given image has no circles")]
    NoCirclesFound,
}

impl RecognitionError {
    pub fn kind(&self) -> VisionErrorKind {
        match self {
            RecognitionError::AmbiguousState { .. } => VisionErrorKind::AmbiguousState,
            RecognitionError::NoCirclesFound => VisionErrorKind::NoCirclesFound,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to crop {what}")]
    Crop {
        what: &'static str,
        #[source]
        source: ImageProcessingError,
    },
    #[error("failed to recognise {what}")]
    Recognition {
        what: &'static str,
        #[source]
        source: RecognitionError,
    },
    #[error("filter icon at {centre} is not inside the single-icon region {expected}")]
    UnexpectedIconPosition { centre: Point, expected: Region },
    #[error("number of filter column icons isn't a known layout: {count}")]
    UnrecognizedIconCount { count: usize },
    #[error("invalid icon crop window")]
    Geometry(#[from] GeometryError),
}

impl ExtractionError {
    pub fn kind(&self) -> VisionErrorKind {
        match self {
            ExtractionError::Crop { source, .. } => source.kind(),
            ExtractionError::Recognition { source, .. } => source.kind(),
            ExtractionError::UnexpectedIconPosition { .. } => {
                VisionErrorKind::UnexpectedIconPosition
            }
            ExtractionError::UnrecognizedIconCount { .. } => {
                VisionErrorKind::UnrecognizedIconCount
            }
            ExtractionError::Geometry(e) => e.kind(),
        }
    }
}
