//! apron-vision
//!
//! Perception layer for automating an airport-management mobile game over
//! adb. Finds interactive elements in a screen capture (filter column icons,
//! toggle switch states) and hands click points to the input controller.

pub mod bot;
pub mod config;
pub mod device;
pub mod error;
pub mod geometry;
pub mod paths;
pub mod vision;

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

pub use error::{
    ExtractionError, GeometryError, ImageProcessingError, RecognitionError, VisionErrorKind,
};
pub use geometry::{Point, Region};

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("apron_vision.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}
