//! Bot configuration.
//!
//! Loads settings from config.json at startup. Provides the device address,
//! timings, tap targets on the reference 1920x1080 layout and the vision
//! tuning.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::geometry::{Point, Region};
use crate::vision::config::region;
use crate::vision::VisionConfig;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<BotConfig> = OnceLock::new();

/// Device connection and input timing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// adb executable, looked up on PATH unless absolute
    pub adb_path: String,
    /// host:port of the emulator or device
    pub addr: String,
    /// Connection attempts before giving up
    pub connect_retries: u32,
    /// Pause between connection attempts (milliseconds)
    pub retry_delay_ms: u64,
    /// Pause after a single tap (milliseconds)
    pub tap_debounce_ms: u64,
    /// Pause after a burst of taps (milliseconds)
    pub tap_multiple_debounce_ms: u64,
    /// Swipe gesture duration (milliseconds)
    pub swipe_duration_ms: u64,
    /// Pause after a swipe (milliseconds)
    pub swipe_debounce_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            adb_path: "adb".to_string(),
            addr: "127.0.0.1:5555".to_string(),
            connect_retries: 3,
            retry_delay_ms: 1000,
            tap_debounce_ms: 200,
            tap_multiple_debounce_ms: 500,
            swipe_duration_ms: 500,
            swipe_debounce_ms: 500,
        }
    }
}

/// Tap targets and regions of the selected-plane panel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectedPlaneConfig {
    /// "+" button adding one handling crew worker
    pub plus_worker_button: Point,
    /// Ramp agent toggle switch, cropped for classification
    pub ramp_agent_toggle_region: Region,
    /// Where to tap to flip the ramp agent toggle
    pub ramp_agent_toggle_button: Point,
    /// Main action button (assign crew / de-icing)
    pub action_button: Point,
    /// Handling crew added per ground service instruction
    pub handling_crew_count: u32,
}

impl Default for SelectedPlaneConfig {
    fn default() -> Self {
        Self {
            plus_worker_button: Point::new(742.0, 842.0),
            ramp_agent_toggle_region: region(690.0, 900.0, 790.0, 950.0),
            ramp_agent_toggle_button: Point::new(740.0, 925.0),
            action_button: Point::new(640.0, 1010.0),
            handling_crew_count: 13,
        }
    }
}

/// Complete bot configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub device: DeviceConfig,
    pub selected_plane: SelectedPlaneConfig,
    pub vision: VisionConfig,
    /// Seconds between bot cycles and between reconnect attempts
    pub cycle_seconds: u64,
    /// Save filter column crops to the temp directory every cycle
    pub save_debug_images: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            selected_plane: SelectedPlaneConfig::default(),
            vision: VisionConfig::default(),
            cycle_seconds: 10,
            save_debug_images: false,
        }
    }
}

/// Loads configuration from `path`, falling back to defaults when the file
/// is missing or unreadable.
pub fn load_config_from(path: &Path) -> BotConfig {
    crate::log(&format!("Looking for config at: {}", path.display()));

    if !path.exists() {
        crate::log("config.json not found. Using default config.");
        return BotConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                crate::log("Config loaded from config.json");
                config
            }
            Err(e) => {
                crate::log(&format!(
                    "Failed to parse config.json: {}. Using defaults.",
                    e
                ));
                BotConfig::default()
            }
        },
        Err(e) => {
            crate::log(&format!("Failed to read config.json: {}. Using defaults.", e));
            BotConfig::default()
        }
    }
}

/// Initializes the global configuration from config.json next to the
/// executable. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config_from(&crate::paths::get_config_path()));
}

/// Returns a reference to the global configuration.
/// Panics if called before init_config().
pub fn get_config() -> &'static BotConfig {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json"));
        assert_eq!(config.cycle_seconds, 10);
        assert_eq!(config.device.connect_retries, 3);
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "device": {"addr": "10.0.0.2:5555"},
                "selected_plane": {"plus_worker_button": {"x": 1.0, "y": 2.0}},
                "vision": {"filter_column": {"palette_icon_count": 8}}
            }"#,
        )
        .unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.device.addr, "10.0.0.2:5555");
        assert_eq!(config.device.adb_path, "adb");
        assert_eq!(config.selected_plane.plus_worker_button, Point::new(1.0, 2.0));
        assert_eq!(config.selected_plane.handling_crew_count, 13);
        assert_eq!(config.vision.filter_column.palette_icon_count, 8);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        // Degenerate region fails validation during deserialization.
        fs::write(
            &path,
            r#"{"selected_plane": {"ramp_agent_toggle_region":
                {"corner1": {"x": 5.0, "y": 5.0}, "corner2": {"x": 5.0, "y": 5.0}}}}"#,
        )
        .unwrap();

        let config = load_config_from(&path);
        assert_eq!(
            config.selected_plane.ramp_agent_toggle_region,
            SelectedPlaneConfig::default().ramp_agent_toggle_region
        );
    }
}
