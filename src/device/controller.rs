//! Tap and swipe input on top of a [`DeviceClient`].

use anyhow::{Context, Result};
use image::DynamicImage;
use std::time::Duration;

use super::DeviceClient;
use crate::config::DeviceConfig;
use crate::geometry::Point;

/// Pauses after each kind of input, giving the UI time to react.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputTimings {
    pub tap_debounce: Duration,
    pub tap_multiple_debounce: Duration,
    pub swipe_duration: Duration,
    pub swipe_debounce: Duration,
}

impl InputTimings {
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self {
            tap_debounce: Duration::from_millis(config.tap_debounce_ms),
            tap_multiple_debounce: Duration::from_millis(config.tap_multiple_debounce_ms),
            swipe_duration: Duration::from_millis(config.swipe_duration_ms),
            swipe_debounce: Duration::from_millis(config.swipe_debounce_ms),
        }
    }

    /// No pauses at all. Used by tests.
    pub fn immediate() -> Self {
        Self {
            tap_debounce: Duration::ZERO,
            tap_multiple_debounce: Duration::ZERO,
            swipe_duration: Duration::ZERO,
            swipe_debounce: Duration::ZERO,
        }
    }
}

fn pause(d: Duration) {
    if !d.is_zero() {
        std::thread::sleep(d);
    }
}

/// Higher-level input on a device. Points are sent truncated to whole pixels.
pub struct Controller<C: DeviceClient> {
    client: C,
    timings: InputTimings,
}

impl<C: DeviceClient> Controller<C> {
    pub fn new(client: C, timings: InputTimings) -> Self {
        Self { client, timings }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Latest screen capture, still in the capture source's channel order.
    pub fn get_raw_screenshot(&mut self) -> Result<DynamicImage> {
        self.client.screenshot().context("Failed to capture screenshot")
    }

    fn send_tap(&mut self, pt: Point) -> Result<()> {
        let (x, y) = pt.to_int_tuple_x_y();
        self.client
            .shell(&format!("input tap {} {}", x, y))
            .with_context(|| format!("Failed to tap at {}", pt))?;
        Ok(())
    }

    pub fn tap(&mut self, pt: Point) -> Result<()> {
        self.send_tap(pt)?;
        pause(self.timings.tap_debounce);
        Ok(())
    }

    /// Taps `count` times back to back, then waits once.
    pub fn tap_multiple(&mut self, pt: Point, count: u32) -> Result<()> {
        for _ in 0..count {
            self.send_tap(pt)
                .with_context(|| format!("Failed to tap {} times at {}", count, pt))?;
        }
        pause(self.timings.tap_multiple_debounce);
        Ok(())
    }

    pub fn swipe(&mut self, start: Point, end: Point) -> Result<()> {
        let (x1, y1) = start.to_int_tuple_x_y();
        let (x2, y2) = end.to_int_tuple_x_y();
        let duration_ms = self.timings.swipe_duration.as_millis();
        self.client
            .shell(&format!("input swipe {} {} {} {} {}", x1, y1, x2, y2, duration_ms))
            .with_context(|| format!("Failed to swipe from {} to {}", start, end))?;
        pause(self.timings.swipe_debounce);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::anyhow;
    use image::{ImageBuffer, Rgba};
    use std::collections::VecDeque;

    /// In-memory device: serves queued frames and records shell commands.
    #[derive(Default)]
    pub(crate) struct ScriptedDevice {
        pub frames: VecDeque<DynamicImage>,
        pub commands: Vec<String>,
        pub connected: bool,
        pub connects: u32,
        pub fail_shell: bool,
    }

    impl DeviceClient for ScriptedDevice {
        fn connect(&mut self) -> Result<()> {
            self.connects += 1;
            self.connected = true;
            Ok(())
        }

        fn disconnect(&mut self) -> Result<()> {
            self.connected = false;
            Ok(())
        }

        fn check_connection(&mut self) -> bool {
            self.connected
        }

        fn shell(&mut self, cmd: &str) -> Result<String> {
            if self.fail_shell {
                return Err(anyhow!("device offline"));
            }
            self.commands.push(cmd.to_string());
            Ok(String::new())
        }

        fn screenshot(&mut self) -> Result<DynamicImage> {
            self.frames.pop_front().ok_or_else(|| anyhow!("no frame queued"))
        }
    }

    fn controller() -> Controller<ScriptedDevice> {
        Controller::new(ScriptedDevice::default(), InputTimings::immediate())
    }

    #[test]
    fn test_tap_truncates_coordinates() {
        let mut c = controller();
        c.tap(Point::new(1865.9, 45.2)).unwrap();
        assert_eq!(c.client().commands, vec!["input tap 1865 45"]);
    }

    #[test]
    fn test_tap_multiple() {
        let mut c = controller();
        c.tap_multiple(Point::new(10.0, 20.0), 3).unwrap();
        assert_eq!(c.client().commands.len(), 3);
        assert!(c.client().commands.iter().all(|cmd| cmd == "input tap 10 20"));
    }

    #[test]
    fn test_swipe_command() {
        let mut c = Controller::new(
            ScriptedDevice::default(),
            InputTimings {
                swipe_duration: Duration::from_millis(500),
                ..InputTimings::immediate()
            },
        );
        c.swipe(Point::new(0.0, 100.0), Point::new(0.0, 600.0)).unwrap();
        assert_eq!(c.client().commands, vec!["input swipe 0 100 0 600 500"]);
    }

    #[test]
    fn test_tap_error_names_the_point() {
        let mut c = controller();
        c.client_mut().fail_shell = true;
        let err = c.tap(Point::new(1.0, 2.0)).unwrap_err();
        assert!(err.to_string().contains("(1, 2)"), "{}", err);
    }

    #[test]
    fn test_raw_screenshot_comes_from_client() {
        let mut c = controller();
        let frame = ImageBuffer::from_pixel(4, 3, Rgba([1u8, 2, 3, 255]));
        c.client_mut().frames.push_back(DynamicImage::ImageRgba8(frame));

        let shot = c.get_raw_screenshot().unwrap();
        assert_eq!((shot.width(), shot.height()), (4, 3));
        assert!(c.get_raw_screenshot().is_err());
    }
}
