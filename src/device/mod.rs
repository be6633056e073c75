//! Device transport: screen capture and input injection.
//!
//! This module provides:
//! - The [`DeviceClient`] seam (connection handling, shell, screenshots)
//! - An adb-backed client (`AdbDeviceClient`)
//! - The input [`Controller`] that turns points into tap/swipe commands

pub mod adb;
pub mod controller;

use anyhow::Result;
use image::DynamicImage;
use thiserror::Error;

pub use adb::AdbDeviceClient;
pub use controller::{Controller, InputTimings};

/// Raised when every connection attempt failed. The runner treats it as a
/// recoverable connection drop rather than an unexpected error.
#[derive(Debug, Error)]
#[error("device connection to {addr} cannot be established after {tries} tries")]
pub struct ConnectionTimeout {
    pub addr: String,
    pub tries: u32,
}

/// A connected device that can run shell commands and capture its screen.
pub trait DeviceClient {
    /// Connects, retrying per the client's policy.
    /// Fails with [`ConnectionTimeout`] when all attempts are exhausted.
    fn connect(&mut self) -> Result<()>;

    fn disconnect(&mut self) -> Result<()>;

    /// `true` while the device reports itself as ready.
    fn check_connection(&mut self) -> bool;

    fn reconnect(&mut self) -> Result<()> {
        self.disconnect()?;
        self.connect()
    }

    /// Reconnects if the connection dropped.
    fn maintain_connection(&mut self) -> Result<()> {
        if !self.check_connection() {
            crate::log("Checked connection - no connection. Reconnecting...");
            self.reconnect()?;
        }
        Ok(())
    }

    /// Runs a shell command on the device and returns its output.
    fn shell(&mut self, cmd: &str) -> Result<String>;

    /// Captures the current screen as decoded by the capture source.
    fn screenshot(&mut self) -> Result<DynamicImage>;
}
