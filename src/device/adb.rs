//! Device client backed by the `adb` executable.

use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use std::process::{Command, Output};
use std::time::Duration;

use super::{ConnectionTimeout, DeviceClient};
use crate::config::DeviceConfig;

/// Talks to one device over `adb -s <addr>`.
pub struct AdbDeviceClient {
    adb_path: String,
    addr: String,
    retries: u32,
    retry_delay: Duration,
    connected: bool,
}

impl AdbDeviceClient {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            adb_path: config.adb_path.clone(),
            addr: config.addr.clone(),
            retries: config.connect_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            connected: false,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        let output = Command::new(&self.adb_path)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run {} {}", self.adb_path, args.join(" ")))?;

        if !output.status.success() {
            return Err(anyhow!(
                "{} {} exited with {}: {}",
                self.adb_path,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(output)
    }

    fn run_on_device(&self, args: &[&str]) -> Result<Output> {
        let mut full = vec!["-s", self.addr.as_str()];
        full.extend_from_slice(args);
        self.run(&full)
    }

    fn get_state(&self) -> Result<String> {
        let output = self.run_on_device(&["get-state"])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn try_connect(&self) -> Result<()> {
        let output = self.run(&["connect", &self.addr])?;
        crate::log(String::from_utf8_lossy(&output.stdout).trim());

        let state = self.get_state()?;
        if state != "device" {
            return Err(anyhow!("Connected device with state '{}'", state));
        }
        Ok(())
    }
}

impl DeviceClient for AdbDeviceClient {
    fn connect(&mut self) -> Result<()> {
        for attempt in 1..=self.retries {
            match self.try_connect() {
                Ok(()) => {
                    self.connected = true;
                    crate::log(&format!(
                        "Adb device connection is established at {}",
                        self.addr
                    ));
                    return Ok(());
                }
                Err(e) => {
                    crate::log(&format!(
                        "Adb connection attempt {}/{} failed: {}. Retry...",
                        attempt, self.retries, e
                    ));
                    std::thread::sleep(self.retry_delay);
                }
            }
        }
        self.connected = false;
        Err(ConnectionTimeout {
            addr: self.addr.clone(),
            tries: self.retries,
        }
        .into())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        // adb reports an error when the device was already gone, which is fine here.
        if let Err(e) = self.run(&["disconnect", &self.addr]) {
            crate::log(&format!("Adb disconnect: {}", e));
        }
        Ok(())
    }

    fn check_connection(&mut self) -> bool {
        if !self.connected {
            return false;
        }
        match self.get_state() {
            Ok(state) if state == "device" => true,
            _ => {
                self.connected = false;
                false
            }
        }
    }

    fn shell(&mut self, cmd: &str) -> Result<String> {
        self.maintain_connection()?;
        let output = self.run_on_device(&["shell", cmd])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn screenshot(&mut self) -> Result<DynamicImage> {
        self.maintain_connection()?;
        let output = self.run_on_device(&["exec-out", "screencap", "-p"])?;
        image::load_from_memory(&output.stdout).context("Failed to decode screencap output")
    }
}
