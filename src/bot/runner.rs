//! Bot runner - the connect / cycle / retry loop.
//!
//! Connects once up front, then repeats: keep the connection alive, run one
//! bot cycle, sleep. A failed cycle is logged and retried after the same
//! pause; the loop only ends when an abort is requested.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::bot::service::BotService;
use crate::config::BotConfig;
use crate::device::{AdbDeviceClient, ConnectionTimeout, Controller, DeviceClient, InputTimings};

/// Global abort flag, checked before every cycle.
static ABORT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Requests the loop to stop after the current cycle.
pub fn request_abort() {
    ABORT_REQUESTED.store(true, Ordering::SeqCst);
}

pub fn is_abort_requested() -> bool {
    ABORT_REQUESTED.load(Ordering::SeqCst)
}

/// Outcome of one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed,
    /// The cycle failed; the connection is assumed lost until the next success
    Failed,
}

pub struct Runner<C: DeviceClient> {
    service: BotService<C>,
    cycle_pause: Duration,
    was_connected: bool,
}

impl<C: DeviceClient> Runner<C> {
    pub fn new(service: BotService<C>, cycle_pause: Duration) -> Self {
        Self {
            service,
            cycle_pause,
            was_connected: true,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.was_connected
    }

    fn cycle(&mut self) -> Result<()> {
        self.service
            .controller_mut()
            .client_mut()
            .maintain_connection()?;

        if self.was_connected {
            crate::log("Connection stable. Starting bot services.");
        } else {
            crate::log("Connection stable - reconnected.");
            self.was_connected = true;
        }
        self.service.run_cycle()
    }

    /// Runs one cycle and logs connection transitions.
    pub fn step(&mut self) -> CycleOutcome {
        match self.cycle() {
            Ok(()) => {
                crate::log(&format!(
                    "Finished bot services. Next cycle starts in {} seconds",
                    self.cycle_pause.as_secs()
                ));
                CycleOutcome::Completed
            }
            Err(e) => {
                if let Some(timeout) = e.downcast_ref::<ConnectionTimeout>() {
                    crate::log(&format!("Warning: {}", timeout));
                } else {
                    crate::log(&format!("Unexpected error in bot cycle: {:#}", e));
                }
                if self.was_connected {
                    crate::log("Connection lost.");
                    self.was_connected = false;
                }
                crate::log(&format!(
                    "Retrying in {} seconds...",
                    self.cycle_pause.as_secs()
                ));
                CycleOutcome::Failed
            }
        }
    }

    /// Loops until [`request_abort`] is called.
    pub fn run(&mut self) {
        while !is_abort_requested() {
            self.step();
            std::thread::sleep(self.cycle_pause);
        }
        crate::log("Abort requested, stopping bot");
    }
}

/// Connects to the configured adb device and runs the bot loop.
///
/// Fails only if the initial connection cannot be made.
pub fn start_bot(config: BotConfig) -> Result<()> {
    let mut client = AdbDeviceClient::new(&config.device);
    client
        .connect()
        .context("Failed initial connection to adb device")?;
    crate::log(&format!("Connected to {}", client.addr()));

    let controller = Controller::new(client, InputTimings::from_config(&config.device));
    let cycle_pause = Duration::from_secs(config.cycle_seconds);
    let mut runner = Runner::new(BotService::new(controller, config), cycle_pause);
    runner.run();
    Ok(())
}
