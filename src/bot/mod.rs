//! Application control flow on top of the vision pipeline.
//!
//! This module provides:
//! - `BotService`: airport actions (ground service, de-icing, filter column)
//! - `Runner`: the connect / cycle / retry loop

pub mod runner;
pub mod service;

pub use runner::{request_abort, start_bot, CycleOutcome, Runner};
pub use service::BotService;
