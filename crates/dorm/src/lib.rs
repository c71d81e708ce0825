//! Dorm - dormitory occupancy administration
//!
//! Loads a backend snapshot, runs bed assignments through the occupancy core,
//! and keeps a local outbox of the intents the backend must apply.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod outbox;
pub mod output;
pub mod snapshot;

pub use error::{Error, Result};
