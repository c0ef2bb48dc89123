//! # Coffee Shop Common
//!
//! Pieces shared by every Coffee Shop crate:
//! - unified `tracing` initialization for binaries
//! - the figment-backed [`config::ConfigLoader`] trait and its error type

pub mod config;
pub mod logging;

pub use config::{ConfigLoader, ConfigurationError};
