//! Forward Bot Core - launcher configuration and errors
//!
//! This crate contains the configuration model for the forward bot launcher.
//! It performs no I/O beyond reading environment variables.

pub mod config;
pub mod error;

pub use config::{Entrypoint, EnvVar, LaunchConfig};
pub use error::ConfigError;
