//! Process bootstrap shared by forward bot binaries

pub mod bootstrap;

pub use bootstrap::{LogSettings, init_env, init_tracing};
