//! Support code for the KAIROS schema client binaries.
//!
//! - [`config`]: the optional TOML configuration file
//! - [`logging`]: `tracing` subscriber setup
//! - [`pipeline`]: the YAML to SDF conversion run shared by `yaml2sdf`

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod logging;
pub mod pipeline;

pub use config::{Config, ConfigError};
pub use pipeline::{run, RunReport, Settings};
