//! Configuration for the orrery.
//!
//! Runtime settings persist to disk as RON files with every section
//! defaulted, so older or partial files keep loading. CLI arguments override
//! the loaded values.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, OutputConfig, PassToggles, RenderConfig, SimulationConfig,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
