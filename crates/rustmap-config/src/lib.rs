//! Configuration for the RustMap editor.
//!
//! Settings persist to disk as a RON file, tolerate missing or unknown
//! fields, and can be overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, IoConfig, MapConfig, PaintConfig, default_config_dir};
pub use error::ConfigError;
