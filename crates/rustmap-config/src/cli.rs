//! Command-line overrides shared by every RustMap command.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Global command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Edge length in metres for newly created maps.
    #[arg(long, global = true)]
    pub size: Option<u32>,

    /// Vertical terrain extent in metres.
    #[arg(long, global = true)]
    pub height_scale: Option<f32>,

    /// Directory that relative map paths resolve against.
    #[arg(long, global = true)]
    pub map_dir: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(size) = args.size {
            self.map.default_size = size;
        }
        if let Some(scale) = args.height_scale {
            self.map.height_scale = scale;
        }
        if let Some(ref dir) = args.map_dir {
            self.io.map_dir = dir.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            log_level: Some("debug".to_string()),
            size: Some(4500),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.debug.log_level, "debug");
        assert_eq!(config.map.default_size, 4500);
        // Non-overridden fields retain defaults
        assert_eq!(config.map.height_scale, 1000.0);
        assert!(config.io.map_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }
}
