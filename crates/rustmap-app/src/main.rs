//! The binary entry point of the RustMap editor.

use clap::Parser;
use rustmap_app::cli::Cli;
use rustmap_app::commands;
use rustmap_app::platform::PlatformDirs;
use rustmap_config::Config;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    let dirs = match PlatformDirs::resolve(cli.args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to resolve platform directories: {e}");
            std::process::exit(1);
        }
    };

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {e}");
            Config::default()
        }
    };
    config.apply_cli_overrides(&cli.args);

    rustmap_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = commands::run(&cli.command, &config) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
