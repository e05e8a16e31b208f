//! Command-line interface of the `rustmap` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rustmap_config::CliArgs;

/// Headless map editing.
#[derive(Parser, Debug)]
#[command(name = "rustmap", version, about = "Headless map layer editor")]
pub struct Cli {
    #[command(flatten)]
    pub args: CliArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a flat map. Its edge length comes from `--size` or the config.
    New {
        /// Output map file.
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a summary of a map.
    Info {
        file: PathBuf,
    },
    /// Paint one texture over a whole layer.
    Paint {
        file: PathBuf,
        /// `ground`, `biome`, `alpha` or `topology:<name>`.
        #[arg(long)]
        layer: String,
        /// Texture name or index.
        #[arg(long)]
        texture: String,
    },
    /// Quarter-turn the whole map.
    Rotate {
        file: PathBuf,
        /// Turn counter-clockwise instead.
        #[arg(long)]
        ccw: bool,
    },
    /// Remap land heights onto `[low, high]`.
    Normalise {
        file: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        low: f32,
        #[arg(long, default_value_t = 1.0)]
        high: f32,
    },
    /// Raise or lower the land.
    Offset {
        file: PathBuf,
        /// Offset in metres.
        #[arg(long, allow_hyphen_values = true)]
        metres: f32,
        /// Clamp instead of rejecting offsets that leave the height range.
        #[arg(long)]
        no_check: bool,
        /// Offset the water as well.
        #[arg(long)]
        water: bool,
    },
    /// Paint wherever water stands above the river level.
    River {
        file: PathBuf,
        #[arg(long)]
        layer: String,
        #[arg(long)]
        texture: String,
        /// Only where the water is also above the land.
        #[arg(long)]
        above_terrain: bool,
    },
}
