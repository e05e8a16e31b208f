//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";
const APP_NAME: &str = "rustmap";

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// New-map and terrain scale settings.
    pub map: MapConfig,
    /// Painting thresholds.
    pub paint: PaintConfig,
    /// Map file locations and codec options.
    pub io: IoConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Map creation and terrain scale settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// Edge length in metres of a map created with `new`.
    pub default_size: u32,
    /// Vertical extent of the terrain in metres. Normalised heights are
    /// multiplied by this to get world heights.
    pub height_scale: f32,
    /// Minimum land height in metres applied to freshly created maps.
    pub new_map_min_height: f32,
    /// Ground texture index painted over a new map.
    pub ground_texture: usize,
    /// Biome texture index painted over a new map.
    pub biome_texture: usize,
    /// Alpha texture index painted over a new map.
    pub alpha_texture: usize,
}

/// Painting settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaintConfig {
    /// Water height in metres above which a cell counts as river.
    pub river_water_level: f32,
    /// Minimum weight for a ground/biome/topology texture to satisfy a condition.
    pub membership_threshold: f32,
    /// Minimum weight for an alpha texture to satisfy a condition.
    pub alpha_threshold: f32,
}

/// Map file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IoConfig {
    /// Directory relative map paths resolve against. Empty means the working directory.
    pub map_dir: PathBuf,
    /// Compress map bodies with LZ4 on save.
    pub compress: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write a JSON log file in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_size: 2000,
            height_scale: 1000.0,
            new_map_min_height: 503.0,
            ground_texture: 4,
            biome_texture: 1,
            alpha_texture: 0,
        }
    }
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            river_water_level: 500.0,
            membership_threshold: 0.5,
            alpha_threshold: 1.0,
        }
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            map_dir: PathBuf::new(),
            compress: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

/// Platform configuration directory for the editor, e.g. `~/.config/rustmap`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
            let config: Config =
                ron::from_str(&contents).map_err(ConfigError::parse(&config_path))?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::write(config_dir))?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::write(&config_path))?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents =
            std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
        let new_config: Config =
            ron::from_str(&contents).map_err(ConfigError::parse(&config_path))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Resolve a map path against [`IoConfig::map_dir`]. Absolute paths pass through.
    pub fn resolve_map_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || self.io.map_dir.as_os_str().is_empty() {
            path.to_path_buf()
        } else {
            self.io.map_dir.join(path)
        }
    }
}
