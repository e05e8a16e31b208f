//! Session settings drawn from the editor configuration.

use rustmap_config::Config;
use rustmap_layers::Conditions;

/// Everything a [`MapSession`](crate::MapSession) reads from configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    /// Vertical terrain extent in metres for new maps.
    pub height_scale: f32,
    /// Minimum land height in metres applied to new maps.
    pub new_map_min_height: f32,
    /// Ground texture painted over new maps.
    pub ground_texture: usize,
    /// Biome texture painted over new maps.
    pub biome_texture: usize,
    /// Alpha texture painted over new maps.
    pub alpha_texture: usize,
    /// Water height in metres above which a cell counts as river.
    pub river_water_level: f32,
    /// Weight a ground, biome or topology texture needs to satisfy a condition.
    pub membership_threshold: f32,
    /// Weight an alpha texture needs to satisfy a condition.
    pub alpha_threshold: f32,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            height_scale: config.map.height_scale,
            new_map_min_height: config.map.new_map_min_height,
            ground_texture: config.map.ground_texture,
            biome_texture: config.map.biome_texture,
            alpha_texture: config.map.alpha_texture,
            river_water_level: config.paint.river_water_level,
            membership_threshold: config.paint.membership_threshold,
            alpha_threshold: config.paint.alpha_threshold,
        }
    }

    /// Empty conditions carrying the configured thresholds.
    pub fn conditions(&self) -> Conditions {
        Conditions {
            membership_threshold: self.membership_threshold,
            alpha_threshold: self.alpha_threshold,
            ..Default::default()
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
