//! Layer catalog: which rasters a map carries and what their channels mean.
//!
//! Every map has one Ground, one Biome and one Alpha raster plus one raster
//! per [`Topology`] category. The channel layout of each kind is fixed by the
//! map format, so texture indices are modelled as enums here and only turn
//! into plain `usize` at the raster boundary.

use std::fmt;
use std::str::FromStr;

use crate::error::LayerError;

macro_rules! texture_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = $label]
                $variant,
            )+
        }

        impl $name {
            /// Every texture in channel order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Channel index of this texture.
            pub fn index(self) -> usize {
                self as usize
            }

            /// Texture stored in channel `index`, if any.
            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            /// Display name, also used as the texture binding name.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

texture_enum! {
    /// Ground splat textures.
    GroundTexture {
        Dirt => "Dirt",
        Snow => "Snow",
        Sand => "Sand",
        Rock => "Rock",
        Grass => "Grass",
        Forest => "Forest",
        Stones => "Stones",
        Gravel => "Gravel",
    }
}

texture_enum! {
    /// Biome (climate zone) textures.
    BiomeTexture {
        Tundra => "Tundra",
        Temperate => "Temperate",
        Arid => "Arid",
        Arctic => "Arctic",
    }
}

texture_enum! {
    /// Two-state textures shared by the Alpha and Topology rasters.
    ///
    /// For Alpha, `Active` means the terrain surface is visible; for a
    /// topology category it means the cell belongs to the category.
    MiscTexture {
        Active => "Active",
        Inactive => "Inactive",
    }
}

texture_enum! {
    /// Topology categories, in the bit order used by the map format.
    Topology {
        Field => "Field",
        Cliff => "Cliff",
        Summit => "Summit",
        Beachside => "Beachside",
        Beach => "Beach",
        Forest => "Forest",
        Forestside => "Forestside",
        Ocean => "Ocean",
        Oceanside => "Oceanside",
        Decor => "Decor",
        Monument => "Monument",
        Road => "Road",
        Roadside => "Roadside",
        Swamp => "Swamp",
        River => "River",
        Riverside => "Riverside",
        Lake => "Lake",
        Lakeside => "Lakeside",
        Offshore => "Offshore",
        Rail => "Rail",
        Railside => "Railside",
        Building => "Building",
        Cliffside => "Cliffside",
        Mountain => "Mountain",
        Clutter => "Clutter",
        Alt => "Alt",
        Tier0 => "Tier0",
        Tier1 => "Tier1",
        Tier2 => "Tier2",
        Mainland => "Mainland",
        Hilltop => "Hilltop",
    }
}

/// Number of topology categories.
pub const TOPOLOGY_COUNT: usize = Topology::ALL.len();

impl Topology {
    /// Bit of this category in a per-cell topology mask.
    pub fn bit(self) -> u32 {
        1 << self.index()
    }

    /// Categories whose bits are set in `mask`, in catalog order.
    pub fn from_mask(mask: u32) -> Vec<Topology> {
        Self::ALL
            .iter()
            .copied()
            .filter(|t| mask & t.bit() != 0)
            .collect()
    }

    /// Combined mask of a selection.
    pub fn mask_of(selection: &[Topology]) -> u32 {
        selection.iter().fold(0, |mask, t| mask | t.bit())
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// Which raster of the map an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Ground splat map, 8 textures.
    Ground,
    /// Biome map, 4 textures.
    Biome,
    /// Alpha (terrain visibility) map, 2 textures.
    Alpha,
    /// One topology category, 2 textures.
    Topology(Topology),
}

impl LayerKind {
    /// Texture count of a ground raster.
    pub const GROUND_TEXTURES: usize = GroundTexture::ALL.len();
    /// Texture count of a biome raster.
    pub const BIOME_TEXTURES: usize = BiomeTexture::ALL.len();
    /// Texture count of alpha and topology rasters.
    pub const MISC_TEXTURES: usize = MiscTexture::ALL.len();

    /// Topology layer at catalog `index`.
    ///
    /// # Errors
    ///
    /// [`LayerError::InvalidLayerKind`] if `index >= TOPOLOGY_COUNT`.
    pub fn topology_index(index: usize) -> Result<Self, LayerError> {
        Topology::from_index(index)
            .map(LayerKind::Topology)
            .ok_or_else(|| LayerError::InvalidLayerKind(format!("topology index {index}")))
    }

    /// Fixed texture count of this kind.
    pub fn texture_count(self) -> usize {
        match self {
            LayerKind::Ground => Self::GROUND_TEXTURES,
            LayerKind::Biome => Self::BIOME_TEXTURES,
            LayerKind::Alpha | LayerKind::Topology(_) => Self::MISC_TEXTURES,
        }
    }

    /// Names of the textures bound to the display when this kind is active.
    pub fn texture_names(self) -> Vec<&'static str> {
        match self {
            LayerKind::Ground => GroundTexture::ALL.iter().map(|t| t.name()).collect(),
            LayerKind::Biome => BiomeTexture::ALL.iter().map(|t| t.name()).collect(),
            LayerKind::Alpha | LayerKind::Topology(_) => {
                MiscTexture::ALL.iter().map(|t| t.name()).collect()
            }
        }
    }

    /// `true` for the Alpha layer.
    pub fn is_alpha(self) -> bool {
        matches!(self, LayerKind::Alpha)
    }

    /// Checks that `texture` is a channel of this kind.
    pub fn check_texture(self, texture: usize) -> Result<(), LayerError> {
        let channels = self.texture_count();
        if texture < channels {
            Ok(())
        } else {
            Err(LayerError::TextureOutOfRange { texture, channels })
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Ground => f.write_str("ground"),
            LayerKind::Biome => f.write_str("biome"),
            LayerKind::Alpha => f.write_str("alpha"),
            LayerKind::Topology(t) => write!(f, "topology:{}", t.name().to_ascii_lowercase()),
        }
    }
}

/// Parses `ground`, `biome`, `alpha`, `topology:<name>` or `topology:<index>`.
impl FromStr for LayerKind {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "ground" => Ok(LayerKind::Ground),
            "biome" => Ok(LayerKind::Biome),
            "alpha" => Ok(LayerKind::Alpha),
            other => {
                let Some(rest) = other.strip_prefix("topology:") else {
                    return Err(LayerError::InvalidLayerKind(s.to_string()));
                };
                if let Ok(index) = rest.parse::<usize>() {
                    return LayerKind::topology_index(index);
                }
                Topology::from_name(rest)
                    .map(LayerKind::Topology)
                    .ok_or_else(|| LayerError::InvalidLayerKind(s.to_string()))
            }
        }
    }
}
