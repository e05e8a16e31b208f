//! Runs one command against a map file.

use std::fmt::Write as _;
use std::path::Path;

use rustmap_config::Config;
use rustmap_editor::{EditorError, MapSession, SessionSettings};
use rustmap_layers::{LayerError, LayerKind, LogProgress, NullDisplay, Rotation, TOPOLOGY_COUNT};
use rustmap_world::BinaryMapCodec;
use tracing::info;

use crate::cli::Command;

/// Errors surfaced to the user by a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Layer(#[from] LayerError),

    /// Neither a texture index nor a texture name of the layer.
    #[error("`{texture}` is not a texture of {layer} (expected one of: {expected})")]
    UnknownTexture {
        texture: String,
        layer: LayerKind,
        expected: String,
    },
}

/// Texture index from a name or index of `kind`'s textures.
pub fn parse_texture(kind: LayerKind, texture: &str) -> Result<usize, CommandError> {
    if let Ok(index) = texture.trim().parse::<usize>() {
        kind.check_texture(index)?;
        return Ok(index);
    }
    let names = kind.texture_names();
    names
        .iter()
        .position(|name| name.eq_ignore_ascii_case(texture.trim()))
        .ok_or_else(|| CommandError::UnknownTexture {
            texture: texture.to_string(),
            layer: kind,
            expected: names.join(", "),
        })
}

fn open_session(config: &Config) -> MapSession {
    MapSession::new(
        Box::new(NullDisplay),
        Box::new(LogProgress::default()),
        SessionSettings::from_config(config),
    )
}

/// Loads `file`, applies `edit` and writes the map back in place.
fn edit_map(
    config: &Config,
    file: &Path,
    edit: impl FnOnce(&mut MapSession) -> Result<(), CommandError>,
) -> Result<(), CommandError> {
    let path = config.resolve_map_path(file);
    let codec = BinaryMapCodec::new(config.io.compress);
    let mut session = open_session(config);
    session.load(&path, &codec)?;
    edit(&mut session)?;
    session.save(&path, &codec)?;
    Ok(())
}

/// Human-readable summary of the open map.
pub fn describe(session: &MapSession) -> Result<String, CommandError> {
    let size = session.size()?;
    let land = session.land()?;
    let (rows, cols) = session.store().resolution()?;
    let (low, high) = land.min_max().unwrap_or((0.0, 0.0));
    let mut out = String::new();
    let _ = writeln!(out, "size:       {} x {} m, height scale {} m", size.x, size.z, size.y);
    let _ = writeln!(out, "heightmap:  {} x {}", land.rows(), land.cols());
    let _ = writeln!(out, "splat:      {rows} x {cols}");
    let _ = writeln!(out, "land:       {:.1} .. {:.1} m", low * size.y, high * size.y);
    let _ = writeln!(out, "topologies: {TOPOLOGY_COUNT}");
    let _ = writeln!(out, "prefabs:    {}", session.prefabs()?.len());
    let _ = write!(out, "paths:      {}", session.paths()?.len());
    Ok(out)
}

/// Runs `command` with `config`.
pub fn run(command: &Command, config: &Config) -> Result<(), CommandError> {
    match command {
        Command::New { out } => {
            let path = config.resolve_map_path(out);
            let mut session = open_session(config);
            session.create_new_map(config.map.default_size)?;
            session.save(&path, &BinaryMapCodec::new(config.io.compress))?;
            info!("Created {}", path.display());
        }
        Command::Info { file } => {
            let mut session = open_session(config);
            session.load(
                &config.resolve_map_path(file),
                &BinaryMapCodec::new(config.io.compress),
            )?;
            println!("{}", describe(&session)?);
        }
        Command::Paint {
            file,
            layer,
            texture,
        } => {
            let kind: LayerKind = layer.parse()?;
            let texture = parse_texture(kind, texture)?;
            edit_map(config, file, |session| Ok(session.paint_layer(kind, texture)?))?;
        }
        Command::Rotate { file, ccw } => {
            let rotation = Rotation::from_cw(!ccw);
            edit_map(config, file, |session| {
                session.rotate_map(rotation)?;
                Ok(())
            })?;
        }
        Command::Normalise { file, low, high } => {
            edit_map(config, file, |session| {
                Ok(session.normalise_heightmap(*low, *high)?)
            })?;
        }
        Command::Offset {
            file,
            metres,
            no_check,
            water,
        } => {
            edit_map(config, file, |session| {
                Ok(session.offset_heightmap(*metres, *water, !no_check)?)
            })?;
        }
        Command::River {
            file,
            layer,
            texture,
            above_terrain,
        } => {
            let kind: LayerKind = layer.parse()?;
            let texture = parse_texture(kind, texture)?;
            edit_map(config, file, |session| {
                Ok(session.paint_river(kind, *above_terrain, texture)?)
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rustmap_layers::{GroundTexture, MiscTexture, Topology};
    use rustmap_world::MapCodec;

    use super::*;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.map.default_size = 16;
        config.io.map_dir = dir.to_path_buf();
        config
    }

    fn reopen(config: &Config, file: &str) -> MapSession {
        let mut session = open_session(config);
        session
            .load(&config.io.map_dir.join(file), &BinaryMapCodec::default())
            .unwrap();
        session
    }

    #[test]
    fn test_parse_texture() {
        assert_eq!(parse_texture(LayerKind::Ground, "rock").unwrap(), GroundTexture::Rock.index());
        assert_eq!(parse_texture(LayerKind::Ground, "7").unwrap(), 7);
        assert!(matches!(
            parse_texture(LayerKind::Biome, "7"),
            Err(CommandError::Layer(LayerError::TextureOutOfRange { .. }))
        ));
        assert!(matches!(
            parse_texture(LayerKind::Alpha, "lava"),
            Err(CommandError::UnknownTexture { .. })
        ));
    }

    #[test]
    fn test_new_then_edit() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let file = PathBuf::from("edited.map");

        run(&Command::New { out: file.clone() }, &config).unwrap();
        assert!(tmp.path().join(&file).exists());

        run(
            &Command::Paint {
                file: file.clone(),
                layer: "ground".to_string(),
                texture: "Sand".to_string(),
            },
            &config,
        )
        .unwrap();
        run(
            &Command::Offset {
                file: file.clone(),
                metres: -3.0,
                no_check: false,
                water: false,
            },
            &config,
        )
        .unwrap();

        let session = reopen(&config, "edited.map");
        let ground = session.layer(LayerKind::Ground).unwrap();
        assert_eq!(ground.dominant(4, 4), GroundTexture::Sand.index());
        assert!((session.height_at(0.5, 0.5).unwrap() - 500.0).abs() < 0.1);

        let summary = describe(&session).unwrap();
        assert!(summary.contains("splat:      8 x 8"));
    }

    #[test]
    fn test_rejected_offset_leaves_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let file = PathBuf::from("steady.map");
        run(&Command::New { out: file.clone() }, &config).unwrap();
        let before = std::fs::read(tmp.path().join(&file)).unwrap();

        let result = run(
            &Command::Offset {
                file: file.clone(),
                metres: 900.0,
                no_check: false,
                water: false,
            },
            &config,
        );
        assert!(matches!(
            result,
            Err(CommandError::Editor(EditorError::Layer(LayerError::OutOfRange { .. })))
        ));
        assert_eq!(std::fs::read(tmp.path().join(&file)).unwrap(), before);
    }

    #[test]
    fn test_river_on_topology() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let file = PathBuf::from("river.map");
        run(&Command::New { out: file.clone() }, &config).unwrap();

        // Lift the water over the land and the river level by hand.
        let codec = BinaryMapCodec::default();
        let path = tmp.path().join(&file);
        let mut session = reopen(&config, "river.map");
        session.raise_water_level(600.0).unwrap();
        session.save(&path, &codec).unwrap();

        run(
            &Command::River {
                file: file.clone(),
                layer: "topology:river".to_string(),
                texture: "active".to_string(),
                above_terrain: true,
            },
            &config,
        )
        .unwrap();
        run(&Command::Rotate { file, ccw: true }, &config).unwrap();

        let world = rustmap_world::world_to_terrain(&codec.load(&path).unwrap()).unwrap();
        let river = &world.layers.topology[Topology::River.index()];
        assert_eq!(river.dominant(0, 0), MiscTexture::Active.index());
    }
}
