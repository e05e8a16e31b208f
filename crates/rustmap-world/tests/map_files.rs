use glam::Vec3;
use rustmap_layers::{GroundTexture, Topology};
use rustmap_world::{
    BinaryMapCodec, DEFAULT_HEIGHT_SCALE, MapCodec, PrefabData, WorldError, empty_map,
    terrain_to_world, world_to_terrain,
};

#[test]
fn test_save_load_convert() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("maps").join("island.map");

    let mut info = empty_map(32, DEFAULT_HEIGHT_SCALE).unwrap();
    info.layers.ground.paint_cell(3, 4, GroundTexture::Snow.index());
    info.layers.topology[Topology::Road.index()].paint_cell(0, 15, 0);
    info.prefabs.push(PrefabData {
        category: "Monument".to_string(),
        id: 7,
        position: Vec3::new(-4.0, 12.0, 8.0),
        rotation: Vec3::new(0.0, 45.0, 0.0),
        scale: Vec3::ONE,
    });

    let codec = BinaryMapCodec::default();
    codec.save(&path, &terrain_to_world(&info).unwrap()).unwrap();
    assert!(path.exists());

    let loaded = world_to_terrain(&codec.load(&path).unwrap()).unwrap();
    assert_eq!(loaded.layers, info.layers);
    assert_eq!(loaded.prefabs, info.prefabs);
    assert_eq!(loaded.resolution(), 17);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = BinaryMapCodec::default().load(&dir.path().join("absent.map"));
    assert!(matches!(result, Err(WorldError::Io(_))));
}

#[test]
fn test_load_foreign_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello world").unwrap();
    let result = BinaryMapCodec::default().load(&path);
    assert!(matches!(result, Err(WorldError::InvalidMagic)));
}
