//! Saved parameters rebuild the same world.

use std::fs;

use world_generator::{build, ClimateTables, ConfigError, MapStore, WorldError, WorldMap, WorldParams};

#[test]
fn test_saved_map_regenerates_identically() {
    let dir = tempfile::tempdir().unwrap();
    let store = MapStore::new(dir.path());

    let params = WorldParams {
        name: "harbor".to_string(),
        seed: 31337,
        width: 64,
        height: 32,
        sea_level: 0.25,
        ..Default::default()
    };
    let original = WorldMap::generate(&params).unwrap();
    store.save(&original.params).unwrap();

    let loaded = store.load_or_create("harbor", &WorldParams::default()).unwrap();
    assert_eq!(loaded, params);

    let rebuilt = WorldMap::generate(&loaded).unwrap();
    for (a, b) in original.grid.tiles().iter().zip(rebuilt.grid.tiles()) {
        assert_eq!(a.elevation.to_bits(), b.elevation.to_bits());
        assert_eq!(a.biome, b.biome);
    }
}

#[test]
fn test_custom_biome_file_replaces_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog: serde_json::Value = serde_json::from_str(world_generator::biomes::BUILTIN_BIOMES).unwrap();
    // Every land cell becomes Grassland
    for row in catalog["table"].as_object_mut().unwrap().values_mut() {
        for cell in row.as_array_mut().unwrap() {
            *cell = serde_json::json!("Grassland");
        }
    }
    let path = dir.path().join("biomes.json");
    fs::write(&path, catalog.to_string()).unwrap();

    let tables = ClimateTables::load(None, Some(&path)).unwrap();
    let params = WorldParams {
        width: 48,
        height: 24,
        seed: 6,
        ..Default::default()
    };
    let world = build(&params, &tables).unwrap();
    for tile in world.grid.tiles().iter().filter(|t| !t.is_ocean()) {
        assert_eq!(world.biome_name(tile), Some("Grassland"));
    }
}

#[test]
fn test_table_with_unknown_biome_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog: serde_json::Value = serde_json::from_str(world_generator::biomes::BUILTIN_BIOMES).unwrap();
    catalog["table"]["Arid"][0] = serde_json::json!("Glacier");
    let path = dir.path().join("biomes.json");
    fs::write(&path, catalog.to_string()).unwrap();

    let err = ClimateTables::load(None, Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownBiome { ref name } if name == "Glacier"));
}

#[test]
fn test_corrupt_save_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = MapStore::new(dir.path());
    let path = store.path_for("broken");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(store.load("broken"), Err(WorldError::Format(_))));
}

#[test]
fn test_invalid_saved_params_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = MapStore::new(dir.path());
    let bad = WorldParams {
        name: "inverted".to_string(),
        mountain_threshold: 0.1,
        ..Default::default()
    };
    store.save(&bad).unwrap();
    assert!(matches!(store.load("inverted"), Err(WorldError::Config(_))));
}

#[test]
fn test_list_ignores_stray_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = MapStore::new(dir.path());
    fs::create_dir_all(dir.path().join("not_a_map")).unwrap();
    for name in ["beta", "alpha"] {
        let params = WorldParams {
            name: name.to_string(),
            ..Default::default()
        };
        store.save(&params).unwrap();
    }
    assert_eq!(store.list().unwrap(), vec!["alpha".to_string(), "beta".to_string()]);
}
