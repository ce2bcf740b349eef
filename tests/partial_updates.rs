//! Partial updates applied to a loaded document

use mapfile_engine::mapfile::model::{Color, MapDefinition, Status};
use mapfile_engine::mapfile::{
    apply_update, apply_updates, load_map, write_map, MapLoader, ParserOptions, UpdateOutcome,
};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::path::Path;

static WORLD: Lazy<MapDefinition> = Lazy::new(|| {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/world.map");
    load_map(path).unwrap()
});

fn world() -> MapDefinition {
    WORLD.clone()
}

#[test]
fn test_batch_on_world_map() {
    let mut map = world();
    let report = apply_updates(
        &mut map,
        [
            ("map layer cities class capital label color", "10 20 30"),
            ("map layer rivers class style 0 symbol", "circle"),
            ("map countries status", "OFF"),
            ("map web template", "templates/alt.html"),
            ("map web template", "/etc/passwd"),
            ("map layer countries data", "../secret.shp"),
            ("map layer lakes status", "ON"),
        ],
        ParserOptions::default(),
    );

    assert_eq!(report.applied(), 4);
    assert_eq!(report.rejections().count(), 2);
    assert_eq!(report.ignored().count(), 1);
    assert!(!report.is_clean());

    let label = map.layers[2].classes[0].label.as_ref().unwrap();
    assert_eq!(label.color, Color::rgb(10, 20, 30));
    assert_eq!(map.layers[1].classes[0].styles[0].symbol, 2);
    assert_eq!(map.layers[0].status, Status::Off);
    assert_eq!(map.web.template.as_deref(), Some("templates/alt.html"));
    assert_eq!(map.layers[0].data.as_deref(), Some("data/countries.shp"));
}

#[test]
fn test_updates_survive_serialization() {
    let mut map = world();
    let report = apply_updates(
        &mut map,
        [
            ("map layer cities labelitem", "NAME_EN"),
            ("map layer annotations feature new", ""),
            ("map layer annotations feature points", "12.5 41.9"),
            ("map layer annotations feature text", "Rome"),
            ("map scalebar intervals", "3"),
            ("map legend keysize", "20 10"),
        ],
        ParserOptions::default(),
    );
    assert!(report.is_clean(), "{}", report);

    let reloaded = MapLoader::default()
        .load_map_from_string(&write_map(&map), map.map_path.clone())
        .unwrap();
    assert_eq!(reloaded, map);
    assert_eq!(reloaded.layers[3].features.len(), 2);
    assert_eq!(reloaded.layers[3].features[1].text.as_deref(), Some("Rome"));
    assert_eq!(reloaded.scalebar.intervals, 3);
    assert_eq!(reloaded.legend.key_size, (20, 10));
}

#[test]
fn test_document_only_keys_are_ignored() {
    let mut map = world();
    for path in ["map name", "map symbolset", "map fontset", "map templatepattern", "map datapattern"] {
        let outcome = apply_update(&mut map, path, "anything", ParserOptions::default()).unwrap();
        assert!(matches!(outcome, UpdateOutcome::Ignored(_)), "{}", path);
    }
    assert_eq!(map, *WORLD);
}

#[test]
fn test_missing_pattern_rejects_paths() {
    let mut map = world();
    map.template_pattern = None;
    let err = apply_update(&mut map, "map web template", "templates/alt.html", ParserOptions::default())
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(map.web.template.as_deref(), Some("templates/world.html"));
}

proptest! {
    #[test]
    fn layer_name_updates_touch_only_their_layer(index in 0usize..4, name in "[a-z]{1,12}") {
        let mut map = world();
        let outcome = apply_update(&mut map, &format!("map layer {} name", index), &name, ParserOptions::default());
        prop_assert_eq!(outcome, Ok(UpdateOutcome::Applied));
        prop_assert_eq!(map.layers[index].name.as_deref(), Some(name.as_str()));

        let mut restored = map.clone();
        restored.layers[index].name = WORLD.layers[index].name.clone();
        prop_assert_eq!(&restored, &*WORLD);
    }

    #[test]
    fn failed_updates_leave_the_map_unchanged(value in "[a-z]{1,8}") {
        let mut map = world();
        let result = apply_update(&mut map, "map layer cities class 0 style 0 size", &value, ParserOptions::default());
        prop_assert!(result.is_err());
        prop_assert_eq!(&map, &*WORLD);
    }

    #[test]
    fn out_of_range_layers_are_ignored(index in 4usize..1000) {
        let mut map = world();
        let outcome = apply_update(&mut map, &format!("map layer {} status", index), "ON", ParserOptions::default());
        prop_assert!(matches!(outcome, Ok(UpdateOutcome::Ignored(_))));
        prop_assert_eq!(&map, &*WORLD);
    }
}
