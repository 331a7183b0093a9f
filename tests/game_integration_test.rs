use std::time::Duration;

use dune_drive::assets::{encode_glb, AssetLoader};
use dune_drive::config::{DecorationSettings, GameConfig};
use dune_drive::game::{Game, PLACEHOLDER_STATUS};
use dune_drive::input::InputSnapshot;
use dune_drive::procgen::decorations::in_exclusion_zone;
use dune_drive::scene::{Scene, Shape, GREEN, RED};
use serde_json::json;
use tempfile::TempDir;

/// Small world so tests stay fast
fn test_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.terrain.size = 400.0;
    config.terrain.segments = 40;
    config.terrain.seed = 42;
    config.placement.exclusion_radius = 25.0;
    config.checkpoints.points = vec![[0.0, 0.0, 20.0], [0.0, 0.0, 40.0]];
    config
}

fn write_model(dir: &TempDir, name: &str) {
    let glb = encode_glb(&json!({
        "asset": { "version": "2.0" },
        "meshes": [{ "primitives": [] }],
        "nodes": [{ "mesh": 0 }]
    }));
    std::fs::write(dir.path().join(name), glb).unwrap();
}

/// Tick with no input until every asset load has settled
async fn settle(game: &mut Game) {
    for _ in 0..400 {
        game.tick(&InputSnapshot::default());
        if !game.is_loading() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("assets never settled");
}

fn car_shape(game: &Game) -> Shape {
    game.scene().named("car").next().unwrap().shape.clone()
}

#[tokio::test]
async fn test_missing_car_model_uses_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let loader = AssetLoader::new(dir.path());
    let mut game = Game::new(&test_config(), &loader, Scene::new());

    assert_eq!(game.status(), Some("Loading car model..."));
    assert!(matches!(car_shape(&game), Shape::Empty));

    settle(&mut game).await;

    assert_eq!(game.status(), Some(PLACEHOLDER_STATUS));
    assert!(matches!(car_shape(&game), Shape::Cuboid { .. }));
}

#[tokio::test]
async fn test_car_model_attaches_when_loaded() {
    let dir = tempfile::tempdir().unwrap();
    write_model(&dir, "car.glb");
    let loader = AssetLoader::new(dir.path());
    let mut game = Game::new(&test_config(), &loader, Scene::new());

    settle(&mut game).await;

    assert_eq!(game.status(), None);
    match car_shape(&game) {
        Shape::Model { asset, mesh_count } => {
            assert_eq!(asset, "car.glb");
            assert_eq!(mesh_count, 1);
        }
        other => panic!("expected model, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_car_model_configured() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.car.model = None;
    let game = Game::new(&config, &AssetLoader::new(dir.path()), Scene::new());

    assert!(matches!(car_shape(&game), Shape::Cuboid { .. }));
}

#[tokio::test]
async fn test_decorations_sit_on_terrain_outside_spawn_zone() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config();
    let mut game = Game::new(&config, &AssetLoader::new(dir.path()), Scene::new());
    settle(&mut game).await;

    let decorations: Vec<_> = game
        .scene()
        .objects()
        .iter()
        .filter(|o| o.name == "tree" || o.name == "rock")
        .collect();

    assert!(!decorations.is_empty());
    assert_eq!(decorations.len(), game.decorations_placed());

    for object in decorations {
        let p = object.transform.position;
        assert!(!in_exclusion_zone(p.x, p.z, config.placement.exclusion_radius));
        let expected = game.heightfield().height_at_cell(p.x, p.z).unwrap_or(0.0);
        assert_eq!(p.y, expected);
    }
}

#[tokio::test]
async fn test_decorations_wait_for_model() {
    let dir = tempfile::tempdir().unwrap();
    write_model(&dir, "cactus.glb");

    let mut config = test_config();
    config.decorations = vec![
        DecorationSettings {
            name: "cactus".to_string(),
            model: Some("cactus.glb".to_string()),
            ..DecorationSettings::tree()
        },
        DecorationSettings {
            name: "palm".to_string(),
            model: Some("palm.glb".to_string()),
            ..DecorationSettings::tree()
        },
    ];

    let mut game = Game::new(&config, &AssetLoader::new(dir.path()), Scene::new());
    // Nothing can be placed before the loads have had a chance to run
    assert_eq!(game.scene().named("cactus").count(), 0);

    settle(&mut game).await;

    let cacti: Vec<_> = game.scene().named("cactus").collect();
    assert!(!cacti.is_empty());
    assert!(cacti.iter().all(|c| matches!(c.shape, Shape::Model { .. })));
    assert_eq!(game.scene().named("palm").count(), 0);
}

#[tokio::test]
async fn test_same_config_same_world() {
    let dir = tempfile::tempdir().unwrap();
    let loader = AssetLoader::new(dir.path());
    let config = test_config();

    let mut first = Game::new(&config, &loader, Scene::new());
    let mut second = Game::new(&config, &loader, Scene::new());
    settle(&mut first).await;
    settle(&mut second).await;

    assert_eq!(first.heightfield(), second.heightfield());
    let positions = |game: &Game| -> Vec<_> {
        game.scene()
            .named("tree")
            .map(|o| o.transform.position)
            .collect()
    };
    assert_eq!(positions(&first), positions(&second));
}

#[tokio::test]
async fn test_drive_through_checkpoints() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.car.model = None;
    let mut game = Game::new(&config, &AssetLoader::new(dir.path()), Scene::new());

    let markers = |game: &Game| -> Vec<[f32; 3]> {
        game.scene()
            .objects()
            .iter()
            .filter(|o| o.name.starts_with("checkpoint_"))
            .map(|o| o.color)
            .collect()
    };
    assert_eq!(markers(&game), vec![RED, RED]);

    let mut reached = Vec::new();
    for _ in 0..600 {
        if let Some(index) = game.tick(&InputSnapshot::forward()) {
            reached.push(index);
        }
        let car = game.car();
        assert!(car.velocity <= config.car.tuning.max_speed);
    }

    assert_eq!(reached, vec![0, 1]);
    assert!(game.checkpoints().is_complete());
    assert_eq!(markers(&game), vec![GREEN, GREEN]);

    // Car rides on the terrain
    let position = game.car_position();
    assert_eq!(position.y, game.heightfield().sample(position.x, position.z));
}

#[tokio::test]
async fn test_reset_returns_car_to_origin() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.car.model = None;
    let mut game = Game::new(&config, &AssetLoader::new(dir.path()), Scene::new());

    for _ in 0..30 {
        game.tick(&InputSnapshot::from_keys(["w", "a"]));
    }
    assert!(game.car().velocity > 0.0);

    game.tick(&InputSnapshot::from_keys(["r"]));
    let car = game.car();
    assert_eq!((car.velocity, car.x, car.z, car.yaw_rad), (0.0, 0.0, 0.0, 0.0));
}
