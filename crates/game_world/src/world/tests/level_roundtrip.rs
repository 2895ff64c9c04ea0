//! Loading levels, saving them back and the save/load round trip

use std::path::Path;

use super::init_logging;
use crate::components::{CameraComponent, FpsCameraComponent, RigidBodyComponent, TransformComponent};
use crate::config::WorldConfig;
use crate::debug::DebugUi;
use crate::document::{Document, MemoryStore, Value};
use crate::foundation::math::Vec3;
use crate::services::{CameraService, PhysicsService, RenderService};
use crate::world::{GameWorld, Service, WorldError, WorldState};

const LEVEL: &str = r#"
Capacity = 8

[Services.CameraService]

[Services.PhysicsService]
Gravity = [0.0, -3.7, 0.0]
FixedTimeStep = 0.02

[Services.RenderService]
ClearColor = [0.2, 0.3, 0.4, 1.0]
Wireframe = true

[GameObjects.Player]
Template = "templates/player.toml"

[GameObjects.Player.Components.TransformComponent]
Position = [0.0, 1.8, 5.0]

[GameObjects.Player.Components.FpsCameraComponent]
MoveSpeed = 3.0

[GameObjects.Crate]
Template = "templates/crate.toml"

[GameObjects.Crate.Components.RigidBodyComponent]
Mass = 25.0

[GameObjects.Marker]
"#;

const PLAYER: &str = r#"
[Components.TransformComponent]
Position = [0.0, 0.0, 0.0]

[Components.CameraComponent]
Fov = 70.0

[Components.FpsCameraComponent]
MoveSpeed = 1.0
"#;

const CRATE: &str = r#"
[Components.TransformComponent]
Scale = [0.5, 0.5, 0.5]

[Components.MeshComponent]
Shape = "Cube"
Material = "Wood"

[Components.RigidBodyComponent]
Mass = 10.0
"#;

fn store() -> MemoryStore {
    MemoryStore::new()
        .with_toml("levels/demo.toml", LEVEL)
        .and_then(|store| store.with_toml("templates/player.toml", PLAYER))
        .and_then(|store| store.with_toml("templates/crate.toml", CRATE))
        .unwrap()
}

fn loaded(store: MemoryStore) -> GameWorld {
    init_logging();
    let mut world = GameWorld::new(store);
    world.load_level("levels/demo.toml").unwrap();
    world
}

fn table<'a>(document: &'a Document, key: &str) -> &'a Document {
    document.get(key).and_then(Value::as_table).unwrap()
}

#[test]
fn test_load_builds_services_and_objects() {
    let world = loaded(store());

    assert_eq!(world.state(), WorldState::Initialized);
    assert_eq!(world.capacity(), 8);
    assert_eq!(world.level_path(), Some(Path::new("levels/demo.toml")));

    let names: Vec<_> = world.services().map(|service| service.name()).collect();
    assert_eq!(names, ["CameraService", "PhysicsService", "RenderService"]);
    assert_eq!(world.get_service::<PhysicsService>().unwrap().gravity, Vec3::new(0.0, -3.7, 0.0));
    assert!(world.get_service::<RenderService>().unwrap().wireframe);

    let player = world.find_game_object("Player").unwrap();
    let object = world.get_game_object(player).unwrap();
    assert!(object.is_initialized());
    assert_eq!(object.get_component::<TransformComponent>().unwrap().position, Vec3::new(0.0, 1.8, 5.0));
    assert_eq!(object.get_component::<CameraComponent>().unwrap().fov, 70.0);
    let controls = object.get_component::<FpsCameraComponent>().unwrap();
    assert_eq!((controls.move_speed, controls.shift_speed), (3.0, 10.0));
    assert_eq!(world.get_service::<CameraService>().unwrap().main_camera(), Some(player));

    let crate_handle = world.find_game_object("Crate").unwrap();
    let crate_object = world.get_game_object(crate_handle).unwrap();
    assert_eq!(crate_object.get_component::<RigidBodyComponent>().unwrap().mass, 25.0);
    assert!(world.get_service::<PhysicsService>().unwrap().contains(crate_handle));

    let marker = world.find_game_object("Marker").unwrap();
    assert_eq!(world.get_game_object(marker).unwrap().component_count(), 0);

    // Objects fill slots in document order
    let order: Vec<_> = world.game_objects().map(|(handle, object)| (handle.index(), object.name())).collect();
    assert_eq!(order, [(0, "Player"), (1, "Crate"), (2, "Marker")]);
}

#[test]
fn test_save_reproduces_capacity_services_and_overrides() {
    let mut world = loaded(store());
    world.save_level(Some(Path::new("levels/saved.toml"))).unwrap();

    let original: Document = toml::from_str(LEVEL).unwrap();
    let saved = world.store().read(Path::new("levels/saved.toml")).unwrap();

    assert_eq!(saved.get("Capacity"), original.get("Capacity"));
    assert_eq!(table(&saved, "Services"), table(&original, "Services"));

    // Ad-hoc objects have no template to diff against and are left out
    let mut expected = table(&original, "GameObjects").clone();
    expected.remove("Marker");
    assert_eq!(table(&saved, "GameObjects"), &expected);
}

#[test]
fn test_saved_level_loads_into_the_same_world() {
    let mut store = store();
    let first = loaded(store.clone());
    let saved = first.build_level_document().unwrap();
    store.insert("levels/demo.toml", saved);

    let second = loaded(store);
    let crate_handle = second.find_game_object("Crate").unwrap();
    let body = second.get_game_object(crate_handle).unwrap().get_component::<RigidBodyComponent>().unwrap();
    assert_eq!(body.mass, 25.0);
    assert_eq!(second.capacity(), first.capacity());
    assert!(second.find_game_object("Marker").is_none());
}

#[test]
fn test_runtime_changes_are_saved_as_overrides() {
    let mut world = loaded(store());
    let crate_handle = world.find_game_object("Crate").unwrap();
    world
        .get_game_object_mut(crate_handle)
        .and_then(|object| object.get_component_mut::<TransformComponent>())
        .unwrap()
        .position = Vec3::new(4.0, 0.0, 0.0);

    let saved = world.build_level_document().unwrap();
    let crate_entry = table(table(&saved, "GameObjects"), "Crate");
    let transform = table(table(crate_entry, "Components"), "TransformComponent");
    assert_eq!(transform.keys().collect::<Vec<_>>(), ["Position"]);
}

#[test]
fn test_duplicate_names_are_disambiguated() {
    init_logging();
    let mut world = GameWorld::new(store());
    world.initialize(4).unwrap();
    let template = Path::new("templates/crate.toml");
    world.create_game_object("Crate", Some(template), true).unwrap();
    world.create_game_object("Crate", Some(template), true).unwrap();

    let saved = world.build_level_document().unwrap();
    let objects = table(&saved, "GameObjects");
    assert!(objects.contains_key("Crate"));
    assert!(objects.contains_key("Crate#1"));
}

#[test]
fn test_disambiguated_keys_never_overwrite_real_names() {
    init_logging();
    let mut store = store();
    let mut world = GameWorld::new(store.clone());
    world.initialize(4).unwrap();
    let template = Path::new("templates/crate.toml");
    for name in ["Crate", "Crate#2", "Crate"] {
        world.create_game_object(name, Some(template), true).unwrap();
    }

    let saved = world.build_level_document().unwrap();
    let objects = table(&saved, "GameObjects");
    assert_eq!(objects.keys().collect::<Vec<_>>(), ["Crate", "Crate#2", "Crate#3"]);
    assert_eq!(table(objects, "Crate#3").get("Name"), Some(&Value::String("Crate".to_owned())));
    assert!(table(objects, "Crate#2").get("Name").is_none());

    // Names survive a reload
    store.insert("levels/demo.toml", saved);
    let reloaded = loaded(store);
    let names: Vec<_> = reloaded.game_objects().map(|(_, object)| object.name().to_owned()).collect();
    assert_eq!(names, ["Crate", "Crate#2", "Crate"]);
}

#[test]
fn test_save_without_a_path_does_nothing() {
    init_logging();
    let mut world = GameWorld::new(MemoryStore::new());
    assert!(matches!(world.save_level(None), Err(WorldError::InvalidState { .. })));

    world.initialize(2).unwrap();
    assert!(world.save_level(None).is_ok());
}

#[test]
fn test_debug_save_button_writes_the_level() {
    let mut world = loaded(store());
    let crate_handle = world.find_game_object("Crate").unwrap();
    world.destroy_game_object(crate_handle);
    world.update(0.016);

    let mut ui = DebugUi::new();
    ui.press("Save");
    world.debug_ui(&mut ui).unwrap();

    assert!(ui.lines().iter().any(|line| line.contains("Player")));
    assert!(ui.lines().iter().any(|line| line.contains("PhysicsService")));
    let saved = world.store().read(Path::new("levels/demo.toml")).unwrap();
    assert!(!table(&saved, "GameObjects").contains_key("Crate"));
}

#[test]
fn test_load_only_once() {
    let mut world = loaded(store());
    assert!(matches!(
        world.load_level("levels/demo.toml"),
        Err(WorldError::InvalidState { operation: "load a level", state: WorldState::Initialized })
    ));
}

#[test]
fn test_capacity_is_required() {
    init_logging();
    let store = MemoryStore::new()
        .with_toml("missing.toml", "[Services.RenderService]\n")
        .and_then(|store| store.with_toml("negative.toml", "Capacity = -1\n"))
        .unwrap();

    let mut world = GameWorld::new(store.clone());
    assert!(matches!(
        world.load_level("missing.toml"),
        Err(WorldError::MissingField { field: "Capacity", .. })
    ));
    // Services were already added when the error surfaced
    assert_eq!(world.state(), WorldState::Loading);

    let mut world = GameWorld::new(store);
    assert!(matches!(world.load_level("negative.toml"), Err(WorldError::InvalidField { .. })));
}

#[test]
fn test_unknown_names_fail_the_load() {
    init_logging();
    let store = MemoryStore::new()
        .with_toml("service.toml", "Capacity = 2\n[Services.AudioService]\n")
        .and_then(|store| {
            store.with_toml(
                "component.toml",
                "Capacity = 2\n[GameObjects.Thing.Components.Teleporter]\nRange = 3\n",
            )
        })
        .unwrap();

    let mut world = GameWorld::new(store.clone());
    assert!(matches!(world.load_level("service.toml"), Err(WorldError::UnknownService(name)) if name == "AudioService"));

    let mut world = GameWorld::new(store);
    assert!(matches!(world.load_level("component.toml"), Err(WorldError::UnknownComponent(name)) if name == "Teleporter"));
}

#[derive(Default)]
struct Weather {
    rain: bool,
}

impl Service for Weather {
    fn name(&self) -> &'static str {
        "Weather"
    }

    fn serialize(&self, out: &mut Document) {
        crate::document::fields::write_bool(out, "Rain", self.rain);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(rain) = crate::document::fields::read_bool(data, "Rain") {
            self.rain = rain;
        }
    }
}

#[test]
fn test_custom_service_hook() {
    init_logging();
    let store = MemoryStore::new().with_toml("weather.toml", "Capacity = 1\n[Services.Weather]\nRain = true\n").unwrap();
    let mut world = GameWorld::new(store).with_custom_service(|name| match name {
        "Weather" => Some(Box::<Weather>::default() as Box<dyn Service>),
        _ => None,
    });

    world.load_level("weather.toml").unwrap();
    assert!(world.get_service::<Weather>().unwrap().rain);

    let saved = world.build_level_document().unwrap();
    assert_eq!(table(table(&saved, "Services"), "Weather").get("Rain"), Some(&Value::Boolean(true)));
}

#[test]
fn test_file_store_round_trip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    for (path, text) in [("levels/demo.toml", LEVEL), ("templates/player.toml", PLAYER), ("templates/crate.toml", CRATE)] {
        let full = dir.path().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, text).unwrap();
    }

    let config = WorldConfig::default().with_assets_dir(dir.path().to_string_lossy());
    let mut world = GameWorld::from_config(&config);
    world.load_level("levels/demo.toml").unwrap();
    world.save_level(Some(Path::new("saves/demo.ron"))).unwrap();
    assert!(dir.path().join("saves/demo.ron").exists());

    let saved = world.store().read(Path::new("saves/demo.ron")).unwrap();
    assert_eq!(saved.get("Capacity").and_then(Value::as_integer), Some(8));
    world.terminate();
}
