//! Level runner
//!
//! Loads a level into a game world, simulates a fixed number of frames
//! headlessly, prints the debug overlay and saves the level back out.
//!
//! Settings come from `level_app.toml` in the working directory when it
//! exists.

mod spinner;

use std::path::Path;

use game_world::config::ConfigError;
use game_world::foundation::logging;
use game_world::prelude::*;
use thiserror::Error;

const CONFIG_PATH: &str = "level_app.toml";

/// Errors that end the run
#[derive(Error, Debug)]
enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("World error: {0}")]
    World(#[from] WorldError),
}

fn load_config() -> (WorldConfig, Option<ConfigError>) {
    if !Path::new(CONFIG_PATH).exists() {
        return (WorldConfig::default(), None);
    }
    match WorldConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => (config, None),
        Err(err) => (WorldConfig::default(), Some(err)),
    }
}

/// Build a small scene in code when no level is configured
fn build_default_scene(world: &mut GameWorld) -> Result<(), RunError> {
    world.add_service::<CameraService>()?;
    world.add_service::<PhysicsService>()?;
    world.add_service::<RenderService>()?;
    world.initialize_default()?;

    let camera = world.create_game_object("Camera", None, false)?;
    if let Some(object) = world.get_game_object_mut(camera) {
        object.add_component(CameraComponent::looking_at(Vec3::new(0.0, 2.0, 8.0), Vec3::zeros()))?;
        object.add_component(FpsCameraComponent::default())?;
    }
    world.initialize_game_object(camera)?;

    let top = world.create_game_object("Top", None, false)?;
    if let Some(object) = world.get_game_object_mut(top) {
        object.add_component(TransformComponent::default())?;
        object.add_component(MeshComponent::default())?;
        object.add_component(spinner::SpinnerComponent::default())?;
    }
    world.initialize_game_object(top)?;
    Ok(())
}

/// Walk the main camera forward while turning slowly
fn steer_camera(world: &mut GameWorld) {
    let Some(camera) = world.get_service::<CameraService>().and_then(CameraService::main_camera) else {
        return;
    };
    if let Some(controls) = world
        .get_game_object_mut(camera)
        .and_then(|object| object.get_component_mut::<FpsCameraComponent>())
    {
        controls.intent = CameraIntent { walk: 1.0, yaw: 5.0, ..Default::default() };
    }
}

fn run() -> Result<(), RunError> {
    let (config, config_error) = load_config();
    logging::init_with_level(&config.log_level);
    if let Some(err) = config_error {
        log::warn!("Ignoring {}: {}", CONFIG_PATH, err);
    }
    config.validate()?;

    let mut world = GameWorld::from_config(&config).with_component_hooks(spinner::hooks());
    match &config.start_level {
        Some(level) => world.load_level(level)?,
        None => build_default_scene(&mut world)?,
    }

    log::info!("Running {} frames at {:.4}s", config.frames, config.frame_time);
    for _ in 0..config.frames {
        steer_camera(&mut world);
        world.update(config.frame_time);
        world.render();
    }

    if let Some(renderer) = world.get_service::<RenderService>() {
        let stats = renderer.stats();
        log::info!("Last frame {}: {} draw calls", stats.frame, stats.draw_calls);
    }

    let mut ui = DebugUi::new();
    world.debug_ui(&mut ui)?;
    for line in ui.lines() {
        log::info!("{}", line);
    }

    if let Some(path) = &config.save_level {
        world.save_level(Some(Path::new(path)))?;
    }
    world.terminate();
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        log::error!("{}", err);
        eprintln!("level_runner: {err}");
        std::process::exit(1);
    }
}
