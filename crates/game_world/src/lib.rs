//! # Game World
//!
//! The lifecycle core of a game world: a fixed-capacity object pool addressed
//! by generational handles, deferred destruction, singleton services, and a
//! factory that builds objects from template documents and level files.
//!
//! ## Features
//!
//! - **Generational handles**: copies of a handle go stale the moment the
//!   object is destroyed; stale handles are simply ignored
//! - **Deferred destruction**: destroyed objects finish the frame and are
//!   released after every object and service has updated
//! - **Components and services**: uniform lifecycle hooks with access to
//!   sibling components, services and the world
//! - **Data-driven levels**: templates plus per-object overrides in TOML or
//!   RON, and saving back as minimal overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use game_world::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WorldConfig::default();
//!     let mut world = GameWorld::from_config(&config);
//!     world.load_level("levels/demo.toml")?;
//!
//!     for _ in 0..config.frames {
//!         world.update(config.frame_time);
//!         world.render();
//!     }
//!
//!     world.save_level(None)?;
//!     world.terminate();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod components;
pub mod config;
pub mod debug;
pub mod document;
pub mod factory;
pub mod foundation;
pub mod services;
pub mod world;

/// Common imports for world users
pub mod prelude {
    pub use crate::{
        components::{
            CameraComponent, CameraIntent, FpsCameraComponent, LifetimeComponent, MeshComponent,
            RigidBodyComponent, TransformComponent,
        },
        config::{Config, ConfigError, WorldConfig},
        debug::DebugUi,
        document::{Document, DocumentStore, FileStore, MemoryStore, Value},
        factory::{FactoryHooks, GameObjectFactory},
        foundation::math::Vec3,
        services::{CameraService, PhysicsService, RenderService},
        world::{
            Component, ComponentContext, GameObject, GameObjectHandle, GameWorld, Service,
            ServiceContext, WorldError, WorldState,
        },
    };
}
