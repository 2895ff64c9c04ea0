//! Game world: object pool, services and level persistence
//!
//! A [`GameWorld`] owns a fixed-capacity table of [`GameObject`] slots and an
//! ordered list of [`Service`]s. Objects are referred to by copyable
//! [`GameObjectHandle`]s that go stale as soon as the object is destroyed.

pub mod component;
pub mod error;
pub mod game_object;
pub mod game_world;
pub mod handle;
pub mod service;

mod level;
mod slots;

#[cfg(test)]
mod tests;

pub use component::{AsAny, Component, ComponentContext};
pub use error::{Result, WorldError};
pub use game_object::GameObject;
pub use game_world::{GameWorld, WorldState};
pub use handle::GameObjectHandle;
pub use service::{Service, ServiceContext};
