//! Built-in component variants
//!
//! These are the component names templates and level files can use without
//! any factory hooks.

pub mod camera;
pub mod fps_camera;
pub mod lifetime;
pub mod mesh;
pub mod rigid_body;
pub mod transform;

pub use camera::CameraComponent;
pub use fps_camera::{CameraIntent, FpsCameraComponent};
pub use lifetime::LifetimeComponent;
pub use mesh::MeshComponent;
pub use rigid_body::RigidBodyComponent;
pub use transform::TransformComponent;

use crate::world::Component;

/// Names of the built-in component variants
pub const BUILTIN_COMPONENTS: [&str; 6] = [
    "TransformComponent",
    "CameraComponent",
    "FpsCameraComponent",
    "MeshComponent",
    "RigidBodyComponent",
    "LifetimeComponent",
];

/// Whether `name` is a built-in component variant
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_COMPONENTS.contains(&name)
}

/// A default-constructed built-in component called `name`
pub fn make_builtin(name: &str) -> Option<Box<dyn Component>> {
    let component: Box<dyn Component> = match name {
        "TransformComponent" => Box::<TransformComponent>::default(),
        "CameraComponent" => Box::<CameraComponent>::default(),
        "FpsCameraComponent" => Box::<FpsCameraComponent>::default(),
        "MeshComponent" => Box::<MeshComponent>::default(),
        "RigidBodyComponent" => Box::<RigidBodyComponent>::default(),
        "LifetimeComponent" => Box::<LifetimeComponent>::default(),
        _ => return None,
    };
    Some(component)
}
