//! Built-in services
//!
//! Level files list services by name under `[Services.<name>]`. These names
//! resolve without hooks; anything else goes to the world's custom service
//! maker (see [`GameWorld::with_custom_service`](crate::world::GameWorld::with_custom_service)).

pub mod camera;
pub mod physics;
pub mod render;

pub use camera::CameraService;
pub use physics::PhysicsService;
pub use render::{DrawCommand, FrameStats, RenderService};

use crate::world::Service;

/// Construct a custom service by name, `None` if the name is not known
pub type ServiceMaker = Box<dyn Fn(&str) -> Option<Box<dyn Service>>>;

/// Names of the built-in services
pub const BUILTIN_SERVICES: [&str; 3] = ["CameraService", "PhysicsService", "RenderService"];

/// A default-constructed built-in service called `name`
pub fn make_builtin(name: &str) -> Option<Box<dyn Service>> {
    let service: Box<dyn Service> = match name {
        "CameraService" => Box::<CameraService>::default(),
        "PhysicsService" => Box::<PhysicsService>::default(),
        "RenderService" => Box::<RenderService>::default(),
        _ => return None,
    };
    Some(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_services_by_name() {
        for name in BUILTIN_SERVICES {
            assert_eq!(make_builtin(name).map(|service| service.name()), Some(name));
        }
        assert!(make_builtin("AudioService").is_none());
    }
}
