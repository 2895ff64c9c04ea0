//! Camera service: tracks the cameras in the world and which one is active

use crate::debug::DebugUi;
use crate::world::{GameObjectHandle, Service};

/// Registry of camera objects
///
/// The first camera to register becomes the main camera. When the main camera
/// goes away the next registered one takes over.
#[derive(Debug, Default)]
pub struct CameraService {
    cameras: Vec<GameObjectHandle>,
    main: Option<GameObjectHandle>,
}

impl CameraService {
    /// Track a camera object
    pub fn register(&mut self, camera: GameObjectHandle) {
        if self.cameras.contains(&camera) {
            return;
        }
        self.cameras.push(camera);
        if self.main.is_none() {
            self.main = Some(camera);
        }
    }

    /// Stop tracking a camera object
    pub fn unregister(&mut self, camera: GameObjectHandle) {
        self.cameras.retain(|&registered| registered != camera);
        if self.main == Some(camera) {
            self.main = self.cameras.first().copied();
        }
    }

    /// Make `camera` the main camera; `false` if it is not registered
    pub fn set_main_camera(&mut self, camera: GameObjectHandle) -> bool {
        let known = self.cameras.contains(&camera);
        if known {
            self.main = Some(camera);
        }
        known
    }

    /// The camera to render from
    pub fn main_camera(&self) -> Option<GameObjectHandle> {
        self.main
    }

    /// Every registered camera, in registration order
    pub fn cameras(&self) -> &[GameObjectHandle] {
        &self.cameras
    }
}

impl Service for CameraService {
    fn name(&self) -> &'static str {
        "CameraService"
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field("Cameras", self.cameras.len());
        match self.main {
            Some(main) => ui.field("Main", main),
            None => ui.field("Main", "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_camera_follows_registration() {
        let mut service = CameraService::default();
        let first = GameObjectHandle::new(0, 0);
        let second = GameObjectHandle::new(1, 0);

        service.register(first);
        service.register(second);
        service.register(first);
        assert_eq!(service.cameras(), [first, second]);
        assert_eq!(service.main_camera(), Some(first));

        service.unregister(first);
        assert_eq!(service.main_camera(), Some(second));
        service.unregister(second);
        assert_eq!(service.main_camera(), None);
    }

    #[test]
    fn test_set_main_requires_registration() {
        let mut service = CameraService::default();
        let camera = GameObjectHandle::new(3, 1);
        assert!(!service.set_main_camera(camera));
        service.register(GameObjectHandle::new(0, 0));
        service.register(camera);
        assert!(service.set_main_camera(camera));
        assert_eq!(service.main_camera(), Some(camera));
    }
}
