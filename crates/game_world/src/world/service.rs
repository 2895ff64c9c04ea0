//! Service trait and the context services run in

use std::any::TypeId;

use super::AsAny;
use crate::debug::DebugUi;
use crate::document::Document;

/// A per-world singleton subsystem (rendering, physics, camera, ...)
///
/// Services share the object lifecycle hooks. They are registered before the
/// world is initialized and run in registration order.
pub trait Service: AsAny {
    /// Name used for this service in level files
    fn name(&self) -> &'static str;

    /// Called once from `GameWorld::initialize`, before any object exists
    fn initialize(&mut self, _ctx: &mut ServiceContext<'_>) {}

    /// Called once from `GameWorld::terminate`, after every object is gone
    fn terminate(&mut self, _ctx: &mut ServiceContext<'_>) {}

    /// Called every frame after all objects have updated
    fn update(&mut self, _delta_time: f32, _ctx: &mut ServiceContext<'_>) {}

    /// Called every rendered frame after all objects have rendered
    fn render(&mut self, _ctx: &mut ServiceContext<'_>) {}

    /// Describe the service in the debug overlay
    fn debug_ui(&mut self, _ui: &mut DebugUi) {}

    /// Write the service's fields into `out`
    fn serialize(&self, _out: &mut Document) {}

    /// Read fields from `data`; absent fields keep their current value
    fn deserialize(&mut self, _data: &Document) {}
}

impl dyn Service {
    /// Concrete type of this service
    pub fn service_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Downcast to the concrete type
    pub fn downcast_ref<T: Service>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcast to the concrete type
    pub fn downcast_mut<T: Service>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// The other services of the world, reachable from a service hook
pub struct ServiceContext<'a> {
    before: &'a mut [Box<dyn Service>],
    after: &'a mut [Box<dyn Service>],
}

impl<'a> ServiceContext<'a> {
    /// Context whose siblings are `others`
    pub(crate) fn new(others: &'a mut [Box<dyn Service>]) -> Self {
        Self { before: others, after: Default::default() }
    }

    /// A sibling service by exact type
    pub fn get<T: Service>(&self) -> Option<&T> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find_map(|service| service.downcast_ref::<T>())
    }

    /// A sibling service by exact type, mutably
    pub fn get_mut<T: Service>(&mut self) -> Option<&mut T> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find_map(|service| service.downcast_mut::<T>())
    }
}

/// Run `hook` on every service in order, giving each access to the others
pub(crate) fn for_each_service(
    services: &mut [Box<dyn Service>],
    mut hook: impl FnMut(&mut dyn Service, &mut ServiceContext<'_>),
) {
    for index in 0..services.len() {
        let (before, rest) = services.split_at_mut(index);
        if let Some((current, after)) = rest.split_first_mut() {
            let mut ctx = ServiceContext { before, after };
            hook(&mut **current, &mut ctx);
        }
    }
}
