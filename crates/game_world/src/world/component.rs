//! Component trait and the context components run in

use std::any::{Any, TypeId};

use super::{GameObjectHandle, GameWorld, Result, Service};
use crate::debug::DebugUi;
use crate::document::Document;

/// Upcast to [`Any`] for exact-type lookups
///
/// Implemented for every `'static` type; components and services never
/// implement it by hand.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of behaviour attached to a [`GameObject`](super::GameObject)
///
/// An object holds at most one component of each concrete type. All hooks
/// have no-op defaults; a component only overrides what it needs.
pub trait Component: AsAny {
    /// Name used for this variant in templates and level files
    fn name(&self) -> &'static str;

    /// Called once, after the template and any overrides have been applied
    fn initialize(&mut self, _ctx: &mut ComponentContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called once, right before the object is freed
    fn terminate(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called every frame while the object is in the world
    fn update(&mut self, _delta_time: f32, _ctx: &mut ComponentContext<'_>) {}

    /// Called every rendered frame
    fn render(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Describe the component in the debug overlay
    fn debug_ui(&mut self, _ui: &mut DebugUi) {}

    /// Write the component's fields into `out`
    fn serialize(&self, _out: &mut Document) {}

    /// Read fields from `data`; absent fields keep their current value
    fn deserialize(&mut self, _data: &Document) {}
}

impl dyn Component {
    /// Concrete type of this component
    pub fn component_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Whether the component is a `T`
    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to the concrete type
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcast to the concrete type
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// The other components of the object whose hook is running
pub(crate) struct Siblings<'a> {
    pub(crate) before: &'a mut [Box<dyn Component>],
    pub(crate) after: &'a mut [Box<dyn Component>],
}

impl Siblings<'_> {
    fn get<T: Component>(&self) -> Option<&T> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find_map(|component| component.downcast_ref::<T>())
    }

    fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find_map(|component| component.downcast_mut::<T>())
    }
}

/// Everything a component hook can reach
///
/// The owning object is checked out of the world while its hooks run, so it
/// is reached through this context rather than through
/// [`GameWorld::get_game_object`].
pub struct ComponentContext<'a> {
    pub(crate) owner: GameObjectHandle,
    pub(crate) owner_name: &'a str,
    pub(crate) siblings: Siblings<'a>,
    pub(crate) world: &'a mut GameWorld,
}

impl ComponentContext<'_> {
    /// Handle of the owning object
    pub fn owner(&self) -> GameObjectHandle {
        self.owner
    }

    /// Name of the owning object
    pub fn owner_name(&self) -> &str {
        self.owner_name
    }

    /// Another component on the same object
    pub fn sibling<T: Component>(&self) -> Option<&T> {
        self.siblings.get::<T>()
    }

    /// Another component on the same object, mutably
    pub fn sibling_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.siblings.get_mut::<T>()
    }

    /// The world the object lives in
    pub fn world(&self) -> &GameWorld {
        &*self.world
    }

    /// The world the object lives in, mutably
    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut *self.world
    }

    /// Shortcut for `world_mut().get_service_mut::<T>()`
    pub fn service_mut<T: Service>(&mut self) -> Option<&mut T> {
        self.world.get_service_mut::<T>()
    }

    /// Request destruction of the owning object
    ///
    /// The object finishes the current frame and is terminated at the next
    /// destroy-list flush.
    pub fn destroy_owner(&mut self) {
        self.world.destroy_game_object(self.owner);
    }
}
