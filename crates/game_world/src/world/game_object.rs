//! Game objects: named aggregates of components

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use super::component::Siblings;
use super::{Component, ComponentContext, GameObjectHandle, GameWorld, Result, WorldError};
use crate::debug::DebugUi;

/// A named set of components living in one world slot
///
/// Objects are created by [`GameWorld::create_game_object`], which assigns the
/// handle once. Components run in the order they were attached.
pub struct GameObject {
    name: String,
    handle: GameObjectHandle,
    template_path: PathBuf,
    components: Vec<Box<dyn Component>>,
    initialized: bool,
}

impl GameObject {
    pub(crate) fn new(name: impl Into<String>, handle: GameObjectHandle) -> Self {
        Self {
            name: name.into(),
            handle,
            template_path: PathBuf::new(),
            components: Vec::new(),
            initialized: false,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the object
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Handle assigned at creation
    pub fn handle(&self) -> GameObjectHandle {
        self.handle
    }

    /// Template the object was built from (empty for ad-hoc objects)
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub(crate) fn set_template_path(&mut self, path: &Path) {
        self.template_path = path.to_path_buf();
    }

    /// Whether `initialize` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Attach a component
    ///
    /// Fails with [`WorldError::DuplicateComponent`] if a component of the
    /// same type is already attached.
    pub fn add_component<T: Component>(&mut self, component: T) -> Result<&mut T> {
        let added = self.add_boxed_component(Box::new(component))?;
        added
            .downcast_mut::<T>()
            .ok_or_else(|| WorldError::UnknownComponent(std::any::type_name::<T>().to_owned()))
    }

    /// Attach an already boxed component
    pub fn add_boxed_component(
        &mut self,
        component: Box<dyn Component>,
    ) -> Result<&mut (dyn Component + 'static)> {
        let type_id = component.component_type_id();
        if self.components.iter().any(|existing| existing.component_type_id() == type_id) {
            return Err(WorldError::DuplicateComponent {
                object: self.name.clone(),
                component: component.name().to_owned(),
            });
        }

        self.components.push(component);
        let index = self.components.len() - 1;
        Ok(&mut *self.components[index])
    }

    /// Component of type `T`, if attached
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.components.iter().find_map(|component| component.downcast_ref::<T>())
    }

    /// Component of type `T`, if attached
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(|component| component.downcast_mut::<T>())
    }

    /// Whether a component of type `T` is attached
    pub fn has_component<T: Component>(&self) -> bool {
        self.components.iter().any(|component| component.is::<T>())
    }

    /// Component whose variant name is `name`
    pub fn find_component(&self, name: &str) -> Option<&(dyn Component + 'static)> {
        self.components
            .iter()
            .find(|component| component.name() == name)
            .map(|component| &**component)
    }

    /// Component whose variant name is `name`, mutably
    pub fn find_component_mut(&mut self, name: &str) -> Option<&mut (dyn Component + 'static)> {
        self.components
            .iter_mut()
            .find(|component| component.name() == name)
            .map(|component| &mut **component)
    }

    /// Attached components in order
    pub fn components(&self) -> impl Iterator<Item = &(dyn Component + 'static)> {
        self.components.iter().map(|component| &**component)
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Run `hook` on the first `limit` components with access to their
    /// siblings and the world, stopping at the first error
    fn visit_components<E>(
        &mut self,
        world: &mut GameWorld,
        limit: usize,
        mut hook: impl FnMut(&mut dyn Component, &mut ComponentContext<'_>) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        let Self { name, handle, components, .. } = self;
        for index in 0..components.len().min(limit) {
            let (before, rest) = components.split_at_mut(index);
            let Some((current, after)) = rest.split_first_mut() else {
                break;
            };
            let mut ctx = ComponentContext {
                owner: *handle,
                owner_name: name.as_str(),
                siblings: Siblings { before, after },
                world: &mut *world,
            };
            hook(&mut **current, &mut ctx)?;
        }
        Ok(())
    }

    /// Run an infallible `hook` on the first `limit` components
    fn run_components(
        &mut self,
        world: &mut GameWorld,
        limit: usize,
        mut hook: impl FnMut(&mut dyn Component, &mut ComponentContext<'_>),
    ) {
        let outcome = self.visit_components::<Infallible>(world, limit, |component, ctx| {
            hook(component, ctx);
            Ok(())
        });
        if let Err(never) = outcome {
            match never {}
        }
    }

    /// Initialize every component once
    ///
    /// If a component fails, the components before it are terminated again
    /// and the object stays uninitialized, so it can be fixed and retried.
    pub(crate) fn initialize(&mut self, world: &mut GameWorld) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        let mut ready = 0;
        let result = self.visit_components::<WorldError>(world, usize::MAX, |component, ctx| {
            component.initialize(ctx)?;
            ready += 1;
            Ok(())
        });
        if let Err(err) = result {
            self.run_components(world, ready, |component, ctx| component.terminate(ctx));
            return Err(err);
        }

        self.initialized = true;
        Ok(())
    }

    pub(crate) fn terminate(&mut self, world: &mut GameWorld) {
        self.run_components(world, usize::MAX, |component, ctx| component.terminate(ctx));
    }

    pub(crate) fn update(&mut self, delta_time: f32, world: &mut GameWorld) {
        self.run_components(world, usize::MAX, |component, ctx| component.update(delta_time, ctx));
    }

    pub(crate) fn render(&mut self, world: &mut GameWorld) {
        self.run_components(world, usize::MAX, |component, ctx| component.render(ctx));
    }

    /// Describe the object and its components in the debug overlay
    pub fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.begin_section(&format!("{} [{}]", self.name, self.handle));
        for component in &mut self.components {
            ui.begin_section(component.name());
            component.debug_ui(ui);
            ui.end_section();
        }
        ui.end_section();
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("template_path", &self.template_path)
            .field("components", &self.components.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("initialized", &self.initialized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CameraComponent, TransformComponent};

    fn object() -> GameObject {
        GameObject::new("Probe", GameObjectHandle::new(0, 0))
    }

    #[test]
    fn test_add_and_get_components() {
        let mut object = object();
        object.add_component(TransformComponent::default()).unwrap();
        object.add_component(CameraComponent::default()).unwrap();

        assert_eq!(object.component_count(), 2);
        assert!(object.has_component::<TransformComponent>());
        assert!(object.get_component::<CameraComponent>().is_some());
        assert_eq!(object.find_component("CameraComponent").map(|c| c.name()), Some("CameraComponent"));
        assert!(object.find_component("MeshComponent").is_none());
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let mut object = object();
        object.add_component(TransformComponent::default()).unwrap();
        let err = object.add_component(TransformComponent::default()).unwrap_err();
        assert!(matches!(err, WorldError::DuplicateComponent { .. }));
        assert_eq!(object.component_count(), 1);
    }

    #[test]
    fn test_components_keep_attach_order() {
        let mut object = object();
        object.add_component(CameraComponent::default()).unwrap();
        object.add_component(TransformComponent::default()).unwrap();
        let names: Vec<_> = object.components().map(|c| c.name()).collect();
        assert_eq!(names, ["CameraComponent", "TransformComponent"]);
    }
}
