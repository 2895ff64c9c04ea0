//! Object factory: builds game objects from template documents
//!
//! A template lists components by name, each with its initial fields:
//!
//! ```toml
//! [Components.TransformComponent]
//! Position = [0.0, 1.0, 0.0]
//!
//! [Components.MeshComponent]
//! Shape = "Cube"
//! ```
//!
//! Built-in component names are resolved first. Names the built-ins do not
//! know go to the [`FactoryHooks`] supplied by the embedder, which is how
//! game-specific components take part in templates and level files.

use std::path::Path;

use log::{debug, warn};

use crate::components;
use crate::document::fields::{expect_table, read_table};
use crate::document::{Document, DocumentStore, Value};
use crate::world::{Component, GameObject, GameObjectHandle, Result, WorldError};

/// Construct a custom component by name, `None` if the name is not known
pub type ComponentMaker = Box<dyn Fn(&str) -> Option<Box<dyn Component>>>;

/// Find an existing custom component on an object by name
pub type ComponentLookup = Box<dyn for<'a> Fn(&str, &'a mut GameObject) -> Option<&'a mut dyn Component>>;

/// Hooks for component names the factory does not know itself
#[derive(Default)]
pub struct FactoryHooks {
    custom_make: Option<ComponentMaker>,
    custom_get: Option<ComponentLookup>,
}

impl FactoryHooks {
    /// Hooks that resolve nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct custom components for template entries
    pub fn with_make<F>(mut self, make: F) -> Self
    where
        F: Fn(&str) -> Option<Box<dyn Component>> + 'static,
    {
        self.custom_make = Some(Box::new(make));
        self
    }

    /// Find custom components for level overrides
    pub fn with_get<F>(mut self, get: F) -> Self
    where
        F: for<'a> Fn(&str, &'a mut GameObject) -> Option<&'a mut dyn Component> + 'static,
    {
        self.custom_get = Some(Box::new(get));
        self
    }

    fn make(&self, name: &str) -> Option<Box<dyn Component>> {
        self.custom_make.as_ref().and_then(|make| make(name))
    }
}

impl std::fmt::Debug for FactoryHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryHooks")
            .field("custom_make", &self.custom_make.is_some())
            .field("custom_get", &self.custom_get.is_some())
            .finish()
    }
}

/// Builds objects from templates and applies level overrides to them
#[derive(Debug, Default)]
pub struct GameObjectFactory {
    hooks: FactoryHooks,
}

impl GameObjectFactory {
    /// Factory consulting `hooks` for unknown component names
    pub fn new(hooks: FactoryHooks) -> Self {
        Self { hooks }
    }

    /// Construct a default component of the variant called `name`
    pub fn make_component(&self, name: &str) -> Result<Box<dyn Component>> {
        components::make_builtin(name)
            .or_else(|| self.hooks.make(name))
            .ok_or_else(|| WorldError::UnknownComponent(name.to_owned()))
    }

    /// Attach the components listed in the template at `template_path`
    ///
    /// Components are attached in document order, each deserialized from its
    /// template fields first.
    pub fn make(&self, template_path: &Path, object: &mut GameObject, store: &dyn DocumentStore) -> Result<()> {
        let template = store.read(template_path)?;
        let context = template_path.display().to_string();

        let Some(entries) = read_table(&template, "Components", &context)? else {
            debug!("Template {} has no components", context);
            return Ok(());
        };

        for (name, value) in entries {
            let fields = expect_table(value, &context, name)?;
            let mut component = self.make_component(name)?;
            component.deserialize(fields);
            object.add_boxed_component(component)?;
        }

        debug!("Built '{}' from {} ({} components)", object.name(), context, object.component_count());
        Ok(())
    }

    /// Apply the per-component overrides in a level entry to `object`
    ///
    /// `data` is the object's entry in the level file; its optional
    /// `Components` table maps component names to fields. Fields not listed
    /// keep their template values.
    pub fn override_deserialize(&self, data: &Document, object: &mut GameObject) -> Result<()> {
        let context = format!("game object '{}'", object.name());
        let Some(entries) = read_table(data, "Components", &context)? else {
            return Ok(());
        };

        for (name, value) in entries {
            let fields = expect_table(value, &context, name)?;
            self.apply_override(name, fields, object)?;
        }
        Ok(())
    }

    fn apply_override(&self, name: &str, fields: &Document, object: &mut GameObject) -> Result<()> {
        if components::is_builtin(name) {
            match object.find_component_mut(name) {
                Some(component) => component.deserialize(fields),
                None => warn!("'{}' has no {} to override; skipping", object.name(), name),
            }
            return Ok(());
        }

        if let Some(get) = &self.hooks.custom_get {
            if let Some(component) = get(name, object) {
                component.deserialize(fields);
                return Ok(());
            }
        }

        // Known to the maker but not attached to this object
        if self.hooks.make(name).is_some() {
            warn!("'{}' has no {} to override; skipping", object.name(), name);
            return Ok(());
        }
        Err(WorldError::UnknownComponent(name.to_owned()))
    }

    /// Fields of `object`'s components that differ from a fresh build of its
    /// template, as a `Components` table for a level file
    ///
    /// Components the template does not contain are left out: a level
    /// override can only adjust components the template creates.
    pub fn diff_against_template(&self, object: &GameObject, store: &dyn DocumentStore) -> Result<Document> {
        let mut pristine = GameObject::new(object.name(), GameObjectHandle::INVALID);
        self.make(object.template_path(), &mut pristine, store)?;

        let mut diff = Document::new();
        for component in object.components() {
            let Some(original) = pristine.find_component(component.name()) else {
                debug!("'{}': {} is not in its template; not saved", object.name(), component.name());
                continue;
            };

            let mut live = Document::new();
            component.serialize(&mut live);
            let mut baseline = Document::new();
            original.serialize(&mut baseline);

            let changed: Document = live
                .into_iter()
                .filter(|(field, value)| baseline.get(field) != Some(value))
                .collect();
            if !changed.is_empty() {
                diff.insert(component.name().to_owned(), Value::Table(changed));
            }
        }
        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{MeshComponent, TransformComponent};
    use crate::document::MemoryStore;
    use crate::foundation::math::Vec3;

    const CRATE: &str = r#"
[Components.TransformComponent]
Position = [1.0, 2.0, 3.0]

[Components.MeshComponent]
Shape = "Cube"
"#;

    #[derive(Default)]
    struct Tag {
        label: String,
    }

    impl Component for Tag {
        fn name(&self) -> &'static str {
            "Tag"
        }

        fn serialize(&self, out: &mut Document) {
            crate::document::fields::write_string(out, "Label", &self.label);
        }

        fn deserialize(&mut self, data: &Document) {
            if let Some(label) = crate::document::fields::read_string(data, "Label") {
                self.label = label;
            }
        }
    }

    fn tag_hooks() -> FactoryHooks {
        FactoryHooks::new()
            .with_make(|name| match name {
                "Tag" => Some(Box::<Tag>::default() as Box<dyn Component>),
                _ => None,
            })
            .with_get(|name, object| match name {
                "Tag" => object.get_component_mut::<Tag>().map(|tag| tag as &mut dyn Component),
                _ => None,
            })
    }

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_toml("crate.toml", CRATE)
            .unwrap()
            .with_toml("tagged.toml", "[Components.Tag]\nLabel = \"loot\"\n")
            .unwrap()
    }

    fn object() -> GameObject {
        GameObject::new("Crate", GameObjectHandle::INVALID)
    }

    fn overrides(text: &str) -> Document {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_make_attaches_components_in_template_order() {
        let factory = GameObjectFactory::default();
        let mut object = object();
        factory.make(Path::new("crate.toml"), &mut object, &store()).unwrap();

        let names: Vec<_> = object.components().map(|c| c.name()).collect();
        assert_eq!(names, ["TransformComponent", "MeshComponent"]);
        let transform = object.get_component::<TransformComponent>().unwrap();
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(object.get_component::<MeshComponent>().unwrap().shape, "Cube");
    }

    #[test]
    fn test_unknown_component_without_hooks() {
        let factory = GameObjectFactory::default();
        let err = factory.make(Path::new("tagged.toml"), &mut object(), &store()).unwrap_err();
        assert!(matches!(err, WorldError::UnknownComponent(name) if name == "Tag"));
    }

    #[test]
    fn test_custom_component_through_hooks() {
        let factory = GameObjectFactory::new(tag_hooks());
        let mut object = object();
        factory.make(Path::new("tagged.toml"), &mut object, &store()).unwrap();
        assert_eq!(object.get_component::<Tag>().unwrap().label, "loot");

        factory
            .override_deserialize(&overrides("[Components.Tag]\nLabel = \"key\""), &mut object)
            .unwrap();
        assert_eq!(object.get_component::<Tag>().unwrap().label, "key");
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let factory = GameObjectFactory::default();
        assert!(matches!(
            factory.make(Path::new("nope.toml"), &mut object(), &store()),
            Err(WorldError::Io { .. })
        ));
    }

    #[test]
    fn test_overrides_only_touch_listed_fields() {
        let factory = GameObjectFactory::default();
        let mut object = object();
        factory.make(Path::new("crate.toml"), &mut object, &store()).unwrap();

        factory
            .override_deserialize(&overrides("[Components.TransformComponent]\nScale = [2, 2, 2]"), &mut object)
            .unwrap();

        let transform = object.get_component::<TransformComponent>().unwrap();
        assert_eq!(transform.scale, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_override_for_absent_component_is_skipped() {
        let factory = GameObjectFactory::new(tag_hooks());
        let mut object = object();
        factory.make(Path::new("crate.toml"), &mut object, &store()).unwrap();

        let data = overrides("[Components.CameraComponent]\nFov = 90\n[Components.Tag]\nLabel = \"x\"");
        factory.override_deserialize(&data, &mut object).unwrap();
        assert_eq!(object.component_count(), 2);
    }

    #[test]
    fn test_override_with_unknown_name_fails() {
        let factory = GameObjectFactory::default();
        let data = overrides("[Components.Teleporter]\nRange = 4");
        assert!(matches!(
            factory.override_deserialize(&data, &mut object()),
            Err(WorldError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_diff_reports_only_changed_fields() {
        let store = store();
        let factory = GameObjectFactory::default();
        let mut object = object();
        factory.make(Path::new("crate.toml"), &mut object, &store).unwrap();
        object.set_template_path(Path::new("crate.toml"));

        assert!(factory.diff_against_template(&object, &store).unwrap().is_empty());

        object.get_component_mut::<TransformComponent>().unwrap().scale = Vec3::new(3.0, 3.0, 3.0);
        let diff = factory.diff_against_template(&object, &store).unwrap();
        let transform = diff.get("TransformComponent").and_then(Value::as_table).unwrap();
        assert_eq!(transform.keys().collect::<Vec<_>>(), ["Scale"]);
        assert!(!diff.contains_key("MeshComponent"));
    }
}
