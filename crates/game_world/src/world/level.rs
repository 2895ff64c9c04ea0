//! Level files: loading a world from a document and saving it back
//!
//! A level names the services to register, the slot capacity and the objects
//! to spawn:
//!
//! ```toml
//! Capacity = 16
//!
//! [Services.RenderService]
//! ClearColor = [0.1, 0.1, 0.2, 1.0]
//!
//! [GameObjects.Player]
//! Template = "templates/player.toml"
//!
//! [GameObjects.Player.Components.TransformComponent]
//! Position = [0.0, 1.8, 5.0]
//! ```

use std::path::Path;

use log::{debug, info, warn};

use super::{GameWorld, Result, Service, WorldError, WorldState};
use crate::document::fields::{expect_table, read_table};
use crate::document::{Document, Value};
use crate::services;

impl GameWorld {
    /// Build the world described by the level document at `path`
    ///
    /// Services are registered and deserialized in document order, the world
    /// is initialized with the level's `Capacity`, then each object is built
    /// from its template, given its overrides and initialized.
    ///
    /// Only valid on a fresh world. If loading fails part way the world is
    /// left as far as it got and should be discarded.
    pub fn load_level(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if self.state() != WorldState::Uninitialized {
            return Err(WorldError::InvalidState { operation: "load a level", state: self.state() });
        }

        info!("Loading level {}", path.display());
        self.level_path = Some(path.to_path_buf());
        let document = self.store.read(path)?;
        let context = path.display().to_string();
        self.set_state(WorldState::Loading);

        if let Some(entries) = read_table(&document, "Services", &context)? {
            for (name, value) in entries {
                let fields = expect_table(value, &context, name)?;
                let service = self.make_service(name)?;
                self.add_boxed_service(service)?.deserialize(fields);
            }
        }

        let capacity = read_capacity(&document, &context)?;
        self.initialize(capacity)?;

        if let Some(entries) = read_table(&document, "GameObjects", &context)? {
            for (name, value) in entries {
                let entry = expect_table(value, &context, name)?;
                let template = read_entry_string(entry, name, "Template")?;
                let object_name = read_entry_string(entry, name, "Name")?.unwrap_or(name.as_str());
                let handle = self.create_game_object(object_name, template.map(Path::new), false)?;
                if let Some(object) = self.slots.get_mut(handle) {
                    self.factory.override_deserialize(entry, object)?;
                }
                self.initialize_game_object(handle)?;
            }
        }

        info!(
            "Level {} loaded: {} services, {} objects",
            path.display(),
            self.services.len(),
            self.live_count()
        );
        Ok(())
    }

    /// Write the current world to `path`, or back to the loaded level
    ///
    /// With no path and no loaded level there is nowhere to save and this
    /// does nothing.
    pub fn save_level(&mut self, path: Option<&Path>) -> Result<()> {
        if self.state() != WorldState::Initialized {
            return Err(WorldError::InvalidState { operation: "save a level", state: self.state() });
        }

        let Some(path) = path.map(Path::to_path_buf).or_else(|| self.level_path.clone()) else {
            debug!("No level path to save to");
            return Ok(());
        };

        let document = self.build_level_document()?;
        self.store.write(&path, &document)?;
        info!("Saved level {}", path.display());
        Ok(())
    }

    /// The level document describing the world as it is now
    ///
    /// Each object entry carries only the component fields that differ from
    /// its template. Objects created without a template cannot be described
    /// this way and are left out. When several objects share a name, the
    /// later ones are keyed `name#n` and keep their real name in `Name`.
    pub fn build_level_document(&self) -> Result<Document> {
        let mut document = Document::new();
        document.insert("Capacity".to_owned(), Value::Integer(i64::from(self.capacity())));

        let mut service_entries = Document::new();
        for service in &self.services {
            let mut fields = Document::new();
            service.serialize(&mut fields);
            service_entries.insert(service.name().to_owned(), Value::Table(fields));
        }
        document.insert("Services".to_owned(), Value::Table(service_entries));

        let mut object_entries = Document::new();
        for (handle, object) in self.slots.iter() {
            let template = object.template_path();
            if template.as_os_str().is_empty() {
                warn!("'{}' ({}) has no template; not saved", object.name(), handle);
                continue;
            }

            let key = unused_key(&object_entries, object.name(), handle.index());
            let mut entry = Document::new();
            if key != object.name() {
                entry.insert("Name".to_owned(), Value::String(object.name().to_owned()));
            }
            entry.insert("Template".to_owned(), Value::String(template.to_string_lossy().into_owned()));
            let components = self.factory.diff_against_template(object, self.store.as_ref())?;
            if !components.is_empty() {
                entry.insert("Components".to_owned(), Value::Table(components));
            }

            object_entries.insert(key, Value::Table(entry));
        }
        document.insert("GameObjects".to_owned(), Value::Table(object_entries));

        Ok(document)
    }

    /// Built-in service called `name`, else the custom service hook's
    fn make_service(&self, name: &str) -> Result<Box<dyn Service>> {
        services::make_builtin(name)
            .or_else(|| self.custom_service.as_ref().and_then(|make| make(name)))
            .ok_or_else(|| WorldError::UnknownService(name.to_owned()))
    }
}

/// Optional string field of a `GameObjects` entry
fn read_entry_string<'a>(entry: &'a Document, object: &str, field: &str) -> Result<Option<&'a str>> {
    match entry.get(field) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(WorldError::InvalidField {
            context: format!("game object '{object}'"),
            field: field.to_owned(),
            reason: format!("expected a string, found {}", other.type_str()),
        }),
    }
}

/// Key for an object entry: its name, or `name#n` counting up from the
/// slot index until nothing already saved uses it
fn unused_key(entries: &Document, name: &str, index: u32) -> String {
    let mut key = name.to_owned();
    let mut suffix = u64::from(index);
    while entries.contains_key(&key) {
        key = format!("{name}#{suffix}");
        suffix += 1;
    }
    key
}

fn read_capacity(document: &Document, context: &str) -> Result<u32> {
    let value = document.get("Capacity").ok_or_else(|| WorldError::MissingField {
        context: context.to_owned(),
        field: "Capacity",
    })?;

    value
        .as_integer()
        .and_then(|capacity| u32::try_from(capacity).ok())
        .ok_or_else(|| WorldError::InvalidField {
            context: context.to_owned(),
            field: "Capacity".to_owned(),
            reason: format!("expected a non-negative integer, found {value}"),
        })
}
