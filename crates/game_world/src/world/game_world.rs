//! The game world: object slots, services and the frame loop

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use super::service::for_each_service;
use super::slots::SlotTable;
use super::{GameObject, GameObjectHandle, Result, Service, WorldError};
use crate::config::WorldConfig;
use crate::debug::DebugUi;
use crate::document::{DocumentStore, FileStore};
use crate::factory::{FactoryHooks, GameObjectFactory};
use crate::services::ServiceMaker;

/// Lifecycle state of a [`GameWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldState {
    /// Services may be added; no objects exist yet
    Uninitialized,
    /// A level is being loaded (services are still being added)
    Loading,
    /// Objects can be created and the frame loop runs
    Initialized,
    /// Everything has been torn down
    Terminated,
}

/// Owner of every game object and service
///
/// Objects live in a fixed number of slots chosen at [`initialize`]. They are
/// addressed by [`GameObjectHandle`]s, which go stale the moment the object
/// is destroyed. The object itself is only terminated and freed at the end
/// of the next [`update`], so destroying something mid-frame never disturbs
/// the objects still running.
///
/// [`initialize`]: GameWorld::initialize
/// [`update`]: GameWorld::update
pub struct GameWorld {
    state: WorldState,
    pub(crate) slots: SlotTable,
    pub(crate) services: Vec<Box<dyn Service>>,
    pub(crate) factory: GameObjectFactory,
    pub(crate) custom_service: Option<ServiceMaker>,
    pub(crate) store: Box<dyn DocumentStore>,
    pub(crate) level_path: Option<PathBuf>,
    default_capacity: u32,
}

impl GameWorld {
    /// Create an uninitialized world reading documents from `store`
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self {
            state: WorldState::Uninitialized,
            slots: SlotTable::default(),
            services: Vec::new(),
            factory: GameObjectFactory::default(),
            custom_service: None,
            store: Box::new(store),
            level_path: None,
            default_capacity: WorldConfig::default().default_capacity,
        }
    }

    /// Create a world whose documents live under `config.assets_dir`
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(FileStore::new(&config.assets_dir)).with_default_capacity(config.default_capacity)
    }

    /// Resolve unknown component names through `hooks`
    pub fn with_component_hooks(mut self, hooks: FactoryHooks) -> Self {
        self.factory = GameObjectFactory::new(hooks);
        self
    }

    /// Resolve unknown service names in level files through `maker`
    pub fn with_custom_service<F>(mut self, maker: F) -> Self
    where
        F: Fn(&str) -> Option<Box<dyn Service>> + 'static,
    {
        self.custom_service = Some(Box::new(maker));
        self
    }

    /// Capacity used by [`initialize_default`](Self::initialize_default)
    pub fn with_default_capacity(mut self, capacity: u32) -> Self {
        self.default_capacity = capacity;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorldState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: WorldState) {
        self.state = state;
    }

    /// Document store used for templates and levels
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Object factory used for templates and overrides
    pub fn factory(&self) -> &GameObjectFactory {
        &self.factory
    }

    /// Path of the most recently loaded level
    pub fn level_path(&self) -> Option<&Path> {
        self.level_path.as_deref()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Initialize services, then size the object table to `capacity`
    pub fn initialize(&mut self, capacity: u32) -> Result<()> {
        if !matches!(self.state, WorldState::Uninitialized | WorldState::Loading) {
            return Err(WorldError::AlreadyInitialized);
        }

        for_each_service(&mut self.services, |service, ctx| service.initialize(ctx));

        self.slots = SlotTable::with_capacity(capacity);
        self.state = WorldState::Initialized;
        info!("Game world initialized: {} services, capacity {}", self.services.len(), capacity);
        Ok(())
    }

    /// Initialize with the configured default capacity
    pub fn initialize_default(&mut self) -> Result<()> {
        self.initialize(self.default_capacity)
    }

    /// Tear down every object, then every service
    ///
    /// Objects go first so their `terminate` hooks can still reach services.
    pub fn terminate(&mut self) {
        if self.state == WorldState::Terminated {
            return;
        }
        // Set first so nothing new can be created from a terminate hook
        self.state = WorldState::Terminated;

        let mut count = 0;
        for index in 0..self.slots.capacity() {
            if let Some(mut object) = self.slots.evict(index) {
                object.terminate(self);
                count += 1;
            }
        }
        self.slots = SlotTable::default();

        for_each_service(&mut self.services, |service, ctx| service.terminate(ctx));
        self.services.clear();

        info!("Game world terminated ({} objects released)", count);
    }

    /// Advance one frame
    ///
    /// Every live object updates in slot order, then every service in
    /// registration order, then objects destroyed this frame are released.
    pub fn update(&mut self, delta_time: f32) {
        if self.state != WorldState::Initialized {
            return;
        }

        for index in 0..self.slots.capacity() {
            if let Some(mut object) = self.slots.check_out_index(index) {
                object.update(delta_time, self);
                self.check_in(index, object);
            }
        }

        for_each_service(&mut self.services, |service, ctx| service.update(delta_time, ctx));

        self.process_destroy_list();
    }

    /// Render one frame: objects in slot order, then services
    pub fn render(&mut self) {
        if self.state != WorldState::Initialized {
            return;
        }

        for index in 0..self.slots.capacity() {
            if let Some(mut object) = self.slots.check_out_index(index) {
                object.render(self);
                self.check_in(index, object);
            }
        }

        for_each_service(&mut self.services, |service, ctx| service.render(ctx));
    }

    /// Describe every object and service, then offer a "Save" button
    pub fn debug_ui(&mut self, ui: &mut DebugUi) -> Result<()> {
        for object in self.slots.iter_mut() {
            object.debug_ui(ui);
        }

        for service in &mut self.services {
            ui.begin_section(service.name());
            service.debug_ui(ui);
            ui.end_section();
        }

        if ui.button("Save") {
            self.save_level(None)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    /// Create an object in a free slot
    ///
    /// With a template path the factory attaches the template's components
    /// first. With `initialize` the object is initialized right away;
    /// otherwise call [`initialize_game_object`](Self::initialize_game_object)
    /// once it is set up. If building or initializing fails, no object is
    /// left behind and the slot is free again.
    pub fn create_game_object(
        &mut self,
        name: impl Into<String>,
        template_path: Option<&Path>,
        initialize: bool,
    ) -> Result<GameObjectHandle> {
        if self.state != WorldState::Initialized {
            return Err(WorldError::NotInitialized);
        }

        let handle = self.slots.allocate().ok_or(WorldError::CapacityExhausted {
            capacity: self.slots.capacity(),
        })?;
        let mut object = Box::new(GameObject::new(name, handle));

        if let Some(path) = template_path.filter(|path| !path.as_os_str().is_empty()) {
            if let Err(err) = self.factory.make(path, &mut object, self.store.as_ref()) {
                self.slots.release_unplaced(handle);
                return Err(err);
            }
            object.set_template_path(path);
        }

        debug!("Created game object '{}' ({})", object.name(), handle);
        self.slots.place(handle, object);

        if initialize {
            if let Err(err) = self.initialize_game_object(handle) {
                // The caller never sees this handle, so the slot must not stay taken
                self.slots.discard(handle);
                warn!("Game object ({}) failed to initialize and was discarded: {}", handle, err);
                return Err(err);
            }
        }
        Ok(handle)
    }

    /// Run an object's `initialize` hooks (once); stale handles are ignored
    pub fn initialize_game_object(&mut self, handle: GameObjectHandle) -> Result<()> {
        let Some(mut object) = self.slots.check_out(handle) else {
            return Ok(());
        };
        let result = object.initialize(self);
        self.check_in(handle.index(), object);
        result
    }

    /// Request destruction of an object
    ///
    /// The handle (and every copy of it) is invalid from this call on. The
    /// object itself still finishes the current frame and is terminated at
    /// the end of the next [`update`](Self::update). Stale handles are ignored.
    pub fn destroy_game_object(&mut self, handle: GameObjectHandle) {
        if self.slots.mark_destroyed(handle) {
            debug!("Queued game object {} for destruction", handle);
        }
    }

    /// Whether `handle` still refers to a live object
    pub fn is_valid(&self, handle: GameObjectHandle) -> bool {
        self.slots.is_valid(handle)
    }

    /// The object behind `handle`, if it still exists
    ///
    /// Also `None` for an object whose own hooks are currently running.
    pub fn get_game_object(&self, handle: GameObjectHandle) -> Option<&GameObject> {
        self.slots.get(handle)
    }

    /// The object behind `handle`, if it still exists
    pub fn get_game_object_mut(&mut self, handle: GameObjectHandle) -> Option<&mut GameObject> {
        self.slots.get_mut(handle)
    }

    /// First live object called `name`
    pub fn find_game_object(&self, name: &str) -> Option<GameObjectHandle> {
        self.slots
            .iter()
            .find(|(_, object)| object.name() == name)
            .map(|(handle, _)| handle)
    }

    /// Live objects with their handles, in slot order
    pub fn game_objects(&self) -> impl Iterator<Item = (GameObjectHandle, &GameObject)> {
        self.slots.iter()
    }

    /// Fixed number of object slots (0 before `initialize`)
    pub fn capacity(&self) -> u32 {
        self.slots.capacity()
    }

    /// Number of occupied slots, including objects awaiting destruction
    pub fn live_count(&self) -> usize {
        self.slots.live_count()
    }

    /// Number of objects queued for the next destroy flush
    pub fn pending_destroy_count(&self) -> usize {
        self.slots.pending_destroy_count()
    }

    fn check_in(&mut self, index: u32, object: Box<GameObject>) {
        if let Some(mut orphan) = self.slots.check_in(index, object) {
            // The world was torn down underneath a running hook
            warn!("Slot {} vanished while '{}' was running; terminating it", index, orphan.name());
            orphan.terminate(self);
        }
    }

    fn process_destroy_list(&mut self) {
        for index in self.slots.take_destroy_list() {
            let Some(mut object) = self.slots.check_out_index(index) else {
                self.slots.free(index);
                continue;
            };

            // Destroy bumped the generation, so the object's own handle is stale
            let still_valid = self.slots.generation(index) == Some(object.handle().generation());
            if still_valid {
                error!("Game object '{}' ({}) is still alive in the destroy list", object.name(), object.handle());
            }
            debug_assert!(!still_valid, "destroyed object must have a stale handle");

            object.terminate(self);
            // The index only goes back to the pool once its occupant is fully gone
            self.slots.free(index);
            debug!("Destroyed game object '{}' ({})", object.name(), object.handle());
        }
    }

    // ------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------

    /// Construct and register a service of type `T`
    ///
    /// Only valid before [`initialize`](Self::initialize).
    pub fn add_service<T: Service + Default>(&mut self) -> Result<&mut T> {
        let service = self.add_boxed_service(Box::<T>::default())?;
        let name = service.name();
        service
            .downcast_mut::<T>()
            .ok_or_else(|| WorldError::UnknownService(name.to_owned()))
    }

    /// Register an already constructed service
    pub fn add_boxed_service(&mut self, service: Box<dyn Service>) -> Result<&mut (dyn Service + 'static)> {
        if !matches!(self.state, WorldState::Uninitialized | WorldState::Loading) {
            return Err(WorldError::ServiceAfterInitialize);
        }

        let type_id = service.service_type_id();
        if self.services.iter().any(|existing| existing.service_type_id() == type_id) {
            return Err(WorldError::DuplicateService(service.name().to_owned()));
        }

        info!("Registered service {}", service.name());
        self.services.push(service);
        let index = self.services.len() - 1;
        Ok(&mut *self.services[index])
    }

    /// The registered service of type `T`
    pub fn get_service<T: Service>(&self) -> Option<&T> {
        self.services.iter().find_map(|service| service.downcast_ref::<T>())
    }

    /// The registered service of type `T`, mutably
    pub fn get_service_mut<T: Service>(&mut self) -> Option<&mut T> {
        self.services.iter_mut().find_map(|service| service.downcast_mut::<T>())
    }

    /// Registered services in update order
    pub fn services(&self) -> impl Iterator<Item = &(dyn Service + 'static)> {
        self.services.iter().map(|service| &**service)
    }
}
