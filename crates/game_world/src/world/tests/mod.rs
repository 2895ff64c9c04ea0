//! World scenario tests
//!
//! Probe components and services record every hook they receive into a shared
//! event log so tests can assert on exact call order.

mod level_roundtrip;

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::MemoryStore;
use crate::world::{
    Component, ComponentContext, GameObjectHandle, GameWorld, Result, Service, ServiceContext,
};

pub(super) type EventLog = Rc<RefCell<Vec<String>>>;

pub(super) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(super) fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(super) fn events(log: &EventLog) -> Vec<String> {
    log.borrow().clone()
}

/// Records its hooks; optionally destroys another object while updating
pub(super) struct Probe {
    label: String,
    log: EventLog,
    pub destroy_on_update: Option<GameObjectHandle>,
}

impl Probe {
    pub fn new(label: &str, log: &EventLog) -> Self {
        Self { label: label.to_owned(), log: Rc::clone(log), destroy_on_update: None }
    }

    fn record(&self, event: &str) {
        self.log.borrow_mut().push(format!("{event} {}", self.label));
    }
}

impl Component for Probe {
    fn name(&self) -> &'static str {
        "Probe"
    }

    fn initialize(&mut self, _ctx: &mut ComponentContext<'_>) -> Result<()> {
        self.record("initialize");
        Ok(())
    }

    fn terminate(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record("terminate");
    }

    fn update(&mut self, _delta_time: f32, ctx: &mut ComponentContext<'_>) {
        self.record("update");
        if let Some(target) = self.destroy_on_update.take() {
            ctx.world_mut().destroy_game_object(target);
        }
    }
}

/// Service counterpart of [`Probe`]
pub(super) struct ProbeService {
    log: EventLog,
}

impl ProbeService {
    pub fn new(log: &EventLog) -> Self {
        Self { log: Rc::clone(log) }
    }

    fn record(&self, event: &str) {
        self.log.borrow_mut().push(format!("{event} service"));
    }
}

impl Service for ProbeService {
    fn name(&self) -> &'static str {
        "ProbeService"
    }

    fn initialize(&mut self, _ctx: &mut ServiceContext<'_>) {
        self.record("initialize");
    }

    fn terminate(&mut self, _ctx: &mut ServiceContext<'_>) {
        self.record("terminate");
    }

    fn update(&mut self, _delta_time: f32, _ctx: &mut ServiceContext<'_>) {
        self.record("update");
    }
}

/// An initialized world with `capacity` slots and no services
pub(super) fn world(capacity: u32) -> GameWorld {
    init_logging();
    let mut world = GameWorld::new(MemoryStore::new());
    world.initialize(capacity).unwrap();
    world
}

/// Create an initialized ad-hoc object carrying a [`Probe`]
pub(super) fn spawn_probe(world: &mut GameWorld, name: &str, log: &EventLog) -> GameObjectHandle {
    let handle = world.create_game_object(name, None, false).unwrap();
    world
        .get_game_object_mut(handle)
        .unwrap()
        .add_component(Probe::new(name, log))
        .unwrap();
    world.initialize_game_object(handle).unwrap();
    handle
}
