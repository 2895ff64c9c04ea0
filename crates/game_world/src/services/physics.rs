//! Physics service
//!
//! Keeps the registry of rigid bodies and turns variable frame times into a
//! whole number of fixed simulation steps. The integration itself belongs to
//! whatever physics backend consumes those steps.

use crate::debug::DebugUi;
use crate::document::fields::{read_f32, read_vec3, write_f32, write_vec3};
use crate::document::Document;
use crate::foundation::math::Vec3;
use crate::world::{GameObjectHandle, Service, ServiceContext};

/// Frames slower than this many steps drop the excess time
const MAX_STEPS_PER_FRAME: u32 = 8;

/// Fixed-step physics bookkeeping
#[derive(Debug)]
pub struct PhysicsService {
    /// World gravity (m/s^2)
    pub gravity: Vec3,
    /// Simulation step in seconds
    pub fixed_time_step: f32,
    bodies: Vec<(GameObjectHandle, f32)>,
    accumulator: f32,
    steps_last_frame: u32,
    total_steps: u64,
}

impl Default for PhysicsService {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_time_step: 1.0 / 60.0,
            bodies: Vec::new(),
            accumulator: 0.0,
            steps_last_frame: 0,
            total_steps: 0,
        }
    }
}

impl PhysicsService {
    /// Add a body, or update its mass if already registered
    pub fn register(&mut self, body: GameObjectHandle, mass: f32) {
        match self.bodies.iter_mut().find(|(handle, _)| *handle == body) {
            Some(entry) => entry.1 = mass,
            None => self.bodies.push((body, mass)),
        }
    }

    /// Remove a body
    pub fn unregister(&mut self, body: GameObjectHandle) {
        self.bodies.retain(|(handle, _)| *handle != body);
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Whether `body` is registered
    pub fn contains(&self, body: GameObjectHandle) -> bool {
        self.bodies.iter().any(|(handle, _)| *handle == body)
    }

    /// Sum of all registered masses
    pub fn total_mass(&self) -> f32 {
        self.bodies.iter().map(|(_, mass)| mass).sum()
    }

    /// Steps simulated during the last update
    pub fn steps_last_frame(&self) -> u32 {
        self.steps_last_frame
    }

    /// Steps simulated since the world started
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Advance the accumulator by `delta_time` and count whole steps
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        self.steps_last_frame = 0;
        if self.fixed_time_step <= 0.0 {
            return 0;
        }

        self.accumulator += delta_time.max(0.0);
        while self.accumulator >= self.fixed_time_step {
            if self.steps_last_frame == MAX_STEPS_PER_FRAME {
                log::warn!("Physics fell behind; dropping {:.3}s", self.accumulator);
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= self.fixed_time_step;
            self.steps_last_frame += 1;
        }
        self.total_steps += u64::from(self.steps_last_frame);
        self.steps_last_frame
    }
}

impl Service for PhysicsService {
    fn name(&self) -> &'static str {
        "PhysicsService"
    }

    fn initialize(&mut self, _ctx: &mut ServiceContext<'_>) {
        log::debug!("Physics running at {:.1} Hz", 1.0 / self.fixed_time_step.max(f32::EPSILON));
    }

    fn terminate(&mut self, _ctx: &mut ServiceContext<'_>) {
        self.bodies.clear();
    }

    fn update(&mut self, delta_time: f32, _ctx: &mut ServiceContext<'_>) {
        self.advance(delta_time);
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field_vec3("Gravity", &self.gravity);
        ui.field("FixedTimeStep", self.fixed_time_step);
        ui.field("Bodies", self.bodies.len());
        ui.field("Steps", self.total_steps);
    }

    fn serialize(&self, out: &mut Document) {
        write_vec3(out, "Gravity", &self.gravity);
        write_f32(out, "FixedTimeStep", self.fixed_time_step);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(gravity) = read_vec3(data, "Gravity") {
            self.gravity = gravity;
        }
        if let Some(step) = read_f32(data, "FixedTimeStep") {
            self.fixed_time_step = step;
        }
    }
}
