//! Lifetime component
//!
//! Destroys its owner once it has been alive for `duration` seconds.

use crate::debug::DebugUi;
use crate::document::fields::{read_f32, write_f32};
use crate::document::Document;
use crate::world::{Component, ComponentContext};

/// Lifetime component for objects that should go away after a duration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LifetimeComponent {
    /// How long the object should live (in seconds); zero or less is forever
    pub duration: f32,
    /// Seconds lived so far
    pub age: f32,
}

impl LifetimeComponent {
    /// Create a lifetime of `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self { duration, age: 0.0 }
    }

    /// Check if this object's lifetime has expired
    pub fn is_expired(&self) -> bool {
        if self.duration <= 0.0 {
            false // Infinite lifetime
        } else {
            self.age >= self.duration
        }
    }

    /// Get remaining lifetime in seconds
    pub fn remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            f32::INFINITY
        } else {
            (self.duration - self.age).max(0.0)
        }
    }
}

impl Component for LifetimeComponent {
    fn name(&self) -> &'static str {
        "LifetimeComponent"
    }

    fn update(&mut self, delta_time: f32, ctx: &mut ComponentContext<'_>) {
        let was_expired = self.is_expired();
        self.age += delta_time;
        if !was_expired && self.is_expired() {
            log::debug!("'{}' reached the end of its lifetime", ctx.owner_name());
            ctx.destroy_owner();
        }
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field("Duration", self.duration);
        ui.field("Remaining", self.remaining());
    }

    // Age is runtime state; only the duration belongs in a level
    fn serialize(&self, out: &mut Document) {
        write_f32(out, "Duration", self.duration);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(duration) = read_f32(data, "Duration") {
            self.duration = duration;
        }
    }
}
