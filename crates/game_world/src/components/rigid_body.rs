//! Rigid body component
//!
//! Marks an object as taking part in physics. The body itself is only a mass;
//! it registers with the [`PhysicsService`] while the object is alive.

use crate::debug::DebugUi;
use crate::document::fields::{read_f32, write_f32};
use crate::document::Document;
use crate::services::PhysicsService;
use crate::world::{Component, ComponentContext, Result, WorldError};

use super::TransformComponent;

/// Physics participation of a game object
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyComponent {
    /// Mass in kilograms; zero makes the body static
    pub mass: f32,
}

impl Default for RigidBodyComponent {
    fn default() -> Self {
        Self { mass: 1.0 }
    }
}

impl RigidBodyComponent {
    /// Whether the body never moves
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }
}

impl Component for RigidBodyComponent {
    fn name(&self) -> &'static str {
        "RigidBodyComponent"
    }

    fn initialize(&mut self, ctx: &mut ComponentContext<'_>) -> Result<()> {
        if ctx.sibling::<TransformComponent>().is_none() {
            return Err(WorldError::MissingDependency {
                component: "RigidBodyComponent",
                requires: "TransformComponent",
            });
        }

        let owner = ctx.owner();
        if let Some(physics) = ctx.service_mut::<PhysicsService>() {
            physics.register(owner, self.mass);
        }
        Ok(())
    }

    fn terminate(&mut self, ctx: &mut ComponentContext<'_>) {
        let owner = ctx.owner();
        if let Some(physics) = ctx.service_mut::<PhysicsService>() {
            physics.unregister(owner);
        }
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field("Mass", self.mass);
    }

    fn serialize(&self, out: &mut Document) {
        write_f32(out, "Mass", self.mass);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(mass) = read_f32(data, "Mass") {
            self.mass = mass;
        }
    }
}
