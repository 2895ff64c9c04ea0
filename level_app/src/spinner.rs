//! Game-specific component resolved through the factory hooks

use game_world::document::fields::{read_f32, write_f32};
use game_world::prelude::*;

/// Turns its object around the up axis at a constant rate
#[derive(Debug, Clone, PartialEq)]
pub struct SpinnerComponent {
    /// Turn rate in degrees per second
    pub degrees_per_second: f32,
}

impl Default for SpinnerComponent {
    fn default() -> Self {
        Self { degrees_per_second: 90.0 }
    }
}

impl Component for SpinnerComponent {
    fn name(&self) -> &'static str {
        "SpinnerComponent"
    }

    fn initialize(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), WorldError> {
        if ctx.sibling::<TransformComponent>().is_none() {
            return Err(WorldError::MissingDependency {
                component: "SpinnerComponent",
                requires: "TransformComponent",
            });
        }
        Ok(())
    }

    fn update(&mut self, delta_time: f32, ctx: &mut ComponentContext<'_>) {
        if let Some(transform) = ctx.sibling_mut::<TransformComponent>() {
            let angle = transform.rotation.y + self.degrees_per_second * delta_time;
            transform.rotation.y = angle.rem_euclid(360.0);
        }
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field("DegreesPerSecond", self.degrees_per_second);
    }

    fn serialize(&self, out: &mut Document) {
        write_f32(out, "DegreesPerSecond", self.degrees_per_second);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(rate) = read_f32(data, "DegreesPerSecond") {
            self.degrees_per_second = rate;
        }
    }
}

/// Factory hooks that make `SpinnerComponent` usable in templates and levels
pub fn hooks() -> FactoryHooks {
    FactoryHooks::new()
        .with_make(|name| match name {
            "SpinnerComponent" => Some(Box::<SpinnerComponent>::default() as Box<dyn Component>),
            _ => None,
        })
        .with_get(|name, object| match name {
            "SpinnerComponent" => object
                .get_component_mut::<SpinnerComponent>()
                .map(|spinner| spinner as &mut dyn Component),
            _ => None,
        })
}
