//! Mesh component
//!
//! Names a shape and material for the renderer. Each rendered frame a visible
//! mesh submits one draw to the [`RenderService`], placed by the sibling
//! [`TransformComponent`] when there is one.

use crate::debug::DebugUi;
use crate::document::fields::{read_bool, read_string, write_bool, write_string};
use crate::document::Document;
use crate::foundation::math::Mat4;
use crate::services::{DrawCommand, RenderService};
use crate::world::{Component, ComponentContext};

use super::TransformComponent;

/// Renderable shape
#[derive(Debug, Clone, PartialEq)]
pub struct MeshComponent {
    /// Shape or model name understood by the renderer
    pub shape: String,
    /// Material name
    pub material: String,
    /// Hidden meshes submit nothing
    pub visible: bool,
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self {
            shape: "Cube".to_owned(),
            material: "Default".to_owned(),
            visible: true,
        }
    }
}

impl Component for MeshComponent {
    fn name(&self) -> &'static str {
        "MeshComponent"
    }

    fn render(&mut self, ctx: &mut ComponentContext<'_>) {
        if !self.visible {
            return;
        }

        let transform = ctx
            .sibling::<TransformComponent>()
            .map_or_else(Mat4::identity, TransformComponent::to_matrix);
        let object = ctx.owner();

        if let Some(renderer) = ctx.service_mut::<RenderService>() {
            renderer.submit(DrawCommand {
                object,
                shape: self.shape.clone(),
                material: self.material.clone(),
                transform,
            });
        }
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field("Shape", &self.shape);
        ui.field("Material", &self.material);
        ui.field("Visible", self.visible);
    }

    fn serialize(&self, out: &mut Document) {
        write_string(out, "Shape", &self.shape);
        write_string(out, "Material", &self.material);
        write_bool(out, "Visible", self.visible);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(shape) = read_string(data, "Shape") {
            self.shape = shape;
        }
        if let Some(material) = read_string(data, "Material") {
            self.material = material;
        }
        if let Some(visible) = read_bool(data, "Visible") {
            self.visible = visible;
        }
    }
}
