//! Transform component
//!
//! Pure data: where an object is, how it is oriented and how large it is.
//! Rotation is kept as Euler angles in degrees, the same form level files use,
//! so a saved level reproduces exactly what was loaded.

use crate::debug::DebugUi;
use crate::document::fields::{read_vec3, write_vec3};
use crate::document::Document;
use crate::foundation::math::{quat_from_euler_degrees, Mat4, Quat, Transform, Vec3};
use crate::world::Component;

/// Spatial placement of a game object
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// World space position (Y-up right-handed)
    pub position: Vec3,

    /// Euler angles in degrees (roll, pitch, yaw)
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set rotation from Euler angles in degrees
    pub fn with_rotation_degrees(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion
    pub fn rotation_quat(&self) -> Quat {
        quat_from_euler_degrees(self.rotation)
    }

    /// Convert to foundation math Transform for calculations
    pub fn to_math_transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation_quat(),
            scale: self.scale,
        }
    }

    /// Convert to transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        self.to_math_transform().to_matrix()
    }

    /// Move by `delta` in world space
    pub fn translate(&mut self, delta: &Vec3) {
        self.position += delta;
    }
}

impl Component for TransformComponent {
    fn name(&self) -> &'static str {
        "TransformComponent"
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field_vec3("Position", &self.position);
        ui.field_vec3("Rotation", &self.rotation);
        ui.field_vec3("Scale", &self.scale);
    }

    fn serialize(&self, out: &mut Document) {
        write_vec3(out, "Position", &self.position);
        write_vec3(out, "Rotation", &self.rotation);
        write_vec3(out, "Scale", &self.scale);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(position) = read_vec3(data, "Position") {
            self.position = position;
        }
        if let Some(rotation) = read_vec3(data, "Rotation") {
            self.rotation = rotation;
        }
        if let Some(scale) = read_vec3(data, "Scale") {
            self.scale = scale;
        }
    }
}
