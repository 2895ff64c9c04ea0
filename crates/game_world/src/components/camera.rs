//! Camera component
//!
//! Holds a free-look camera: position, view direction and a perspective
//! projection. Cameras announce themselves to the [`CameraService`] so the
//! service can pick the one to render from.

use crate::debug::DebugUi;
use crate::document::fields::{read_f32, read_vec3, write_f32, write_vec3};
use crate::document::Document;
use crate::foundation::math::{Mat4, Point3, Vec3};
use crate::services::CameraService;
use crate::world::{Component, ComponentContext, Result};

// Keep the view direction away from straight up/down so the view matrix
// never degenerates
const MAX_PITCH_DEGREES: f32 = 89.0;

/// Perspective camera attached to a game object
#[derive(Debug, Clone, PartialEq)]
pub struct CameraComponent {
    /// Eye position in world space
    pub position: Vec3,
    /// Unit view direction
    pub direction: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            direction: -Vec3::z(),
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraComponent {
    /// Camera at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let direction = (target - position).try_normalize(f32::EPSILON).unwrap_or_else(|| -Vec3::z());
        Self {
            position,
            direction,
            ..Default::default()
        }
    }

    /// Unit vector to the camera's right
    pub fn right(&self) -> Vec3 {
        self.direction.cross(&Vec3::y()).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::x)
    }

    /// Move along the view direction
    pub fn walk(&mut self, distance: f32) {
        self.position += self.direction * distance;
    }

    /// Move sideways
    pub fn strafe(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    /// Move along world up
    pub fn rise(&mut self, distance: f32) {
        self.position += Vec3::y() * distance;
    }

    /// Turn around world up by `radians`
    pub fn yaw(&mut self, radians: f32) {
        let rotation = nalgebra::Rotation3::from_axis_angle(&Vec3::y_axis(), -radians);
        self.direction = (rotation * self.direction).normalize();
    }

    /// Tilt up or down by `radians`, stopping just short of vertical
    pub fn pitch(&mut self, radians: f32) {
        let current = self.direction.y.clamp(-1.0, 1.0).asin();
        let limit = MAX_PITCH_DEGREES.to_radians();
        let target = (current - radians).clamp(-limit, limit);
        let axis = nalgebra::Unit::new_normalize(self.right());
        let rotation = nalgebra::Rotation3::from_axis_angle(&axis, target - current);
        self.direction = (rotation * self.direction).normalize();
    }

    /// World-to-view matrix (right-handed)
    pub fn view_matrix(&self) -> Mat4 {
        let eye = Point3::from(self.position);
        Mat4::look_at_rh(&eye, &(eye + self.direction), &Vec3::y())
    }

    /// Perspective projection for a viewport with the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::new_perspective(aspect, self.fov.to_radians(), self.near, self.far)
    }
}

impl Component for CameraComponent {
    fn name(&self) -> &'static str {
        "CameraComponent"
    }

    fn initialize(&mut self, ctx: &mut ComponentContext<'_>) -> Result<()> {
        let owner = ctx.owner();
        if let Some(cameras) = ctx.service_mut::<CameraService>() {
            cameras.register(owner);
        }
        Ok(())
    }

    fn terminate(&mut self, ctx: &mut ComponentContext<'_>) {
        let owner = ctx.owner();
        if let Some(cameras) = ctx.service_mut::<CameraService>() {
            cameras.unregister(owner);
        }
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field_vec3("Position", &self.position);
        ui.field_vec3("Direction", &self.direction);
        ui.field("Fov", self.fov);
    }

    fn serialize(&self, out: &mut Document) {
        write_vec3(out, "Position", &self.position);
        write_vec3(out, "Direction", &self.direction);
        write_f32(out, "Fov", self.fov);
        write_f32(out, "Near", self.near);
        write_f32(out, "Far", self.far);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(position) = read_vec3(data, "Position") {
            self.position = position;
        }
        if let Some(direction) = read_vec3(data, "Direction") {
            match direction.try_normalize(f32::EPSILON) {
                Some(direction) => self.direction = direction,
                None => log::warn!("Ignoring zero camera direction"),
            }
        }
        if let Some(fov) = read_f32(data, "Fov") {
            self.fov = fov;
        }
        if let Some(near) = read_f32(data, "Near") {
            self.near = near;
        }
        if let Some(far) = read_f32(data, "Far") {
            self.far = far;
        }
    }
}
