//! First-person camera controller
//!
//! Drives the sibling [`CameraComponent`] from a [`CameraIntent`]. Input
//! devices are outside this crate; whoever owns them fills in the intent each
//! frame.

use crate::debug::DebugUi;
use crate::document::fields::{read_f32, write_f32};
use crate::document::Document;
use crate::world::{Component, ComponentContext, Result, WorldError};

use super::CameraComponent;

/// Movement requested for one frame
///
/// Axes are in `-1.0..=1.0` (held keys); `yaw` and `pitch` are raw look
/// deltas such as mouse movement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraIntent {
    /// Forward (+) / backward (-)
    pub walk: f32,
    /// Right (+) / left (-)
    pub strafe: f32,
    /// Up (+) / down (-)
    pub rise: f32,
    /// Horizontal look delta
    pub yaw: f32,
    /// Vertical look delta
    pub pitch: f32,
    /// Use the boosted move speed
    pub boost: bool,
}

/// Fly-through camera controls
#[derive(Debug, Clone, PartialEq)]
pub struct FpsCameraComponent {
    /// Units per second
    pub move_speed: f32,
    /// Units per second while boosting
    pub shift_speed: f32,
    /// Radians per look unit per second
    pub turn_speed: f32,
    /// Input for the next update
    pub intent: CameraIntent,
}

impl Default for FpsCameraComponent {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            shift_speed: 10.0,
            turn_speed: 0.1,
            intent: CameraIntent::default(),
        }
    }
}

impl FpsCameraComponent {
    /// Apply `intent` to `camera` over `delta_time` seconds
    pub fn drive(&self, camera: &mut CameraComponent, delta_time: f32) {
        let intent = &self.intent;
        let speed = if intent.boost { self.shift_speed } else { self.move_speed };
        let step = speed * delta_time;

        camera.walk(intent.walk * step);
        camera.strafe(intent.strafe * step);
        camera.rise(intent.rise * step);

        let turn = self.turn_speed * delta_time;
        camera.yaw(intent.yaw * turn);
        camera.pitch(intent.pitch * turn);
    }
}

impl Component for FpsCameraComponent {
    fn name(&self) -> &'static str {
        "FpsCameraComponent"
    }

    fn initialize(&mut self, ctx: &mut ComponentContext<'_>) -> Result<()> {
        if ctx.sibling::<CameraComponent>().is_none() {
            return Err(WorldError::MissingDependency {
                component: "FpsCameraComponent",
                requires: "CameraComponent",
            });
        }
        Ok(())
    }

    fn update(&mut self, delta_time: f32, ctx: &mut ComponentContext<'_>) {
        if let Some(camera) = ctx.sibling_mut::<CameraComponent>() {
            self.drive(camera, delta_time);
        }
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field("MoveSpeed", self.move_speed);
        ui.field("ShiftSpeed", self.shift_speed);
        ui.field("TurnSpeed", self.turn_speed);
    }

    fn serialize(&self, out: &mut Document) {
        write_f32(out, "MoveSpeed", self.move_speed);
        write_f32(out, "ShiftSpeed", self.shift_speed);
        write_f32(out, "TurnSpeed", self.turn_speed);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(speed) = read_f32(data, "MoveSpeed") {
            self.move_speed = speed;
        }
        if let Some(speed) = read_f32(data, "ShiftSpeed") {
            self.shift_speed = speed;
        }
        if let Some(speed) = read_f32(data, "TurnSpeed") {
            self.turn_speed = speed;
        }
    }
}
