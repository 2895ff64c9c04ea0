//! Render service
//!
//! Collects the draws components submit while rendering and closes the frame
//! once every object has rendered. A graphics backend reads the finished
//! frame from [`RenderService::last_frame`].

use crate::debug::DebugUi;
use crate::document::fields::{read_bool, read_color, write_bool, write_color};
use crate::document::Document;
use crate::foundation::math::Mat4;
use crate::world::{GameObjectHandle, Service, ServiceContext};

/// One mesh to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Object that submitted the draw
    pub object: GameObjectHandle,
    /// Shape or model name
    pub shape: String,
    /// Material name
    pub material: String,
    /// Model matrix
    pub transform: Mat4,
}

/// Per-frame statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Index of the frame, starting at 0
    pub frame: u64,
    /// Draws submitted during the frame
    pub draw_calls: usize,
}

/// Frame assembly for the renderer
#[derive(Debug)]
pub struct RenderService {
    /// Background color (RGBA)
    pub clear_color: [f32; 4],
    /// Draw outlines only
    pub wireframe: bool,
    pending: Vec<DrawCommand>,
    finished: Vec<DrawCommand>,
    stats: FrameStats,
    frames: u64,
}

impl Default for RenderService {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.1, 0.1, 1.0],
            wireframe: false,
            pending: Vec::new(),
            finished: Vec::new(),
            stats: FrameStats::default(),
            frames: 0,
        }
    }
}

impl RenderService {
    /// Queue a draw for the frame being rendered
    pub fn submit(&mut self, command: DrawCommand) {
        self.pending.push(command);
    }

    /// Draws of the most recently completed frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.finished
    }

    /// Statistics of the most recently completed frame
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Number of frames completed
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl Service for RenderService {
    fn name(&self) -> &'static str {
        "RenderService"
    }

    fn terminate(&mut self, _ctx: &mut ServiceContext<'_>) {
        self.pending.clear();
        self.finished.clear();
    }

    fn render(&mut self, _ctx: &mut ServiceContext<'_>) {
        self.stats = FrameStats { frame: self.frames, draw_calls: self.pending.len() };
        self.finished = std::mem::take(&mut self.pending);
        self.frames += 1;
    }

    fn debug_ui(&mut self, ui: &mut DebugUi) {
        ui.field("Frame", self.stats.frame);
        ui.field("DrawCalls", self.stats.draw_calls);
        ui.field("Wireframe", self.wireframe);
    }

    fn serialize(&self, out: &mut Document) {
        write_color(out, "ClearColor", self.clear_color);
        write_bool(out, "Wireframe", self.wireframe);
    }

    fn deserialize(&mut self, data: &Document) {
        if let Some(color) = read_color(data, "ClearColor") {
            self.clear_color = color;
        }
        if let Some(wireframe) = read_bool(data, "Wireframe") {
            self.wireframe = wireframe;
        }
    }
}
