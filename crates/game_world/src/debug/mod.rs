//! Headless debug overlay
//!
//! [`DebugUi`] collects what components and services want to show as plain
//! text lines, and plays back button presses queued by the embedder. A real
//! immediate-mode UI can be driven from the same calls.

use std::collections::HashSet;
use std::fmt::Display;

use crate::foundation::math::Vec3;

/// Immediate-mode collector for debug output
#[derive(Debug, Default)]
pub struct DebugUi {
    lines: Vec<String>,
    depth: usize,
    pressed: HashSet<String>,
}

impl DebugUi {
    /// Create an empty overlay
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, text: String) {
        self.lines.push(format!("{}{}", "  ".repeat(self.depth), text));
    }

    /// Open a titled, indented section
    pub fn begin_section(&mut self, title: &str) {
        self.push(format!("[{title}]"));
        self.depth += 1;
    }

    /// Close the innermost section
    pub fn end_section(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Show a labelled value
    pub fn field(&mut self, label: &str, value: impl Display) {
        self.push(format!("{label}: {value}"));
    }

    /// Show a labelled vector
    pub fn field_vec3(&mut self, label: &str, value: &Vec3) {
        self.push(format!("{label}: [{:.3}, {:.3}, {:.3}]", value.x, value.y, value.z));
    }

    /// Show a button; `true` if a press was queued for it
    pub fn button(&mut self, label: &str) -> bool {
        self.push(format!("<{label}>"));
        self.pressed.remove(label)
    }

    /// Queue a press for the button called `label`
    pub fn press(&mut self, label: &str) {
        self.pressed.insert(label.to_owned());
    }

    /// Everything shown since the last [`clear`](Self::clear)
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Start a new frame of output; queued presses are kept
    pub fn clear(&mut self) {
        self.lines.clear();
        self.depth = 0;
    }
}
