//! Generational object handles

use std::fmt;

/// Stable reference to a pooled [`GameObject`](super::GameObject)
///
/// A handle is an `(index, generation)` pair. It stays valid until the object
/// is destroyed; after that the slot's generation moves on and every copy of
/// the handle reads as stale, even if the slot is later reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameObjectHandle {
    index: u32,
    generation: u32,
}

impl GameObjectHandle {
    /// Handle that never refers to an object
    pub const INVALID: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at the time the handle was issued
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl Default for GameObjectHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for GameObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}
