//! World error types

use std::path::PathBuf;

use thiserror::Error;

use super::WorldState;

/// Errors raised by the world, the object factory and the document layer
///
/// Stale handles are never reported here; they behave as if the object no
/// longer exists.
#[derive(Error, Debug)]
pub enum WorldError {
    /// An object was created before `initialize`
    #[error("Game world is not initialized")]
    NotInitialized,

    /// `initialize` was called twice
    #[error("Game world is already initialized")]
    AlreadyInitialized,

    /// A service was added after `initialize`
    #[error("Services cannot be added after the world is initialized")]
    ServiceAfterInitialize,

    /// A second service of the same type was added
    #[error("Service '{0}' is already registered")]
    DuplicateService(String),

    /// Every slot is occupied
    #[error("No free object slots (capacity {capacity})")]
    CapacityExhausted {
        /// Fixed slot count of the world
        capacity: u32,
    },

    /// A second component of the same type was attached to one object
    #[error("Object '{object}' already has a {component}")]
    DuplicateComponent {
        /// Name of the object
        object: String,
        /// Name of the component variant
        component: String,
    },

    /// No built-in or custom maker knows this component name
    #[error("Unknown component '{0}'")]
    UnknownComponent(String),

    /// No built-in or custom maker knows this service name
    #[error("Unknown service '{0}'")]
    UnknownService(String),

    /// A component needs a sibling the object does not have
    #[error("{component} requires a {requires} on the same object")]
    MissingDependency {
        /// Component that failed to initialize
        component: &'static str,
        /// Component it depends on
        requires: &'static str,
    },

    /// Operation not allowed in the world's current state
    #[error("Cannot {operation} while the world is {state:?}")]
    InvalidState {
        /// What was attempted
        operation: &'static str,
        /// State the world was in
        state: WorldState,
    },

    /// A required field is absent
    #[error("{context}: missing required field '{field}'")]
    MissingField {
        /// Document or entry being read
        context: String,
        /// Field name
        field: &'static str,
    },

    /// A required field has an unusable value
    #[error("{context}: invalid field '{field}': {reason}")]
    InvalidField {
        /// Document or entry being read
        context: String,
        /// Field name
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// A document could not be read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A document could not be decoded
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse {
        /// File involved
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// A document could not be encoded
    #[error("Failed to serialize {}: {message}", .path.display())]
    Serialize {
        /// File involved
        path: PathBuf,
        /// Encoder message
        message: String,
    },

    /// The file extension does not name a known document format
    #[error("Unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, WorldError>;
