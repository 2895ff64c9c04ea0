//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types used by the built-in components
//! - Logging setup for binaries and tests

pub mod math;
pub mod logging;
