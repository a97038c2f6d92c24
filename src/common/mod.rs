//! Common types and utilities shared across the crate.
//!
//! This module provides the bounds-checked binary readers used by the
//! decoder and the unified error type presented to users.

// Submodule declarations
pub mod binary;
pub mod error;

// Re-exports for convenience
pub use binary::{BinaryError, BinaryResult};
pub use error::{Error, Result};
