//! Unified error types for Shpread library.
//!
//! This module provides a unified error type that wraps the decoder's own
//! errors, presenting a consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
