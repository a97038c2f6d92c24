//! Unified error types for Shpread library.
//!
//! Callers that only use [`crate::shp`] can match on [`crate::shp::ShpError`]
//! directly; this type exists for code that wants one error for the crate.
//! Short reads never surface on their own: the decoder reports them as
//! [`ShpError::Truncated`].
use thiserror::Error;

use crate::shp::ShpError;

/// Main error type for Shpread operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shapefile structure error
    #[error("Shapefile error: {0}")]
    Shapefile(ShpError),
}

impl Error {
    /// Byte offset at which the failure was detected, when one is known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Shapefile(e) => e.offset(),
        }
    }
}

/// Result type for Shpread operations.
pub type Result<T> = std::result::Result<T, Error>;
