//! Error types for Shapefile decoding.

use thiserror::Error;

/// Errors that abort a parse.
///
/// Every variant except `TooSmall` carries the absolute byte offset in the
/// input buffer at which the problem was detected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShpError {
    /// The buffer cannot even hold the fixed 100-byte file header.
    #[error("Not a SHP file, not big enough: {length} bytes (header needs 100)")]
    TooSmall { length: usize },

    /// The file code at offset 0 is not 9994.
    #[error("Not a SHP file, wrong magic number at offset 0: found {found:#010x}, expected 0x0000270a")]
    BadMagic { found: i32 },

    /// A declared length runs past the end of the data that holds it.
    #[error("Truncated data at offset {offset}: need {needed} bytes, only {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A parts or points count stored as a negative integer.
    #[error("Negative {field} count {value} at offset {offset}")]
    NegativeCount {
        field: &'static str,
        value: i32,
        offset: usize,
    },
}

impl ShpError {
    /// Byte offset at which the failure was detected.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ShpError::TooSmall { .. } => None,
            ShpError::BadMagic { .. } => Some(0),
            ShpError::Truncated { offset, .. } | ShpError::NegativeCount { offset, .. } => {
                Some(*offset)
            },
        }
    }

    /// Re-express an offset relative to a record body as an offset into the file.
    pub(crate) fn shifted(self, base: usize) -> Self {
        match self {
            ShpError::Truncated {
                offset,
                needed,
                available,
            } => ShpError::Truncated {
                offset: offset.saturating_add(base),
                needed,
                available,
            },
            ShpError::NegativeCount {
                field,
                value,
                offset,
            } => ShpError::NegativeCount {
                field,
                value,
                offset: offset.saturating_add(base),
            },
            other => other,
        }
    }
}

/// Result type for Shapefile operations.
pub type ShpResult<T> = Result<T, ShpError>;
