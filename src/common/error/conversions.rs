//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::common::binary::BinaryError;
use crate::shp::ShpError;

impl From<ShpError> for Error {
    fn from(err: ShpError) -> Self {
        Error::Shapefile(err)
    }
}

// A short read inside the decoder is always a truncated header or record.
// `available` becomes the byte count left after `offset`.
impl From<BinaryError> for ShpError {
    fn from(err: BinaryError) -> Self {
        match err {
            BinaryError::InsufficientData {
                offset,
                needed,
                available,
            } => ShpError::Truncated {
                offset,
                needed,
                available: available.saturating_sub(offset),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_error_becomes_truncated() {
        let err: ShpError = BinaryError::InsufficientData {
            offset: 104,
            needed: 8,
            available: 107,
        }
        .into();
        assert_eq!(
            err,
            ShpError::Truncated {
                offset: 104,
                needed: 8,
                available: 3
            }
        );
    }

    #[test]
    fn test_unified_error_keeps_offset() {
        let err: Error = ShpError::BadMagic { found: 0 }.into();
        assert_eq!(err.offset(), Some(0));
        assert!(err.to_string().starts_with("Shapefile error:"));
    }
}
