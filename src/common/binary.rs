//! Binary data parsing utilities.
//!
//! Bounds-checked reads of little-endian scalars and raw structs. Every short
//! read reports the offset it started at.

use zerocopy::{F64, FromBytes, I32, LE};

/// Binary parsing error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData {
        /// Offset of the read, relative to the slice it was made on
        offset: usize,
        /// Number of bytes the read needed
        needed: usize,
        /// Length of the slice
        available: usize,
    },
}

impl BinaryError {
    /// Offset at which the short read started.
    pub fn offset(&self) -> usize {
        match self {
            BinaryError::InsufficientData { offset, .. } => *offset,
        }
    }
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                offset,
                needed,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data at offset {}: need {} bytes, slice holds {}",
                    offset, needed, available
                )
            },
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Borrow `len` bytes starting at `offset`, or report how far short the slice is.
///
/// # Examples
///
/// ```
/// use shpread::common::binary::take;
/// let data = [1u8, 2, 3, 4];
/// assert_eq!(take(&data, 1, 2).unwrap(), &[2, 3]);
/// assert!(take(&data, 3, 2).is_err());
/// ```
#[inline]
pub fn take(data: &[u8], offset: usize, len: usize) -> BinaryResult<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(BinaryError::InsufficientData {
            offset,
            needed: len,
            available: data.len(),
        })
}

/// Read a little-endian i32 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use shpread::common::binary::read_i32_le;
/// let data = [0x05, 0x00, 0x00, 0x00];
/// assert_eq!(read_i32_le(&data, 0).unwrap(), 5);
/// ```
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> BinaryResult<i32> {
    read_at::<I32<LE>>(data, offset).map(|v| v.get())
}

/// Read a little-endian f64 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use shpread::common::binary::read_f64_le;
/// let data = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F];
/// assert!((read_f64_le(&data, 0).unwrap() - 1.0).abs() < f64::EPSILON);
/// ```
#[inline]
pub fn read_f64_le(data: &[u8], offset: usize) -> BinaryResult<f64> {
    read_at::<F64<LE>>(data, offset).map(|v| v.get())
}

/// Read a `T` from the bytes starting at `offset`.
///
/// Also used for the `#[repr(C)]` raw header structs.
#[inline]
pub fn read_at<T: FromBytes>(data: &[u8], offset: usize) -> BinaryResult<T> {
    data.get(offset..)
        .and_then(|rest| T::read_from_prefix(rest).ok())
        .map(|(value, _)| value)
        .ok_or(BinaryError::InsufficientData {
            offset,
            needed: size_of::<T>(),
            available: data.len(),
        })
}
