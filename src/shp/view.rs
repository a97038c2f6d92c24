//! Typed views over the shared input buffer.
//!
//! A polygon's parts (`i32`) and points (`f64`) arrays sit at whatever offset
//! the record layout puts them, so they may or may not be aligned for their
//! element type. [`acquire_view`] borrows the bytes in place when it can and
//! decodes them element by element when it cannot. The resulting [`View`]
//! looks the same either way.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use tracing::trace;
use zerocopy::{F64, FromBytes, I32, Immutable, KnownLayout, LE};

use super::error::{ShpError, ShpResult};
use crate::common::binary::{read_at, take};

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f64 {}
}

/// Numeric element types that can be viewed out of a Shapefile buffer.
///
/// Implemented for `i32` and `f64`, the two array element types the format uses.
pub trait ViewElement:
    FromBytes + Immutable + KnownLayout + Copy + PartialEq + fmt::Debug + sealed::Sealed + 'static
{
    /// Unaligned little-endian wire form of the element.
    type Le: FromBytes;

    fn from_le(raw: Self::Le) -> Self;
}

impl ViewElement for i32 {
    type Le = I32<LE>;

    #[inline]
    fn from_le(raw: Self::Le) -> Self {
        raw.get()
    }
}

impl ViewElement for f64 {
    type Le = F64<LE>;

    #[inline]
    fn from_le(raw: Self::Le) -> Self {
        raw.get()
    }
}

/// A read-only sequence of `T` decoded from the input buffer.
///
/// Derefs to `[T]`. Whether the elements are borrowed from the buffer or were
/// copied out of it is not observable through this type.
#[derive(Clone)]
pub struct View<'a, T: ViewElement>(Cow<'a, [T]>);

impl<T: ViewElement> View<'_, T> {
    /// Detach the view from the input buffer.
    pub fn into_owned(self) -> View<'static, T> {
        View(Cow::Owned(self.0.into_owned()))
    }

    #[cfg(test)]
    pub(crate) fn is_borrowed(&self) -> bool {
        matches!(self.0, Cow::Borrowed(_))
    }
}

impl<T: ViewElement> Deref for View<'_, T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T: ViewElement> AsRef<[T]> for View<'_, T> {
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T: ViewElement> From<Vec<T>> for View<'static, T> {
    fn from(values: Vec<T>) -> Self {
        View(Cow::Owned(values))
    }
}

impl<T: ViewElement> PartialEq for View<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self[..] == other[..]
    }
}

impl<T: ViewElement> PartialEq<[T]> for View<'_, T> {
    fn eq(&self, other: &[T]) -> bool {
        self[..] == *other
    }
}

impl<T: ViewElement> fmt::Debug for View<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(feature = "serde")]
impl<T: ViewElement + serde::Serialize> serde::Serialize for View<'_, T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// View `count` little-endian elements of `T` starting at `offset` in `buffer`.
///
/// Fails with [`ShpError::Truncated`] if the range does not fit in `buffer`.
/// Offsets in the error are relative to `buffer`.
///
/// # Examples
///
/// ```
/// use shpread::shp::view::acquire_view;
///
/// let mut bytes = vec![0u8; 3];
/// bytes.extend_from_slice(&1.5f64.to_le_bytes());
/// bytes.extend_from_slice(&(-2.0f64).to_le_bytes());
///
/// let points = acquire_view::<f64>(&bytes, 3, 2).unwrap();
/// assert_eq!(&points[..], &[1.5, -2.0]);
/// ```
pub fn acquire_view<T: ViewElement>(
    buffer: &[u8],
    offset: usize,
    count: usize,
) -> ShpResult<View<'_, T>> {
    let byte_len = count
        .checked_mul(size_of::<T>())
        .ok_or(ShpError::Truncated {
            offset,
            needed: usize::MAX,
            available: buffer.len().saturating_sub(offset),
        })?;
    let bytes = take(buffer, offset, byte_len)?;

    if let Some(values) = reinterpret::<T>(bytes) {
        trace!(offset, count, "zero-copy view");
        return Ok(View(Cow::Borrowed(values)));
    }

    trace!(offset, count, "element-wise decode");
    decode_elementwise(bytes)
        .map(|values| View(Cow::Owned(values)))
        .map_err(|e| e.shifted(offset))
}

/// Reinterpret `bytes` in place. `None` if the address is not aligned for `T`.
#[cfg(target_endian = "little")]
#[inline]
fn reinterpret<T: ViewElement>(bytes: &[u8]) -> Option<&[T]> {
    <[T]>::ref_from_bytes(bytes).ok()
}

// Native `f64`/`i32` are big-endian here; in-place reinterpretation would be wrong.
#[cfg(not(target_endian = "little"))]
#[inline]
fn reinterpret<T: ViewElement>(_bytes: &[u8]) -> Option<&[T]> {
    None
}

/// Decode `bytes` as consecutive little-endian `T`s.
///
/// Fails on a trailing partial element; offsets are relative to `bytes`.
pub(crate) fn decode_elementwise<T: ViewElement>(bytes: &[u8]) -> ShpResult<Vec<T>> {
    let width = size_of::<T>();
    (0..bytes.len())
        .step_by(width)
        .map(|at| read_at::<T::Le>(bytes, at).map(T::from_le).map_err(ShpError::from))
        .collect()
}
