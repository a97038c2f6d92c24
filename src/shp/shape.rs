//! Per-record shape decoding.
//!
//! A record body starts with a little-endian shape type code. Null shapes have
//! no further content. Polygons are laid out as:
//!
//! | Offset | Field | Type |
//! |---|---|---|
//! | 0 | shape type (5) | i32 |
//! | 4 | Xmin, Ymin, Xmax, Ymax | 4 × f64 |
//! | 36 | NumParts | i32 |
//! | 40 | NumPoints | i32 |
//! | 44 | Parts | i32 × NumParts |
//! | 44 + 4 × NumParts | Points | f64 × 2 × NumPoints |

use std::ops::Range;

use super::error::{ShpError, ShpResult};
use super::types::ShapeType;
use super::view::{View, acquire_view};
use crate::common::binary::{read_f64_le, read_i32_le, take};

/// Length of the polygon body before the parts array.
pub const POLYGON_FIXED_LEN: usize = 44;

/// Axis-aligned X/Y rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// A polygon: one or more rings sharing a flat points array.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Polygon<'a> {
    pub bbox: BoundingBox,
    /// Index into the points of the first point of each ring
    pub parts: View<'a, i32>,
    /// Coordinates, flattened as x, y, x, y, ...
    pub points: View<'a, f64>,
}

impl Polygon<'_> {
    #[inline]
    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    /// Number of coordinate pairs.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len() / 2
    }

    /// The `index`th coordinate pair.
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        let x = *self.points.get(index.checked_mul(2)?)?;
        let y = *self.points.get(index * 2 + 1)?;
        Some((x, y))
    }

    /// Range of point indices covered by part `index`.
    ///
    /// The last part runs to the end of the points. `None` if `index` is out of
    /// range or the stored start indices do not describe a valid range.
    ///
    /// ```
    /// use shpread::shp::{BoundingBox, Polygon};
    ///
    /// let polygon = Polygon {
    ///     bbox: BoundingBox::default(),
    ///     parts: vec![0, 5, 9].into(),
    ///     points: vec![0.0; 22].into(),
    /// };
    /// assert_eq!(polygon.part_range(1), Some(5..9));
    /// assert_eq!(polygon.part_range(2), Some(9..11));
    /// assert_eq!(polygon.part_range(3), None);
    /// ```
    pub fn part_range(&self, index: usize) -> Option<Range<usize>> {
        let start = usize::try_from(*self.parts.get(index)?).ok()?;
        let end = match self.parts.get(index + 1) {
            Some(&next) => usize::try_from(next).ok()?,
            None => self.num_points(),
        };
        (start <= end && end <= self.num_points()).then_some(start..end)
    }

    /// Flattened coordinates of each ring, in part order.
    ///
    /// Parts whose range is invalid are skipped.
    pub fn rings(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.num_parts())
            .filter_map(|i| self.part_range(i))
            .map(|range| &self.points[range.start * 2..range.end * 2])
    }

    /// Whether the parts start at 0, never decrease, and stay within the points.
    pub fn has_consistent_parts(&self) -> bool {
        match self.parts.first() {
            None => self.points.is_empty(),
            Some(&first) => {
                first == 0 && (0..self.num_parts()).all(|i| self.part_range(i).is_some())
            },
        }
    }

    /// Detach the polygon from the input buffer.
    pub fn into_owned(self) -> Polygon<'static> {
        Polygon {
            bbox: self.bbox,
            parts: self.parts.into_owned(),
            points: self.points.into_owned(),
        }
    }
}

/// Decoded content of one record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Geometry<'a> {
    /// Shape type 0: a record without geometry
    Null,
    /// Shape type 5
    Polygon(Polygon<'a>),
    /// Any other type code, carried as stored
    Unsupported(i32),
}

impl<'a> Geometry<'a> {
    pub fn as_polygon(&self) -> Option<&Polygon<'a>> {
        match self {
            Geometry::Polygon(polygon) => Some(polygon),
            _ => None,
        }
    }

    /// The stored type code.
    pub fn type_code(&self) -> i32 {
        match self {
            Geometry::Null => ShapeType::Null.code(),
            Geometry::Polygon(_) => ShapeType::Polygon.code(),
            Geometry::Unsupported(code) => *code,
        }
    }

    pub fn into_owned(self) -> Geometry<'static> {
        match self {
            Geometry::Null => Geometry::Null,
            Geometry::Polygon(polygon) => Geometry::Polygon(polygon.into_owned()),
            Geometry::Unsupported(code) => Geometry::Unsupported(code),
        }
    }
}

/// Decode one record body.
///
/// Error offsets are relative to `body`.
pub fn decode_shape(body: &[u8]) -> ShpResult<Geometry<'_>> {
    let code = read_i32_le(body, 0)?;
    match ShapeType::from_code(code) {
        Some(ShapeType::Null) => Ok(Geometry::Null),
        Some(ShapeType::Polygon) => decode_polygon(body).map(Geometry::Polygon),
        _ => Ok(Geometry::Unsupported(code)),
    }
}

fn decode_polygon(body: &[u8]) -> ShpResult<Polygon<'_>> {
    take(body, 0, POLYGON_FIXED_LEN)?;

    let bbox = BoundingBox {
        min_x: read_f64_le(body, 4)?,
        min_y: read_f64_le(body, 12)?,
        max_x: read_f64_le(body, 20)?,
        max_y: read_f64_le(body, 28)?,
    };
    let num_parts = read_count(body, 36, "parts")?;
    let num_points = read_count(body, 40, "points")?;

    let overflow = ShpError::Truncated {
        offset: POLYGON_FIXED_LEN,
        needed: usize::MAX,
        available: body.len() - POLYGON_FIXED_LEN,
    };
    let parts_len = num_parts.checked_mul(size_of::<i32>()).ok_or(overflow.clone())?;
    let coords = num_points.checked_mul(2).ok_or(overflow.clone())?;
    let points_len = coords.checked_mul(size_of::<f64>()).ok_or(overflow.clone())?;
    let arrays_len = parts_len.checked_add(points_len).ok_or(overflow)?;

    if body.len() - POLYGON_FIXED_LEN < arrays_len {
        return Err(ShpError::Truncated {
            offset: POLYGON_FIXED_LEN,
            needed: arrays_len,
            available: body.len() - POLYGON_FIXED_LEN,
        });
    }

    let parts = acquire_view::<i32>(body, POLYGON_FIXED_LEN, num_parts)?;
    let points = acquire_view::<f64>(body, POLYGON_FIXED_LEN + parts_len, coords)?;

    Ok(Polygon { bbox, parts, points })
}

fn read_count(body: &[u8], offset: usize, field: &'static str) -> ShpResult<usize> {
    let value = read_i32_le(body, offset)?;
    usize::try_from(value).map_err(|_| ShpError::NegativeCount {
        field,
        value,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shp::fixture::polygon_body;

    fn polygon(parts: &[i32], points: &[f64]) -> Polygon<'static> {
        Polygon {
            bbox: BoundingBox::default(),
            parts: parts.to_vec().into(),
            points: points.to_vec().into(),
        }
    }

    #[test]
    fn test_decode_polygon_fields() {
        let points = [0.0, 0.0, 4.0, 0.0, 4.0, 3.0, 0.0, 0.0];
        let body = polygon_body(&[0], &points);
        let geometry = decode_shape(&body).unwrap();

        let polygon = geometry.as_polygon().unwrap();
        assert_eq!(geometry.type_code(), 5);
        assert_eq!(
            polygon.bbox,
            BoundingBox {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 4.0,
                max_y: 3.0
            }
        );
        assert_eq!(&polygon.parts[..], &[0]);
        assert_eq!(&polygon.points[..], &points[..]);
        assert_eq!(polygon.num_points(), 4);
        assert_eq!(polygon.point(2), Some((4.0, 3.0)));
        assert_eq!(polygon.point(4), None);
    }

    #[test]
    fn test_null_shape() {
        let body = 0i32.to_le_bytes();
        assert_eq!(decode_shape(&body).unwrap(), Geometry::Null);
    }

    #[test]
    fn test_unsupported_shape_keeps_code() {
        let mut body = 3i32.to_le_bytes().to_vec();
        body.extend_from_slice(&[0u8; 40]);
        assert_eq!(decode_shape(&body).unwrap(), Geometry::Unsupported(3));
        assert_eq!(decode_shape(&77i32.to_le_bytes()).unwrap(), Geometry::Unsupported(77));
    }

    #[test]
    fn test_empty_body_is_truncated() {
        assert!(matches!(
            decode_shape(&[]),
            Err(ShpError::Truncated { offset: 0, needed: 4, .. })
        ));
    }

    #[test]
    fn test_short_arrays_are_truncated() {
        let body = polygon_body(&[0], &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        let cut = &body[..body.len() - 8];
        assert_eq!(
            decode_shape(cut),
            Err(ShpError::Truncated {
                offset: POLYGON_FIXED_LEN,
                needed: 4 + 48,
                available: 4 + 40
            })
        );
    }

    #[test]
    fn test_short_fixed_part_is_truncated() {
        let body = polygon_body(&[0], &[0.0, 0.0]);
        assert!(matches!(
            decode_shape(&body[..30]),
            Err(ShpError::Truncated { offset: 0, needed: 44, .. })
        ));
    }

    #[test]
    fn test_negative_counts() {
        let mut body = polygon_body(&[0], &[0.0, 0.0]);
        body[40..44].copy_from_slice(&(-2i32).to_le_bytes());
        assert_eq!(
            decode_shape(&body),
            Err(ShpError::NegativeCount {
                field: "points",
                value: -2,
                offset: 40
            })
        );
    }

    #[test]
    fn test_huge_counts_do_not_read_out_of_bounds() {
        let mut body = polygon_body(&[0], &[0.0, 0.0]);
        body[36..40].copy_from_slice(&i32::MAX.to_le_bytes());
        body[40..44].copy_from_slice(&i32::MAX.to_le_bytes());
        assert!(matches!(decode_shape(&body), Err(ShpError::Truncated { .. })));
    }

    #[test]
    fn test_last_part_runs_to_end() {
        let polygon = polygon(&[0, 5, 9], &[0.0; 22]);
        assert_eq!(polygon.part_range(0), Some(0..5));
        assert_eq!(polygon.part_range(1), Some(5..9));
        assert_eq!(polygon.part_range(2), Some(9..11));
        assert!(polygon.has_consistent_parts());

        let lens: Vec<usize> = polygon.rings().map(|r| r.len()).collect();
        assert_eq!(lens, vec![10, 8, 4]);
    }

    #[test]
    fn test_inconsistent_parts() {
        assert!(!polygon(&[1, 2], &[0.0; 8]).has_consistent_parts());
        assert!(!polygon(&[0, 3, 2], &[0.0; 8]).has_consistent_parts());
        assert!(!polygon(&[0, 9], &[0.0; 8]).has_consistent_parts());
        assert!(!polygon(&[], &[0.0; 2]).has_consistent_parts());
        assert!(polygon(&[], &[]).has_consistent_parts());

        let bad = polygon(&[0, 3, 2], &[0.0; 8]);
        assert_eq!(bad.part_range(1), None);
        assert_eq!(bad.rings().count(), 2);
    }
}
