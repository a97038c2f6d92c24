//! ESRI Shapefile (.shp) geometry decoder.
//!
//! A `.shp` file is a 100-byte header followed by variable-length records.
//! [`parse`] validates the header, walks the records up to the length the
//! header declares, and decodes each record's shape. Polygons are kept;
//! null shapes and shape types this crate does not decode are skipped.
//!
//! # Architecture
//!
//! - [`header`]: the fixed file header
//! - [`record`]: forward-only traversal of the record headers
//! - [`shape`]: per-record shape decoding
//! - [`view`]: aligned/unaligned typed views over the buffer
//! - [`diagnostics`]: non-fatal notices and the sinks that receive them
//!
//! # Example
//!
//! ```no_run
//! use shpread::shp;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("states.shp")?;
//! let result = shp::parse(&bytes)?;
//! for (record, polygon) in result.polygons() {
//!     for ring in polygon.rings() {
//!         println!("record {}: ring of {} points", record.record_number, ring.len() / 2);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod error;
pub mod header;
pub mod record;
pub mod shape;
pub mod types;
pub mod view;

#[cfg(test)]
mod fixture;

pub use diagnostics::{DiagnosticSink, FnSink, NoopSink, Notice};
pub use error::{ShpError, ShpResult};
pub use header::{BoundingBoxZm, ShapefileHeader};
pub use record::{RawRecord, RecordIter};
pub use shape::{BoundingBox, Geometry, Polygon, decode_shape};
pub use types::ShapeType;
pub use view::View;

use tracing::{debug, trace, warn};

/// One decoded record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ShapeRecord<'a> {
    /// Record number as stored (1-based)
    pub record_number: i32,
    /// Content length in bytes
    pub content_length: usize,
    pub geometry: Geometry<'a>,
}

impl ShapeRecord<'_> {
    pub fn into_owned(self) -> ShapeRecord<'static> {
        ShapeRecord {
            record_number: self.record_number,
            content_length: self.content_length,
            geometry: self.geometry.into_owned(),
        }
    }
}

/// Everything a parse produces.
///
/// Borrows the input buffer; use [`ParseResult::into_owned`] to keep it longer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseResult<'a> {
    /// Decoded records, in file order
    pub shapes: Vec<ShapeRecord<'a>>,
    pub version: i32,
    /// Shape type hint from the file header
    pub shape_type: i32,
    pub header: ShapefileHeader,
    /// Non-fatal notices. Empty when the parse ran with a caller-supplied sink.
    pub notices: Vec<Notice>,
}

impl<'a> ParseResult<'a> {
    /// Records paired with their polygon.
    pub fn polygons(&self) -> impl Iterator<Item = (&ShapeRecord<'a>, &Polygon<'a>)> + '_ {
        self.shapes
            .iter()
            .filter_map(|record| Some((record, record.geometry.as_polygon()?)))
    }

    pub fn into_owned(self) -> ParseResult<'static> {
        ParseResult {
            shapes: self.shapes.into_iter().map(ShapeRecord::into_owned).collect(),
            version: self.version,
            shape_type: self.shape_type,
            header: self.header,
            notices: self.notices,
        }
    }
}

/// Parse a whole `.shp` buffer, collecting notices into [`ParseResult::notices`].
///
/// # Errors
///
/// Fails on a short or foreign header, and on any record whose declared
/// length or content runs past the data. No partial result is returned.
pub fn parse(data: &[u8]) -> ShpResult<ParseResult<'_>> {
    let mut notices: Vec<Notice> = Vec::new();
    let mut result = parse_with_sink(data, &mut notices)?;
    result.notices = notices;
    Ok(result)
}

/// Parse a whole `.shp` buffer, sending notices to `sink`.
pub fn parse_with_sink<'a, S>(data: &'a [u8], sink: &mut S) -> ShpResult<ParseResult<'a>>
where
    S: DiagnosticSink + ?Sized,
{
    let header = ShapefileHeader::parse(data)?;
    let mut shapes = Vec::new();
    let mut skipped = 0usize;

    for record in RecordIter::new(data, &header) {
        let record = record?;
        let geometry = decode_shape(record.body).map_err(|e| e.shifted(record.body_offset()))?;

        match geometry {
            Geometry::Null => {
                trace!(record_number = record.record_number, "null shape");
                skipped += 1;
            },
            Geometry::Unsupported(code) => {
                let kind = ShapeType::from_code(code);
                warn!(
                    record_number = record.record_number,
                    offset = record.offset,
                    code,
                    "ignoring unsupported shape type"
                );
                sink.notice(Notice::UnsupportedShapeType {
                    record_number: record.record_number,
                    offset: record.offset,
                    code,
                    kind,
                });
                skipped += 1;
            },
            Geometry::Polygon(polygon) => {
                if !polygon.has_consistent_parts() {
                    sink.notice(Notice::InconsistentParts {
                        record_number: record.record_number,
                        offset: record.offset,
                    });
                }
                shapes.push(ShapeRecord {
                    record_number: record.record_number,
                    content_length: record.content_length,
                    geometry: Geometry::Polygon(polygon),
                });
            },
        }
    }

    debug!(shapes = shapes.len(), skipped, "parsed shapefile");

    Ok(ParseResult {
        shapes,
        version: header.version,
        shape_type: header.shape_type,
        header,
        notices: Vec::new(),
    })
}
