//! Shpread - A Rust library for decoding ESRI Shapefile geometry
//!
//! This library decodes the main `.shp` file of a Shapefile into an ordered
//! list of shape records. The caller supplies the bytes; reading them from
//! disk or network is left to the caller.
//!
//! # Features
//!
//! - **Header validation**: file code, declared length, version and bounds
//! - **Polygon decoding**: bounding box, ring start indices and points
//! - **Zero-copy parsing**: parts and points borrow the input buffer when its
//!   alignment allows it, and are decoded element by element otherwise
//! - **Bounds checking**: every declared length is checked against the real
//!   buffer before it is read
//! - **Explicit diagnostics**: unsupported records are reported through a
//!   [`shp::DiagnosticSink`] instead of being printed
//!
//! # Example - Parsing a buffer
//!
//! ```no_run
//! use shpread::shp;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("countries.shp")?;
//! let result = shp::parse(&bytes)?;
//!
//! println!("version {}, shape type {}", result.version, result.shape_type);
//! for record in &result.shapes {
//!     if let Some(polygon) = record.geometry.as_polygon() {
//!         println!(
//!             "record {}: {} rings, {} points",
//!             record.record_number,
//!             polygon.num_parts(),
//!             polygon.num_points()
//!         );
//!     }
//! }
//! for notice in &result.notices {
//!     println!("note: {notice}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Collecting diagnostics yourself
//!
//! ```no_run
//! use shpread::shp::{self, Notice};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("mixed.shp")?;
//! let mut notices: Vec<Notice> = Vec::new();
//! let result = shp::parse_with_sink(&bytes, &mut notices)?;
//! println!("{} polygons, {} skipped", result.shapes.len(), notices.len());
//! # Ok(())
//! # }
//! ```

/// Shared binary readers and the crate-wide error type.
pub mod common;

/// ESRI Shapefile (.shp) decoder
///
/// Header parsing, record traversal, shape decoding and the buffer view
/// strategy used for the parts and points arrays.
pub mod shp;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use shp::{
    Geometry, Notice, ParseResult, Polygon, ShapeRecord, ShapeType, ShapefileHeader, ShpError,
    parse, parse_with_sink,
};
