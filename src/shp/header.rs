//! The fixed 100-byte file header.

use tracing::debug;
use zerocopy::{BE, F64, I32, LE, U32};
use zerocopy_derive::{FromBytes as DeriveFromBytes, Immutable, KnownLayout, Unaligned};

use super::error::{ShpError, ShpResult};
use super::shape::BoundingBox;
use super::types::ShapeType;
use crate::common::binary::read_at;

/// Length of the file header; records start right after it.
pub const HEADER_LEN: usize = 100;

/// File code every `.shp` file starts with.
pub const FILE_CODE: i32 = 0x0000_270A;

/// On-disk header layout (100 bytes).
///
/// Code and length are big-endian, the rest little-endian.
#[derive(Debug, Clone, Copy, DeriveFromBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct RawHeader {
    /// File code (9994)
    file_code: I32<BE>,
    /// Five unused words
    _unused: [U32<BE>; 5],
    /// File length in 16-bit words, header included
    file_length: U32<BE>,
    /// Version (1000)
    version: I32<LE>,
    /// Shape type of the records in the file
    shape_type: I32<LE>,
    /// Xmin, Ymin, Xmax, Ymax, Zmin, Zmax, Mmin, Mmax
    bbox: [F64<LE>; 8],
}

const _: () = assert!(size_of::<RawHeader>() == HEADER_LEN);

/// File-wide bounds, including the Z and M ranges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingBoxZm {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
    pub min_m: f64,
    pub max_m: f64,
}

impl BoundingBoxZm {
    /// The X/Y rectangle.
    pub fn xy(&self) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        }
    }
}

/// Decoded file header.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ShapefileHeader {
    pub file_code: i32,
    /// Declared file length in bytes (the stored word count doubled)
    pub declared_byte_length: usize,
    pub version: i32,
    /// Raw shape type hint for the whole file
    pub shape_type: i32,
    pub bbox: BoundingBoxZm,
}

impl ShapefileHeader {
    /// Decode and validate the header at the start of `data`.
    ///
    /// # Errors
    ///
    /// - [`ShpError::TooSmall`] if `data` is shorter than [`HEADER_LEN`]
    /// - [`ShpError::BadMagic`] if the file code is not [`FILE_CODE`]
    pub fn parse(data: &[u8]) -> ShpResult<Self> {
        let raw: RawHeader =
            read_at(data, 0).map_err(|_| ShpError::TooSmall { length: data.len() })?;

        let file_code = raw.file_code.get();
        if file_code != FILE_CODE {
            return Err(ShpError::BadMagic { found: file_code });
        }

        let [min_x, min_y, max_x, max_y, min_z, max_z, min_m, max_m] = raw.bbox.map(|v| v.get());
        let header = Self {
            file_code,
            declared_byte_length: (raw.file_length.get() as usize).saturating_mul(2),
            version: raw.version.get(),
            shape_type: raw.shape_type.get(),
            bbox: BoundingBoxZm {
                min_x,
                min_y,
                max_x,
                max_y,
                min_z,
                max_z,
                min_m,
                max_m,
            },
        };

        debug!(
            version = header.version,
            shape_type = header.shape_type,
            declared = header.declared_byte_length,
            actual = data.len(),
            "parsed shapefile header"
        );
        if header.declared_byte_length > data.len() {
            debug!("declared file length exceeds the buffer; expect a truncated record");
        }

        Ok(header)
    }

    /// The file's shape type hint, if it is a code the format defines.
    pub fn shape_kind(&self) -> Option<ShapeType> {
        ShapeType::from_code(self.shape_type)
    }
}
