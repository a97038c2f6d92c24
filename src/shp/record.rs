//! Record traversal.
//!
//! After the header the file is a run of records, each an 8-byte big-endian
//! header (record number, content length in 16-bit words) followed by the
//! content. The walk stops at the length declared in the file header, not at
//! the end of the buffer.

use std::iter::FusedIterator;

use tracing::trace;
use zerocopy::{BE, I32, U32};
use zerocopy_derive::{FromBytes as DeriveFromBytes, Immutable, KnownLayout, Unaligned};

use super::error::ShpResult;
use super::header::{HEADER_LEN, ShapefileHeader};
use crate::common::binary::{read_at, take};

/// Length of a record header.
pub const RECORD_HEADER_LEN: usize = 8;

/// On-disk record header (8 bytes, big-endian)
#[derive(Debug, Clone, Copy, DeriveFromBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct RawRecordHeader {
    record_number: I32<BE>,
    content_length: U32<BE>,
}

const _: () = assert!(size_of::<RawRecordHeader>() == RECORD_HEADER_LEN);

/// One record located in the buffer, before its content is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Offset of the record header in the file
    pub offset: usize,
    /// Record number as stored (1-based)
    pub record_number: i32,
    /// Content length in bytes
    pub content_length: usize,
    /// The record content
    pub body: &'a [u8],
}

impl RawRecord<'_> {
    /// Offset of the record content in the file.
    #[inline]
    pub fn body_offset(&self) -> usize {
        self.offset + RECORD_HEADER_LEN
    }
}

/// Forward-only iterator over the records of a `.shp` buffer.
///
/// Yields an error at most once; the iterator is exhausted afterwards.
#[derive(Debug, Clone)]
pub struct RecordIter<'a> {
    data: &'a [u8],
    cursor: usize,
    end: usize,
    failed: bool,
}

impl<'a> RecordIter<'a> {
    /// Walk the records of `data`, which must start with `header`.
    pub fn new(data: &'a [u8], header: &ShapefileHeader) -> Self {
        Self {
            data,
            cursor: HEADER_LEN,
            end: header.declared_byte_length,
            failed: false,
        }
    }

    /// Offset of the next record header.
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn read_record(&self) -> ShpResult<RawRecord<'a>> {
        let offset = self.cursor;
        let raw: RawRecordHeader = read_at(self.data, offset)?;

        let body_offset = offset + RECORD_HEADER_LEN;
        let content_length = (raw.content_length.get() as usize).saturating_mul(2);
        let body = take(self.data, body_offset, content_length)?;

        Ok(RawRecord {
            offset,
            record_number: raw.record_number.get(),
            content_length,
            body,
        })
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = ShpResult<RawRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.end {
            return None;
        }

        match self.read_record() {
            Ok(record) => {
                trace!(
                    record_number = record.record_number,
                    offset = record.offset,
                    content_length = record.content_length,
                    "record"
                );
                self.cursor = record.body_offset() + record.content_length;
                Some(Ok(record))
            },
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            },
        }
    }
}

impl FusedIterator for RecordIter<'_> {}
