//! Builders for synthetic `.shp` buffers used by the tests.

use super::header::{FILE_CODE, HEADER_LEN};

/// Encode a polygon record body. The bounding box is computed from `points`.
pub(crate) fn polygon_body(parts: &[i32], points: &[f64]) -> Vec<u8> {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for xy in points.chunks_exact(2) {
        min_x = min_x.min(xy[0]);
        max_x = max_x.max(xy[0]);
        min_y = min_y.min(xy[1]);
        max_y = max_y.max(xy[1]);
    }
    if points.is_empty() {
        (min_x, min_y, max_x, max_y) = (0.0, 0.0, 0.0, 0.0);
    }

    let mut body = Vec::with_capacity(44 + parts.len() * 4 + points.len() * 8);
    body.extend_from_slice(&5i32.to_le_bytes());
    for v in [min_x, min_y, max_x, max_y] {
        body.extend_from_slice(&v.to_le_bytes());
    }
    body.extend_from_slice(&(parts.len() as i32).to_le_bytes());
    body.extend_from_slice(&((points.len() / 2) as i32).to_le_bytes());
    for part in parts {
        body.extend_from_slice(&part.to_le_bytes());
    }
    for v in points {
        body.extend_from_slice(&v.to_le_bytes());
    }
    body
}

/// Assembles a whole file from records.
#[derive(Debug, Clone)]
pub(crate) struct ShpBuilder {
    shape_type: i32,
    records: Vec<(i32, Vec<u8>)>,
    declared_words: Option<u32>,
}

impl ShpBuilder {
    pub(crate) fn new() -> Self {
        Self {
            shape_type: 5,
            records: Vec::new(),
            declared_words: None,
        }
    }

    pub(crate) fn shape_type(mut self, shape_type: i32) -> Self {
        self.shape_type = shape_type;
        self
    }

    /// Append a record with an arbitrary body. `body.len()` must be even.
    pub(crate) fn raw(mut self, record_number: i32, body: &[u8]) -> Self {
        self.records.push((record_number, body.to_vec()));
        self
    }

    pub(crate) fn polygon(self, record_number: i32, parts: &[i32], points: &[f64]) -> Self {
        let body = polygon_body(parts, points);
        self.raw(record_number, &body)
    }

    pub(crate) fn null(self, record_number: i32) -> Self {
        self.raw(record_number, &0i32.to_le_bytes())
    }

    /// A record of type `code` followed by `payload_len` zero bytes.
    pub(crate) fn other(self, record_number: i32, code: i32, payload_len: usize) -> Self {
        let mut body = code.to_le_bytes().to_vec();
        body.resize(4 + payload_len, 0);
        self.raw(record_number, &body)
    }

    /// Override the file length written in the header.
    pub(crate) fn declared_words(mut self, words: u32) -> Self {
        self.declared_words = Some(words);
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data[0..4].copy_from_slice(&FILE_CODE.to_be_bytes());
        data[28..32].copy_from_slice(&1000i32.to_le_bytes());
        data[32..36].copy_from_slice(&self.shape_type.to_le_bytes());

        for (record_number, body) in &self.records {
            data.extend_from_slice(&record_number.to_be_bytes());
            data.extend_from_slice(&((body.len() / 2) as u32).to_be_bytes());
            data.extend_from_slice(body);
        }

        let words = self.declared_words.unwrap_or((data.len() / 2) as u32);
        data[24..28].copy_from_slice(&words.to_be_bytes());
        data
    }
}

/// A copy of some bytes whose first byte sits `shift` bytes past an 8-byte boundary.
pub(crate) struct AlignedBuf {
    storage: Vec<u64>,
    shift: usize,
    len: usize,
}

impl AlignedBuf {
    pub(crate) fn new(bytes: &[u8], shift: usize) -> Self {
        use zerocopy::IntoBytes;

        let shift = shift % 8;
        let mut storage = vec![0u64; (bytes.len() + shift).div_ceil(8) + 1];
        storage.as_mut_slice().as_mut_bytes()[shift..shift + bytes.len()].copy_from_slice(bytes);
        Self {
            storage,
            shift,
            len: bytes.len(),
        }
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        use zerocopy::IntoBytes;

        &self.storage.as_slice().as_bytes()[self.shift..self.shift + self.len]
    }
}
