//! Non-fatal conditions found while parsing.
//!
//! The decoder never prints. Anything worth telling the caller that does not
//! abort the parse is turned into a [`Notice`] and handed to a
//! [`DiagnosticSink`].

use std::fmt;

use super::types::ShapeType;

/// A non-fatal condition met during a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Notice {
    /// A record whose shape type is not decoded was skipped.
    UnsupportedShapeType {
        record_number: i32,
        /// Offset of the record header in the file
        offset: usize,
        code: i32,
        /// The code's name, when the format defines it
        kind: Option<ShapeType>,
    },
    /// A polygon's part indices do not partition its points array.
    ///
    /// The polygon is still returned.
    InconsistentParts { record_number: i32, offset: usize },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::UnsupportedShapeType {
                record_number,
                offset,
                code,
                kind,
            } => match kind {
                Some(kind) => write!(
                    f,
                    "record {} at offset {}: ignoring shape type {}",
                    record_number, offset, kind
                ),
                None => write!(
                    f,
                    "record {} at offset {}: ignoring unknown shape type {}",
                    record_number, offset, code
                ),
            },
            Notice::InconsistentParts {
                record_number,
                offset,
            } => write!(
                f,
                "record {} at offset {}: part indices do not partition the points",
                record_number, offset
            ),
        }
    }
}

/// Receiver for [`Notice`]s.
pub trait DiagnosticSink {
    fn notice(&mut self, notice: Notice);
}

impl DiagnosticSink for Vec<Notice> {
    #[inline]
    fn notice(&mut self, notice: Notice) {
        self.push(notice);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    #[inline]
    fn notice(&mut self, notice: Notice) {
        (**self).notice(notice);
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    #[inline]
    fn notice(&mut self, _notice: Notice) {}
}

/// Adapts a closure into a sink.
///
/// ```
/// use shpread::shp::{DiagnosticSink, FnSink, Notice};
///
/// let mut seen = 0;
/// let mut sink = FnSink(|_: Notice| seen += 1);
/// sink.notice(Notice::InconsistentParts { record_number: 1, offset: 100 });
/// drop(sink);
/// assert_eq!(seen, 1);
/// ```
pub struct FnSink<F>(pub F);

impl<F: FnMut(Notice)> DiagnosticSink for FnSink<F> {
    #[inline]
    fn notice(&mut self, notice: Notice) {
        (self.0)(notice);
    }
}
