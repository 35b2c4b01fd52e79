//! Byte-offset spans into source text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `[start, end)` into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: u32,
    pub end: u32,
}

impl TextSpan {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        TextSpan { start, end }
    }

    /// Create a span from a start offset and a length.
    #[inline]
    pub const fn at(start: u32, len: u32) -> Self {
        TextSpan {
            start,
            end: start + len,
        }
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True when `offset` lies inside the span (end exclusive).
    #[inline]
    pub const fn contains(self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True when `other` lies entirely inside this span.
    #[inline]
    pub const fn contains_span(self, other: TextSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Spans intersect when they overlap or touch. An empty span at the edge
    /// of another span intersects it.
    #[inline]
    pub const fn intersects_with(self, other: TextSpan) -> bool {
        other.start <= self.end && other.end >= self.start
    }

    /// Spans overlap only when they share at least one byte.
    #[inline]
    pub const fn overlaps_with(self, other: TextSpan) -> bool {
        let start = if self.start > other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end < other.end {
            self.end
        } else {
            other.end
        };
        start < end
    }

    /// Shift the span by a signed delta. Saturates at zero.
    #[inline]
    pub fn shifted(self, delta: i64) -> Self {
        let shift = |v: u32| (i64::from(v) + delta).max(0) as u32;
        TextSpan::new(shift(self.start), shift(self.end))
    }

    /// Slice `text` with this span, if it is in bounds.
    pub fn slice(self, text: &str) -> Option<&str> {
        text.get(self.start as usize..self.end as usize)
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

#[cfg(test)]
#[path = "../tests/span_tests.rs"]
mod span_tests;
