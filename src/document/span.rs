//! Line spans.
//!
//! A [`Span`] is the caller's request: a closed range of zero-based line
//! indices. It is only turned into a usable range by [`Span::checked`], which
//! validates it against a concrete line count.

use crate::error::{Result, SpliceError};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// Closed range `[start, end]` of zero-based line indices.
///
/// Bounds are signed so that negative input reaches validation and is
/// reported as [`SpliceError::InvalidSpan`] instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    start: i64,
    end: i64,
}

impl Span {
    /// Create a closed span from zero-based bounds.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Create a closed span from a half-open range `start..end_exclusive`.
    pub fn half_open(start: i64, end_exclusive: i64) -> Self {
        Self::new(start, end_exclusive.saturating_sub(1))
    }

    /// Create a closed span from one-based inclusive bounds, as shown by editors.
    pub fn from_one_based(start: i64, end: i64) -> Self {
        Self::new(start.saturating_sub(1), end.saturating_sub(1))
    }

    /// A span covering a single line.
    pub fn single(line: i64) -> Self {
        Self::new(line, line)
    }

    /// Requested start line.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Requested end line (inclusive).
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Validate against a document with `line_count` lines.
    ///
    /// Requires `0 <= start <= end < line_count`. Nothing is clamped.
    pub fn checked(&self, line_count: usize) -> Result<RangeInclusive<usize>> {
        let reason = if self.start < 0 || self.end < 0 {
            Some("line indices must not be negative")
        } else if self.start > self.end {
            Some("start is after end")
        } else if self.end as u64 >= line_count as u64 {
            Some("end is past the last line")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SpliceError::InvalidSpan {
                start: self.start,
                end: self.end,
                line_count,
                reason,
            }),
            None => Ok(self.start as usize..=self.end as usize),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Error raised when span text cannot be parsed.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid span '{input}': expected START..=END, START..END, START,END or LINE")]
pub struct SpanParseError {
    input: String,
}

impl FromStr for Span {
    type Err = SpanParseError;

    /// Parse `A..=B` (closed), `A..B` (half-open), `A,B` (closed) or `A`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let input = s.trim();
        let err = || SpanParseError {
            input: s.to_string(),
        };
        let bound = |text: &str| text.trim().parse::<i64>().map_err(|_| err());

        if let Some((start, end)) = input.split_once("..=") {
            Ok(Span::new(bound(start)?, bound(end)?))
        } else if let Some((start, end)) = input.split_once("..") {
            Ok(Span::half_open(bound(start)?, bound(end)?))
        } else if let Some((start, end)) = input.split_once(',') {
            Ok(Span::new(bound(start)?, bound(end)?))
        } else {
            Ok(Span::single(bound(input)?))
        }
    }
}
