//! Line-addressed view of a text file.
//!
//! A [`Document`] holds the full file content in a [`Rope`] built with only
//! line feed recognised as a line break, so `\r\n` lines keep their `\r` as
//! ordinary content and every byte round-trips unchanged.

mod span;

use crate::error::{Result, SpliceError};
use ropey::Rope;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub use span::{Span, SpanParseError};

/// Ordered sequence of lines read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    rope: Rope,
}

/// A single line of a [`Document`], including its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    index: usize,
    raw: Cow<'a, str>,
}

impl<'a> Line<'a> {
    /// Zero-based position in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw text including the terminator.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Text without the terminator.
    pub fn content(&self) -> &str {
        &self.raw[..self.raw.len() - self.terminator().len()]
    }

    /// `"\r\n"`, `"\n"`, or `""` for an unterminated final line.
    pub fn terminator(&self) -> &'static str {
        if self.raw.ends_with("\r\n") {
            "\r\n"
        } else if self.raw.ends_with('\n') {
            "\n"
        } else {
            ""
        }
    }
}

impl Document {
    /// Build a document from in-memory text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    pub(crate) fn from_rope(rope: Rope) -> Self {
        Self { rope }
    }

    pub(crate) fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Read `path` in full.
    ///
    /// # Errors
    /// * `NotFound` - the path does not exist
    /// * `ReadFailure` - the path is not a regular file, or reading failed
    /// * `DecodeFailure` - the content is not valid UTF-8
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        let document = Self::from_text(&text);
        log::debug!(
            "Loaded {} ({} lines, {} bytes)",
            path.display(),
            document.len(),
            document.len_bytes()
        );
        Ok(document)
    }

    /// Number of lines.
    ///
    /// A trailing line feed ends the last line rather than starting an empty
    /// one, so `"a\n"` has one line and `""` has none.
    pub fn len(&self) -> usize {
        let lines = self.rope.len_lines();
        if self.rope.line(lines - 1).len_chars() == 0 {
            lines - 1
        } else {
            lines
        }
    }

    /// True when the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Total size in bytes.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Line at `index`, if present.
    pub fn line(&self, index: usize) -> Option<Line<'_>> {
        if index >= self.len() {
            return None;
        }
        Some(Line {
            index,
            raw: Cow::from(self.rope.line(index)),
        })
    }

    /// All lines in order.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> + '_ {
        (0..self.len()).filter_map(move |index| self.line(index))
    }

    /// Lines inside a validated span.
    pub fn lines_in(&self, span: Span) -> Result<Vec<Line<'_>>> {
        let range = span.checked(self.len())?;
        Ok(range.filter_map(|index| self.line(index)).collect())
    }

    /// Stream the exact content into `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for chunk in self.rope.chunks() {
            writer.write_all(chunk.as_bytes())?;
        }
        writer.flush()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

/// Read a UTF-8 text file in full.
///
/// Shared by document loading and replacement sources so that every entry
/// point reports the same error kinds.
///
/// # Errors
/// * `NotFound` - the path does not exist
/// * `ReadFailure` - the path is not a regular file, or reading failed
/// * `DecodeFailure` - the content is not valid UTF-8
pub fn read_text(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| SpliceError::from_read(path, e))?;
    if !metadata.is_file() {
        return Err(SpliceError::ReadFailure {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    let bytes = fs::read(path).map_err(|e| SpliceError::from_read(path, e))?;
    decode_text(path, bytes)
}

/// Decode bytes read from `path` as UTF-8.
pub fn decode_text(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| SpliceError::DecodeFailure {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })
}

/// Count lines in `text` using the same rule as [`Document::len`].
pub fn count_lines(text: &str) -> usize {
    text.split_inclusive('\n').count()
}
