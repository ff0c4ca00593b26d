//! Span-addressed line splicing with atomic writes.
//!
//! This module provides the splice engine:
//! - [`splice`]: pure remove-and-insert over a [`Document`]
//! - [`persist`]: atomic file replacement (write temp + fsync + rename)
//! - [`apply_edit`] / [`preview_edit`]: load, guard, splice, and persist (or not)

mod atomic;
mod edit_loader;

use crate::document::{count_lines, Document, Line, Span};
use crate::error::{Result, SpliceError};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub use atomic::persist;
pub use edit_loader::load_edit_from_file;

/// A single line splice to perform on a file.
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// File to edit.
    pub file: PathBuf,
    /// Lines to remove.
    pub span: Span,
    /// Block inserted in place of the span.
    pub replacement: String,
    /// SHA-256 the file must have before editing.
    pub expect_hash: Option<String>,
}

impl EditRequest {
    /// Create a request without a content guard.
    pub fn new(file: PathBuf, span: Span, replacement: impl Into<String>) -> Self {
        Self {
            file,
            span,
            replacement: replacement.into(),
            expect_hash: None,
        }
    }

    /// Require the file to hash to `hash` before it is edited.
    pub fn with_expected_hash(mut self, hash: impl Into<String>) -> Self {
        self.expect_hash = Some(hash.into());
        self
    }
}

/// Result summary for an applied edit.
#[derive(Debug, Clone, Serialize)]
pub struct EditSummary {
    /// Path of the edited file.
    pub file: PathBuf,
    /// First removed line (zero-based).
    pub span_start: usize,
    /// Last removed line (zero-based, inclusive).
    pub span_end: usize,
    /// Number of lines removed.
    pub lines_removed: usize,
    /// Number of lines inserted.
    pub lines_added: usize,
    /// Line count before the edit.
    pub lines_before: usize,
    /// Line count after the edit.
    pub lines_after: usize,
    /// SHA-256 before the edit.
    pub before_hash: String,
    /// SHA-256 after the edit.
    pub after_hash: String,
}

/// Preview metadata describing what an edit would change.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    /// The file that would be edited.
    pub file: String,
    /// 1-based line number where the change begins.
    pub line_start: usize,
    /// 1-based line number where the change ends.
    pub line_end: usize,
    /// Number of lines added by the edit.
    pub lines_added: usize,
    /// Number of lines removed by the edit.
    pub lines_removed: usize,
    /// Number of bytes inserted.
    pub bytes_added: usize,
    /// Number of bytes removed.
    pub bytes_removed: usize,
    /// Text that would be removed.
    pub removed: String,
    /// Text that would be inserted.
    pub inserted: String,
    /// SHA-256 of the file as it is now.
    pub current_hash: String,
}

struct Spliced<'a> {
    document: Document,
    range: RangeInclusive<usize>,
    removed: String,
    inserted: Cow<'a, str>,
}

/// Replace the lines in `span` with `replacement`.
///
/// Returns `document[..start] + replacement + document[end + 1..]`. Lines
/// outside the span are carried over byte for byte; `document` itself is not
/// modified.
///
/// A non-empty replacement that does not end in a line feed receives the
/// terminator of the last removed line, so it never merges with the line
/// after the span. An empty replacement deletes the span.
///
/// # Errors
/// * `InvalidSpan` - `start > end`, a negative bound, or `end` past the last line
pub fn splice(document: &Document, span: Span, replacement: &str) -> Result<Document> {
    splice_parts(document, span, replacement).map(|spliced| spliced.document)
}

fn splice_parts<'a>(document: &Document, span: Span, replacement: &'a str) -> Result<Spliced<'a>> {
    let range = span.checked(document.len())?;
    let (first, last) = (*range.start(), *range.end());

    let rope = document.rope();
    let start_char = rope.line_to_char(first);
    let end_char = rope.line_to_char(last + 1);

    let last_removed = document
        .line(last)
        .ok_or(SpliceError::InvalidSpan {
            start: span.start(),
            end: span.end(),
            line_count: document.len(),
            reason: "end is past the last line",
        })?;
    let inserted = terminated_block(replacement, &last_removed);
    let removed = rope.slice(start_char..end_char).to_string();

    let mut edited = rope.clone();
    edited.remove(start_char..end_char);
    edited.insert(start_char, &inserted);

    log::debug!(
        "Spliced lines {}..={}: removed {} lines, inserted {}",
        first,
        last,
        last - first + 1,
        count_lines(&inserted)
    );

    Ok(Spliced {
        document: Document::from_rope(edited),
        range,
        removed,
        inserted,
    })
}

fn terminated_block<'a>(replacement: &'a str, last_removed: &Line<'_>) -> Cow<'a, str> {
    if replacement.is_empty() || replacement.ends_with('\n') {
        return Cow::Borrowed(replacement);
    }
    match last_removed.terminator() {
        "" => Cow::Borrowed(replacement),
        terminator => Cow::Owned(format!("{}{}", replacement, terminator)),
    }
}

/// Load, splice, and atomically rewrite the file named by `request`.
///
/// Either the file is fully rewritten or it is left exactly as it was.
///
/// # Errors
/// * `NotFound`, `ReadFailure`, `DecodeFailure` - from loading
/// * `StaleContent` - `expect_hash` does not match the current file
/// * `InvalidSpan` - raised before anything is written
/// * `WriteFailure` - the original file was left untouched
pub fn apply_edit(request: &EditRequest) -> Result<EditSummary> {
    let original = Document::load(&request.file)?;
    let before_hash = content_hash(&original);
    check_expected_hash(request, &before_hash)?;

    let spliced = splice_parts(&original, request.span, &request.replacement)?;
    persist(&spliced.document, &request.file)?;

    let after_hash = content_hash(&spliced.document);
    Ok(EditSummary {
        file: request.file.clone(),
        span_start: *spliced.range.start(),
        span_end: *spliced.range.end(),
        lines_removed: spliced.range.clone().count(),
        lines_added: count_lines(&spliced.inserted),
        lines_before: original.len(),
        lines_after: spliced.document.len(),
        before_hash,
        after_hash,
    })
}

/// Compute what [`apply_edit`] would do without writing anything.
pub fn preview_edit(request: &EditRequest) -> Result<PreviewReport> {
    let original = Document::load(&request.file)?;
    let current_hash = content_hash(&original);
    check_expected_hash(request, &current_hash)?;

    let spliced = splice_parts(&original, request.span, &request.replacement)?;
    Ok(PreviewReport {
        file: request.file.to_string_lossy().into_owned(),
        line_start: spliced.range.start() + 1,
        line_end: spliced.range.end() + 1,
        lines_added: count_lines(&spliced.inserted),
        lines_removed: spliced.range.clone().count(),
        bytes_added: spliced.inserted.len(),
        bytes_removed: spliced.removed.len(),
        removed: spliced.removed,
        inserted: spliced.inserted.into_owned(),
        current_hash,
    })
}

/// SHA-256 of the document's bytes, lowercase hex.
pub fn content_hash(document: &Document) -> String {
    let mut hasher = Sha256::new();
    for chunk in document.rope().chunks() {
        hasher.update(chunk.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// SHA-256 of a file on disk, for computing an `expect_hash` guard.
pub fn file_hash(path: &Path) -> Result<String> {
    Document::load(path).map(|document| content_hash(&document))
}

fn check_expected_hash(request: &EditRequest, actual: &str) -> Result<()> {
    match &request.expect_hash {
        Some(expected) if !expected.trim().eq_ignore_ascii_case(actual) => {
            Err(SpliceError::StaleContent {
                path: request.file.clone(),
                expected: expected.trim().to_string(),
                actual: actual.to_string(),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn numbered(count: usize) -> Document {
        let text: String = (0..count).map(|i| format!("line {}\n", i)).collect();
        Document::from_text(&text)
    }

    #[test]
    fn test_splice_replaces_middle() {
        let doc = Document::from_text("a\nb\nc\nd\n");
        let out = splice(&doc, Span::new(1, 2), "X\n").expect("splice");
        assert_eq!(out.to_string(), "a\nX\nd\n");
        assert_eq!(doc.to_string(), "a\nb\nc\nd\n", "input must stay intact");
    }

    #[test]
    fn test_splice_empty_replacement_deletes() {
        let doc = Document::from_text("a\nb\nc\n");
        let out = splice(&doc, Span::single(1), "").expect("splice");
        assert_eq!(out.to_string(), "a\nc\n");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_splice_adds_terminator_from_removed_line() {
        let doc = Document::from_text("a\r\nb\r\nc\r\n");
        let out = splice(&doc, Span::single(1), "B").expect("splice");
        assert_eq!(out.to_string(), "a\r\nB\r\nc\r\n");
    }

    #[test]
    fn test_splice_unterminated_last_line_stays_unterminated() {
        let doc = Document::from_text("a\nb");
        let out = splice(&doc, Span::single(1), "z").expect("splice");
        assert_eq!(out.to_string(), "a\nz");
    }

    #[test]
    fn test_splice_whole_document() {
        let doc = numbered(3);
        let out = splice(&doc, Span::new(0, 2), "only\n").expect("splice");
        assert_eq!(out.to_string(), "only\n");
    }

    #[test]
    fn test_splice_rejects_bad_spans_before_work() {
        let doc = numbered(4);
        for span in [Span::new(2, 1), Span::new(0, 4), Span::new(-1, 0)] {
            assert!(matches!(
                splice(&doc, span, "x\n"),
                Err(SpliceError::InvalidSpan { .. })
            ));
        }
    }

    #[test]
    fn test_apply_edit_summary() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("file.txt");
        fs::write(&path, "0\n1\n2\n3\n4\n").expect("Failed to write file");

        let summary = apply_edit(&EditRequest::new(path.clone(), Span::new(1, 3), "new\n"))
            .expect("apply");

        assert_eq!(fs::read_to_string(&path).unwrap(), "0\nnew\n4\n");
        assert_eq!(summary.span_start, 1);
        assert_eq!(summary.span_end, 3);
        assert_eq!(summary.lines_removed, 3);
        assert_eq!(summary.lines_added, 1);
        assert_eq!(summary.lines_before, 5);
        assert_eq!(summary.lines_after, 3);
        assert_ne!(summary.before_hash, summary.after_hash);
        assert_eq!(summary.after_hash, file_hash(&path).unwrap());
    }

    #[test]
    fn test_apply_edit_rejects_stale_hash() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("file.txt");
        fs::write(&path, "a\nb\n").expect("Failed to write file");

        let request =
            EditRequest::new(path.clone(), Span::single(0), "z\n").with_expected_hash("deadbeef");
        assert!(matches!(
            apply_edit(&request),
            Err(SpliceError::StaleContent { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_apply_edit_accepts_matching_hash_any_case() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("file.txt");
        fs::write(&path, "a\nb\n").expect("Failed to write file");

        let hash = file_hash(&path).unwrap().to_uppercase();
        let request = EditRequest::new(path.clone(), Span::single(0), "z\n").with_expected_hash(hash);
        apply_edit(&request).expect("apply with matching hash");
        assert_eq!(fs::read_to_string(&path).unwrap(), "z\nb\n");
    }

    #[test]
    fn test_preview_does_not_write() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("file.txt");
        fs::write(&path, "a\nb\nc\n").expect("Failed to write file");

        let report = preview_edit(&EditRequest::new(path.clone(), Span::new(1, 2), "x\ny\nz"))
            .expect("preview");

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
        assert_eq!(report.line_start, 2);
        assert_eq!(report.line_end, 3);
        assert_eq!(report.lines_removed, 2);
        assert_eq!(report.lines_added, 3);
        assert_eq!(report.removed, "b\nc\n");
        assert_eq!(report.inserted, "x\ny\nz\n");
        assert_eq!(report.bytes_removed, 4);
        assert_eq!(report.bytes_added, 6);
    }
}
