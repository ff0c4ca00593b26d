//! Linesplice error types.
//!
//! All errors are typed and provide root cause information.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for splice operations.
#[derive(Error, Debug)]
pub enum SpliceError {
    /// Target file does not exist.
    #[error("File not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Permission or I/O error while reading.
    #[error("Failed to read {path}: {source}")]
    ReadFailure {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-8.
    #[error("File {path} is not valid UTF-8 (invalid byte sequence at offset {offset})")]
    DecodeFailure {
        /// The file that failed to decode.
        path: PathBuf,
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },

    /// Span does not address lines of the document.
    #[error("Invalid span [{start}, {end}] for document with {line_count} lines: {reason}")]
    InvalidSpan {
        /// Requested start line (zero-based).
        start: i64,
        /// Requested end line (zero-based, inclusive).
        end: i64,
        /// Number of lines in the document, when known.
        line_count: usize,
        /// Which bound was violated.
        reason: &'static str,
    },

    /// Temporary file creation, write, sync or rename failed.
    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        /// The file that was being replaced.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File content changed since the caller computed its span.
    #[error("Content of {path} changed: expected sha256 {expected}, found {actual}")]
    StaleContent {
        /// The target file.
        path: PathBuf,
        /// Hash the caller expected.
        expected: String,
        /// Hash actually found on disk.
        actual: String,
    },

    /// Edit configuration file is malformed.
    #[error("Invalid edit config: {message}")]
    InvalidEditConfig {
        /// The schema validation error message.
        message: String,
    },
}

impl SpliceError {
    /// Build the error for an I/O failure while reading `path`.
    ///
    /// `NotFound` is split out so callers can tell a typo from a permission problem.
    pub fn from_read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            SpliceError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SpliceError::ReadFailure {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Stable identifier for the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            SpliceError::NotFound { .. } => "NotFound",
            SpliceError::ReadFailure { .. } => "ReadFailure",
            SpliceError::DecodeFailure { .. } => "DecodeFailure",
            SpliceError::InvalidSpan { .. } => "InvalidSpan",
            SpliceError::WriteFailure { .. } => "WriteFailure",
            SpliceError::StaleContent { .. } => "StaleContent",
            SpliceError::InvalidEditConfig { .. } => "InvalidEditConfig",
        }
    }

    /// Path involved in the failure, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            SpliceError::NotFound { path }
            | SpliceError::ReadFailure { path, .. }
            | SpliceError::DecodeFailure { path, .. }
            | SpliceError::WriteFailure { path, .. }
            | SpliceError::StaleContent { path, .. } => Some(path),
            SpliceError::InvalidSpan { .. } | SpliceError::InvalidEditConfig { .. } => None,
        }
    }

    /// Remediation hint for the operator.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SpliceError::NotFound { .. } => Some(
                "Check the path; relative paths resolve from the working directory or the edit file",
            ),
            SpliceError::DecodeFailure { .. } => Some("Targets and replacement sources must be UTF-8 text"),
            SpliceError::InvalidSpan { .. } => Some(
                "Spans are zero-based and inclusive; run `linesplice show` to inspect line indices",
            ),
            SpliceError::StaleContent { .. } => {
                Some("Re-read the file and recompute the span before retrying")
            }
            SpliceError::WriteFailure { .. } => {
                Some("The original file was left unchanged; check directory permissions and free space")
            }
            SpliceError::ReadFailure { .. } | SpliceError::InvalidEditConfig { .. } => None,
        }
    }
}

/// Result type alias for splice operations.
pub type Result<T> = std::result::Result<T, SpliceError>;
