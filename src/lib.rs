//! Linesplice: span-addressed line replacement with atomic writes.
//!
//! This library removes a contiguous range of lines from a text file and
//! inserts a replacement block in their place, leaving every other byte
//! unchanged and replacing the file via temp file + rename.

#![warn(missing_docs)]
// env_logger is used by src/main.rs (binary), not this library
#![expect(unused_crate_dependencies)]

pub mod cli;
pub mod document;
pub mod error;
pub mod patch;

/// Re-export common error types for convenience.
pub use error::{Result, SpliceError};

/// Re-export the document model for convenience.
pub use document::{Document, Line, Span};

/// Re-export the splice engine entry points.
pub use patch::{apply_edit, persist, preview_edit, splice, EditRequest};

/// Linesplice version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
