//! Command-line interface for linesplice.
//!
//! This module handles argument parsing and output payloads only.
//! NO file operations are performed here.

use crate::document::Span;
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Linesplice: replace a range of lines in a file, atomically.
#[derive(Parser, Debug)]
#[command(name = "linesplice")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON payloads instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available linesplice commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Replace a span of lines with new content.
    Apply {
        /// Path to the file to edit.
        #[arg(short, long)]
        file: PathBuf,

        /// Lines to replace: START..=END, START..END, START,END or LINE (zero-based).
        #[arg(short, long, allow_hyphen_values = true)]
        span: Span,

        /// Path to file containing replacement content ("-" for stdin).
        #[arg(
            short = 'w',
            long = "with",
            value_name = "FILE",
            required_unless_present = "content",
            conflicts_with = "content"
        )]
        with_: Option<PathBuf>,

        /// Inline replacement content.
        #[arg(short, long, allow_hyphen_values = true)]
        content: Option<String>,

        /// Interpret span bounds as one-based line numbers.
        #[arg(long)]
        one_based: bool,

        /// Refuse to edit unless the file's SHA-256 matches.
        #[arg(long, value_name = "SHA256")]
        expect_hash: Option<String>,

        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply an edit described by a JSON file.
    Run {
        /// Path to the edit JSON file.
        #[arg(short, long)]
        config: PathBuf,

        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the lines inside a span with their indices.
    Show {
        /// Path to the file to inspect.
        #[arg(short, long)]
        file: PathBuf,

        /// Lines to print.
        #[arg(short, long, allow_hyphen_values = true)]
        span: Span,

        /// Interpret span bounds as one-based line numbers.
        #[arg(long)]
        one_based: bool,
    },

    /// Print the SHA-256 of a file, for use with --expect-hash.
    Hash {
        /// Path to the file to hash.
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Apply the `--one-based` flag to a parsed span.
pub fn effective_span(span: Span, one_based: bool) -> Span {
    if one_based {
        Span::from_one_based(span.start(), span.end())
    } else {
        span
    }
}

/// Parse command-line arguments.
///
/// Returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// JSON success payload for CLI responses.
#[derive(Serialize)]
pub struct CliSuccessPayload {
    /// Status indicator ("ok").
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CliSuccessPayload {
    /// Construct a payload with structured data.
    pub fn with_data(message: String, data: Value) -> Self {
        Self {
            status: "ok",
            message,
            data: Some(data),
        }
    }
}

/// JSON error payload for CLI responses.
#[derive(Serialize)]
pub struct CliErrorPayload {
    /// Status indicator ("error").
    pub status: &'static str,
    /// Structured error details.
    pub error: ErrorDetails,
}

/// Details for a CLI error payload.
#[derive(Serialize)]
pub struct ErrorDetails {
    /// Error kind identifier (InvalidSpan, etc.).
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional file context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Optional hint for remediation steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CliErrorPayload {
    /// Build payload from a SpliceError instance.
    pub fn from_error(error: &crate::SpliceError) -> Self {
        CliErrorPayload {
            status: "error",
            error: ErrorDetails {
                kind: error.kind(),
                message: error.to_string(),
                file: error
                    .file_path()
                    .map(|path| path.to_string_lossy().to_string()),
                hint: error.hint().map(|h| h.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpliceError;

    #[test]
    fn test_parse_apply_with_negative_span() {
        let cli = Cli::try_parse_from([
            "linesplice", "apply", "--file", "a.txt", "--span", "-1..=2", "--content", "x",
        ])
        .expect("parse");
        match cli.command {
            Commands::Apply { span, content, .. } => {
                assert_eq!(span, Span::new(-1, 2));
                assert_eq!(content.as_deref(), Some("x"));
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_apply_requires_replacement_source() {
        let result = Cli::try_parse_from(["linesplice", "apply", "--file", "a.txt", "--span", "1"]);
        assert!(result.is_err());

        let both = Cli::try_parse_from([
            "linesplice", "apply", "-f", "a.txt", "-s", "1", "-w", "r.txt", "-c", "x",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn test_effective_span_one_based() {
        assert_eq!(effective_span(Span::new(1, 3), true), Span::new(0, 2));
        assert_eq!(effective_span(Span::new(1, 3), false), Span::new(1, 3));
    }

    #[test]
    fn test_error_payload_shape() {
        let err = SpliceError::NotFound {
            path: PathBuf::from("src/page.svelte"),
        };
        let value = serde_json::to_value(CliErrorPayload::from_error(&err)).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["kind"], "NotFound");
        assert_eq!(value["error"]["file"], "src/page.svelte");
        assert!(value["error"]["hint"].is_string());
    }
}
