//! Linesplice CLI binary
//!
//! The CLI is a thin adapter over the library APIs - NO splice logic is implemented here.

use linesplice::cli::{effective_span, CliErrorPayload, CliSuccessPayload, Commands};
use linesplice::document::{self, Document, Span};
use linesplice::patch::{self, EditRequest};
use linesplice::SpliceError;
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = linesplice::cli::parse_args();

    // Initialize logger if verbose
    if cli.verbose {
        env_logger::init();
    }

    // Execute command
    let result = match cli.command {
        Commands::Apply {
            file,
            span,
            with_: replacement_file,
            content,
            one_based,
            expect_hash,
            dry_run,
        } => read_replacement(replacement_file.as_deref(), content).and_then(|replacement| {
            let mut request = EditRequest::new(file, effective_span(span, one_based), replacement);
            request.expect_hash = expect_hash;
            execute_edit(&request, dry_run)
        }),

        Commands::Run { config, dry_run } => {
            patch::load_edit_from_file(&config).and_then(|request| execute_edit(&request, dry_run))
        }

        Commands::Show {
            file,
            span,
            one_based,
        } => execute_show(&file, effective_span(span, one_based)),

        Commands::Hash { file } => patch::file_hash(&file).map(|hash| {
            let message = format!("{}  {}", hash, file.display());
            (message, json!({ "file": file, "sha256": hash }))
        }),
    };

    // Handle result
    match result {
        Ok((message, data)) => {
            if cli.json {
                print_json(&CliSuccessPayload::with_data(message, data));
            } else {
                println!("{}", message);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.json {
                print_json(&CliErrorPayload::from_error(&e));
            } else {
                eprintln!("Error: {}", e);
                if let Some(hint) = e.hint() {
                    eprintln!("Hint: {}", hint);
                }
            }
            ExitCode::from(1)
        }
    }
}

/// Resolve replacement text from `--with FILE`, `--with -`, or `--content`.
fn read_replacement(
    replacement_file: Option<&Path>,
    content: Option<String>,
) -> Result<String, SpliceError> {
    match (replacement_file, content) {
        (_, Some(inline)) => Ok(inline),
        (Some(path), None) if path == Path::new("-") => {
            let stdin = Path::new("<stdin>");
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .map_err(|e| SpliceError::from_read(stdin, e))?;
            document::decode_text(stdin, buffer)
        }
        (Some(path), None) => document::read_text(path),
        (None, None) => Err(SpliceError::InvalidEditConfig {
            message: "Either --with or --content is required".to_string(),
        }),
    }
}

/// Execute an edit, or preview it when `dry_run` is set.
fn execute_edit(request: &EditRequest, dry_run: bool) -> Result<(String, Value), SpliceError> {
    if dry_run {
        let report = patch::preview_edit(request)?;
        let message = format!(
            "Would replace lines {}-{} of '{}' ({} removed, {} added)",
            report.line_start,
            report.line_end,
            report.file,
            report.lines_removed,
            report.lines_added
        );
        return Ok((message, to_value(&report)));
    }

    let summary = patch::apply_edit(request)?;
    let message = format!(
        "Spliced '{}' lines {}..={} ({} removed, {} added; hash: {} -> {})",
        summary.file.display(),
        summary.span_start,
        summary.span_end,
        summary.lines_removed,
        summary.lines_added,
        summary.before_hash,
        summary.after_hash
    );
    Ok((message, to_value(&summary)))
}

/// Print the lines in `span` with their zero-based indices.
fn execute_show(file: &Path, span: Span) -> Result<(String, Value), SpliceError> {
    let document = Document::load(file)?;
    let lines = document.lines_in(span)?;

    let width = lines
        .last()
        .map(|line| line.index().to_string().len())
        .unwrap_or(1);
    let message = lines
        .iter()
        .map(|line| format!("{:>width$}| {}", line.index(), line.content(), width = width))
        .collect::<Vec<_>>()
        .join("\n");
    let data = Value::Array(
        lines
            .iter()
            .map(|line| json!({ "index": line.index(), "text": line.raw() }))
            .collect(),
    );
    Ok((message, data))
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn print_json<T: serde::Serialize>(payload: &T) {
    match serde_json::to_string_pretty(payload) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize output: {}", e),
    }
}
