use super::EditRequest;
use crate::document::{read_text, Span};
use crate::error::{Result, SpliceError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EditSpec {
    file: String,
    start: i64,
    end: i64,
    #[serde(default)]
    content: Option<String>,
    #[serde(rename = "with", default)]
    with_file: Option<String>,
    #[serde(default)]
    expect_hash: Option<String>,
    #[serde(default)]
    one_based: bool,
}

/// Load a single edit from a JSON description.
///
/// Relative `file` and `with` paths are resolved against the directory
/// containing `edit_path`.
pub fn load_edit_from_file(edit_path: &Path) -> Result<EditRequest> {
    let contents = read_text(edit_path)?;
    let spec: EditSpec =
        serde_json::from_str(&contents).map_err(|err| SpliceError::InvalidEditConfig {
            message: format!("JSON parse error: {}", err),
        })?;

    if spec.file.trim().is_empty() {
        return Err(SpliceError::InvalidEditConfig {
            message: "'file' must not be empty".to_string(),
        });
    }

    let base_dir = edit_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let replacement = resolve_content(&base_dir, &spec)?;

    let span = if spec.one_based {
        Span::from_one_based(spec.start, spec.end)
    } else {
        Span::new(spec.start, spec.end)
    };

    Ok(EditRequest {
        file: resolve_path(&base_dir, &spec.file),
        span,
        replacement,
        expect_hash: spec.expect_hash,
    })
}

fn resolve_path(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Replacement text from `content` or the `with` file.
///
/// A missing or undecodable `with` file keeps its `NotFound` / `ReadFailure` /
/// `DecodeFailure` kind; only the field combination is a schema problem.
fn resolve_content(base_dir: &Path, spec: &EditSpec) -> Result<String> {
    match (&spec.content, &spec.with_file) {
        (Some(inline), None) => Ok(inline.to_string()),
        (None, Some(with_file)) => read_text(&resolve_path(base_dir, with_file)),
        (Some(_), Some(_)) => Err(SpliceError::InvalidEditConfig {
            message: "Specify only one of 'content' or 'with'".to_string(),
        }),
        (None, None) => Err(SpliceError::InvalidEditConfig {
            message: "Edit requires either 'content' or 'with' field".to_string(),
        }),
    }
}
