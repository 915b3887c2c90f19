//! Utilities for turning user-supplied paths into file entries.

use std::path::{Path, PathBuf};

use crate::error::{PdfOpsError, Result};
use crate::files::FileEntry;

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Patterns keep their relative order; the matches of one pattern come back
/// sorted by path. A plain path without glob characters is passed through
/// unchanged, so a missing file is reported when it is opened rather than
/// vanishing silently.
///
/// # Errors
///
/// - [`PdfOpsError::InvalidConfig`] for a malformed pattern
/// - [`PdfOpsError::FileNotFound`] for a pattern that matches nothing
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if is_glob_pattern(pattern) {
            resolved_paths.extend(collect_paths_for_pattern(pattern)?);
        } else {
            resolved_paths.push(PathBuf::from(pattern));
        }
    }

    Ok(resolved_paths)
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./scans/*.jpg"`
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|err| PdfOpsError::invalid_config(format!("Invalid pattern '{pattern}': {err}")))?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| PdfOpsError::Io(err.into_error()))?;
        if path.is_file() {
            resolved_paths.push(path);
        }
    }

    if resolved_paths.is_empty() {
        return Err(PdfOpsError::file_not_found(PathBuf::from(pattern)));
    }

    Ok(resolved_paths)
}

/// Parse the contents of an input-list file: one path per line.
///
/// Blank lines and lines starting with `#` are skipped. Surrounding
/// whitespace is trimmed.
///
/// # Errors
///
/// Returns [`PdfOpsError::InvalidInputList`] for a line containing a NUL byte.
pub fn parse_input_list(list_path: &Path, contents: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains('\0') {
            return Err(PdfOpsError::InvalidInputList {
                path: list_path.to_path_buf(),
                line_number: index + 1,
                details: "Path contains a NUL byte".to_string(),
            });
        }

        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}

/// Read and parse an input-list file.
///
/// # Errors
///
/// Returns [`PdfOpsError::FailedToReadInputList`] if the file cannot be read,
/// or any error from [`parse_input_list`].
pub async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PdfOpsError::FailedToReadInputList {
            path: path.to_path_buf(),
            source,
        })?;

    parse_input_list(path, &contents)
}

/// Build file entries for `paths`, in order.
///
/// # Errors
///
/// Fails on the first path that does not exist or is a directory.
pub fn entries_from_paths(paths: &[PathBuf]) -> Result<Vec<FileEntry>> {
    paths.iter().map(FileEntry::from_path).collect()
}
