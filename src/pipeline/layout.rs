//! Output path derivation.
//!
//! [`OutputLayout::Flat`] takes the input's directory relative to itself,
//! which is always empty, so every Markdown file lands directly in the output
//! root. [`OutputLayout::Mirror`] takes it relative to the input root instead
//! and recreates the subdirectory structure.

use crate::config::OutputLayout;
use crate::error::ConvertError;
use std::path::{Path, PathBuf};

/// Compute `<output_root>/<relative_dir>/<stem>.md` for `input`.
pub fn output_path(
    input: &Path,
    input_root: &Path,
    output_root: &Path,
    layout: OutputLayout,
) -> Result<PathBuf, ConvertError> {
    let stem = input
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConvertError::InvalidInput {
            path: input.to_path_buf(),
        })?;

    let relative_dir = match layout {
        OutputLayout::Flat => PathBuf::new(),
        OutputLayout::Mirror => input
            .parent()
            .and_then(|parent| parent.strip_prefix(input_root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let mut file_name = stem.to_os_string();
    file_name.push(".md");
    Ok(output_root.join(relative_dir).join(file_name))
}
