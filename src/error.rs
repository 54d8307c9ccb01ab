//! Error types for the pdf2md-batch library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BatchError`] — **Fatal**: the batch cannot start at all (invalid
//!   configuration, no async runtime). Returned as `Err(BatchError)` from the
//!   config builder and the blocking entry point.
//!
//! * [`ConvertError`] — **Non-fatal**: a single file failed (converter exited
//!   non-zero, hung past its timeout, could not be spawned) but every other
//!   file is unaffected. It never escapes the single-file boundary; it is
//!   folded into a [`crate::output::ConversionOutcome`] so one bad PDF cannot
//!   stop the rest of the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by the pdf2md-batch library.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a single file's conversion did not succeed.
///
/// The set is closed so callers can match exhaustively; see
/// [`crate::output::ConversionOutcome::from_result`] for how each variant is
/// surfaced.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input path has no file stem to name the Markdown output after.
    #[error("input path has no file name: '{}'", path.display())]
    InvalidInput { path: PathBuf },

    /// Creating the output directory failed.
    #[error("failed to create output directory '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter process could not be started or waited on.
    #[error("failed to run converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran and exited non-zero.
    #[error("converter exited with {}: {stderr}", describe_exit(*exit_code))]
    CommandFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The converter did not finish within the configured timeout.
    #[error("converter timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl ConvertError {
    /// Stable category name, shown as the "kind" of unknown errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::InvalidInput { .. } => "InvalidInput",
            ConvertError::Io { .. } => "IoError",
            ConvertError::Spawn { .. } => "SpawnError",
            ConvertError::CommandFailed { .. } => "CommandFailed",
            ConvertError::Timeout { .. } => "Timeout",
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Only failures of the converter itself qualify; a missing binary or an
    /// unwritable output directory will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ConvertError::CommandFailed { .. } | ConvertError::Timeout { .. }
        )
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "a signal".to_string(),
    }
}
