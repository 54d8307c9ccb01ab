//! Result types: one [`ConversionOutcome`] per file, gathered into a
//! [`BatchReport`] by the driver.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The classified result of converting one PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// The converter exited 0.
    Success {
        input: PathBuf,
        output: PathBuf,
        duration_ms: u64,
    },
    /// The converter exited non-zero; `stderr` is what it printed.
    CommandFailure {
        input: PathBuf,
        exit_code: Option<i32>,
        stderr: String,
    },
    /// The converter was killed after exceeding the timeout.
    Timeout { input: PathBuf, secs: u64 },
    /// Anything else: bad input path, output directory I/O, spawn failure.
    UnknownError {
        input: PathBuf,
        kind: String,
        message: String,
    },
}

impl ConversionOutcome {
    /// Classify the result of one conversion attempt.
    pub fn from_result(
        input: PathBuf,
        result: Result<PathBuf, ConvertError>,
        duration_ms: u64,
    ) -> Self {
        match result {
            Ok(output) => ConversionOutcome::Success {
                input,
                output,
                duration_ms,
            },
            Err(ConvertError::CommandFailed { exit_code, stderr }) => {
                ConversionOutcome::CommandFailure {
                    input,
                    exit_code,
                    stderr,
                }
            }
            Err(ConvertError::Timeout { secs }) => ConversionOutcome::Timeout { input, secs },
            Err(
                e @ (ConvertError::InvalidInput { .. }
                | ConvertError::Io { .. }
                | ConvertError::Spawn { .. }),
            ) => ConversionOutcome::UnknownError {
                input,
                kind: e.kind().to_string(),
                message: e.to_string(),
            },
        }
    }

    pub fn input(&self) -> &Path {
        match self {
            ConversionOutcome::Success { input, .. }
            | ConversionOutcome::CommandFailure { input, .. }
            | ConversionOutcome::Timeout { input, .. }
            | ConversionOutcome::UnknownError { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }
}

/// Renders the one console line (two for failures) reported per file.
impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionOutcome::Success { input, output, .. } => write!(
                f,
                "✅ Converted: {} -> {}",
                input.display(),
                output.display()
            ),
            ConversionOutcome::CommandFailure { input, stderr, .. } => write!(
                f,
                "❌ Conversion failed (command error): {}\nDetails: {}",
                input.display(),
                stderr.trim_end()
            ),
            ConversionOutcome::Timeout { input, .. } => {
                write!(f, "⏱️ Timed out: {}", input.display())
            }
            ConversionOutcome::UnknownError {
                input,
                kind,
                message,
            } => write!(
                f,
                "⚠️ Unknown error: {}\nKind: {}, details: {}",
                input.display(),
                kind,
                message
            ),
        }
    }
}

/// Aggregate counts for a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_files: usize,
    pub succeeded: usize,
    /// Converter exited non-zero.
    pub failed: usize,
    pub timed_out: usize,
    /// Unknown errors (I/O, spawn, invalid input).
    pub errored: usize,
    pub total_duration_ms: u64,
}

impl BatchStats {
    /// Tally a set of outcomes.
    pub fn from_outcomes(outcomes: &[ConversionOutcome], total_duration_ms: u64) -> Self {
        let mut stats = BatchStats {
            total_files: outcomes.len(),
            total_duration_ms,
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                ConversionOutcome::Success { .. } => stats.succeeded += 1,
                ConversionOutcome::CommandFailure { .. } => stats.failed += 1,
                ConversionOutcome::Timeout { .. } => stats.timed_out += 1,
                ConversionOutcome::UnknownError { .. } => stats.errored += 1,
            }
        }
        stats
    }

    /// Files that did not convert, for any reason.
    pub fn unsuccessful(&self) -> usize {
        self.failed + self.timed_out + self.errored
    }
}

/// Everything a batch run produced, in completion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<ConversionOutcome>,
    pub stats: BatchStats,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.stats.unsuccessful() == 0
    }
}
