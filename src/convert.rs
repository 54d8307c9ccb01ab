//! Eager (whole-batch) conversion entry points.
//!
//! [`run_batch`] discovers every PDF, converts them through a pool of
//! `workers` concurrent converter processes, and returns only when all have
//! finished. Use [`crate::stream::run_batch_stream`] instead to consume
//! outcomes as they complete.

use crate::config::BatchConfig;
use crate::error::{BatchError, ConvertError};
use crate::output::{BatchReport, BatchStats, ConversionOutcome};
use crate::pipeline::{discover, invoke, layout};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Convert every PDF under `config.input_dir`.
///
/// Per-file failures never abort the batch; they show up as non-success
/// outcomes in the report (check `report.stats`). An input directory with no
/// PDFs, or one that does not exist, yields an empty report.
pub async fn run_batch(config: &BatchConfig) -> BatchReport {
    let total_start = Instant::now();
    info!(
        "Starting batch: {} -> {}",
        config.input_dir.display(),
        config.output_dir.display()
    );

    let files = discover::find_pdfs(&config.input_dir);
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(files.len());
    }
    if files.is_empty() {
        warn!("No PDF files found under {}", config.input_dir.display());
        return BatchReport::default();
    }
    info!(
        "Found {} PDF files, converting with {} workers",
        files.len(),
        config.workers
    );

    let outcomes = process_concurrent(&files, config).await;
    let stats = BatchStats::from_outcomes(&outcomes, total_start.elapsed().as_millis() as u64);

    info!(
        "Batch complete: {}/{} converted, {} failed, {} timed out, {} errors, {}ms total",
        stats.succeeded,
        stats.total_files,
        stats.failed,
        stats.timed_out,
        stats.errored,
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(&stats);
    }

    BatchReport { outcomes, stats }
}

/// Synchronous wrapper around [`run_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_batch_sync(config: &BatchConfig) -> Result<BatchReport, BatchError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| BatchError::Internal(format!("Failed to create tokio runtime: {}", e)))?;
    Ok(runtime.block_on(run_batch(config)))
}

/// Convert a single PDF and classify the result.
///
/// Never fails: every error is folded into the returned
/// [`ConversionOutcome`], which is also passed to the progress callback.
pub async fn convert_file(input: &Path, config: &BatchConfig) -> ConversionOutcome {
    let start = Instant::now();
    if let Some(ref cb) = config.progress_callback {
        cb.on_file_start(input);
    }

    let result = convert_with_retries(input, config).await;
    let outcome = ConversionOutcome::from_result(
        input.to_path_buf(),
        result,
        start.elapsed().as_millis() as u64,
    );

    match &outcome {
        ConversionOutcome::Success { output, .. } => {
            debug!("Converted {} -> {}", input.display(), output.display())
        }
        other => warn!("{}", other),
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_file_complete(&outcome);
    }
    outcome
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run files through `config.workers` concurrent conversions.
async fn process_concurrent(files: &[PathBuf], config: &BatchConfig) -> Vec<ConversionOutcome> {
    stream::iter(files.iter().map(|path| convert_file(path, config)))
        .buffer_unordered(config.workers)
        .collect()
        .await
}

/// Prepare the output directory, then invoke the converter, retrying
/// converter failures with exponential backoff when `max_retries > 0`.
async fn convert_with_retries(input: &Path, config: &BatchConfig) -> Result<PathBuf, ConvertError> {
    let output = layout::output_path(input, &config.input_dir, &config.output_dir, config.layout)?;
    if let Some(dir) = output.parent() {
        // create_dir_all tolerates the directory appearing concurrently.
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| ConvertError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
    }

    let mut attempt = 0;
    loop {
        match invoke::run_converter(&config.converter, input, &output, config.timeout).await {
            Ok(()) => return Ok(output),
            Err(e) if e.is_retryable() && attempt < config.max_retries => {
                attempt += 1;
                let backoff = backoff_ms(config.retry_backoff_ms, attempt);
                warn!(
                    "{}: retry {}/{} after {}ms ({})",
                    input.display(),
                    attempt,
                    config.max_retries,
                    backoff,
                    e
                );
                sleep(Duration::from_millis(backoff)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Delay before retry `attempt` (1-based): `base * 2^(attempt-1)`, saturating.
fn backoff_ms(base: u64, attempt: u32) -> u64 {
    base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}
