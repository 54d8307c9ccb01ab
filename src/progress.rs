//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the batch discovers and converts files. The CLI uses this to print one
//! status line per file above its progress bar; library callers can forward
//! events anywhere.
//!
//! # Example
//!
//! ```rust
//! use pdf2md_batch::{BatchConfig, BatchProgressCallback, ConversionOutcome};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, outcome: &ConversionOutcome) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{outcome}");
//!     }
//! }
//!
//! let config = BatchConfig::builder("/in", "/out")
//!     .progress_callback(Arc::new(CountingCallback { done: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{BatchStats, ConversionOutcome};
use std::path::Path;
use std::sync::Arc;

/// Called by the batch driver as it processes each file.
///
/// Up to `workers` files are in flight at once, so `on_file_start` and
/// `on_file_complete` may be called concurrently from different tasks.
/// Implementations must protect shared mutable state themselves. All methods
/// default to no-ops.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery, before any file is converted.
    ///
    /// `total_files` is 0 when discovery found nothing; no other event
    /// follows in that case.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before the converter is spawned for `input`.
    fn on_file_start(&self, input: &Path) {
        let _ = input;
    }

    /// Called exactly once per file with its final outcome.
    fn on_file_complete(&self, outcome: &ConversionOutcome) {
        let _ = outcome;
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, stats: &BatchStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
