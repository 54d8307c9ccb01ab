//! Streaming batch API: emit outcomes as files finish.
//!
//! Unlike the eager [`crate::convert::run_batch`], which returns only after
//! every file is done, [`run_batch_stream`] yields each
//! [`ConversionOutcome`] as soon as its converter exits. Outcomes arrive in
//! completion order, not discovery order.

use crate::config::BatchConfig;
use crate::convert::convert_file;
use crate::output::ConversionOutcome;
use crate::pipeline::discover;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-file outcomes.
pub type OutcomeStream = Pin<Box<dyn Stream<Item = ConversionOutcome> + Send>>;

/// Discover PDFs and convert them lazily, `config.workers` at a time.
///
/// Discovery runs eagerly and fires `on_batch_start`; conversion only starts
/// when the stream is polled. `on_batch_complete` is not fired since the
/// caller decides when the batch is over.
///
/// # Example
/// ```rust,no_run
/// use futures::StreamExt;
/// use pdf2md_batch::{run_batch_stream, BatchConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BatchConfig::builder("/data/pdfs", "/data/markdown").build()?;
/// let mut outcomes = run_batch_stream(&config);
/// while let Some(outcome) = outcomes.next().await {
///     println!("{outcome}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn run_batch_stream(config: &BatchConfig) -> OutcomeStream {
    let files = discover::find_pdfs(&config.input_dir);
    info!(
        "Starting streaming batch: {} PDFs under {}",
        files.len(),
        config.input_dir.display()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(files.len());
    }

    let workers = config.workers;
    let config = Arc::new(config.clone());
    let s = stream::iter(files.into_iter().map(move |path| {
        let cfg = Arc::clone(&config);
        async move { convert_file(&path, &cfg).await }
    }))
    .buffer_unordered(workers);

    Box::pin(s)
}
