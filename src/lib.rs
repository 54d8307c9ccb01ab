//! # pdf2md-batch
//!
//! Batch-convert a directory tree of PDF documents to Markdown by running an
//! external converter (by default [MinerU](https://github.com/opendatalab/MinerU)'s
//! `mineru` command) once per file, several files at a time.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input dir
//!  │
//!  ├─ 1. Discover  every *.pdf (any case), recursively
//!  ├─ 2. Layout    <output>/<stem>.md, output directory created on demand
//!  ├─ 3. Invoke    mineru convert --input … --output … --format markdown
//!  │               (N workers, per-file timeout, captured stderr)
//!  └─ 4. Report    one outcome per file + batch stats
//! ```
//!
//! One file failing, hanging, or refusing to spawn never stops the others:
//! each becomes a [`ConversionOutcome`] in the final [`BatchReport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2md_batch::{run_batch, BatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder("/data/pdfs", "/data/markdown")
//!         .workers(4)
//!         .build()?;
//!     let report = run_batch(&config).await;
//!     for outcome in &report.outcomes {
//!         println!("{outcome}");
//!     }
//!     eprintln!("{}/{} converted", report.stats.succeeded, report.stats.total_files);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md-batch` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BatchConfig, BatchConfigBuilder, ConverterCommand, OutputLayout};
pub use convert::{convert_file, run_batch, run_batch_sync};
pub use error::{BatchError, ConvertError};
pub use output::{BatchReport, BatchStats, ConversionOutcome};
pub use pipeline::discover::find_pdfs;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{run_batch_stream, OutcomeStream};
