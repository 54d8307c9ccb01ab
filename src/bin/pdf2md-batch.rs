//! CLI binary for pdf2md-batch.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`
//! and prints one status line per file.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2md_batch::{
    run_batch, BatchConfig, BatchProgressCallback, BatchStats, ConversionOutcome,
    ConverterCommand, OutputLayout, ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── Console reporter ─────────────────────────────────────────────────────────

/// Prints every status line through one sink: above the progress bar when
/// it is drawn, otherwise to stdout.
struct ConsoleReporter {
    bar: Option<ProgressBar>,
}

impl ConsoleReporter {
    fn new(show_bar: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {pos:>3}/{len} files  \
                     ⏱ {elapsed_precise}  ETA {eta_precise}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.set_prefix("Converting");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self { bar })
    }

    fn line(&self, msg: impl AsRef<str>) {
        match &self.bar {
            // A hidden bar (stderr is not a terminal) swallows println.
            Some(bar) if !bar.is_hidden() => bar.println(msg.as_ref()),
            _ => println!("{}", msg.as_ref()),
        }
    }
}

impl BatchProgressCallback for ConsoleReporter {
    fn on_batch_start(&self, total_files: usize) {
        if total_files == 0 {
            self.line("⚠️ No PDF files found, check the input path");
            if let Some(ref bar) = self.bar {
                bar.finish_and_clear();
            }
            return;
        }
        if let Some(ref bar) = self.bar {
            bar.set_length(total_files as u64);
            bar.reset_eta();
        }
        self.line(format!(
            "🔍 Found {total_files} PDF files, starting conversion..."
        ));
    }

    fn on_file_start(&self, input: &Path) {
        if let Some(ref bar) = self.bar {
            bar.set_message(input.display().to_string());
        }
    }

    fn on_file_complete(&self, outcome: &ConversionOutcome) {
        self.line(outcome.to_string());
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, stats: &BatchStats) {
        self.line("🎉 All files processed!");
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        let failed = stats.unsuccessful();
        eprintln!(
            "   {} converted  /  {} failed  —  {}ms total",
            green(&stats.succeeded.to_string()),
            if failed == 0 {
                dim("0")
            } else {
                red(&failed.to_string())
            },
            stats.total_duration_ms,
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every PDF under ./papers into ./markdown (4 workers)
  pdf2md-batch ./papers ./markdown

  # Keep the input subdirectory structure
  pdf2md-batch --layout mirror ./papers ./markdown

  # More workers, longer timeout, retry failed files twice
  pdf2md-batch -w 8 --timeout 900 --max-retries 2 ./papers ./markdown

  # Run the converter through python
  pdf2md-batch --converter python3 --converter-arg=-m --converter-arg=mineru ./papers ./out

  # Machine-readable report; fail the run if any file failed
  pdf2md-batch --json --strict ./papers ./markdown > report.json

CONVERTER CONTRACT:
  <converter> [converter-args...] convert --input <pdf> --output <md> --format markdown
  Exit 0 means success; anything else is reported with the captured stderr.

ENVIRONMENT VARIABLES:
  PDF2MD_BATCH_INPUT       Input directory
  PDF2MD_BATCH_OUTPUT      Output directory
  PDF2MD_BATCH_CONVERTER   Converter program (default: mineru)
  PDF2MD_BATCH_WORKERS     Concurrent conversions (default: 4)
  PDF2MD_BATCH_TIMEOUT     Per-file timeout in seconds (default: 300)
  RUST_LOG                 Override the log filter
"#;

/// Batch-convert a directory of PDFs to Markdown with an external converter.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md-batch",
    version,
    about = "Batch-convert a directory tree of PDFs to Markdown with an external converter",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory searched recursively for *.pdf files.
    #[arg(env = "PDF2MD_BATCH_INPUT")]
    input_dir: PathBuf,

    /// Directory the Markdown files are written to.
    #[arg(env = "PDF2MD_BATCH_OUTPUT")]
    output_dir: PathBuf,

    /// Converter program to run for each file.
    #[arg(long, env = "PDF2MD_BATCH_CONVERTER", default_value = pdf2md_batch::config::DEFAULT_CONVERTER)]
    converter: String,

    /// Argument placed before `convert` (repeatable).
    #[arg(long = "converter-arg", allow_hyphen_values = true)]
    converter_args: Vec<String>,

    /// Number of files converted concurrently.
    #[arg(short, long, env = "PDF2MD_BATCH_WORKERS", default_value_t = pdf2md_batch::config::DEFAULT_WORKERS)]
    workers: usize,

    /// Per-file converter timeout in seconds.
    #[arg(long, env = "PDF2MD_BATCH_TIMEOUT", default_value_t = pdf2md_batch::config::DEFAULT_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Output layout: flat (all files in the output root) or mirror (keep subdirectories).
    #[arg(long, env = "PDF2MD_BATCH_LAYOUT", value_enum, default_value = "flat")]
    layout: LayoutArg,

    /// Retries per file after a converter failure or timeout.
    #[arg(long, env = "PDF2MD_BATCH_MAX_RETRIES", default_value_t = 0)]
    max_retries: u32,

    /// Exit non-zero if any file failed to convert.
    #[arg(long, env = "PDF2MD_BATCH_STRICT")]
    strict: bool,

    /// Print the batch report as JSON instead of status lines.
    #[arg(long, env = "PDF2MD_BATCH_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2MD_BATCH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MD_BATCH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2MD_BATCH_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum LayoutArg {
    Flat,
    Mirror,
}

impl From<LayoutArg> for OutputLayout {
    fn from(v: LayoutArg) -> Self {
        match v {
            LayoutArg::Flat => OutputLayout::Flat,
            LayoutArg::Mirror => OutputLayout::Mirror,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The status lines already cover every file, so library INFO logs are
    // only shown when the progress bar is off.
    let show_status = !cli.quiet && !cli.json;
    let show_progress = show_status && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let reporter: Option<ProgressCallback> = if show_status {
        Some(ConsoleReporter::new(show_progress) as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, reporter)?;

    // ── Run batch ────────────────────────────────────────────────────────
    let report = run_batch(&config).await;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    if cli.strict && !report.all_succeeded() {
        anyhow::bail!(
            "{}/{} files failed to convert",
            report.stats.unsuccessful(),
            report.stats.total_files
        );
    }

    Ok(())
}

/// Map CLI args to `BatchConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    let converter =
        ConverterCommand::new(cli.converter.clone()).with_prefix_args(cli.converter_args.clone());

    let mut builder = BatchConfig::builder(&cli.input_dir, &cli.output_dir)
        .converter(converter)
        .workers(cli.workers)
        .timeout_secs(cli.timeout)
        .layout(cli.layout.clone().into())
        .max_retries(cli.max_retries);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
