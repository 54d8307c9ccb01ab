//! Configuration types for batch PDF-to-Markdown conversion.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. The configuration is assembled once at start-up
//! and never mutated afterwards; workers share it read-only.

use crate::error::BatchError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default converter program looked up on `PATH`.
pub const DEFAULT_CONVERTER: &str = "mineru";

/// Default number of conversions running at once.
pub const DEFAULT_WORKERS: usize = 4;

/// Default per-invocation wall-clock timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for a batch conversion.
///
/// # Example
/// ```rust
/// use pdf2md_batch::BatchConfig;
///
/// let config = BatchConfig::builder("/data/pdfs", "/data/markdown")
///     .workers(8)
///     .timeout_secs(600)
///     .build()
///     .unwrap();
/// assert_eq!(config.workers, 8);
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Root directory searched recursively for PDFs.
    pub input_dir: PathBuf,

    /// Root directory the Markdown files are written under.
    pub output_dir: PathBuf,

    /// External converter invocation. Default: `mineru`.
    pub converter: ConverterCommand,

    /// Number of files converted concurrently. Default: 4.
    ///
    /// Each worker blocks on its own converter process, so this is also the
    /// maximum number of converter processes alive at once.
    pub workers: usize,

    /// Wall-clock limit for a single converter run. Default: 300 s.
    ///
    /// A run that exceeds it is killed and reported as a timeout.
    pub timeout: Duration,

    /// Where output files land relative to the output root. Default: [`OutputLayout::Flat`].
    pub layout: OutputLayout,

    /// Extra attempts after a converter failure or timeout. Default: 0.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    pub retry_backoff_ms: u64,

    /// Optional per-file progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("converter", &self.converter)
            .field("workers", &self.workers)
            .field("timeout", &self.timeout)
            .field("layout", &self.layout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder with default settings for the given directories.
    pub fn builder(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: BatchConfig {
                input_dir: input_dir.into(),
                output_dir: output_dir.into(),
                converter: ConverterCommand::default(),
                workers: DEFAULT_WORKERS,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                layout: OutputLayout::default(),
                max_retries: 0,
                retry_backoff_ms: 500,
                progress_callback: None,
            },
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn converter(mut self, converter: ConverterCommand) -> Self {
        self.config.converter = converter;
        self
    }

    pub fn workers(mut self, n: usize) -> Self {
        self.config.workers = n.max(1);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = Duration::from_secs(secs);
        self
    }

    pub fn layout(mut self, layout: OutputLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, BatchError> {
        let c = &self.config;
        if c.timeout.is_zero() {
            return Err(BatchError::InvalidConfig(
                "Timeout must be greater than zero".into(),
            ));
        }
        if c.converter.program.trim().is_empty() {
            return Err(BatchError::InvalidConfig(
                "Converter program must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// The external converter and any arguments placed before `convert`.
///
/// The full command line is
/// `<program> [prefix_args...] convert --input <pdf> --output <md> --format markdown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterCommand {
    pub program: String,
    pub prefix_args: Vec<String>,
}

impl ConverterCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    pub fn with_prefix_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix_args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ConverterCommand {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER)
    }
}

/// How output paths are laid out under the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// Every `<stem>.md` is written directly into the output root. (default)
    ///
    /// Files with the same stem in different input subdirectories overwrite
    /// each other.
    #[default]
    Flat,
    /// The input subdirectory structure is recreated under the output root.
    Mirror,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let c = BatchConfig::builder("/in", "/out").build().unwrap();
        assert_eq!(c.converter.program, "mineru");
        assert!(c.converter.prefix_args.is_empty());
        assert_eq!(c.workers, 4);
        assert_eq!(c.timeout, Duration::from_secs(300));
        assert_eq!(c.layout, OutputLayout::Flat);
        assert_eq!(c.max_retries, 0);
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn workers_are_clamped_to_one() {
        let c = BatchConfig::builder("/in", "/out").workers(0).build().unwrap();
        assert_eq!(c.workers, 1);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = BatchConfig::builder("/in", "/out")
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Timeout"));
    }

    #[test]
    fn blank_converter_is_rejected() {
        let err = BatchConfig::builder("/in", "/out")
            .converter(ConverterCommand::new("  "))
            .build()
            .unwrap_err();
        assert!(matches!(err, BatchError::InvalidConfig(_)));
    }

    #[test]
    fn prefix_args_are_kept_in_order() {
        let cmd = ConverterCommand::new("python3").with_prefix_args(["-m", "mineru"]);
        assert_eq!(cmd.prefix_args, vec!["-m".to_string(), "mineru".to_string()]);
    }

    #[test]
    fn layout_serialises_lowercase() {
        let json = serde_json::to_string(&OutputLayout::Mirror).unwrap();
        assert_eq!(json, "\"mirror\"");
    }

    #[test]
    fn debug_hides_callback() {
        let c = BatchConfig::builder("/in", "/out")
            .progress_callback(std::sync::Arc::new(crate::progress::NoopProgressCallback))
            .build()
            .unwrap();
        assert!(format!("{c:?}").contains("<dyn BatchProgressCallback>"));
    }
}
