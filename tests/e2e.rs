//! End-to-end tests for pdf2md-batch.
//!
//! A real converter is not needed: each test writes a small `sh` script that
//! honours the converter command line
//! (`convert --input <pdf> --output <md> --format markdown`) and records or
//! fakes whatever the test needs. Unix only.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture
#![cfg(unix)]

use assert_cmd::Command;
use pdf2md_batch::{
    run_batch, BatchConfig, BatchProgressCallback, BatchStats, ConversionOutcome,
    ConverterCommand, OutputLayout,
};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Scratch tree: `in/a.pdf`, `in/sub/b.PDF`, `in/notes.txt`.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(input.join("sub")).unwrap();
        fs::write(input.join("a.pdf"), b"%PDF-1.4").unwrap();
        fs::write(input.join("sub/b.PDF"), b"%PDF-1.4").unwrap();
        fs::write(input.join("notes.txt"), b"not a pdf").unwrap();
        Self { dir }
    }

    fn input(&self) -> PathBuf {
        self.dir.path().join("in")
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn log(&self) -> PathBuf {
        self.dir.path().join("invocations.log")
    }

    /// Write a converter stub; it appends its `--input` argument to the log
    /// before running `body`.
    fn stub(&self, body: &str) -> PathBuf {
        let script = self.dir.path().join("converter.sh");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"$3\" >> '{}'\n{}\n",
                self.log().display(),
                body
            ),
        )
        .unwrap();
        script
    }

    fn converter(&self, body: &str) -> ConverterCommand {
        ConverterCommand::new("sh").with_prefix_args([self.stub(body).to_string_lossy().into_owned()])
    }

    fn invocations(&self) -> Vec<String> {
        let mut lines: Vec<String> = fs::read_to_string(self.log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect();
        lines.sort();
        lines
    }
}

/// Records the order of batch events.
#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
    completions: AtomicUsize,
}

impl BatchProgressCallback for EventLog {
    fn on_batch_start(&self, total_files: usize) {
        self.events.lock().unwrap().push(format!("start {total_files}"));
    }

    fn on_file_complete(&self, outcome: &ConversionOutcome) {
        let name = outcome.input().file_name().unwrap().to_string_lossy().into_owned();
        self.events.lock().unwrap().push(format!("file {name}"));
    }

    fn on_batch_complete(&self, _stats: &BatchStats) {
        self.completions.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push("complete".into());
    }
}

fn cli() -> Command {
    Command::cargo_bin("pdf2md-batch").unwrap()
}

fn cli_for(fx: &Fixture, body: &str) -> Command {
    let mut cmd = cli();
    cmd.arg("--converter")
        .arg("sh")
        .arg(format!("--converter-arg={}", fx.stub(body).display()))
        .arg("--no-progress")
        .arg(fx.input())
        .arg(fx.output())
        .env_remove("RUST_LOG");
    cmd
}

// ── Library end-to-end ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_batch_converts_only_pdfs_and_completes_once() {
    let fx = Fixture::new();
    let events = Arc::new(EventLog::default());
    let config = BatchConfig::builder(fx.input(), fx.output())
        .converter(fx.converter("exit 0"))
        .progress_callback(events.clone())
        .build()
        .expect("valid config");

    let report = run_batch(&config).await;

    assert_eq!(
        fx.invocations(),
        vec![
            fx.input().join("a.pdf").display().to_string(),
            fx.input().join("sub/b.PDF").display().to_string(),
        ]
    );
    assert_eq!(report.stats.total_files, 2);
    assert_eq!(report.stats.succeeded, 2);
    assert!(report.all_succeeded());
    assert_eq!(events.completions.load(Ordering::SeqCst), 1);

    let events = events.events.lock().unwrap();
    assert_eq!(events.first().map(String::as_str), Some("start 2"));
    assert_eq!(events.last().map(String::as_str), Some("complete"));
    assert_eq!(events.iter().filter(|e| e.starts_with("file ")).count(), 2);
}

#[tokio::test]
async fn test_flat_layout_writes_into_output_root() {
    let fx = Fixture::new();
    let config = BatchConfig::builder(fx.input(), fx.output())
        .converter(fx.converter("echo converted > \"$5\""))
        .build()
        .unwrap();

    let report = run_batch(&config).await;

    assert_eq!(report.stats.succeeded, 2);
    assert!(fx.output().join("a.md").is_file());
    assert!(fx.output().join("b.md").is_file());
    assert!(!fx.output().join("sub").exists());
}

#[tokio::test]
async fn test_mirror_layout_keeps_subdirectories() {
    let fx = Fixture::new();
    let config = BatchConfig::builder(fx.input(), fx.output())
        .converter(fx.converter("echo converted > \"$5\""))
        .layout(OutputLayout::Mirror)
        .build()
        .unwrap();

    let report = run_batch(&config).await;

    assert_eq!(report.stats.succeeded, 2);
    assert!(fx.output().join("a.md").is_file());
    assert!(fx.output().join("sub/b.md").is_file());
}

#[tokio::test]
async fn test_failures_do_not_stop_the_batch() {
    let fx = Fixture::new();
    let config = BatchConfig::builder(fx.input(), fx.output())
        .converter(fx.converter("echo boom >&2\nexit 1"))
        .workers(1)
        .build()
        .unwrap();

    let report = run_batch(&config).await;

    assert_eq!(fx.invocations().len(), 2, "both files must be attempted");
    assert_eq!(report.stats.failed, 2);
    for outcome in &report.outcomes {
        assert!(outcome.to_string().contains("boom"), "got: {outcome}");
    }
}

#[tokio::test]
async fn test_workers_bound_concurrent_converters() {
    let fx = Fixture::new();
    for i in 0..6 {
        fs::write(fx.input().join(format!("extra{i}.pdf")), b"%PDF").unwrap();
    }
    let running = fx.dir.path().join("running");
    fs::create_dir_all(&running).unwrap();
    let peak = fx.dir.path().join("peak");
    // Each stub registers itself, records how many peers are running, then exits.
    let body = format!(
        "touch '{r}/'$$\nls '{r}' | wc -l >> '{p}'\nsleep 0.2\nrm '{r}/'$$",
        r = running.display(),
        p = peak.display()
    );
    let config = BatchConfig::builder(fx.input(), fx.output())
        .converter(fx.converter(&body))
        .workers(2)
        .build()
        .unwrap();

    let report = run_batch(&config).await;

    assert_eq!(report.stats.succeeded, 8);
    let max_seen = fs::read_to_string(&peak)
        .unwrap()
        .lines()
        .filter_map(|l| l.trim().parse::<usize>().ok())
        .max()
        .unwrap();
    assert!(max_seen <= 2, "saw {max_seen} converters at once");
}

// ── CLI ──────────────────────────────────────────────────────────────────────

#[test]
fn test_cli_prints_status_lines() {
    let fx = Fixture::new();
    cli_for(&fx, "exit 0")
        .assert()
        .success()
        .stdout(predicate::str::contains("🔍 Found 2 PDF files"))
        .stdout(predicate::str::contains("✅ Converted:").count(2))
        .stdout(predicate::str::contains("🎉 All files processed!").count(1))
        .stdout(predicate::str::contains("No PDF files found").not());
}

#[test]
fn test_cli_status_lines_share_stdout_with_progress_enabled() {
    // Without --no-progress the bar exists but is hidden (no terminal), so
    // every status line must still land on the same stream.
    let fx = Fixture::new();
    cli()
        .arg("--converter")
        .arg("sh")
        .arg(format!("--converter-arg={}", fx.stub("exit 0").display()))
        .arg(fx.input())
        .arg(fx.output())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicate::str::contains("🔍 Found 2 PDF files"))
        .stdout(predicate::str::contains("✅ Converted:").count(2))
        .stdout(predicate::str::contains("🎉 All files processed!").count(1))
        .stderr(predicate::str::contains("✅").not())
        .stderr(predicate::str::contains("🎉").not());
}

#[test]
fn test_cli_no_pdfs_warning_on_stdout_with_progress_enabled() {
    let fx = Fixture::new();
    let empty = fx.input().join("empty");
    fs::create_dir_all(&empty).unwrap();
    cli()
        .arg("--converter")
        .arg("sh")
        .arg(format!("--converter-arg={}", fx.stub("exit 0").display()))
        .arg(&empty)
        .arg(fx.output())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicate::str::contains("⚠️ No PDF files found"))
        .stderr(predicate::str::contains("No PDF files found").not());
}

#[test]
fn test_cli_exits_zero_even_when_every_file_fails() {
    let fx = Fixture::new();
    cli_for(&fx, "echo boom >&2\nexit 1")
        .assert()
        .success()
        .stdout(predicate::str::contains("❌ Conversion failed").count(2))
        .stdout(predicate::str::contains("boom"));
}

#[test]
fn test_cli_strict_exits_non_zero_on_failure() {
    let fx = Fixture::new();
    cli_for(&fx, "exit 1")
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("2/2 files failed"));
}

#[test]
fn test_cli_warns_when_no_pdfs() {
    let dir = TempDir::new().unwrap();
    cli()
        .arg("--no-progress")
        .arg(dir.path().join("missing"))
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("⚠️ No PDF files found"))
        .stdout(predicate::str::contains("🎉").not());
}

#[test]
fn test_cli_json_report() {
    let fx = Fixture::new();
    let output = cli_for(&fx, "exit 0").arg("--json").output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(report["stats"]["total_files"], 2);
    assert_eq!(report["stats"]["succeeded"], 2);
    let statuses: Vec<&str> = report["outcomes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["success", "success"]);
}

#[test]
fn test_cli_timeout_flag_rejects_zero() {
    let fx = Fixture::new();
    cli_for(&fx, "exit 0").arg("--timeout").arg("0").assert().failure();
}
