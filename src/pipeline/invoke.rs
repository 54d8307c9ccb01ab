//! Converter invocation: run the external tool for one PDF.
//!
//! The converter is an opaque collaborator reached through a fixed command
//! line:
//!
//! ```text
//! <program> [prefix args...] convert --input <pdf> --output <md> --format markdown
//! ```
//!
//! Both output pipes are drained while the process runs so a chatty
//! converter cannot stall on a full pipe buffer. A run that outlives its
//! timeout is killed and reaped before this module returns; the child is also
//! marked `kill_on_drop` so a cancelled batch leaves no process behind.

use crate::config::ConverterCommand;
use crate::error::ConvertError;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Build the converter command line for one input/output pair.
pub fn build_command(converter: &ConverterCommand, input: &Path, output: &Path) -> Command {
    let mut cmd = Command::new(&converter.program);
    cmd.args(&converter.prefix_args)
        .arg("convert")
        .arg("--input")
        .arg(input)
        .arg("--output")
        .arg(output)
        .arg("--format")
        .arg("markdown")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// Run the converter once and wait for it, up to `timeout`.
///
/// # Errors
/// - [`ConvertError::Spawn`] if the program cannot be started or waited on
/// - [`ConvertError::CommandFailed`] on a non-zero exit, with captured stderr
/// - [`ConvertError::Timeout`] if the process was still running at the deadline
pub async fn run_converter(
    converter: &ConverterCommand,
    input: &Path,
    output: &Path,
    timeout: Duration,
) -> Result<(), ConvertError> {
    let mut cmd = build_command(converter, input, output);
    debug!("Spawning {:?}", cmd.as_std());

    let mut child = cmd.spawn().map_err(|source| ConvertError::Spawn {
        program: converter.program.clone(),
        source,
    })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let waited = tokio::time::timeout(timeout, async {
        tokio::join!(child.wait(), read_pipe(stdout), read_pipe(stderr))
    })
    .await;

    match waited {
        Ok((status, stdout, stderr)) => {
            let status = status.map_err(|source| ConvertError::Spawn {
                program: converter.program.clone(),
                source,
            })?;
            if !stdout.trim().is_empty() {
                debug!("{} stdout: {}", input.display(), stdout.trim_end());
            }
            if status.success() {
                Ok(())
            } else {
                Err(ConvertError::CommandFailed {
                    exit_code: status.code(),
                    stderr,
                })
            }
        }
        Err(_) => {
            if let Err(e) = child.kill().await {
                warn!(
                    "Failed to kill timed-out converter for {}: {}",
                    input.display(),
                    e
                );
            }
            Err(ConvertError::Timeout {
                secs: timeout.as_millis().div_ceil(1000) as u64,
            })
        }
    }
}

/// Drain a child pipe to a (lossily decoded) string.
async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let Some(mut pipe) = pipe else {
        return String::new();
    };
    let mut buf = Vec::new();
    if let Err(e) = pipe.read_to_end(&mut buf).await {
        debug!("Error reading converter output: {}", e);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
