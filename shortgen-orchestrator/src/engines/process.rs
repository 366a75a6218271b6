//! External process execution
//!
//! Runs engine binaries (ffmpeg, whisper.cpp, the renderer) to completion and
//! turns a non-zero exit into an error carrying the tail of stderr.

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Longest stderr excerpt kept in an error message
const STDERR_TAIL: usize = 2000;

/// Runs `program` with `args` and returns its stdout
pub async fn run<I, S>(program: &str, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!("Executing process: {:?}", cmd.as_std());

    let output = cmd
        .output()
        .await
        .with_context(|| format!("Failed to execute '{}'", program))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !stderr.trim().is_empty() {
        debug!("{} stderr: {}", program, stderr.trim());
    }

    if !output.status.success() {
        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        anyhow::bail!(
            "'{}' exited with {}: {}",
            program,
            code,
            tail(stderr.trim(), STDERR_TAIL)
        );
    }

    Ok(stdout)
}

fn tail(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
