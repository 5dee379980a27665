use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{DubbingError, DubbingResult};

const STDERR_TAIL: usize = 800;

/// Runs an external tool to completion, killing it if `limit` elapses.
///
/// A non-zero exit is an error carrying the tail of stderr.
pub async fn run_tool<I, S>(program: &str, args: I, limit: Duration) -> DubbingResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| DubbingError::tool(program, format!("failed to spawn: {}", e)))?;

    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| DubbingError::tool(program, e.to_string()))?,
        Err(_) => {
            return Err(DubbingError::ToolTimeout {
                tool: program.to_string(),
                seconds: limit.as_secs(),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DubbingError::tool(
            program,
            format!("{}: {}", output.status, tail(stderr.trim(), STDERR_TAIL)),
        ));
    }

    Ok(output)
}

fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = count - max_chars;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
