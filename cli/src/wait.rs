//! Waiting for the analysis tool to finish writing its transcript.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaitError {
    #[error("timed out after {}s waiting for {}", .timeout.as_secs(), .path.display())]
    TimedOut { path: PathBuf, timeout: Duration },
}

/// Polls until `path` exists and is non-empty, or `timeout` elapses.
pub fn wait_for_transcript(
    path: &Path,
    timeout: Duration,
    poll: Duration,
) -> Result<PathBuf, WaitError> {
    let deadline = Instant::now() + timeout;
    loop {
        if is_ready(path) {
            return Ok(path.to_path_buf());
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::TimedOut {
                path: path.to_path_buf(),
                timeout,
            });
        }
        debug!(path = %path.display(), "Transcript not ready yet");
        thread::sleep(poll.min(deadline - now));
    }
}

fn is_ready(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
