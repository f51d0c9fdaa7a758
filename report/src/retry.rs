//! Write retry while the target file is held open by another program.

use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;

/// Default pause between write attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Receives a notice each time a write is refused because the file is in use.
///
/// Implementations decide how to tell the user and how long to wait before
/// the next attempt; [`write_with_retry`] calls `notify` and then retries
/// immediately.
pub trait ContentionNotice {
    fn notify(&mut self, path: &Path, err: &io::Error, attempt: u32);
}

/// Prints the notice to stderr and sleeps for `interval`.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotice {
    pub interval: Duration,
}

impl TerminalNotice {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for TerminalNotice {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_INTERVAL)
    }
}

impl ContentionNotice for TerminalNotice {
    fn notify(&mut self, path: &Path, err: &io::Error, attempt: u32) {
        warn!(path = %path.display(), attempt, error = %err, "Report file is in use");
        eprintln!(
            "The file {} is currently open. Please close it so the report can be saved.",
            path.display()
        );
        thread::sleep(self.interval);
    }
}

/// Whether `err` means another process holds the file.
pub fn is_contention(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    cfg!(windows) && matches!(err.raw_os_error(), Some(32 | 33))
}

/// Runs `write` until it succeeds, notifying on every contention failure.
///
/// Retries are unbounded. Any other I/O error is returned as
/// [`ReportError::Io`](crate::ReportError::Io).
pub fn write_with_retry<F>(path: &Path, notice: &mut dyn ContentionNotice, mut write: F) -> Result<()>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut attempt = 0u32;
    loop {
        match write(path) {
            Ok(()) => {
                if attempt > 0 {
                    debug!(path = %path.display(), retries = attempt, "Write succeeded after retry");
                }
                return Ok(());
            }
            Err(err) if is_contention(&err) => {
                attempt += 1;
                notice.notify(path, &err, attempt);
            }
            Err(err) => return Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportError;

    #[derive(Default)]
    struct Recorder {
        attempts: Vec<u32>,
    }

    impl ContentionNotice for Recorder {
        fn notify(&mut self, _path: &Path, _err: &io::Error, attempt: u32) {
            self.attempts.push(attempt);
        }
    }

    #[test]
    fn test_retries_until_writable() {
        let mut recorder = Recorder::default();
        let mut calls = 0;
        write_with_retry(Path::new("report.xlsx"), &mut recorder, |_| {
            calls += 1;
            if calls < 3 {
                Err(io::Error::from(io::ErrorKind::PermissionDenied))
            } else {
                Ok(())
            }
        })
        .unwrap();
        assert_eq!(calls, 3);
        assert_eq!(recorder.attempts, vec![1, 2]);
    }

    #[test]
    fn test_other_errors_are_returned() {
        let mut recorder = Recorder::default();
        let err = write_with_retry(Path::new("report.xlsx"), &mut recorder, |_| {
            Err(io::Error::from(io::ErrorKind::NotFound))
        })
        .unwrap_err();
        assert!(matches!(err, ReportError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert!(recorder.attempts.is_empty());
    }

    #[test]
    fn test_is_contention() {
        assert!(is_contention(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(!is_contention(&io::Error::from(io::ErrorKind::NotFound)));
    }
}
