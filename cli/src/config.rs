//! Run configuration for `fault-summary`.
//!
//! Every field is optional in the YAML file; missing fields take the
//! defaults below. Command-line flags override file values.
//!
//! # Example YAML
//!
//! ```yaml
//! markers:
//!   - "Fault description:"
//! table_anchor: "Fault  1 "
//! report_file_name: "Fault Summary - TTY Window.xlsx"
//! sheet_name: "Fault Summary"
//! retry_interval_ms: 2000
//! block_policy: truncate
//! wait_timeout_secs: 360
//! ```

use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tty_fault_report::{DEFAULT_REPORT_FILE_NAME, DEFAULT_SHEET_NAME, ReportOptions};
use tty_fault_transcript::{BlockPolicy, DEFAULT_MARKERS, ParseOptions, TABLE_ANCHOR};

/// Longest sheet name Excel accepts.
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Characters Excel rejects in sheet names.
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Errors from loading or validating a [`RunConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Phrases opening a simulation run; the last occurrence wins.
    pub markers: Vec<String>,
    /// Heading that starts the fault table.
    pub table_anchor: String,
    /// Report file name, placed next to the transcript.
    pub report_file_name: String,
    /// Sheet replaced on every run.
    pub sheet_name: String,
    /// Pause between save attempts while the report is open elsewhere.
    pub retry_interval_ms: u64,
    pub block_policy: BlockPolicy,
    /// How long `--wait` polls for the transcript.
    pub wait_timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
            table_anchor: TABLE_ANCHOR.to_string(),
            report_file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            retry_interval_ms: 2000,
            block_policy: BlockPolicy::default(),
            wait_timeout_secs: 360,
        }
    }
}

impl RunConfig {
    /// Loads and validates a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.markers.is_empty() || self.markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "markers must list at least one non-empty phrase".to_string(),
            ));
        }
        if self.table_anchor.is_empty() {
            return Err(ConfigError::Invalid("table_anchor must not be empty".to_string()));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(ConfigError::Invalid("sheet_name must not be empty".to_string()));
        }
        if self.sheet_name.chars().count() > MAX_SHEET_NAME_CHARS {
            return Err(ConfigError::Invalid(format!(
                "sheet_name '{}' is longer than {MAX_SHEET_NAME_CHARS} characters",
                self.sheet_name
            )));
        }
        if let Some(bad) = self.sheet_name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
            return Err(ConfigError::Invalid(format!(
                "sheet_name '{}' contains '{bad}', which Excel does not allow",
                self.sheet_name
            )));
        }
        if !self.report_file_name.to_ascii_lowercase().ends_with(".xlsx") {
            return Err(ConfigError::Invalid(format!(
                "report_file_name '{}' must end in .xlsx",
                self.report_file_name
            )));
        }
        if self.retry_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "retry_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            markers: self.markers.clone(),
            table_anchor: self.table_anchor.clone(),
            block_policy: self.block_policy,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            file_name: self.report_file_name.clone(),
            sheet_name: self.sheet_name.clone(),
        }
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}
