mod config;
mod output;
mod wait;

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tty_fault_core::CurveType;
use tty_fault_report::{TerminalNotice, write_report};
use tty_fault_transcript::{BlockPolicy, process_transcript_file};

use crate::config::RunConfig;
use crate::output::{OutputFormat, format_dataset};
use crate::wait::{DEFAULT_POLL_INTERVAL, wait_for_transcript};

/// Report variant selection; `auto` inspects the fault table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CurveArg {
    Distance,
    Overcurrent,
    Auto,
}

impl CurveArg {
    fn resolve(self) -> Option<CurveType> {
        match self {
            Self::Distance => Some(CurveType::Distance),
            Self::Overcurrent => Some(CurveType::Overcurrent),
            Self::Auto => None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "fault-summary", version)]
#[command(about = "Summarize relay fault simulations from a saved TTY transcript")]
struct Cli {
    /// Transcript file saved from the TTY window. Truncated in place to the last run.
    transcript: PathBuf,
    /// Report variant.
    #[arg(long, value_enum, default_value = "auto")]
    curve: CurveArg,
    /// YAML run configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Handling of fault table blocks whose sequences differ in length.
    #[arg(long, value_enum)]
    block_policy: Option<BlockPolicy>,
    /// Sheet to (re)write in the report workbook.
    #[arg(long)]
    sheet_name: Option<String>,
    /// Print the merged dataset to stdout in this format.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Skip writing the spreadsheet.
    #[arg(long)]
    no_report: bool,
    /// Wait for the transcript to appear before processing.
    #[arg(long)]
    wait: bool,
    /// Seconds to wait with --wait (default from config: 360).
    #[arg(long)]
    wait_timeout: Option<u64>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli)?;
    debug!(?config, "Effective configuration");

    let transcript = if cli.wait {
        wait_for_transcript(&cli.transcript, config.wait_timeout(), DEFAULT_POLL_INTERVAL)
            .map_err(|err| err.to_string())?
    } else {
        cli.transcript.clone()
    };

    let parsed = process_transcript_file(&transcript, cli.curve.resolve(), &config.parse_options())
        .map_err(|err| format!("Failed to process '{}': {err}", transcript.display()))?;
    info!(
        records = parsed.dataset.len(),
        curve = %parsed.dataset.curve,
        "Transcript parsed"
    );

    if let Some(format) = cli.format {
        print!("{}", format_dataset(&parsed.dataset, format)?);
    }

    if cli.no_report {
        return Ok(());
    }

    let mut notice = TerminalNotice::new(config.retry_interval());
    let saved = write_report(
        &transcript,
        &parsed.dataset,
        &config.report_options(),
        &mut notice,
    )
    .map_err(|err| format!("Failed to write report: {err}"))?;

    if cli.format.is_some() {
        eprintln!("Spreadsheet saved at: {}", saved.display());
    } else {
        println!("Spreadsheet saved at: {}", saved.display());
    }
    Ok(())
}

/// File config (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<RunConfig, String> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(policy) = cli.block_policy {
        config.block_policy = policy;
    }
    if let Some(sheet_name) = &cli.sheet_name {
        config.sheet_name = sheet_name.clone();
    }
    if let Some(secs) = cli.wait_timeout {
        config.wait_timeout_secs = secs;
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fault-summary").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["tty.txt"]);
        assert_eq!(cli.curve, CurveArg::Auto);
        assert_eq!(cli.curve.resolve(), None);
        assert!(cli.format.is_none());
        assert!(!cli.no_report);
        assert_eq!(load_config(&cli).unwrap(), RunConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "tty.txt",
            "--curve",
            "overcurrent",
            "--block-policy",
            "strict",
            "--sheet-name",
            "Run 3",
            "--wait-timeout",
            "10",
            "-vv",
        ]);
        assert_eq!(cli.curve.resolve(), Some(CurveType::Overcurrent));
        assert_eq!(cli.verbose, 2);

        let config = load_config(&cli).unwrap();
        assert_eq!(config.block_policy, BlockPolicy::Strict);
        assert_eq!(config.sheet_name, "Run 3");
        assert_eq!(config.wait_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = parse(&["tty.txt", "--sheet-name", ""]);
        assert!(load_config(&cli).is_err());
    }
}
