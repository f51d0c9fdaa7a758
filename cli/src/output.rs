//! Stdout rendering of a merged dataset and its statistics.

use serde::Serialize;
use tty_fault_core::{CurveType, FaultDataset, FaultRecord, ImpedanceStatistics};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

#[derive(Debug, Serialize)]
struct DatasetOutput<'a> {
    curve: CurveType,
    records: &'a [FaultRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<ImpedanceStatistics>,
}

/// Formats the dataset, plus impedance statistics when present.
pub fn format_dataset(dataset: &FaultDataset, format: OutputFormat) -> Result<String, String> {
    let output = DatasetOutput {
        curve: dataset.curve,
        records: &dataset.records,
        statistics: dataset.statistics(),
    };
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&output)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&output).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(dataset_to_markdown(dataset, output.statistics.as_ref())),
        OutputFormat::Table => Ok(dataset_to_table(dataset, output.statistics.as_ref())),
    }
}

fn string_rows(dataset: &FaultDataset) -> Vec<Vec<String>> {
    dataset
        .rows()
        .into_iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

fn dataset_to_markdown(dataset: &FaultDataset, stats: Option<&ImpedanceStatistics>) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Fault Summary ({})\n\n", dataset.curve));

    let columns = dataset.columns();
    out.push_str(&format!("| {} |\n", columns.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(columns.len())));
    for row in string_rows(dataset) {
        out.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    out.push('\n');

    if let Some(stats) = stats {
        out.push_str("## Impedance by Relay\n\n");
        out.push_str("| Relay | Max | Min |\n");
        out.push_str("|-------|-----|-----|\n");
        for relay in stats.relays() {
            out.push_str(&format!(
                "| {relay} | {} | {} |\n",
                stats.max_by_relay[relay], stats.min_by_relay[relay]
            ));
        }
        out.push('\n');
        out.push_str(&format!("**Overall Maximum Impedance:** {}\n\n", stats.overall_max));
        out.push_str(&format!("**Overall Minimum Impedance:** {}\n", stats.overall_min));
    }
    out
}

fn dataset_to_table(dataset: &FaultDataset, stats: Option<&ImpedanceStatistics>) -> String {
    let columns = dataset.columns();
    let rows = string_rows(dataset);
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(name, w)| format!("{name:<w$}"))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, w)| format!("{value:<w$}"))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    if let Some(stats) = stats {
        let relay_width = stats.relays().map(str::len).max().unwrap_or(5).max(5);
        out.push_str("\nImpedance by relay:\n");
        for relay in stats.relays() {
            out.push_str(&format!(
                "  {relay:<relay_width$}  max {}  min {}\n",
                stats.max_by_relay[relay], stats.min_by_relay[relay]
            ));
        }
        out.push_str(&format!(
            "Overall: max {}  min {}\n",
            stats.overall_max, stats.overall_min
        ));
    }
    out
}
