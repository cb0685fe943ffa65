/// Output formatter for inspection results
///
/// This module handles rendering the result table for the console and writing
/// it out as CSV or JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::batch::{BatchReport, FileFailure};
use crate::core::table::{ResultTable, COLUMN_HEADERS};
use crate::error::InspectError;

/// Format the table for console output
///
/// # Arguments
///
/// * `table` - Records of the run
/// * `use_markdown` - Whether to wrap the output in triple backticks
///
/// # Returns
///
/// Formatted string for console output
pub fn format_table(table: &ResultTable, use_markdown: bool) -> String {
    if table.is_empty() {
        return if use_markdown {
            "```\nNo files inspected.\n```\n".to_string()
        } else {
            "No files inspected.\n".to_string()
        };
    }

    let mut output = String::new();
    if use_markdown {
        output.push_str("```\n");
    }

    let label_width = COLUMN_HEADERS.iter().map(|h| h.len()).max().unwrap_or(0);

    for record in table {
        let values = record.values();
        output.push_str(&format!("{}\n", values[0].yellow().bold()));

        for (header, value) in COLUMN_HEADERS.iter().zip(values.iter()).skip(1) {
            let label = format!("{:<width$}", header, width = label_width);
            let value = if *header == "Verified" {
                if record.info.is_signed() {
                    value.green().to_string()
                } else {
                    value.red().to_string()
                }
            } else {
                value.to_string()
            };
            output.push_str(&format!("  {} {}\n", label.cyan(), value));
        }
        output.push('\n');
    }

    if use_markdown {
        output.push_str("```\n");
    }

    output
}

/// Write the table to a CSV file with the standard column headers
///
/// # Arguments
///
/// * `table` - Records to export
/// * `output_path` - Path where the CSV file will be written
/// * `delimiter` - Column separator byte
pub fn create_csv_report(table: &ResultTable, output_path: &Path, delimiter: u8) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create CSV output file: {}", output_path.display()))?;

    table
        .write_delimited(BufWriter::new(file), &COLUMN_HEADERS, delimiter)
        .context("Failed to write CSV data")?;

    Ok(())
}

/// Export the table to a JSON file as an array of records
pub fn export_results_json(table: &ResultTable, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, table.records())
        .context("Failed to write JSON data")?;
    writer.flush().context("Failed to flush JSON output")?;

    Ok(())
}

/// Describe one failed file the way an operator needs to see it
pub fn format_failure(failure: &FileFailure) -> String {
    let mut output = format!(
        "{}\n{}\n",
        "Failed to process file:".red().bold(),
        failure.path.display()
    );

    match &failure.error {
        InspectError::ToolFailed {
            code,
            stdout,
            stderr,
            ..
        } => {
            let code = code.map_or_else(|| "none".to_string(), |c| c.to_string());
            output.push_str(&format!("\nReturn Code: {}\n", code));
            output.push_str(&format!("\nOutput:\n{}\n", stdout.trim_end()));
            output.push_str(&format!("\nError:\n{}\n", stderr.trim_end()));
        }
        other => {
            output.push_str(&format!("\nError:\n{}\n", other));
        }
    }

    output
}

/// Create a summary of the run
pub fn create_summary(table: &ResultTable, report: &BatchReport, elapsed: Duration) -> String {
    let signed = table.iter().filter(|r| r.info.is_signed()).count();

    let mut output = String::new();
    output.push_str(&format!("{}\n", "Inspection Complete".bold()));
    output.push_str(&format!("{} {}\n", "Files attempted:".green(), report.attempted));
    output.push_str(&format!("{} {}\n", "Records:".green(), report.recorded));
    output.push_str(&format!("{} {}\n", "Signed:".green(), signed));
    output.push_str(&format!("{} {}\n", "Not signed:".green(), table.len() - signed));
    if report.failures.is_empty() {
        output.push_str(&format!("{} 0\n", "Failures:".green()));
    } else {
        output.push_str(&format!("{} {}\n", "Failures:".red(), report.failures.len()));
    }
    output.push_str(&format!(
        "{} {:.2} seconds\n",
        "Time elapsed:".green(),
        elapsed.as_secs_f64()
    ));

    output
}
