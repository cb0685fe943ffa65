/// sigcheck_table - batch front end for Sysinternals sigcheck
///
/// The main entry point. It parses command-line arguments, locates sigcheck,
/// runs it over every requested file and prints or exports the resulting table.

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, LevelFilter};
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use sigcheck_table::config::{self, Config};
use sigcheck_table::core::batch::{run_batch, BatchOptions};
use sigcheck_table::core::inspector::{locate_tool, SigcheckInspector};
use sigcheck_table::core::table::ResultTable;
use sigcheck_table::utils::file_utils::{self, PathFilter};
use sigcheck_table::utils::output_formatter;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "sigcheck_table",
    version,
    about = "Tabulate Sysinternals sigcheck results for files and folders",
    long_about = "Runs Sysinternals sigcheck on each file and collects the reported signature
details into one table:
- Verified status and signing date
- Publisher, company, description and product
- Product and file version, machine type

Sigcheck is a command-line utility from Microsoft Sysinternals. It shows file
version, signing info, timestamp, and much more.
Official site: https://learn.microsoft.com/en-us/sysinternals/downloads/sigcheck"
)]
struct Args {
    /// Path(s) to the file(s) to inspect
    #[arg(value_name = "FILES")]
    file_paths: Vec<PathBuf>,

    /// Inspect all files in directory (recursively)
    #[arg(long = "dir")]
    dir: Option<PathBuf>,

    /// Exclude file pattern for --dir (glob syntax, can be used multiple times)
    #[arg(long = "exclude", action = ArgAction::Append)]
    exclude: Option<Vec<String>>,

    /// Include only file pattern for --dir (glob syntax, can be used multiple times)
    #[arg(long = "include", action = ArgAction::Append)]
    include: Option<Vec<String>>,

    /// Maximum number of files to inspect
    #[arg(long = "max-files")]
    max_files: Option<usize>,

    /// Path to the sigcheck executable (default: search PATH)
    #[arg(long = "sigcheck")]
    sigcheck: Option<PathBuf>,

    /// Extra argument passed to sigcheck (can be used multiple times)
    #[arg(long = "tool-arg", action = ArgAction::Append, allow_hyphen_values = true)]
    tool_arg: Option<Vec<String>>,

    /// Export results to CSV file
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Export results to JSON file
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Column delimiter for the CSV export (default: ',')
    #[arg(long = "delimiter")]
    delimiter: Option<char>,

    /// Number of parallel sigcheck processes (1=serial, 0=auto, default: 1)
    #[arg(long = "parallel")]
    parallel: Option<usize>,

    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Show only summary information
    #[arg(long = "summary-only", action = ArgAction::SetTrue)]
    summary_only: bool,

    /// Path to configuration file (JSON)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Set logging level (default: INFO)
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,

    /// Log file path (default: sigcheck_table.log)
    #[arg(long = "log-file", default_value = "sigcheck_table.log")]
    log_file: PathBuf,
}

/// Main entry point function
fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let start_time = Instant::now();
    let args = Args::parse();

    setup_logging(&args);

    let config = config::load_config(args.config.as_deref());

    // Without the tool nothing can be inspected
    let tool_path = args.sigcheck.clone().or_else(|| config.sigcheck_path.clone());
    let tool = locate_tool(tool_path.as_deref()).context("Cannot run sigcheck")?;
    let tool_args = args.tool_arg.clone().unwrap_or_else(|| config.tool_args.clone());
    let inspector = SigcheckInspector::new(tool).with_args(tool_args);

    let delimiter = resolve_delimiter(&args, &config)?;

    let filter = PathFilter {
        include: args.include.clone().unwrap_or_else(|| config.include.clone()),
        exclude: args.exclude.clone().unwrap_or_else(|| config.exclude.clone()),
        max_files: args.max_files.or(config.max_files),
    };
    let files = file_utils::collect_input_paths(&args.file_paths, args.dir.as_deref(), &filter);
    info!("Collected {} files to inspect", files.len());

    let options = BatchOptions {
        workers: args.parallel.or(config.parallel).unwrap_or(1),
    };

    if !args.quiet && !files.is_empty() {
        println!("\n{} {} files...", "Inspecting".bold(), files.len());
    }

    let progress_bar = if !args.quiet && !files.is_empty() {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .map_err(|e| anyhow!("Invalid progress template: {}", e))?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut table = ResultTable::new();
    let report = run_batch(&inspector, &files, &mut table, options, progress_bar.as_ref())?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Inspection complete");
    }

    // Per-file failures never stop the run, but the operator sees each one
    for failure in &report.failures {
        eprintln!("\n{}", output_formatter::format_failure(failure));
    }

    if let Some(csv_path) = &args.csv {
        output_formatter::create_csv_report(&table, csv_path, delimiter)?;
        info!("Saved CSV report to {}", csv_path.display());
        if !args.quiet {
            println!("{} {}", "Data saved to CSV:".green(), csv_path.display());
        }
    }

    if let Some(json_path) = &args.json {
        output_formatter::export_results_json(&table, json_path)?;
        info!("Saved JSON report to {}", json_path.display());
    }

    if !args.quiet {
        if !args.summary_only {
            println!("\n{}", output_formatter::format_table(&table, args.md));
        }
        println!(
            "{}",
            output_formatter::create_summary(&table, &report, start_time.elapsed())
        );
    }

    Ok(())
}

/// Set up logging with file output
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    match File::create(&args.log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!(
                "{} cannot open log file {}: {}",
                "Warning:".yellow(),
                args.log_file.display(),
                e
            );
        }
    }

    builder.init();
}

/// Pick the CSV delimiter from the command line or config; it must be one ASCII byte
fn resolve_delimiter(args: &Args, config: &Config) -> Result<u8> {
    let delimiter = args.delimiter.or(config.delimiter).unwrap_or(',');
    if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
        error!("Unusable delimiter {:?}", delimiter);
        return Err(anyhow!(
            "delimiter must be a single ASCII character other than a quote or line break, got {:?}",
            delimiter
        ));
    }
    Ok(delimiter as u8)
}
