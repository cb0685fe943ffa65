/// Batch runner
///
/// Inspects a flat list of paths and fills a [`ResultTable`] in input order.
/// A failure on one file is logged and recorded; the remaining files are still
/// processed.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{error, info};
use rayon::prelude::*;

use crate::core::inspector::Inspector;
use crate::core::parser::InspectionRecord;
use crate::core::table::ResultTable;
use crate::error::{BatchError, InspectError};

/// How the batch spreads tool invocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// 1 = serial, 0 = one worker per CPU, n = n workers
    pub workers: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// A file the batch could not inspect
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: InspectError,
}

/// Outcome of one run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub attempted: usize,
    pub recorded: usize,
    pub failures: Vec<FileFailure>,
}

/// Clear `table` and inspect every path, appending one record per success.
///
/// Records land in the same order as `paths` regardless of worker count.
/// Only a broken thread pool aborts the run; per-file problems end up in
/// [`BatchReport::failures`].
pub fn run_batch<I: Inspector + ?Sized>(
    inspector: &I,
    paths: &[PathBuf],
    table: &mut ResultTable,
    options: BatchOptions,
    progress: Option<&ProgressBar>,
) -> Result<BatchReport, BatchError> {
    table.clear();

    let mut report = BatchReport {
        attempted: paths.len(),
        ..BatchReport::default()
    };

    if paths.is_empty() {
        info!("No input files; nothing to inspect");
        return Ok(report);
    }

    let inspect_one = |path: &PathBuf| {
        let outcome = inspect_path(inspector, path);
        if let Some(pb) = progress {
            pb.inc(1);
        }
        outcome
    };

    let outcomes: Vec<Result<InspectionRecord, InspectError>> = if options.workers == 1 {
        paths.iter().map(inspect_one).collect()
    } else {
        let num_workers = if options.workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            options.workers
        };
        info!("Inspecting {} files with {} workers", paths.len(), num_workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .build()?;
        // Indexed collect keeps input order
        pool.install(|| paths.par_iter().map(inspect_one).collect())
    };

    for (path, outcome) in paths.iter().zip(outcomes) {
        match outcome {
            Ok(record) => table.append(record),
            Err(e) => {
                error!("Error processing {}: {}", path.display(), e);
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error: e,
                });
            }
        }
    }

    report.recorded = table.len();
    info!(
        "Batch finished: {} recorded, {} failed",
        report.recorded,
        report.failures.len()
    );

    Ok(report)
}

fn inspect_path<I: Inspector + ?Sized>(
    inspector: &I,
    path: &Path,
) -> Result<InspectionRecord, InspectError> {
    let output = inspector.inspect(path)?;
    Ok(InspectionRecord::from_report(
        path.to_string_lossy().into_owned(),
        &output,
    ))
}
