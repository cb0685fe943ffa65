/// Error types for the sigcheck front end
///
/// Per-file failures, the fatal "no tool" condition and export problems are kept
/// apart so the batch runner can decide which ones stop a run.

use std::io;
use std::path::PathBuf;

/// Failure while inspecting a single file. The batch continues after these.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// The input path could not be read before the tool was started
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The tool process could not be started
    #[error("failed to start {}: {source}", .tool.display())]
    Spawn {
        tool: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The tool ran but exited with a non-zero status
    #[error("sigcheck exited with {} for {}", exit_label(.code), .path.display())]
    ToolFailed {
        path: PathBuf,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("return code {}", code),
        None => "no return code (terminated by signal)".to_string(),
    }
}

/// The signature tool could not be obtained. Fatal to the whole batch.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("sigcheck not found: {0}")]
    NotFound(String),
}

/// Failure while rendering or writing the result table
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Header labels do not line up with the record columns
    #[error("header has {actual} columns, records have {expected}")]
    ColumnMismatch { expected: usize, actual: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of the batch machinery itself (not of an individual file)
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
