/// sigcheck_table - batch front end for Sysinternals sigcheck
///
/// This library runs sigcheck over a set of files, parses each report into a
/// fixed-schema record and collects the records into a table that can be
/// printed or exported as CSV.

// Re-export core modules
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

// Re-export main types for convenience
pub use crate::core::batch::{run_batch, BatchOptions, BatchReport, FileFailure};
pub use crate::core::inspector::{locate_tool, Inspector, SigcheckInspector};
pub use crate::core::parser::{parse_report, InspectionRecord, SignatureInfo};
pub use crate::core::table::{ResultTable, COLUMN_HEADERS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

