/// Utility modules for the sigcheck front end
///
/// This module contains helpers for gathering input paths and for formatting
/// and exporting the result table.

pub mod file_utils;
pub mod output_formatter;
