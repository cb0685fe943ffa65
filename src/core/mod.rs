/// Core module for signature inspection
///
/// This module contains the report parser, the result table, the seam to the
/// external sigcheck tool and the batch runner that ties them together.

pub mod batch;
pub mod inspector;
pub mod parser;
pub mod table;
