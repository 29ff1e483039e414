//! Output formatting for step results, discovery and diagnostics

pub mod console;
pub mod diagnostics;
pub mod report;
