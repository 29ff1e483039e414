//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod dependency_checker;
pub mod diagnostics;
pub mod execution_logger;
pub mod filesystem;
pub mod process_runner;
