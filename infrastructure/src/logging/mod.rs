//! Logging infrastructure: structured execution history.
//!
//! Provides [`JsonlExecutionLogger`], a JSONL file writer that implements
//! the [`ExecutionLogger`](biorun_application::ExecutionLogger) port.

mod jsonl_logger;

pub use jsonl_logger::{EXECUTION_LOG_FILE, JsonlExecutionLogger};
