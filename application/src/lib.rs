//! Application layer for biorun
//!
//! This crate contains the port definitions, the command executor and the
//! tool facades. It depends only on the domain layer.

pub mod ports;
pub mod tools;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use ports::{
    dependency_checker::DependencyChecker,
    diagnostics::{Diagnostic, DiagnosticSink, NoDiagnostics, TracingDiagnostics},
    execution_logger::{ExecutionEvent, ExecutionLogger, NoExecutionLogger},
    filesystem::FileSystem,
    process_runner::ProcessRunner,
};
pub use tools::{
    Aligner, Assembler, Cufflinks, ExternalTool, Hisat2, IndexedTool, Kallisto, OutputSpec,
    KNOWN_PROGRAMS, Quantifier, ReadTrimmer, Salmon, Samtools, Stringtie, ToolEnv, ToolError, ToolFacade,
    TrimGalore,
};
pub use use_cases::execute_command::CommandExecutor;
