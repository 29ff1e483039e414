//! Serializable summary of one semantic tool operation

use biorun_domain::{ReadSet, StepFailure, StepResult};
use serde::Serialize;
use std::path::PathBuf;

/// Files a successful step produced
pub trait StepOutput {
    fn output_paths(&self) -> Vec<PathBuf>;
}

impl StepOutput for () {
    fn output_paths(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

impl StepOutput for PathBuf {
    fn output_paths(&self) -> Vec<PathBuf> {
        vec![self.clone()]
    }
}

impl StepOutput for ReadSet {
    fn output_paths(&self) -> Vec<PathBuf> {
        self.files().into_iter().map(PathBuf::from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// e.g. `"samtools sort"`
    pub operation: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
}

impl StepReport {
    pub fn from_result<T: StepOutput>(operation: impl Into<String>, result: &StepResult<T>) -> Self {
        let operation = operation.into();
        match result {
            Ok(output) => Self {
                operation,
                success: true,
                outputs: output.output_paths(),
                failure: None,
            },
            Err(failure) => Self {
                operation,
                success: false,
                outputs: Vec::new(),
                failure: Some(failure.clone()),
            },
        }
    }

    /// Report for a raw invocation that only yields success or failure
    pub fn from_status(operation: impl Into<String>, success: bool) -> Self {
        Self {
            operation: operation.into(),
            success,
            outputs: Vec::new(),
            failure: None,
        }
    }
}
