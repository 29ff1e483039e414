//! Sequencing read inputs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Single-end or paired-end FASTQ input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum ReadLayout {
    Single { fastq: PathBuf },
    Paired { fastq1: PathBuf, fastq2: PathBuf },
}

impl ReadLayout {
    pub fn is_paired(&self) -> bool {
        matches!(self, ReadLayout::Paired { .. })
    }

    pub fn files(&self) -> Vec<&Path> {
        match self {
            ReadLayout::Single { fastq } => vec![fastq.as_path()],
            ReadLayout::Paired { fastq1, fastq2 } => vec![fastq1.as_path(), fastq2.as_path()],
        }
    }
}

/// A run's reads plus the directory its derived files are written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadSet {
    /// Run identifier, used for output names and execution tags
    pub accession: String,
    /// Directory for outputs derived from this run
    pub location: PathBuf,
    #[serde(flatten)]
    pub layout: ReadLayout,
}

impl ReadSet {
    pub fn single(
        accession: impl Into<String>,
        location: impl Into<PathBuf>,
        fastq: impl Into<PathBuf>,
    ) -> Self {
        Self {
            accession: accession.into(),
            location: location.into(),
            layout: ReadLayout::Single {
                fastq: fastq.into(),
            },
        }
    }

    pub fn paired(
        accession: impl Into<String>,
        location: impl Into<PathBuf>,
        fastq1: impl Into<PathBuf>,
        fastq2: impl Into<PathBuf>,
    ) -> Self {
        Self {
            accession: accession.into(),
            location: location.into(),
            layout: ReadLayout::Paired {
                fastq1: fastq1.into(),
                fastq2: fastq2.into(),
            },
        }
    }

    /// Same run and location with a different set of read files
    pub fn with_layout(&self, layout: ReadLayout) -> Self {
        Self {
            accession: self.accession.clone(),
            location: self.location.clone(),
            layout,
        }
    }

    pub fn is_paired(&self) -> bool {
        self.layout.is_paired()
    }

    pub fn files(&self) -> Vec<&Path> {
        self.layout.files()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files() {
        let single = ReadSet::single("SRR1", "/data/SRR1", "/data/SRR1/r.fastq");
        assert!(!single.is_paired());
        assert_eq!(single.files(), vec![Path::new("/data/SRR1/r.fastq")]);

        let paired = ReadSet::paired("SRR2", "/data/SRR2", "/a_1.fastq", "/a_2.fastq");
        assert!(paired.is_paired());
        assert_eq!(paired.files().len(), 2);
    }

    #[test]
    fn test_serialize_flattens_layout() {
        let paired = ReadSet::paired("SRR2", "/d", "/a_1.fq", "/a_2.fq");
        let json = serde_json::to_value(&paired).unwrap();
        assert_eq!(json["layout"], "paired");
        assert_eq!(json["fastq1"], "/a_1.fq");
        assert_eq!(json["accession"], "SRR2");
    }
}
