//! Tool invocation facades
//!
//! ```text
//! ToolEnv (executor, fs, dependencies)
//!    │
//!    ▼
//! ToolFacade ── program, whitelist, persisted defaults
//!    │
//!    ├── Hisat2      (Aligner)
//!    ├── Kallisto    (Quantifier)
//!    ├── Salmon      (Quantifier)
//!    ├── Stringtie   (Assembler)
//!    ├── Cufflinks   (Assembler)
//!    ├── Samtools
//!    └── TrimGalore  (ReadTrimmer)
//! ```

pub mod cufflinks;
pub mod env;
pub mod error;
pub mod facade;
pub mod hisat2;
pub mod kallisto;
pub mod salmon;
pub mod samtools;
pub mod stringtie;
pub mod traits;
pub mod trim_galore;

pub use cufflinks::Cufflinks;
pub use env::ToolEnv;
pub use error::ToolError;
pub use facade::ToolFacade;
pub use hisat2::Hisat2;
pub use kallisto::Kallisto;
pub use salmon::Salmon;
pub use samtools::{OutputSpec, Samtools};
pub use stringtie::Stringtie;
pub use traits::{Aligner, Assembler, ExternalTool, IndexedTool, Quantifier, ReadTrimmer};
pub use trim_galore::TrimGalore;

/// Every external program the facades in this module launch
pub const KNOWN_PROGRAMS: &[&str] = &[
    hisat2::PROGRAM,
    hisat2::BUILD_PROGRAM,
    kallisto::PROGRAM,
    salmon::PROGRAM,
    stringtie::PROGRAM,
    "cuffcompare",
    "cuffdiff",
    cufflinks::PROGRAM,
    "cuffmerge",
    "cuffnorm",
    "cuffquant",
    samtools::PROGRAM,
    trim_galore::PROGRAM,
    "cutadapt",
];
