//! External program discovery
//!
//! [`WhichDependencyChecker`] answers the facade's construction-time
//! question "is this program installed?". [`discover_tools`] produces the
//! report behind `biorun check`:
//!
//! ```text
//! $ biorun check
//!   ✓ hisat2      /opt/bin/hisat2
//!   ✓ samtools    /usr/bin/samtools
//!   ✗ cufflinks   not found
//! ```

mod discovery;

pub use discovery::{DiscoveredTool, DiscoveryResult, discover_tools};

use biorun_application::ports::dependency_checker::DependencyChecker;

/// Looks programs up on `PATH` with the `which` crate.
pub struct WhichDependencyChecker;

impl DependencyChecker for WhichDependencyChecker {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
