//! Dependency checker port

/// Port for checking that external programs are installed.
pub trait DependencyChecker: Send + Sync {
    /// Whether `program` can be launched (e.g. found on `PATH`)
    fn is_available(&self, program: &str) -> bool;

    /// Programs from `programs` that are not available, in input order
    fn missing<'a>(&self, programs: &[&'a str]) -> Vec<&'a str> {
        programs
            .iter()
            .copied()
            .filter(|p| !self.is_available(p))
            .collect()
    }
}
