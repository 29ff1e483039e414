//! Filesystem port
//!
//! The checks tool facades need to decide overwrite-skip behavior and to
//! verify that an operation's declared output actually materialized.

use std::io;
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn path_exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents
    fn make_dir(&self, path: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}
