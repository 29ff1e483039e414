//! Local filesystem adapter

use biorun_application::ports::filesystem::FileSystem;
use std::fs;
use std::io;
use std::path::Path;

pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn make_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_filesystem_operations() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let fs = LocalFileSystem;

        fs.make_dir(&nested).unwrap();
        assert!(fs.path_exists(&nested));
        assert!(!fs.is_file(&nested));

        let file = nested.join("x.gtf");
        std::fs::write(&file, "").unwrap();
        let renamed = nested.join("y.gtf");
        fs.rename(&file, &renamed).unwrap();
        assert!(!fs.path_exists(&file));
        assert!(fs.is_file(&renamed));

        fs.remove_file(&renamed).unwrap();
        assert!(!fs.path_exists(&renamed));
        assert!(fs.remove_file(&renamed).is_err());
    }
}
