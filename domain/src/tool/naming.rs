//! Deterministic output-path naming

use std::path::{Path, PathBuf};

const READ_EXTENSIONS: [&str; 2] = [".fastq", ".fq"];

/// File name without its last extension (`/a/b/x.sorted.bam` → `x.sorted`)
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory containing `path`, `.` for bare file names
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `<out_dir or input dir>/<input stem><suffix><extension>`
pub fn derive_output(input: &Path, out_dir: Option<&Path>, suffix: &str, extension: &str) -> PathBuf {
    let dir = out_dir.map(Path::to_path_buf).unwrap_or_else(|| parent_dir(input));
    dir.join(format!("{}{}{}", file_stem(input), suffix, extension))
}

/// FASTQ file name with `.gz` and the `.fastq`/`.fq` extension removed
pub fn read_base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    READ_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
        .to_string()
}

pub fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}
