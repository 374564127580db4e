use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File scanner for traversing a source tree.
///
/// The `FileScanner` recursively walks a directory to find all Rust source files that may
/// carry WebSocket annotations. It skips hidden directories, the `target`, `tests` and
/// `benches` directories, and any file whose name marks it as a test file (`*_test.rs`,
/// `*_tests.rs`, `test.rs`, `tests.rs`).
///
/// Paths are returned sorted so that repeated runs over the same tree visit files in the
/// same order.
///
/// # Example
///
/// ```no_run
/// use wsapi_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} source files", result.source_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// Sorted paths of all discovered `.rs` files
    pub source_files: Vec<PathBuf>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all non-test `.rs` files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceRead`] if the root or any entry below it cannot be accessed.
    /// An unreadable entry aborts the scan rather than producing a partial file list.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut source_files = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.depth() == 0 {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_pruned_dir = e.file_type().is_dir()
                    && matches!(&*file_name, "target" | "tests" | "benches");

                !is_hidden && !is_pruned_dir
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root_path.clone());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                Error::SourceRead { path, source }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("rs") {
                continue;
            }
            if is_test_file(path) {
                debug!("Skipping test file: {}", path.display());
                continue;
            }

            source_files.push(path.to_path_buf());
        }

        source_files.sort();
        debug!(
            "Scanned {}: {} source files",
            self.root_path.display(),
            source_files.len()
        );

        Ok(ScanResult { source_files })
    }
}

/// Whether the file name denotes a test file.
fn is_test_file(path: &Path) -> bool {
    let stem = match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem,
        None => return false,
    };
    stem == "test" || stem == "tests" || stem.ends_with("_test") || stem.ends_with("_tests")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(result: &ScanResult) -> Vec<String> {
        result
            .source_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_normal_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("lib.rs"), "pub fn test() {}").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(file_names(&result), vec!["lib.rs", "main.rs"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let scanner = FileScanner::new(temp_dir.path().to_path_buf());
        let result = scanner.scan().unwrap();

        assert!(result.source_files.is_empty());
    }

    #[test]
    fn test_scan_nested_directories_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/models")).unwrap();
        fs::write(root.join("src/models/user.rs"), "struct User {}").unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn a() {}").unwrap();
        fs::write(root.join("build.rs"), "fn main() {}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.source_files.len(), 3);
        let mut sorted = result.source_files.clone();
        sorted.sort();
        assert_eq!(result.source_files, sorted);
    }

    #[test]
    fn test_scan_skips_test_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("handler.rs"), "fn a() {}").unwrap();
        fs::write(root.join("handler_test.rs"), "fn b() {}").unwrap();
        fs::write(root.join("handler_tests.rs"), "fn c() {}").unwrap();
        fs::write(root.join("tests.rs"), "fn d() {}").unwrap();
        fs::write(root.join("contest.rs"), "fn e() {}").unwrap();
        fs::create_dir(root.join("tests")).unwrap();
        fs::write(root.join("tests/integration.rs"), "fn f() {}").unwrap();
        fs::create_dir(root.join("benches")).unwrap();
        fs::write(root.join("benches/throughput.rs"), "fn g() {}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(file_names(&result), vec!["contest.rs", "handler.rs"]);
    }

    #[test]
    fn test_scan_skips_target_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("target")).unwrap();
        fs::write(root.join("target/build.rs"), "fn main() {}").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/config.rs"), "// config").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(file_names(&result), vec!["main.rs"]);
    }

    #[test]
    fn test_scan_missing_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = FileScanner::new(temp_dir.path().join("does-not-exist"));

        match scanner.scan() {
            Err(Error::SourceRead { path, .. }) => {
                assert!(path.ends_with("does-not-exist"));
            }
            other => panic!("expected SourceRead error, got {:?}", other.map(|r| r.source_files)),
        }
    }
}
