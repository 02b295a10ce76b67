use relative_path::RelativePathBuf;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions treated as Markdown when scanning directories.
pub const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid lint root: {0}")]
    InvalidRoot(String),
}

/// Read a markdown file and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Scan for markdown files below `root`, sorted
pub fn scan_markdown_files(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !root.exists() {
        return Err(IoError::InvalidRoot(format!(
            "directory not found: {}",
            root.display()
        )));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

/// Expands command line paths: directories are scanned, files are kept as
/// given whatever their extension. The result is sorted and deduplicated.
pub fn collect_markdown_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, IoError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(scan_markdown_files(path)?);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            return Err(IoError::NotFound(path.clone()));
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// `path` relative to `root` with `/` separators, when it lies below it.
pub fn relative_to(root: &Path, path: &Path) -> Option<RelativePathBuf> {
    let stripped = path.strip_prefix(root).ok()?;
    RelativePathBuf::from_path(stripped).ok()
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if is_markdown(&path) {
            files.push(path);
        }
    }

    Ok(())
}
