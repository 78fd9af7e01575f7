//! Input discovery for join.

use std::io;
use std::path::{Path, PathBuf};

/// Files in `dir` whose extension matches `ext`, as absolute, sorted paths.
///
/// `ext` may carry a leading dot. Subdirectories are not searched.
pub fn sibling_files(dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let wanted = ext.trim_start_matches('.');
    let dir = dir.canonicalize()?;

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some(wanted) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sibling_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["02.mp3", "01.mp3", "cover.jpg", "10.mp3"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.mp3")).unwrap();

        let files = sibling_files(dir.path(), ".mp3").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["01.mp3", "02.mp3", "10.mp3"]);
        assert!(files.iter().all(|f| f.is_absolute()));
    }

    #[test]
    fn test_sibling_files_without_dot() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.m4a"), b"").unwrap();
        assert_eq!(sibling_files(dir.path(), "m4a").unwrap().len(), 1);
        assert!(sibling_files(dir.path(), "mp3").unwrap().is_empty());
    }
}
