// Copyright © 2024 HtmlSift. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! File helpers shared by the pipeline steps.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{HtmlSiftError, Result};

/// Reads a whole file as UTF-8, reporting failures as `ReadError`.
pub fn read_content<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| HtmlSiftError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `content` to `path`, replacing any existing file.
///
/// The caller picks the error variant, since the same write is a
/// `WriteError` for intermediates and a `PostProcessWriteError` for the
/// final document.
pub fn write_content<P, F>(path: P, content: &str, on_error: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(PathBuf, std::io::Error) -> HtmlSiftError,
{
    let path = path.as_ref();
    fs::write(path, content).map_err(|e| on_error(path.to_path_buf(), e))
}

/// Returns the file name without its final extension.
pub fn base_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Returns `true` when the file name ends in `.html`, ignoring case.
pub fn is_html_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".html"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let result = read_content("definitely/not/here.html");
        assert!(matches!(result, Err(HtmlSiftError::ReadError { .. })));
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.md");

        write_content(&path, "first", |path, source| {
            HtmlSiftError::WriteError { path, source }
        })
        .unwrap();
        write_content(&path, "second", |path, source| {
            HtmlSiftError::WriteError { path, source }
        })
        .unwrap();
        assert_eq!(read_content(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_error_variant_chosen_by_caller() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing-dir").join("page.md");

        let err = write_content(&path, "x", |path, source| {
            HtmlSiftError::PostProcessWriteError { path, source }
        })
        .unwrap_err();
        assert!(matches!(err, HtmlSiftError::PostProcessWriteError { .. }));
    }

    #[test]
    fn test_html_detection_and_base_name() {
        assert!(is_html_file(Path::new("a/b/tokyo.html")));
        assert!(is_html_file(Path::new("KYOTO.HTML")));
        assert!(!is_html_file(Path::new("notes.htm")));
        assert!(!is_html_file(Path::new("page.html.bak")));

        assert_eq!(
            base_name(Path::new("a/tokyo-city-guide.html")).as_deref(),
            Some("tokyo-city-guide")
        );
        assert_eq!(
            base_name(Path::new("OSAKA.HTML")).as_deref(),
            Some("OSAKA")
        );
    }
}
