//! # procap Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! Reading the file whose contents become the child's input line. The file is
//! read in full, as plain text, before any process is spawned, so that a missing
//! or unreadable file surfaces as `ProcapError::InputFile` without side effects.
//!
//! ```rust,ignore
//! use crate::common::fs::io;
//!
//! let input = io::read_input_file(Path::new("requests/initialize.json"))?;
//! ```
//!
use crate::core::error::{ProcapError, Result}; // Use standard Result and custom Error types
use anyhow::anyhow;
use std::fs; // Standard filesystem module
use std::path::Path; // Filesystem path type
use tracing::debug; // Logging utilities

/// Reads the entire content of an input file into a string.
///
/// The content is returned unchanged: no trimming, trailing line separators kept.
///
/// # Errors
///
/// Returns `ProcapError::InputFile` if the file cannot be found, opened, or read
/// (e.g., permissions, invalid UTF-8).
pub fn read_input_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|source| {
        anyhow!(ProcapError::InputFile {
            path: path.display().to_string(),
            source,
        })
    })?;
    debug!("Read {} bytes of input from {:?}", content.len(), path);
    Ok(content)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Content comes back byte-for-byte, including the trailing newline.
    #[test]
    fn test_read_input_file_verbatim() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("input.txt");
        let content = "{\"jsonrpc\": \"2.0\"}\n";
        fs::write(&file_path, content)?;

        assert_eq!(read_input_file(&file_path)?, content);
        Ok(())
    }

    #[test]
    fn test_read_input_file_not_found() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("nonexistent.txt");

        let err = read_input_file(&file_path).unwrap_err();

        match err.downcast_ref::<ProcapError>() {
            Some(ProcapError::InputFile { path, source }) => {
                assert!(path.ends_with("nonexistent.txt"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected InputFile error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_read_input_file_rejects_directory() -> Result<()> {
        let base_dir = tempdir()?;
        let err = read_input_file(base_dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProcapError>(),
            Some(ProcapError::InputFile { .. })
        ));
        Ok(())
    }
}
