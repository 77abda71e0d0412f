//! # Pbxpatch Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!

//! ## Overview
//!
//! This module centralizes the fundamental filesystem input/output operations
//! the tool needs: ensuring directories exist, reading a project file into a
//! string, and writing the rewritten project file back to disk. They are
//! convenient, robust wrappers around standard library `std::fs` functions
//! with consistent error context.
//!
//! ## Architecture
//!
//! The module offers three focused utility functions:
//! - **`ensure_dir_exists`**: Checks if a directory exists at the given path. If not, it creates the directory, including any necessary parent directories (`fs::create_dir_all`). It also validates that if a path *does* exist, it is actually a directory.
//! - **`read_file_to_string`**: A simple wrapper around `fs::read_to_string` that adds context to potential I/O errors using `anyhow::Context`.
//! - **`write_file_atomic`**: Writes string content to the target path via a temporary file in the same directory, then persists it over the target. The project file is the input of the rest of the Xcode build, so a half-written file after a crash would be worse than no write at all; the rename makes the replacement all-or-nothing.
//!
//! ## Usage
//!
//! The `inject` command reads the project file with `read_file_to_string`,
//! mutates it in memory, and writes it back with `write_file_atomic`;
//! `ensure_dir_exists` prepares the third-party frameworks directory before
//! mirroring.
//!
//! ```rust
//! use crate::common::fs::io;
//! use crate::core::error::Result;
//! use std::path::Path;
//!
//! # fn run_example() -> Result<()> {
//! let staging = Path::new("./build/Third-Party Frameworks");
//! let project = Path::new("./build/Unity-iPhone.xcodeproj/project.pbxproj");
//!
//! io::ensure_dir_exists(staging)?;
//! let content = io::read_file_to_string(project)?;
//! io::write_file_atomic(project, &content)?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{PbxpatchError, Result};
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, this function attempts to create the directory,
/// including any necessary parent directories (similar to `mkdir -p`).
/// If the path already exists but is not a directory (e.g., it's a file),
/// an error (`PbxpatchError::FileSystem`) is returned.
///
/// # Arguments
///
/// * `path` - A `&Path` reference to the directory path to ensure exists.
///
/// # Returns
///
/// * `Result<()>` - Returns `Ok(())` if the directory exists or was successfully created.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(PbxpatchError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
///
/// A simple wrapper around `std::fs::read_to_string` that adds contextual
/// information to the error message if reading fails.
///
/// # Arguments
///
/// * `path` - A `&Path` reference to the file to read.
///
/// # Errors
///
/// Returns an `Err` if the file cannot be found, opened, or read, with
/// context indicating which file failed.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes `content` to `path` atomically, overwriting any existing file.
///
/// The content is first written to a temporary file in the same directory
/// (same filesystem, so the final rename cannot cross a mount boundary) and
/// then persisted over the target. Readers see either the old file or the
/// complete new one, never a partial write.
///
/// # Arguments
///
/// * `path` - A `&Path` reference to the target file path.
/// * `content` - A `&str` slice containing the content to write.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The target path has no parent directory.
/// - The temporary file cannot be created or written.
/// - Persisting the temporary file over the target fails.
pub fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        PbxpatchError::FileSystem(format!("Target path has no parent directory: {:?}", path))
    })?;
    ensure_dir_exists(parent)?;

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
    temp.persist(path)
        .with_context(|| format!("Failed to persist rewritten file {:?}", path))?;
    info!("Wrote file: {:?}", path);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Test `ensure_dir_exists` when the directory needs to be created, including parents.
    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        Ok(())
    }

    /// Test `ensure_dir_exists` when the directory already exists.
    #[test]
    fn test_ensure_dir_exists_already_exists() -> Result<()> {
        let base_dir = tempdir()?;
        let existing_dir = base_dir.path().join("existing");
        fs::create_dir(&existing_dir)?;
        ensure_dir_exists(&existing_dir)?;
        assert!(existing_dir.is_dir());
        Ok(())
    }

    /// Test `ensure_dir_exists` when the target path exists but is a file.
    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    /// Test writing atomically and reading the content back.
    #[test]
    fn test_atomic_write_then_read() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("project.pbxproj");
        let content = "// !$*UTF8*$!\n{\n}\n";
        write_file_atomic(&file_path, content)?;
        assert!(file_path.exists());
        assert_eq!(read_file_to_string(&file_path)?, content);
        Ok(())
    }

    /// Test that an atomic write replaces existing content completely.
    #[test]
    fn test_atomic_write_overwrites() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("project.pbxproj");
        fs::write(&file_path, "old contents that are much longer than the new ones")?;
        write_file_atomic(&file_path, "new")?;
        assert_eq!(read_file_to_string(&file_path)?, "new");
        Ok(())
    }

    /// Test `read_file_to_string` when the target file does not exist.
    #[test]
    fn test_read_file_not_found() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("nonexistent.txt");
        let result = read_file_to_string(&file_path);
        assert!(result.is_err());
        Ok(())
    }
}
