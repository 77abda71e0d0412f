//! # Pbxpatch Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used
//! throughout pbxpatch. It provides a consistent approach to error
//! management with detailed error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `PbxpatchError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover the tool's failure domains:
//! - Manifest/configuration errors
//! - Framework descriptor validation errors
//! - Filesystem errors
//! - Project-file structure errors
//!
//! Structural *anomalies* in the project file (unmatched delimiters, absent
//! sections) are deliberately not errors: they are logged and degrade to
//! skipped injections (see `pbx::scanner` and `pbx::inject`). Only
//! conditions that make the run meaningless (an unreadable manifest, an
//! invalid descriptor, an unreadable or unwritable project file) surface
//! through these types.
//!
//! ## Examples
//!
//! ```rust,ignore
//! // Return a specific error type
//! if !path.exists() {
//!     return Err(PbxpatchError::FileSystem(format!("Path not found: {}", path.display())))?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the pbxpatch application.
#[derive(Error, Debug)]
pub enum PbxpatchError {
    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Invalid framework descriptor: {0}")]
    Descriptor(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Project file error: {0}")]
    Project(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
