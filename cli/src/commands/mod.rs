//! # Pbxpatch Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the CLI and re-exports
//! them for the application entry point (`main.rs`).
//!
//! ## Commands
//!
//! - `inject`: the build post-step: stage framework directories and rewrite
//!   the project file.
//! - `inspect`: read-only diagnostics reporting where each target construct
//!   was located in a project file.
//!
//! Each command defines its own arguments structure and handler function.
//!

/// Read-only location report over a project file.
pub mod inspect;
/// The main post-build step: mirror frameworks and rewrite the project file.
pub mod inject;
