//! # Pbxpatch Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!

//! ## Overview
//!
//! The organizational unit for all filesystem-related utility functions in
//! the tool. Functionality is delegated to specialized submodules; callers
//! import the specific submodule they need (e.g.
//! `crate::common::fs::io::read_file_to_string`).
//!
//! ## Architecture
//!
//! - **`io`**: Basic input/output operations: ensuring directories exist,
//!   reading files to strings, and the atomic write used for the rewritten
//!   project file.
//! - **`mirror`**: Locating named directories under a search root and
//!   deep-copying them into the build output's third-party directory.
//!
pub mod io;
pub mod mirror;
