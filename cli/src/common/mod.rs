//! # Pbxpatch Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!

//! ## Overview
//!
//! The organizational entry point for shared utility modules, kept separate
//! from command-specific logic (`commands::`) and core infrastructure
//! (`core::`). Today that is just the filesystem layer, but the namespace
//! keeps the boundary explicit.
//!
//! ## Architecture
//!
//! - **`fs`**: Foundational filesystem operations: file reading, atomic
//!   writing, directory creation, and the third-party directory mirror.
//!
pub mod fs;
