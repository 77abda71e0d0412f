//! # Pbxpatch Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command: the injection manifest
//! (`config`) and the error types (`error`). Command handlers import these;
//! nothing here depends on the command layer.
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config::Manifest;
//! use crate::core::error::{PbxpatchError, Result};
//! ```
//!
pub mod config;
pub mod error;
