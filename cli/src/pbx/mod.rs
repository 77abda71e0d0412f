//! # Pbxpatch Project File Engine
//!
//! File: cli/src/pbx/mod.rs
//!
//! ## Overview
//!
//! Everything that understands the `project.pbxproj` text format lives here:
//! the line buffer the whole tool edits through, the brace scanner, the two
//! section locators built on top of it, the framework record model, and the
//! injector that ties them together.
//!
//! ## Architecture
//!
//! - `buffer`: ordered mutable line sequence with positional insertion.
//! - `scanner`: pure brace-scope scanner producing a scope tree.
//! - `locate`: comment-anchored and scope-anchored section location.
//! - `framework`: validated framework descriptors and record formatting.
//! - `inject`: the five-pass injection orchestrator.
//!
//! The dependency direction is strictly downward: `inject` uses `locate`
//! and `framework`, `locate` uses `scanner`, and everything uses `buffer`.

pub mod buffer;
pub mod framework;
pub mod inject;
pub mod locate;
pub mod scanner;
