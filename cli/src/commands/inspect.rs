//! # Pbxpatch Inspect Command
//!
//! File: cli/src/commands/inspect.rs
//!
//! ## Overview
//!
//! A read-only diagnostic over a project file: reports, for each construct
//! the injector targets, the line ranges where it was located. Useful for
//! checking how a particular Xcode export will be handled before running
//! `inject`, and for debugging projects where a section is not found.
//!
//! Both locator contracts are exercised: the two flat record sections are
//! reported from their Begin/End comment anchors, the three record-level
//! constructs from the brace scan.
//!
//! ## Usage
//!
//! ```bash
//! pbxpatch inspect --project-file ./ios-build/Unity-iPhone.xcodeproj/project.pbxproj
//! ```
//!
use crate::common::fs::io;
use crate::core::error::Result;
use crate::pbx::buffer::LineBuffer;
use crate::pbx::locate::{self, SectionRange};
use clap::Parser;
use std::path::PathBuf;

/// # Inspect Arguments (`InspectArgs`)
///
/// Defines the command-line arguments accepted by the `pbxpatch inspect`
/// subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// The project file to analyze.
    #[arg(long)]
    project_file: PathBuf,
}

/// Reported line ranges are 1-based and inclusive, matching what an editor
/// shows, even though the locators work in 0-based half-open ranges.
fn describe(label: &str, ranges: &[SectionRange]) {
    if ranges.is_empty() {
        println!("{label}: not found");
        return;
    }
    for range in ranges {
        // A located interior can be empty (start == end).
        if range.start == range.end {
            println!("{label}: lines {}..{} (empty)", range.start + 1, range.end);
        } else {
            println!("{label}: lines {}..{}", range.start + 1, range.end);
        }
    }
}

/// # Handle Inspect Command (`handle_inspect`)
///
/// Locates every injector-relevant construct in the given project file and
/// prints one line per match.
///
/// # Errors
///
/// Returns an `Err` only if the project file cannot be read; absent
/// constructs are reported, not errors.
pub fn handle_inspect(args: InspectArgs) -> Result<()> {
    let content = io::read_file_to_string(&args.project_file)?;
    let buffer = LineBuffer::from_content(&content);
    println!("{}: {} lines", args.project_file.display(), buffer.len());

    for section in ["PBXBuildFile", "PBXFileReference"] {
        let ranges = locate::locate_sections(&buffer, section);
        describe(&format!("{section} section (comment anchors)"), &ranges);
    }

    for kind in [
        "PBXFrameworksBuildPhase",
        "PBXGroup",
        "XCBuildConfiguration",
    ] {
        let marker = format!("isa = {kind}");
        let ranges = locate::locate_scopes_containing(&buffer, &marker);
        describe(&format!("{kind} records (brace scan)"), &ranges);
    }

    Ok(())
}
