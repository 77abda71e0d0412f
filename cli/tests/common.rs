//! # Pbxpatch CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared utility functions used across the integration test files. Each
//! `.rs` file in `cli/tests/` is compiled as a separate test crate against
//! the `pbxpatch` binary; this module keeps the fixture plumbing in one
//! place.
//!

// Allow potentially unused code in this common module, as different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// # Get Pbxpatch Command (`pbxpatch_cmd`)
///
/// Helper function to create an `assert_cmd::Command` instance pointing to
/// the compiled `pbxpatch` binary target for the current test run.
///
/// ## Panics
/// Panics if the `pbxpatch` binary cannot be found via `Command::cargo_bin`.
pub fn pbxpatch_cmd() -> Command {
    Command::cargo_bin("pbxpatch").expect("Failed to find pbxpatch binary for testing")
}

/// A structurally faithful miniature Unity iOS export: every construct the
/// injector targets appears once, with an existing entry in each list.
pub fn sample_pbxproj() -> String {
    [
        "// !$*UTF8*$!",
        "{",
        "  archiveVersion = 1;",
        "  objectVersion = 46;",
        "  objects = {",
        "",
        "/* Begin PBXBuildFile section */",
        "    AA01 /* Existing.framework in Frameworks */ = {isa = PBXBuildFile; fileRef = AA00 /* Existing.framework */; };",
        "/* End PBXBuildFile section */",
        "",
        "/* Begin PBXFileReference section */",
        "    AA00 /* Existing.framework */ = {isa = PBXFileReference; lastKnownFileType = wrapper.framework; name = Existing.framework; path = System/Library/Frameworks/Existing.framework; sourceTree = SDKROOT; };",
        "/* End PBXFileReference section */",
        "",
        "/* Begin PBXFrameworksBuildPhase section */",
        "    BB01 /* Frameworks */ = {",
        "      isa = PBXFrameworksBuildPhase;",
        "      buildActionMask = 2147483647;",
        "      files = (",
        "        AA01 /* Existing.framework in Frameworks */,",
        "      );",
        "      runOnlyForDeploymentPostprocessing = 0;",
        "    };",
        "/* End PBXFrameworksBuildPhase section */",
        "",
        "/* Begin PBXGroup section */",
        "    CC01 /* Frameworks */ = {",
        "      isa = PBXGroup;",
        "      children = (",
        "        AA00 /* Existing.framework */,",
        "      );",
        "      name = Frameworks;",
        "      sourceTree = \"<group>\";",
        "    };",
        "/* End PBXGroup section */",
        "",
        "/* Begin XCBuildConfiguration section */",
        "    DD01 /* Release */ = {",
        "      isa = XCBuildConfiguration;",
        "      buildSettings = {",
        "        OTHER_LDFLAGS = (",
        "          \"-weak_framework\",",
        "        );",
        "        PRODUCT_NAME = \"$(TARGET_NAME)\";",
        "      };",
        "      name = Release;",
        "    };",
        "/* End XCBuildConfiguration section */",
        "  };",
        "  rootObject = EE01;",
        "}",
        "",
    ]
    .join("\n")
}

/// A manifest declaring one iOS profile with a single vendor framework and
/// one directory to mirror.
pub fn sample_manifest() -> String {
    r#"
[profiles.ios]
vendor_tag = "TESTVENDOR"
mirror = ["Vendor.framework"]

[[profiles.ios.frameworks]]
name = "Vendor.framework"
id = "FAFAFAFAFAFAFAFAFAFAFAFA"
file_id = "FBFBFBFBFBFBFBFBFBFBFBFB"
path = "Third-Party Frameworks/Vendor.framework"
source_tree = "<group>"
"#
    .to_string()
}

/// Lays out a fake build directory (`<root>/build`) containing the sample
/// project file at the default Unity location, plus an assets tree
/// (`<root>/assets`) holding a `Vendor.framework` directory with content.
/// Returns (build_dir, assets_dir, project_file).
pub fn setup_build_tree(root: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let build_dir = root.join("build");
    let project_dir = build_dir.join("Unity-iPhone.xcodeproj");
    fs::create_dir_all(&project_dir).expect("create project dir");
    let project_file = project_dir.join("project.pbxproj");
    fs::write(&project_file, sample_pbxproj()).expect("write project file");

    let assets_dir = root.join("assets");
    let vendor_dir = assets_dir.join("Plugins/iOS/Vendor.framework");
    fs::create_dir_all(vendor_dir.join("Headers")).expect("create vendor dir");
    fs::write(vendor_dir.join("Vendor"), b"binary blob").expect("write vendor binary");
    fs::write(vendor_dir.join("Headers/Vendor.h"), b"// header").expect("write vendor header");

    (build_dir, assets_dir, project_file)
}
