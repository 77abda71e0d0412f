//! # Pbxpatch Section Injector
//!
//! File: cli/src/pbx/inject.rs
//!
//! ## Overview
//!
//! The orchestrator that rewrites a `project.pbxproj` buffer so every
//! framework in a resolved profile is wired into the project. Five edits are
//! applied, one per target construct:
//!
//! 1. `PBXBuildFile`: one build-file record per framework.
//! 2. `PBXFileReference`: one file-reference record per framework.
//! 3. `PBXFrameworksBuildPhase`: file entries appended to the phase's
//!    `files = (` list, on the instances the phase policy selects.
//! 4. `PBXGroup`: child entries added to the group matching the profile's
//!    group label, for frameworks that declare membership in it.
//! 5. `XCBuildConfiguration`: the third-party search path added to
//!    `FRAMEWORK_SEARCH_PATHS` and `-ObjC` to `OTHER_LDFLAGS`, with either
//!    list synthesized inside `buildSettings` when absent.
//!
//! ## Architecture
//!
//! Comment-anchored location is used for the two flat record sections
//! (their `/* Begin ... section */` anchors survive even when the sections
//! are empty), while the three record-level constructs are found by brace
//! scanning for their `isa = <Kind>` markers, then drilled into with bounded
//! anchor scans. See [`crate::pbx::locate`].
//!
//! Every injected block is wrapped in sentinel comments carrying the
//! profile's vendor tag, and the sentinels always land *inside* the list or
//! section they mark. Re-running the tool re-locates the same ranges, finds
//! the start sentinel, and skips them, so the whole pass is idempotent.
//! A missing target construct is logged and skipped, never fatal: a partial
//! wiring a developer can finish by hand beats a failed build post-step.
//!
//! Each pass works on fresh location results and applies its insertions in
//! descending line order, so earlier insertions never invalidate the line
//! numbers of the ones still pending. Each injected block is spliced as a
//! single unit, which keeps entries in manifest order.
//!
use crate::core::config::{InjectionProfile, PhasePolicy};
use crate::core::error::Result;
use crate::pbx::buffer::LineBuffer;
use crate::pbx::framework::{self, FrameworkDescriptor, TAB};
use crate::pbx::locate::{self, SectionRange};
use regex::Regex;
use tracing::{debug, info, warn};

/// Marker text on the first line of a framework build-phase record.
const PHASE_MARKER: &str = "isa = PBXFrameworksBuildPhase";
/// Marker text on the first line of a group record.
const GROUP_MARKER: &str = "isa = PBXGroup";
/// Marker text on the first line of a build-configuration record.
const CONFIG_MARKER: &str = "isa = XCBuildConfiguration";

/// Applies a profile's framework wiring to a project-file buffer.
pub struct Injector<'a> {
    profile: &'a InjectionProfile,
}

impl<'a> Injector<'a> {
    pub fn new(profile: &'a InjectionProfile) -> Self {
        Self { profile }
    }

    /// The comment that opens every injected block. Indentation is added at
    /// the injection site; detection matches the bare text anywhere in a
    /// located range.
    fn start_sentinel(&self) -> String {
        format!("/* START OF {} INJECTED FILES */", self.profile.vendor_tag)
    }

    fn end_sentinel(&self) -> String {
        format!("/* END OF {} INJECTED FILES */", self.profile.vendor_tag)
    }

    /// Runs all five injection passes over `buffer`.
    ///
    /// The duplicate scan runs first so the log records which frameworks
    /// the project already referenced, but it does not gate the passes:
    /// re-run safety comes from the sentinel check inside each located
    /// range, not from name matching.
    pub fn apply(&self, buffer: &mut LineBuffer) -> Result<()> {
        let mut frameworks = self.profile.frameworks.clone();
        framework::mark_already_present(buffer, &mut frameworks);

        if frameworks.is_empty() {
            info!("Profile declares no frameworks; record injection skipped");
        } else {
            info!(count = frameworks.len(), "Injecting framework records");
            self.inject_anchored_section(buffer, "PBXBuildFile", &frameworks, |f| {
                f.build_file_entry()
            });
            self.inject_anchored_section(buffer, "PBXFileReference", &frameworks, |f| {
                f.file_reference_entry()
            });
            self.inject_phase_files(buffer, &frameworks);
            self.inject_group_children(buffer, &frameworks);
        }

        self.inject_build_settings(buffer);
        Ok(())
    }

    /// Contract for the two flat record sections: locate the comment-anchored
    /// section and splice the new records just before its end anchor. Works
    /// even when the section interior is empty.
    fn inject_anchored_section<F>(
        &self,
        buffer: &mut LineBuffer,
        section_name: &str,
        pending: &[FrameworkDescriptor],
        render: F,
    ) where
        F: Fn(&FrameworkDescriptor) -> String,
    {
        let ranges = locate::locate_sections(buffer, section_name);
        if ranges.is_empty() {
            warn!(section = section_name, "section anchors not found; skipping");
            return;
        }
        for range in ranges.iter().rev() {
            if buffer.range_contains(range.as_range(), &self.start_sentinel()) {
                debug!(section = section_name, "sentinel present; section already injected");
                continue;
            }
            let mut block = Vec::with_capacity(pending.len() + 2);
            block.push(format!("{TAB}{TAB}{}", self.start_sentinel()));
            block.extend(pending.iter().map(&render));
            block.push(format!("{TAB}{TAB}{}", self.end_sentinel()));
            buffer.insert_block(range.end, block);
            debug!(
                section = section_name,
                line = range.end,
                entries = pending.len(),
                "records injected"
            );
        }
    }

    /// Appends phase file entries to the `files = (` list of the framework
    /// build phases the policy selects.
    fn inject_phase_files(&self, buffer: &mut LineBuffer, pending: &[FrameworkDescriptor]) {
        let mut scopes = locate::locate_scopes_containing(buffer, PHASE_MARKER);
        if scopes.is_empty() {
            warn!("no framework build phase found; skipping phase injection");
            return;
        }
        if self.profile.phase_policy == PhasePolicy::First {
            scopes.truncate(1);
        }
        for scope in scopes.iter().rev() {
            let lists = locate::locate_delimited(
                buffer,
                scope.as_range(),
                &locate::FILES_LIST_BEGIN,
                &locate::LIST_END,
            );
            if lists.is_empty() {
                warn!(line = scope.start, "build phase has no files list; skipping");
                continue;
            }
            for list in lists.iter().rev() {
                if buffer.range_contains(list.as_range(), &self.start_sentinel()) {
                    debug!(line = list.start, "sentinel present; phase already injected");
                    continue;
                }
                let indent = TAB.repeat(4);
                let mut block = Vec::with_capacity(pending.len() + 2);
                block.push(format!("{indent}{}", self.start_sentinel()));
                block.extend(pending.iter().map(|f| f.phase_file_entry()));
                block.push(format!("{indent}{}", self.end_sentinel()));
                buffer.insert_block(list.start, block);
            }
        }
    }

    /// Adds group child entries to every group record whose declaration line
    /// carries the profile's group label; only frameworks declaring
    /// membership in that label are added.
    fn inject_group_children(&self, buffer: &mut LineBuffer, pending: &[FrameworkDescriptor]) {
        let label = &self.profile.group_label;
        let members: Vec<&FrameworkDescriptor> = pending
            .iter()
            .filter(|f| f.belongs_to_group(label))
            .collect();
        if members.is_empty() {
            debug!(label = %label, "no pending frameworks belong to the target group");
            return;
        }

        let label_comment = format!("/* {label} */");
        let scopes: Vec<SectionRange> = locate::locate_scopes_containing(buffer, GROUP_MARKER)
            .into_iter()
            .filter(|scope| {
                buffer
                    .line(scope.start)
                    .map(|line| line.contains(&label_comment))
                    .unwrap_or(false)
            })
            .collect();
        if scopes.is_empty() {
            warn!(label = %label, "no group with the target label found; skipping");
            return;
        }

        for scope in scopes.iter().rev() {
            let lists = locate::locate_delimited(
                buffer,
                scope.as_range(),
                &locate::CHILDREN_LIST_BEGIN,
                &locate::LIST_END,
            );
            if lists.is_empty() {
                warn!(line = scope.start, "group has no children list; skipping");
                continue;
            }
            for list in lists.iter().rev() {
                if buffer.range_contains(list.as_range(), &self.start_sentinel()) {
                    debug!(line = list.start, "sentinel present; group already injected");
                    continue;
                }
                let indent = TAB.repeat(4);
                let mut block = Vec::with_capacity(members.len() + 2);
                block.push(format!("{indent}{}", self.start_sentinel()));
                block.extend(members.iter().map(|f| f.group_child_entry()));
                block.push(format!("{indent}{}", self.end_sentinel()));
                buffer.insert_block(list.start, block);
            }
        }
    }

    /// Wires the build settings of every configuration: the third-party
    /// directory into `FRAMEWORK_SEARCH_PATHS` and `-ObjC` into
    /// `OTHER_LDFLAGS`. Runs even when no records were pending, since these
    /// settings are per-project rather than per-framework.
    fn inject_build_settings(&self, buffer: &mut LineBuffer) {
        let indent = TAB.repeat(5);
        let search_path = format!(
            "{indent}\"\\\"$(SRCROOT)/{}\\\"\",",
            self.profile.third_party_dir
        );
        self.inject_setting_list(
            buffer,
            "FRAMEWORK_SEARCH_PATHS",
            &locate::FRAMEWORK_SEARCH_PATHS_BEGIN,
            &search_path,
        );
        let objc_flag = format!("{indent}-ObjC,");
        self.inject_setting_list(buffer, "OTHER_LDFLAGS", &locate::OTHER_LDFLAGS_BEGIN, &objc_flag);
    }

    /// One full pass for a single build-setting list: re-locates the
    /// configuration scopes fresh (a prior pass may have shifted lines),
    /// then either appends to the existing list or synthesizes one at the
    /// top of `buildSettings`.
    fn inject_setting_list(
        &self,
        buffer: &mut LineBuffer,
        key: &str,
        list_begin: &Regex,
        value_line: &str,
    ) {
        let scopes = locate::locate_scopes_containing(buffer, CONFIG_MARKER);
        if scopes.is_empty() {
            warn!("no build configuration found; skipping build settings injection");
            return;
        }
        for scope in scopes.iter().rev() {
            let settings = locate::locate_delimited(
                buffer,
                scope.as_range(),
                &locate::BUILD_SETTINGS_BEGIN,
                &locate::BLOCK_END,
            );
            if settings.is_empty() {
                warn!(line = scope.start, "configuration has no buildSettings; skipping");
                continue;
            }
            for block_range in settings.iter().rev() {
                let lists =
                    locate::locate_delimited(buffer, block_range.as_range(), list_begin, &locate::LIST_END);
                if lists.is_empty() {
                    // Synthesize the whole list, sentinels inside the parens
                    // so a re-run's bounded scan still sees them.
                    let outer = TAB.repeat(4);
                    let inner = TAB.repeat(5);
                    let block = vec![
                        format!("{outer}{key} = ("),
                        format!("{inner}{}", self.start_sentinel()),
                        value_line.to_string(),
                        format!("{inner}{}", self.end_sentinel()),
                        format!("{outer});"),
                    ];
                    buffer.insert_block(block_range.start, block);
                    debug!(key, line = block_range.start, "setting list synthesized");
                    continue;
                }
                for list in lists.iter().rev() {
                    if buffer.range_contains(list.as_range(), &self.start_sentinel()) {
                        debug!(key, line = list.start, "sentinel present; setting already injected");
                        continue;
                    }
                    let inner = TAB.repeat(5);
                    let block = vec![
                        format!("{inner}{}", self.start_sentinel()),
                        value_line.to_string(),
                        format!("{inner}{}", self.end_sentinel()),
                    ];
                    buffer.insert_block(list.start, block);
                }
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Manifest;

    /// A trimmed but structurally faithful Unity-style project file: one
    /// record per section, one build phase, one labeled group, and a single
    /// configuration that already has OTHER_LDFLAGS but no
    /// FRAMEWORK_SEARCH_PATHS.
    fn sample_project() -> String {
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
            "    CC02 /* Classes */ = {",
            "      isa = PBXGroup;",
            "      children = (",
            "      );",
            "      name = Classes;",
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
        ]
        .join("\n")
    }

    fn test_profile() -> InjectionProfile {
        let toml_text = r#"
            [profiles.ios]
            vendor_tag = "PBXPATCH"

            [[profiles.ios.frameworks]]
            name = "Alpha.framework"
            id = "1111111111111111111111AA"
            file_id = "1111111111111111111111AB"
            path = "System/Library/Frameworks/Alpha.framework"

            [[profiles.ios.frameworks]]
            name = "Beta.framework"
            id = "2222222222222222222222AA"
            file_id = "2222222222222222222222AB"
            attributes = ["Weak"]
            path = "System/Library/Frameworks/Beta.framework"
        "#;
        let manifest: Manifest = toml::from_str(toml_text).expect("valid manifest");
        manifest
            .resolve("ios")
            .expect("valid entries")
            .expect("profile present")
    }

    fn apply_to_sample(profile: &InjectionProfile) -> String {
        let mut buffer = LineBuffer::from_content(&sample_project());
        Injector::new(profile)
            .apply(&mut buffer)
            .expect("injection succeeds");
        buffer.to_content()
    }

    #[test]
    fn test_records_injected_into_anchored_sections() {
        let content = apply_to_sample(&test_profile());
        assert!(content.contains(
            "1111111111111111111111AA /* Alpha.framework in Frameworks */ = {isa = PBXBuildFile; fileRef = 1111111111111111111111AB /* Alpha.framework */; settings = { }; };"
        ));
        assert!(content.contains("settings = {ATTRIBUTES = (Weak, ); };"));
        assert!(content.contains(
            "1111111111111111111111AB /* Alpha.framework */ = {isa = PBXFileReference; lastKnownFileType = wrapper.framework; name = Alpha.framework; path = \"System/Library/Frameworks/Alpha.framework\"; sourceTree = \"SDKROOT\"; };"
        ));
        // Records land inside the sections, before their end anchors.
        let build_file_pos = content
            .find("1111111111111111111111AA /* Alpha.framework in Frameworks */")
            .expect("build file present");
        let end_anchor_pos = content
            .find("/* End PBXBuildFile section */")
            .expect("end anchor survives");
        assert!(build_file_pos < end_anchor_pos);
    }

    #[test]
    fn test_phase_and_group_lists_gain_entries() {
        let content = apply_to_sample(&test_profile());
        assert!(content.contains("1111111111111111111111AA /* Alpha.framework in Frameworks */,"));
        assert!(content.contains("1111111111111111111111AB /* Alpha.framework */,"));
        // The unlabeled group stays untouched.
        let classes_section = content
            .split("CC02 /* Classes */")
            .nth(1)
            .expect("Classes group survives");
        let classes_children = classes_section
            .split("name = Classes;")
            .next()
            .expect("children precede name");
        assert!(!classes_children.contains("Alpha.framework"));
    }

    #[test]
    fn test_search_paths_synthesized_and_ldflags_appended() {
        let content = apply_to_sample(&test_profile());
        // No FRAMEWORK_SEARCH_PATHS existed, so a full list is synthesized.
        assert!(content.contains("FRAMEWORK_SEARCH_PATHS = ("));
        assert!(content.contains("\"\\\"$(SRCROOT)/Third-Party Frameworks\\\"\","));
        // OTHER_LDFLAGS existed; the flag joins the existing values.
        assert!(content.contains("-ObjC,"));
        assert!(content.contains("\"-weak_framework\","));
        assert_eq!(content.matches("OTHER_LDFLAGS = (").count(), 1);
    }

    #[test]
    fn test_second_application_changes_nothing() {
        let profile = test_profile();
        let mut buffer = LineBuffer::from_content(&sample_project());
        let injector = Injector::new(&profile);
        injector.apply(&mut buffer).expect("first application");
        let once = buffer.to_content();
        injector.apply(&mut buffer).expect("second application");
        assert_eq!(once, buffer.to_content());
    }

    #[test]
    fn test_duplicate_flag_does_not_gate_injection() {
        // "Existing.framework" is already referenced by the fixture; the
        // duplicate scan flags it, but the first run still injects its
        // records. Only the sentinel stops a later run.
        let toml_text = r#"
            [[profiles.ios.frameworks]]
            name = "Existing.framework"
            id = "3333333333333333333333AA"
            file_id = "3333333333333333333333AB"
        "#;
        let manifest: Manifest = toml::from_str(toml_text).expect("valid manifest");
        let profile = manifest.resolve("ios").expect("ok").expect("present");
        let content = apply_to_sample(&profile);
        assert!(content.contains("3333333333333333333333AA"));
        assert!(content.contains("-ObjC,"));
    }

    #[test]
    fn test_empty_sections_receive_records() {
        // Xcode writes the Begin/End comments even for sections with no
        // records; injection must land between the anchors.
        let project = [
            "// !$*UTF8*$!",
            "{",
            "  objects = {",
            "/* Begin PBXBuildFile section */",
            "/* End PBXBuildFile section */",
            "/* Begin PBXFileReference section */",
            "/* End PBXFileReference section */",
            "  };",
            "}",
        ]
        .join("\n");
        let profile = test_profile();
        let mut buffer = LineBuffer::from_content(&project);
        Injector::new(&profile)
            .apply(&mut buffer)
            .expect("injection succeeds");
        let content = buffer.to_content();
        let start_pos = content
            .find("/* START OF PBXPATCH INJECTED FILES */")
            .expect("start sentinel present");
        let record_pos = content
            .find("1111111111111111111111AA /* Alpha.framework in Frameworks */")
            .expect("build file present");
        let end_pos = content
            .find("/* END OF PBXPATCH INJECTED FILES */")
            .expect("end sentinel present");
        let anchor_pos = content
            .find("/* End PBXBuildFile section */")
            .expect("end anchor survives");
        assert!(start_pos < record_pos && record_pos < end_pos && end_pos < anchor_pos);
        assert!(content.contains("1111111111111111111111AB /* Alpha.framework */ = {isa = PBXFileReference;"));
    }

    #[test]
    fn test_missing_section_is_skipped_not_fatal() {
        let profile = test_profile();
        let mut buffer = LineBuffer::from_content("{\n  objects = {\n  };\n}\n");
        let result = Injector::new(&profile).apply(&mut buffer);
        assert!(result.is_ok());
        assert!(!buffer.to_content().contains("Alpha.framework"));
    }

    #[test]
    fn test_phase_policy_all_reaches_every_phase() {
        let second_phase = [
            "/* Begin PBXFrameworksBuildPhase section */",
            "    BB01 /* Frameworks */ = {",
            "      isa = PBXFrameworksBuildPhase;",
            "      files = (",
            "      );",
            "    };",
            "    BB02 /* Frameworks */ = {",
            "      isa = PBXFrameworksBuildPhase;",
            "      files = (",
            "      );",
            "    };",
            "/* End PBXFrameworksBuildPhase section */",
        ]
        .join("\n");

        let toml_first = r#"
            [profiles.ios]
            phase_policy = "first"

            [[profiles.ios.frameworks]]
            name = "Alpha.framework"
            id = "1111111111111111111111AA"
            file_id = "1111111111111111111111AB"
        "#;
        let toml_all = toml_first.replace("\"first\"", "\"all\"");

        let resolve = |text: &str| {
            let manifest: Manifest = toml::from_str(text).expect("valid manifest");
            manifest.resolve("ios").expect("ok").expect("present")
        };

        let mut buffer = LineBuffer::from_content(&second_phase);
        Injector::new(&resolve(toml_first))
            .apply(&mut buffer)
            .expect("first-policy injection");
        assert_eq!(
            buffer
                .to_content()
                .matches("1111111111111111111111AA /* Alpha.framework in Frameworks */,")
                .count(),
            1
        );

        let mut buffer = LineBuffer::from_content(&second_phase);
        Injector::new(&resolve(&toml_all))
            .apply(&mut buffer)
            .expect("all-policy injection");
        assert_eq!(
            buffer
                .to_content()
                .matches("1111111111111111111111AA /* Alpha.framework in Frameworks */,")
                .count(),
            2
        );
    }
}
