//! # Pbxpatch Framework Descriptor
//!
//! File: cli/src/pbx/framework.rs
//!
//! ## Overview
//!
//! The value record describing one framework to wire into the Xcode project:
//! its display name, the two synthetic object identifiers Xcode needs (a
//! build-file id and a file-reference id, which must never collide), optional
//! attribute tags such as weak linking, a file-kind tag, the on-disk path,
//! the placement root (`sourceTree`), and the group labels it belongs under.
//!
//! ## Architecture
//!
//! Descriptors are validated at construction: an empty name, an empty id, or
//! colliding ids would silently corrupt the project file if they ever reached
//! the injector, so `FrameworkDescriptor::new` rejects them with an explicit
//! error instead. The ids are otherwise opaque (typically 24 hex characters
//! resembling Xcode's own object ids) and their format is not checked.
//!
//! The four `*_entry` methods render the exact pbxproj record strings the
//! injector splices into each section. `mark_already_present` is the
//! duplicate detector: one scan over the whole buffer flagging every
//! descriptor whose name already occurs anywhere in the file. The flag is
//! informational (logged); re-run protection comes from the injector's
//! sentinel check, not from this flag.
//!
use crate::core::error::{PbxpatchError, Result};
use crate::pbx::buffer::LineBuffer;
use tracing::{debug, info};

/// Two-space indent unit used throughout generated pbxproj text, matching
/// what Unity's generator emits.
pub const TAB: &str = "  ";

/// Describes one framework to be injected into the project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkDescriptor {
    /// Display name, e.g. `AdColony.framework`. Must match the name Xcode
    /// would use for an existing reference, or duplicate detection
    /// under-matches.
    pub name: String,
    /// Build-file object id (arbitrary, unique, distinct from `file_id`).
    pub id: String,
    /// File-reference object id (arbitrary, unique, distinct from `id`).
    pub file_id: String,
    /// Attribute tags applied in the build-file settings, e.g. `Weak`.
    pub attributes: Vec<String>,
    /// Xcode file-kind tag, e.g. `wrapper.framework`.
    pub file_type: String,
    /// Path recorded on the file reference.
    pub path: String,
    /// Placement root, e.g. `SDKROOT` or `<group>`.
    pub source_tree: String,
    /// Labels of the PBXGroup instances this framework is listed under.
    pub groups: Vec<String>,
    /// Set by `mark_already_present` when the name already occurs in the file.
    pub already_present: bool,
}

impl FrameworkDescriptor {
    /// Builds a descriptor, rejecting values that would corrupt the project.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        id: &str,
        file_id: &str,
        attributes: &[String],
        file_type: &str,
        path: &str,
        source_tree: &str,
        groups: &[String],
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(PbxpatchError::Descriptor(
                "framework name must not be empty".to_string(),
            )
            .into());
        }
        if id.trim().is_empty() || file_id.trim().is_empty() {
            return Err(PbxpatchError::Descriptor(format!(
                "framework '{name}' needs both a build-file id and a file-reference id"
            ))
            .into());
        }
        if id == file_id {
            return Err(PbxpatchError::Descriptor(format!(
                "framework '{name}' uses the same id for its build file and its file reference ('{id}'); they must differ"
            ))
            .into());
        }
        Ok(Self {
            name: name.to_string(),
            id: id.to_string(),
            file_id: file_id.to_string(),
            attributes: attributes.iter().map(|a| a.trim().to_string()).collect(),
            file_type: file_type.to_string(),
            path: path.to_string(),
            source_tree: source_tree.to_string(),
            groups: groups.iter().map(|g| g.trim().to_string()).collect(),
            already_present: false,
        })
    }

    /// Renders the PBXBuildFile record line for this framework.
    ///
    /// Shape: `id /* name in Frameworks */ = {isa = PBXBuildFile;
    /// fileRef = file_id /* name */; settings = {ATTRIBUTES = (…); }; };`
    pub fn build_file_entry(&self) -> String {
        let mut entry = format!(
            "{TAB}{TAB}{} /* {} in Frameworks */ = {{isa = PBXBuildFile; fileRef = {} /* {} */; settings = {{",
            self.id, self.name, self.file_id, self.name
        );
        if !self.attributes.is_empty() {
            entry.push_str("ATTRIBUTES = (");
            for attribute in &self.attributes {
                entry.push_str(attribute);
                entry.push_str(", ");
            }
            entry.push_str(");");
        }
        entry.push_str(" }; };");
        entry
    }

    /// Renders the PBXFileReference record line for this framework.
    pub fn file_reference_entry(&self) -> String {
        format!(
            "{TAB}{TAB}{} /* {} */ = {{isa = PBXFileReference; lastKnownFileType = {}; name = {}; path = \"{}\"; sourceTree = \"{}\"; }};",
            self.file_id, self.name, self.file_type, self.name, self.path, self.source_tree
        )
    }

    /// Renders the entry for a `files = (…)` list of a frameworks build phase.
    pub fn phase_file_entry(&self) -> String {
        format!(
            "{TAB}{TAB}{TAB}{TAB}{} /* {} in Frameworks */,",
            self.id, self.name
        )
    }

    /// Renders the entry for a `children = (…)` list of a PBXGroup.
    pub fn group_child_entry(&self) -> String {
        format!("{TAB}{TAB}{TAB}{TAB}{} /* {} */,", self.file_id, self.name)
    }

    /// True when this framework should be listed under a group with `label`.
    pub fn belongs_to_group(&self, label: &str) -> bool {
        self.groups.iter().any(|g| g == label)
    }
}

/// Scans all lines once and flags every descriptor whose name already occurs
/// anywhere in the file.
///
/// Already-present frameworks are still injected (the sentinel check gates
/// re-runs); the flag exists so the log shows what an untouched project
/// already referenced.
pub fn mark_already_present(buffer: &LineBuffer, frameworks: &mut [FrameworkDescriptor]) {
    for line in buffer.lines() {
        for framework in frameworks.iter_mut() {
            if !framework.already_present && line.contains(&framework.name) {
                framework.already_present = true;
                debug!(name = %framework.name, "framework already referenced by the project");
            }
        }
    }
    for framework in frameworks.iter() {
        if !framework.already_present {
            info!(name = %framework.name, "framework will be added to the Xcode project");
        }
    }
}
