//! # Pbxpatch Configuration
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loading and validation of the injection **manifest** (`pbxpatch.toml`),
//! the file that declares what gets injected and how. The manifest holds one
//! profile per target platform; the caller resolves its `--platform` value
//! against the profiles exactly once at startup, and a platform with no
//! profile turns the whole run into a logged no-op. This replaces the
//! original tool's compile-time platform conditionals with a plain data
//! lookup.
//!
//! ## Architecture
//!
//! Deserialization uses `serde` + `toml` with `deny_unknown_fields` so a
//! typoed key fails loudly instead of being ignored. Resolution converts the
//! raw `FrameworkEntry` tables into validated `FrameworkDescriptor`s
//! eagerly: a malformed descriptor (empty name, colliding ids) is a load
//! error, and never reaches the injector.
//!
//! When no manifest file is supplied, a built-in iOS profile is used. It
//! reproduces the framework table an untouched AdColony Unity export needs:
//! the staged vendor framework plus the system frameworks and the zlib
//! dylib, with AdSupport/Social/StoreKit weak-linked.
//!
//! ## Example manifest
//!
//! ```toml
//! [profiles.ios]
//! vendor_tag = "PBXPATCH"
//! third_party_dir = "Third-Party Frameworks"
//! group_label = "Frameworks"
//! phase_policy = "first"
//! mirror = ["AdColony.framework"]
//!
//! [[profiles.ios.frameworks]]
//! name = "AdColony.framework"
//! id = "0277BC0B195E402F001C9760"
//! file_id = "0277BC0A195E402F001C9760"
//! file_type = "wrapper.framework"
//! path = "Third-Party Frameworks/AdColony.framework"
//! source_tree = "<group>"
//! ```
//!
use crate::core::error::{PbxpatchError, Result};
use crate::pbx::framework::FrameworkDescriptor;
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Relative path from the build directory to the generated project file.
const DEFAULT_PROJECT_SUBPATH: &str = "Unity-iPhone.xcodeproj/project.pbxproj";

/// Which sibling PBXFrameworksBuildPhase instances receive the injection.
///
/// Multiple instances exist when the project has several native targets;
/// the selection is an explicit policy, never a hard-coded index.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PhasePolicy {
    /// Inject only into the first located instance (the main target).
    #[default]
    First,
    /// Inject into every located instance.
    All,
}

/// The raw manifest as read from `pbxpatch.toml`.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// One profile per target platform keyword (e.g. "ios").
    #[serde(default)]
    pub profiles: HashMap<String, ProfileEntry>,
}

/// One platform's injection profile, as declared in the manifest.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ProfileEntry {
    /// Tag embedded in the sentinel comments wrapping injected blocks.
    #[serde(default = "default_vendor_tag")]
    pub vendor_tag: String,
    /// Name of the directory created under the build output for staged
    /// third-party frameworks; also referenced by FRAMEWORK_SEARCH_PATHS.
    #[serde(default = "default_third_party_dir")]
    pub third_party_dir: String,
    /// Label identifying the PBXGroup instance to inject children into.
    #[serde(default = "default_group_label")]
    pub group_label: String,
    /// Build-phase instance selection policy.
    #[serde(default)]
    pub phase_policy: PhasePolicy,
    /// Relative path from the build directory to the project file.
    #[serde(default = "default_project_subpath")]
    pub project_subpath: String,
    /// Leaf names of directories to locate under the assets root and
    /// deep-copy into the third-party directory before injecting.
    #[serde(default)]
    pub mirror: Vec<String>,
    /// Frameworks to wire into the project.
    #[serde(default)]
    pub frameworks: Vec<FrameworkEntry>,
}

/// One framework table row of the manifest.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FrameworkEntry {
    pub name: String,
    pub id: String,
    pub file_id: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default = "default_file_type")]
    pub file_type: String,
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_source_tree")]
    pub source_tree: String,
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,
}

fn default_vendor_tag() -> String {
    "PBXPATCH".to_string()
}
fn default_third_party_dir() -> String {
    "Third-Party Frameworks".to_string()
}
fn default_group_label() -> String {
    "Frameworks".to_string()
}
fn default_project_subpath() -> String {
    DEFAULT_PROJECT_SUBPATH.to_string()
}
fn default_file_type() -> String {
    "wrapper.framework".to_string()
}
fn default_source_tree() -> String {
    "SDKROOT".to_string()
}
fn default_groups() -> Vec<String> {
    vec!["Frameworks".to_string()]
}

/// A resolved, validated profile ready for the injector.
#[derive(Debug, Clone)]
pub struct InjectionProfile {
    pub vendor_tag: String,
    pub third_party_dir: String,
    pub group_label: String,
    pub phase_policy: PhasePolicy,
    pub project_subpath: String,
    pub mirror: Vec<String>,
    pub frameworks: Vec<FrameworkDescriptor>,
}

impl Manifest {
    /// Loads and parses a manifest file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the TOML manifest on disk.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not parse as a manifest.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading injection manifest from: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {:?}", path))?;
        let manifest: Manifest = toml::from_str(&content)
            .map_err(|e| PbxpatchError::Manifest(format!("{:?}: {e}", path)))?;
        Ok(manifest)
    }

    /// Resolves the profile for `platform`, validating every framework
    /// entry. Returns `None` when the manifest declares no profile for the
    /// platform; the caller treats that as "nothing to do here".
    pub fn resolve(&self, platform: &str) -> Result<Option<InjectionProfile>> {
        let entry = match self.profiles.get(platform) {
            Some(entry) => entry,
            None => {
                debug!(platform, "no profile declared for platform");
                return Ok(None);
            }
        };

        let mut frameworks = Vec::with_capacity(entry.frameworks.len());
        for fw in &entry.frameworks {
            let descriptor = FrameworkDescriptor::new(
                &fw.name,
                &fw.id,
                &fw.file_id,
                &fw.attributes,
                &fw.file_type,
                &fw.path,
                &fw.source_tree,
                &fw.groups,
            )
            .with_context(|| format!("Invalid manifest entry for '{}'", fw.name))?;
            frameworks.push(descriptor);
        }

        Ok(Some(InjectionProfile {
            vendor_tag: entry.vendor_tag.clone(),
            third_party_dir: entry.third_party_dir.clone(),
            group_label: entry.group_label.clone(),
            phase_policy: entry.phase_policy,
            project_subpath: entry.project_subpath.clone(),
            mirror: entry.mirror.clone(),
            frameworks,
        }))
    }

    /// The built-in manifest used when no `pbxpatch.toml` is supplied:
    /// a single iOS profile carrying the framework table a default AdColony
    /// Unity export needs.
    pub fn builtin() -> Self {
        const SYSTEM_FRAMEWORK_PATH: &str = "System/Library/Frameworks";
        // (name, id, file_id, weak, file_type, path, source_tree)
        let rows: Vec<(&str, &str, &str, bool, &str, String, &str)> = vec![
            (
                "AdColony.framework",
                "0277BC0B195E402F001C9760",
                "0277BC0A195E402F001C9760",
                false,
                "wrapper.framework",
                format!("{}/AdColony.framework", default_third_party_dir()),
                "<group>",
            ),
            (
                "libz.1.2.5.dylib",
                "0277BBFD195E3FCA001C9760",
                "0277BBFC195E3FCA001C9760",
                false,
                "\"compiled.mach-o.dylib\"",
                "usr/lib/libz.1.2.5.dylib".to_string(),
                "SDKROOT",
            ),
            (
                "AdSupport.framework",
                "0277BBFF195E3FD4001C9760",
                "0277BBFE195E3FD4001C9760",
                true,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/AdSupport.framework"),
                "SDKROOT",
            ),
            (
                "CoreTelephony.framework",
                "0277BC01195E3FDD001C9760",
                "0277BC00195E3FDC001C9760",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/CoreTelephony.framework"),
                "SDKROOT",
            ),
            (
                "EventKit.framework",
                "0277BC03195E3FE4001C9760",
                "0277BC02195E3FE4001C9760",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/EventKit.framework"),
                "SDKROOT",
            ),
            (
                "MessageUI.framework",
                "0277BC05195E3FEB001C9760",
                "0277BC04195E3FEB001C9760",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/MessageUI.framework"),
                "SDKROOT",
            ),
            (
                "Social.framework",
                "0277BC07195E3FF3001C9760",
                "0277BC06195E3FF3001C9760",
                true,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/Social.framework"),
                "SDKROOT",
            ),
            (
                "StoreKit.framework",
                "0277BC09195E3FFA001C9760",
                "0277BC08195E3FFA001C9760",
                true,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/StoreKit.framework"),
                "SDKROOT",
            ),
            (
                "AudioToolbox.framework",
                "8358D1B80ED1CC3700E3A684",
                "8358D1B70ED1CC3700E3A684",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/AudioToolbox.framework"),
                "SDKROOT",
            ),
            (
                "AVFoundation.framework",
                "7F36C11313C5C673007FBDD9",
                "7F36C11013C5C673007FBDD9",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/AVFoundation.framework"),
                "SDKROOT",
            ),
            (
                "CoreGraphics.framework",
                "56B7959B1442E0F20026B3DD",
                "56B7959A1442E0F20026B3DD",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/CoreGraphics.framework"),
                "SDKROOT",
            ),
            (
                "CoreMedia.framework",
                "7F36C11113C5C673007FBDD9",
                "7F36C10E13C5C673007FBDD9",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/CoreMedia.framework"),
                "SDKROOT",
            ),
            (
                "EventKitUI.framework",
                "0277BC0D195E4068001C9760",
                "0277BC0C195E4068001C9760",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/EventKitUI.framework"),
                "SDKROOT",
            ),
            (
                "MediaPlayer.framework",
                "5682F4B20F3B34FF007A219C",
                "5682F4B10F3B34FF007A219C",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/MediaPlayer.framework"),
                "SDKROOT",
            ),
            (
                "QuartzCore.framework",
                "83B2570B0E62FF8A00468741",
                "83B2570A0E62FF8A00468741",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/QuartzCore.framework"),
                "SDKROOT",
            ),
            (
                "SystemConfiguration.framework",
                "56BCBA390FCF049A0030C3B2",
                "56BCBA380FCF049A0030C3B2",
                false,
                "wrapper.framework",
                format!("{SYSTEM_FRAMEWORK_PATH}/SystemConfiguration.framework"),
                "SDKROOT",
            ),
        ];

        let frameworks = rows
            .into_iter()
            .map(|(name, id, file_id, weak, file_type, path, source_tree)| FrameworkEntry {
                name: name.to_string(),
                id: id.to_string(),
                file_id: file_id.to_string(),
                attributes: if weak {
                    vec!["Weak".to_string()]
                } else {
                    Vec::new()
                },
                file_type: file_type.to_string(),
                path,
                source_tree: source_tree.to_string(),
                groups: default_groups(),
            })
            .collect();

        let ios = ProfileEntry {
            vendor_tag: default_vendor_tag(),
            third_party_dir: default_third_party_dir(),
            group_label: default_group_label(),
            phase_policy: PhasePolicy::First,
            project_subpath: default_project_subpath(),
            mirror: vec!["AdColony.framework".to_string()],
            frameworks,
        };

        let mut profiles = HashMap::new();
        profiles.insert("ios".to_string(), ios);
        Manifest { profiles }
    }
}
