//! # Pbxpatch Directory Mirror
//!
//! File: cli/src/common/fs/mirror.rs
//!

//! ## Overview
//!
//! Stages third-party framework bundles next to the generated Xcode project.
//! Unity keeps vendor frameworks somewhere under the project's assets tree;
//! this module finds each named directory anywhere under a search root and
//! deep-copies it into the build output's third-party directory, so the
//! search path injected into the project file actually resolves.
//!
//! ## Architecture
//!
//! Two functions split the concern:
//! - **`find_directories`**: walks the search root with `walkdir` and pairs
//!   each requested leaf name with the first directory carrying that name.
//!   Names with no match are simply absent from the result; the caller logs
//!   them.
//! - **`mirror_directories`**: creates the destination tree if needed, then
//!   copies each located directory into it with `fs_extra` (recursive,
//!   overwrite on).
//!
//! A missing search root is not an error: a project with no staged vendor
//! directories still gets its project file rewritten. Copy failures, on the
//! other hand, propagate: a framework the linker cannot find would fail the
//! build later with a far worse message.
//!
use crate::common::fs::io;
use crate::core::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Finds, for each leaf name in `names`, the first directory under `root`
/// whose file name matches it exactly.
///
/// The walk is depth-first in directory order; once a name is matched,
/// later directories with the same name are ignored.
///
/// # Arguments
///
/// * `root` - Directory tree to search.
/// * `names` - Leaf names to look for (e.g. `"AdColony.framework"`).
///
/// # Returns
///
/// * A map from matched leaf name to the directory's full path. Names with
///   no match are absent.
pub fn find_directories(root: &Path, names: &[String]) -> HashMap<String, PathBuf> {
    let mut found: HashMap<String, PathBuf> = HashMap::new();
    if names.is_empty() {
        return found;
    }

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(leaf) = entry.file_name().to_str() else {
            continue;
        };
        if names.iter().any(|n| n == leaf) && !found.contains_key(leaf) {
            debug!("Found directory '{}' at {:?}", leaf, entry.path());
            found.insert(leaf.to_string(), entry.path().to_path_buf());
            if found.len() == names.len() {
                break;
            }
        }
    }
    found
}

/// Mirrors each named directory found under `search_root` into `dest`,
/// creating `dest` if it does not exist.
///
/// Each matched directory lands as `dest/<name>/...` with its full
/// subtree. Names that are not found, and a `search_root` that does not
/// exist at all, are logged and skipped.
///
/// # Arguments
///
/// * `search_root` - Tree to search for the named directories.
/// * `names` - Leaf names of the directories to mirror.
/// * `dest` - Destination directory receiving the copies.
///
/// # Errors
///
/// Returns an `Err` if the destination cannot be created or a located
/// directory fails to copy.
pub fn mirror_directories(search_root: &Path, names: &[String], dest: &Path) -> Result<()> {
    if names.is_empty() {
        debug!("No directories to mirror");
        return Ok(());
    }
    if !search_root.is_dir() {
        warn!(
            "Mirror search root {:?} does not exist; skipping directory staging",
            search_root
        );
        return Ok(());
    }

    io::ensure_dir_exists(dest)?;

    let located = find_directories(search_root, names);
    for name in names {
        match located.get(name) {
            Some(source) => {
                info!("Mirroring {:?} into {:?}", source, dest);
                let mut options = fs_extra::dir::CopyOptions::new();
                options.overwrite = true;
                fs_extra::dir::copy(source, dest, &options).map_err(|e| {
                    anyhow::anyhow!(e)
                        .context(format!("Failed to copy dir {:?} to {:?}", source, dest))
                })?;
            }
            None => {
                warn!(
                    "Directory '{}' not found under {:?}; skipping",
                    name, search_root
                );
            }
        }
    }
    Ok(())
}
