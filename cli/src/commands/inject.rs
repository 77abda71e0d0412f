//! # Pbxpatch Inject Command
//!
//! File: cli/src/commands/inject.rs
//!
//! ## Overview
//!
//! The build post-step itself: stage the third-party framework directories
//! next to the exported Xcode project, then rewrite `project.pbxproj` so the
//! frameworks declared by the platform profile are wired into every section
//! that references them.
//!
//! ## Workflow
//!
//! 1. Load the manifest (`--manifest`, or the built-in iOS profile).
//! 2. Resolve the `--platform` value to a profile. No profile means this
//!    platform is not handled: log and exit successfully, so the tool can be
//!    attached unconditionally to a multi-platform build pipeline.
//! 3. Mirror the profile's framework directories from the assets tree into
//!    the build output's third-party directory.
//! 4. Read the project file, run the five-pass injector over it, and write
//!    the result back atomically.
//!
//! ## Usage
//!
//! ```bash
//! pbxpatch inject --platform ios --build-dir ./ios-build --assets-dir ./Assets
//! pbxpatch inject --platform ios --build-dir ./ios-build --manifest pbxpatch.toml
//! ```
//!
use crate::common::fs::{io, mirror};
use crate::core::config::Manifest;
use crate::core::error::{PbxpatchError, Result};
use crate::pbx::buffer::LineBuffer;
use crate::pbx::inject::Injector;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

/// # Inject Arguments (`InjectArgs`)
///
/// Defines the command-line arguments accepted by the `pbxpatch inject`
/// subcommand.
#[derive(Parser, Debug)]
pub struct InjectArgs {
    /// Target platform keyword resolved against the manifest's profiles.
    #[arg(long, short = 'p', default_value = "ios")]
    platform: String,

    /// The exported build directory containing the Xcode project.
    #[arg(long, short = 'b')]
    build_dir: PathBuf,

    /// Root of the tree searched for the framework directories to stage.
    /// When omitted, directory staging is skipped.
    #[arg(long, short = 'a')]
    assets_dir: Option<PathBuf>,

    /// Path to a TOML manifest. When omitted, the built-in iOS profile
    /// is used.
    #[arg(long, short = 'm')]
    manifest: Option<PathBuf>,

    /// Explicit path to the project file, overriding the profile's
    /// `project_subpath` under the build directory.
    #[arg(long)]
    project_file: Option<PathBuf>,
}

/// # Handle Inject Command (`handle_inject`)
///
/// Orchestrates the whole post-step for one build:
/// manifest resolution, directory staging, and the project file rewrite.
///
/// # Arguments
///
/// * `args` - The parsed `InjectArgs`.
///
/// # Errors
///
/// Returns an `Err` if the manifest is invalid, a located framework
/// directory fails to copy, or the project file cannot be read or written.
/// A platform with no profile and a missing assets tree are logged no-ops,
/// not errors.
pub fn handle_inject(args: InjectArgs) -> Result<()> {
    info!(
        "Running project injection for platform '{}' in {:?}",
        args.platform, args.build_dir
    );

    let manifest = match &args.manifest {
        Some(path) => Manifest::load(path)?,
        None => Manifest::builtin(),
    };
    let Some(profile) = manifest.resolve(&args.platform)? else {
        info!(
            "No profile for platform '{}'; nothing to do",
            args.platform
        );
        return Ok(());
    };

    // Stage framework directories before touching the project file, so a
    // copy failure leaves the project untouched.
    if let Some(assets_dir) = &args.assets_dir {
        let staging_dir = args.build_dir.join(&profile.third_party_dir);
        mirror::mirror_directories(assets_dir, &profile.mirror, &staging_dir)?;
    } else if !profile.mirror.is_empty() {
        warn!(
            "Profile lists {} director{} to mirror but no --assets-dir was given; skipping staging",
            profile.mirror.len(),
            if profile.mirror.len() == 1 { "y" } else { "ies" }
        );
    }

    let project_path = match &args.project_file {
        Some(path) => path.clone(),
        None => args.build_dir.join(&profile.project_subpath),
    };
    info!("Rewriting project file: {:?}", project_path);

    let content = io::read_file_to_string(&project_path)?;
    if content.trim().is_empty() {
        anyhow::bail!(PbxpatchError::Project(format!(
            "Project file {:?} is empty",
            project_path
        )));
    }
    let mut buffer = LineBuffer::from_content(&content);
    Injector::new(&profile).apply(&mut buffer)?;
    io::write_file_atomic(&project_path, &buffer.to_content())?;

    info!("Project injection finished");
    Ok(())
}
