//! # Pbxpatch Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the pbxpatch CLI, the
//! post-build step that wires third-party frameworks into a generated Xcode
//! `project.pbxproj`. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! pbxpatch --help
//!
//! # Run the injection post-step with increased verbosity
//! pbxpatch -vv inject --build-dir ./ios-build --assets-dir ./Assets
//!
//! # Report where each target construct sits in a project file
//! pbxpatch inspect --project-file ./ios-build/Unity-iPhone.xcodeproj/project.pbxproj
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to the appropriate command handler
//! 4. Format and display any errors that occur
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

// Declare the top-level modules of the CLI crate.
mod commands; // Command logic (inject, inspect)
mod common; // Shared utilities (fs)
mod core; // Core infrastructure (errors, config)
mod pbx; // The project-file engine (buffer, scanner, locators, injector)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "pbxpatch",
    about = "Post-build injector for Xcode project.pbxproj files",
    long_about = "Stages third-party framework directories next to a generated Xcode\n\
                  project and rewrites project.pbxproj so the frameworks are linked,\n\
                  grouped, and findable by the build.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "i")]
    Inject(commands::inject::InjectArgs),
    Inspect(commands::inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Inject(args) => commands::inject::handle_inject(args),
        Commands::Inspect(args) => commands::inspect::handle_inspect(args),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
