use anyhow::Result;
use clap::{Parser, Subcommand};

use ix_scrub::commands::{patch_command, scan_command};

/// Build-time scrubber for instruction-name strings in deployed program
/// binaries.
///
/// This CLI is a thin wrapper around `scrub-core` (exposed in code as
/// `scrub_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "ix-scrub",
    version,
    about = "Scrub instruction-name strings from deployed program binaries",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a source tree and list the instruction names it would scrub.
    Scan {
        /// Root of the source tree to scan.
        #[arg(long, default_value = "programs")]
        source_root: String,

        /// Marker token that activates a source file's declarations.
        #[arg(long, default_value = scrub_core::extract::DEFAULT_MARKER)]
        marker: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Scrub instruction names from every artifact in the deploy directory.
    ///
    /// This will:
    /// - Extract instruction names from the source tree.
    /// - Replace each embedded discriminator string with a same-length
    ///   payload, in every matching artifact.
    /// - Overwrite changed artifacts in place; total byte length is never
    ///   altered.
    Patch {
        /// Root of the source tree to scan.
        #[arg(long, default_value = "programs")]
        source_root: String,

        /// Directory holding the deployed artifacts to patch.
        #[arg(long, default_value = "target/deploy")]
        deploy_dir: String,

        /// Marker token that activates a source file's declarations.
        #[arg(long, default_value = scrub_core::extract::DEFAULT_MARKER)]
        marker: String,

        /// Report what would change without writing artifacts back.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { source_root, marker, json } => scan_command(&source_root, &marker, json)?,
        Command::Patch { source_root, deploy_dir, marker, dry_run, json } => {
            patch_command(&source_root, &deploy_dir, &marker, dry_run, json)?
        }
    }

    Ok(())
}
