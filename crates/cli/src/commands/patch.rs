use anyhow::{Context, Result};

use scrub_core::patch::DISCRIMINATOR_PREFIX;
use scrub_core::payload::PayloadSpec;
use scrub_core::scrub::{self, RunReport, ScrubConfig};

use crate::canonicalize_or_current;

/// Scrub instruction names from every artifact in the deploy directory.
pub fn patch_command(
    source_root: &str,
    deploy_dir: &str,
    marker: &str,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let config = ScrubConfig {
        source_root: canonicalize_or_current(source_root)?,
        deploy_dir: canonicalize_or_current(deploy_dir)?,
        marker: marker.to_string(),
        payload: PayloadSpec::default(),
        dry_run,
    };

    let report = scrub::run(&config)?;

    if json {
        let serialized =
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?;
        println!("{}", serialized);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Human-readable run summary: per-file extraction counts, then per-artifact
/// and per-name outcomes.
fn print_report(report: &RunReport) {
    println!(
        "Found {} instructions in {} files:",
        report.extraction.total(),
        report.extraction.files.len()
    );
    for file in &report.extraction.files {
        println!("  {} ({}): {}", file.path.display(), file.names.len(), file.names.join(", "));
    }

    for artifact in &report.artifacts {
        println!();
        println!("Patching: {}", artifact.path.display());
        for outcome in &artifact.outcomes {
            if outcome.replaced() {
                println!(
                    "  - Scrubbed: {}{} ({} occurrence(s))",
                    DISCRIMINATOR_PREFIX, outcome.name, outcome.occurrences
                );
            } else {
                println!("  - Not found: {}{}", DISCRIMINATOR_PREFIX, outcome.name);
            }
        }
        if artifact.written {
            println!("  Wrote patched artifact.");
        } else if artifact.changed {
            println!("  Dry run; artifact left untouched on disk.");
        } else {
            println!("  No changes made.");
        }
    }

    println!();
    println!("Patched {} of {} artifact(s).", report.changed_count(), report.artifacts.len());
}
