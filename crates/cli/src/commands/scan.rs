use anyhow::{anyhow, Context, Result};

use crate::canonicalize_or_current;

/// Scan a source tree and list the instruction names it would scrub.
///
/// Exits with an error when the tree yields no identifiers, matching the
/// pipeline's behavior: a patch run over this tree would be a silent no-op.
pub fn scan_command(source_root: &str, marker: &str, json: bool) -> Result<()> {
    let root = canonicalize_or_current(source_root)?;

    let extraction = scrub_core::extract::scan_tree(&root, marker)
        .with_context(|| format!("Failed to scan source tree at {}", root.display()))?;

    if extraction.is_empty() {
        return Err(anyhow!("No instruction declarations found under {}", root.display()));
    }

    if json {
        let serialized = serde_json::to_string_pretty(&extraction)
            .context("Failed to serialize extraction to JSON")?;
        println!("{}", serialized);
    } else {
        println!("Instructions ({}):", extraction.total());
        for file in &extraction.files {
            println!("  {} ({}):", file.path.display(), file.names.len());
            for name in &file.names {
                println!("    - {}", name);
            }
        }
    }

    Ok(())
}
