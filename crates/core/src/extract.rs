//! Source scanning: discover exported instruction declarations and derive
//! their canonical display names.
//!
//! A source file contributes identifiers only when it contains a live (not
//! commented out) program marker line. Declarations are matched textually
//! rather than through a full parser; the scan stays tolerant of trees that
//! do not currently build, at the cost of some precision.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

/// Attribute line marking a file's declarations as exported instructions.
pub const DEFAULT_MARKER: &str = "#[program]";

/// Extension of source files considered by the scan.
pub const SOURCE_EXTENSION: &str = "rs";

/// Declaration shape for an exported instruction: `pub fn name(`.
static DECLARATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"pub\s+fn\s+([A-Za-z0-9_]+)\s*\(").expect("declaration regex"));

/// Error type for the extraction pass.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Walking the source tree failed (missing root, permissions, ...).
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// A source file could not be read as UTF-8 text.
    ///
    /// This is fatal rather than skippable: an unreadable file may declare
    /// instructions that would then go unscrubbed.
    #[error("Failed to read source file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Instruction names discovered in a single source file, in order of
/// appearance. Names are already canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInstructions {
    pub path: PathBuf,
    pub names: Vec<String>,
}

/// Result of scanning a whole source tree.
///
/// Files appear in traversal order; only files that yielded at least one
/// instruction are listed. Duplicate names across (or within) files are
/// preserved as found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub files: Vec<FileInstructions>,
}

impl Extraction {
    /// Flatten all discovered names into one sequence, discovery order.
    pub fn names(&self) -> Vec<String> {
        self.files.iter().flat_map(|f| f.names.iter().cloned()).collect()
    }

    /// Total number of discovered names across all files.
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.names.len()).sum()
    }

    /// True when no file yielded any instruction name.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Convert a raw declared name to its canonical display form.
///
/// Splits on `_`, upper-cases the first letter of each segment, and
/// concatenates without separators. Empty segments (leading/trailing/double
/// underscores) contribute nothing.
pub fn canonical_name(raw: &str) -> String {
    raw.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Check whether `content` contains a live occurrence of the marker token.
///
/// A line counts only if, after trimming, it does not start with `//` --
/// which also covers `///` doc comments and `//!` inner doc comments. One
/// live line activates the whole file; a file with only commented-out
/// markers stays inactive.
pub fn has_live_marker(content: &str, marker: &str) -> bool {
    content.lines().any(|line| line.contains(marker) && !line.trim().starts_with("//"))
}

/// Collect canonical instruction names declared in `content`, in order of
/// appearance.
pub fn instruction_names(content: &str) -> Vec<String> {
    DECLARATION_RE.captures_iter(content).map(|caps| canonical_name(&caps[1])).collect()
}

/// Scan all source files under `root` and extract instruction names from
/// every file activated by `marker`.
///
/// Traversal is sorted by file name so discovery order is deterministic.
/// Inactive files are skipped entirely, even if they contain well-formed
/// declarations.
pub fn scan_tree(root: &Path, marker: &str) -> ExtractResult<Extraction> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
            continue;
        }

        let content = fs::read_to_string(path)
            .map_err(|source| ExtractError::Read { path: path.to_path_buf(), source })?;

        if !has_live_marker(&content, marker) {
            continue;
        }

        let names = instruction_names(&content);
        if !names.is_empty() {
            files.push(FileInstructions { path: path.to_path_buf(), names });
        }
    }

    Ok(Extraction { files })
}
