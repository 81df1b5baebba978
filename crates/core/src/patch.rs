//! In-place scrubbing of discriminator strings inside binary artifacts.
//!
//! Every replacement swaps a discriminator for a payload of identical byte
//! length, so offsets inside the artifact never shift and its internal
//! structure (symbol tables, section headers, jump targets) stays intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::payload::PayloadSpec;

/// Prefix the program runtime embeds before each instruction display name.
pub const DISCRIMINATOR_PREFIX: &str = "Instruction: ";

/// Extension of binary artifacts considered for patching.
pub const ARTIFACT_EXTENSION: &str = "so";

/// Error type for artifact patching.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The artifact path does not exist; nothing to patch.
    #[error("Artifact does not exist: {0}")]
    Missing(PathBuf),

    /// Reading the artifact failed.
    #[error("Failed to read artifact {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the patched artifact back failed.
    #[error("Failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for patch operations.
pub type PatchResult<T> = Result<T, PatchError>;

/// Per-name outcome within one artifact.
///
/// `occurrences == 0` means the discriminator was not present -- this is
/// informational, not an error; many artifacts legitimately lack some
/// instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameOutcome {
    pub name: String,
    pub occurrences: usize,
}

impl NameOutcome {
    /// True when at least one occurrence was rewritten.
    pub fn replaced(&self) -> bool {
        self.occurrences > 0
    }
}

/// Result of patching a single artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub path: PathBuf,
    /// At least one discriminator was replaced in the buffer.
    pub changed: bool,
    /// The mutated buffer was written back to disk (false for dry runs and
    /// unchanged artifacts).
    pub written: bool,
    /// SHA-256 of the artifact bytes as read.
    pub hash_before: String,
    /// SHA-256 of the mutated buffer; present only when `changed`.
    pub hash_after: Option<String>,
    pub outcomes: Vec<NameOutcome>,
}

/// Patch one artifact in place.
///
/// The artifact is read fully into memory; every occurrence of
/// `"Instruction: " + name` is replaced with `"Instruction: "` plus a
/// same-length payload, for each name in sequence order. The file is
/// rewritten only if at least one replacement occurred and `dry_run` is off.
pub fn patch_artifact(
    path: &Path,
    names: &[String],
    payload: &PayloadSpec,
    dry_run: bool,
) -> PatchResult<ArtifactReport> {
    if !path.exists() {
        return Err(PatchError::Missing(path.to_path_buf()));
    }

    let mut buffer = fs::read(path)
        .map_err(|source| PatchError::Read { path: path.to_path_buf(), source })?;
    let hash_before = sha256_hex(&buffer);

    let mut outcomes = Vec::with_capacity(names.len());
    let mut changed = false;

    for name in names {
        let mut pattern = Vec::with_capacity(DISCRIMINATOR_PREFIX.len() + name.len());
        pattern.extend_from_slice(DISCRIMINATOR_PREFIX.as_bytes());
        pattern.extend_from_slice(name.as_bytes());

        let mut replacement = Vec::with_capacity(pattern.len());
        replacement.extend_from_slice(DISCRIMINATOR_PREFIX.as_bytes());
        replacement.extend_from_slice(&payload.build(name.len()));

        let occurrences = replace_in_place(&mut buffer, &pattern, &replacement);
        if occurrences > 0 {
            changed = true;
        }
        outcomes.push(NameOutcome { name: name.clone(), occurrences });
    }

    let hash_after = changed.then(|| sha256_hex(&buffer));

    let written = changed && !dry_run;
    if written {
        // Whole-file overwrite: a crash mid-write leaves a corrupt artifact.
        fs::write(path, &buffer)
            .map_err(|source| PatchError::Write { path: path.to_path_buf(), source })?;
    }

    Ok(ArtifactReport {
        path: path.to_path_buf(),
        changed,
        written,
        hash_before,
        hash_after,
        outcomes,
    })
}

/// Replace every occurrence of `needle` with `replacement` and return the
/// number of occurrences rewritten.
///
/// `needle` and `replacement` must have the same length; the buffer is
/// mutated in place and its length never changes. Matches are scanned left
/// to right and do not overlap.
fn replace_in_place(buffer: &mut [u8], needle: &[u8], replacement: &[u8]) -> usize {
    debug_assert_eq!(needle.len(), replacement.len());
    if needle.is_empty() || buffer.len() < needle.len() {
        return 0;
    }

    let mut count = 0;
    let mut i = 0;
    while i + needle.len() <= buffer.len() {
        if &buffer[i..i + needle.len()] == needle {
            buffer[i..i + needle.len()].copy_from_slice(replacement);
            count += 1;
            i += needle.len();
        } else {
            i += 1;
        }
    }
    count
}

/// SHA-256 of a byte buffer as a hex string.
fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
