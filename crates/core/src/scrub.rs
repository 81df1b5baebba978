//! End-to-end scrub pipeline: extract instruction names from a source tree,
//! then patch each deployed artifact in place.
//!
//! Artifacts are processed one at a time with no shared state between them;
//! each buffer is mutated wholly in memory before any write-back, so a fatal
//! error never leaves an artifact half-patched.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{self, ExtractError, Extraction, DEFAULT_MARKER};
use crate::patch::{self, ArtifactReport, PatchError, ARTIFACT_EXTENSION};
use crate::payload::PayloadSpec;

/// Configuration for one scrub run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubConfig {
    /// Root of the source tree to scan for instruction declarations.
    pub source_root: PathBuf,
    /// Directory holding the deployed artifacts to patch.
    pub deploy_dir: PathBuf,
    /// Marker token activating a source file's declarations.
    pub marker: String,
    /// Filler/pad scheme for replacement payloads.
    pub payload: PayloadSpec,
    /// Report what would change without writing artifacts back.
    pub dry_run: bool,
}

impl ScrubConfig {
    /// Build a configuration with default marker and payload scheme.
    pub fn new(source_root: impl Into<PathBuf>, deploy_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            deploy_dir: deploy_dir.into(),
            marker: DEFAULT_MARKER.to_string(),
            payload: PayloadSpec::default(),
            dry_run: false,
        }
    }
}

/// Error type for the scrub pipeline.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// No live program markers, or no declarations inside them. Patching
    /// would be a silent no-op, so the run stops before touching artifacts.
    #[error("No instruction declarations found under {0}")]
    NoInstructions(PathBuf),

    /// The deploy directory contains no matching artifacts.
    #[error("No .so artifacts found in {0}")]
    NoArtifacts(PathBuf),

    /// The deploy directory could not be enumerated.
    #[error("Failed to read deploy directory {path}: {source}")]
    DeployDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Convenience result type for pipeline operations.
pub type ScrubResult<T> = Result<T, ScrubError>;

/// Full report of one scrub run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: String,
    pub finished_at: String,
    pub dry_run: bool,
    pub extraction: Extraction,
    pub artifacts: Vec<ArtifactReport>,
}

impl RunReport {
    /// Number of artifacts that had at least one discriminator replaced.
    pub fn changed_count(&self) -> usize {
        self.artifacts.iter().filter(|a| a.changed).count()
    }
}

/// Enumerate the artifacts to patch: regular `.so` files directly inside
/// `deploy_dir`, sorted by path for deterministic processing order.
///
/// A missing/unreadable directory or an empty artifact set is fatal for the
/// whole run -- there is nothing to patch.
pub fn collect_artifacts(deploy_dir: &Path) -> ScrubResult<Vec<PathBuf>> {
    let entries = fs::read_dir(deploy_dir)
        .map_err(|source| ScrubError::DeployDir { path: deploy_dir.to_path_buf(), source })?;

    let mut artifacts = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|source| ScrubError::DeployDir { path: deploy_dir.to_path_buf(), source })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(ARTIFACT_EXTENSION) {
            continue;
        }
        artifacts.push(path);
    }
    artifacts.sort();

    if artifacts.is_empty() {
        return Err(ScrubError::NoArtifacts(deploy_dir.to_path_buf()));
    }
    Ok(artifacts)
}

/// Run the full pipeline: extract, then patch every artifact.
///
/// The extracted name sequence is the sole handoff between the two passes;
/// duplicates are processed redundantly but harmlessly, since after the
/// first replacement the pattern no longer matches.
pub fn run(config: &ScrubConfig) -> ScrubResult<RunReport> {
    let started_at = Utc::now().to_rfc3339();

    let extraction = extract::scan_tree(&config.source_root, &config.marker)?;
    if extraction.is_empty() {
        return Err(ScrubError::NoInstructions(config.source_root.clone()));
    }
    let names = extraction.names();

    let artifact_paths = collect_artifacts(&config.deploy_dir)?;

    let mut artifacts = Vec::with_capacity(artifact_paths.len());
    for path in &artifact_paths {
        artifacts.push(patch::patch_artifact(path, &names, &config.payload, config.dry_run)?);
    }

    Ok(RunReport {
        started_at,
        finished_at: Utc::now().to_rfc3339(),
        dry_run: config.dry_run,
        extraction,
        artifacts,
    })
}
