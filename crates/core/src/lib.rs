//! scrub-core
//!
//! Core library for scrubbing instruction-name strings from deployed program
//! binaries.
//!
//! This crate defines the source-tree extractor (which instruction names a
//! program exports), the same-length replacement payload scheme, the in-place
//! artifact patcher, and the end-to-end pipeline tying them together.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, build scripts, etc.).

pub mod extract;
pub mod patch;
pub mod payload;
pub mod scrub;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
