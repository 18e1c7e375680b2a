//! Release pipeline for Python packages
//!
//! # Flow
//!
//! 1. The manifest must exist in the project root
//! 2. Target version = `--version` (validated) or the manifest's current one
//! 3. A new version is written to the manifest before anything else runs
//! 4. Tests, lint, build: each fail-fast
//! 5. Publish to TestPyPI, PyPI, or both with a confirmation gate between
//! 6. Optional git commit + annotated tag + push, behind a second gate
//!
//! Nothing is rolled back on failure. A failed run is re-run from the top;
//! re-applying the same target version is a no-op.

pub mod artifacts;
pub mod pipeline;
pub mod report;
pub mod version;

pub use pipeline::{PublishMode, ReleaseOptions, ReleaseOutcome, ReleasePipeline};
pub use report::ReleaseReport;
