//! pyrelease - fail-fast release pipeline for Python packages
//!
//! Bumps the version in `pyproject.toml`, runs tests and lint, builds
//! distributions, uploads them to TestPyPI and PyPI, and tags the release.
//! Also ships serde models for the Bitbucket Cloud API resources the
//! surrounding tooling consumes.

pub mod bitbucket;
pub mod commands;
pub mod core;
pub mod manifest;
pub mod release;
pub mod ui;
pub mod utils;
