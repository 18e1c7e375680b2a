//! Core building blocks for pyrelease
//!
//! - **config**: release.toml parsing and validation
//! - **context**: project root + config, built once and shared
//! - **error**: error types with contextual help messages
//! - **exec**: command-execution capability (real, dry-run)
//! - **prompt**: yes/no confirmation capability
//! - **vcs**: git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod prompt;
pub mod vcs;
