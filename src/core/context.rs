//! Release context - build once in main, pass everywhere
//!
//! Holds the project root and the loaded configuration so the pipeline and
//! its steps never re-read `release.toml` or re-resolve paths.

use crate::core::config::ReleaseConfig;
use crate::core::error::ReleaseResult;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ReleaseContext {
  /// Project root (the directory pyrelease was started in)
  pub root: PathBuf,

  /// Loaded release.toml, or defaults
  pub config: ReleaseConfig,
}

impl ReleaseContext {
  /// Build the context for a project root, loading release.toml if present
  pub fn build(root: &Path) -> ReleaseResult<Self> {
    let config = ReleaseConfig::load_or_default(root)?;
    Ok(Self::with_config(root, config))
  }

  /// Build a context around an already-loaded configuration
  pub fn with_config(root: &Path, config: ReleaseConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      config,
    }
  }

  pub fn project_root(&self) -> &Path {
    &self.root
  }

  /// Absolute path of the manifest
  pub fn manifest_path(&self) -> PathBuf {
    self.root.join(&self.config.manifest)
  }

  /// Directory holding built artifacts
  pub fn dist_dir(&self) -> PathBuf {
    self.root.join("dist")
  }
}
