//! Build output housekeeping: clean before a build, fingerprint after

use crate::core::error::{ReleaseResult, ResultExt};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Directories a previous build may have left behind
const BUILD_DIRS: &[&str] = &["dist", "build"];

/// Remove `dist/`, `build/` and `*.egg-info` under `root`
///
/// Best-effort: anything that cannot be removed is left in place and skipped
/// silently. Returns the paths that were actually removed.
pub fn clean_build_outputs(root: &Path) -> Vec<PathBuf> {
  let mut candidates: Vec<PathBuf> = BUILD_DIRS.iter().map(|dir| root.join(dir)).collect();

  let egg_info = format!("{}/*.egg-info", glob::Pattern::escape(&root.to_string_lossy()));
  if let Ok(paths) = glob::glob(&egg_info) {
    candidates.extend(paths.filter_map(Result::ok));
  }

  candidates
    .into_iter()
    .filter(|path| remove_path(path))
    .collect()
}

fn remove_path(path: &Path) -> bool {
  match fs::symlink_metadata(path) {
    Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).is_ok(),
    Ok(_) => fs::remove_file(path).is_ok(),
    Err(_) => false,
  }
}

/// A built distribution file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  /// File name inside dist/
  pub name: String,
  pub size: u64,
  /// Lowercase hex SHA-256
  pub sha256: String,
}

/// List regular files in `dist_dir`, sorted by name, with their digests
///
/// A missing directory yields an empty list.
pub fn collect_artifacts(dist_dir: &Path) -> ReleaseResult<Vec<Artifact>> {
  if !dist_dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut artifacts = Vec::new();
  for entry in fs::read_dir(dist_dir).with_context(|| format!("Failed to list {}", dist_dir.display()))? {
    let entry = entry?;
    let path = entry.path();
    if !path.is_file() {
      continue;
    }

    let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    artifacts.push(Artifact {
      name: entry.file_name().to_string_lossy().into_owned(),
      size: bytes.len() as u64,
      sha256: format!("{:x}", Sha256::digest(&bytes)),
    });
  }

  artifacts.sort_by(|a, b| a.name.cmp(&b.name));
  Ok(artifacts)
}
