//! `pyproject.toml` version handling
//!
//! Uses `toml_edit` so a version bump is a parse-modify-serialize cycle that
//! leaves comments, key order and whitespace alone. The version is looked up
//! in `[project]` (PEP 621) first, then `[tool.poetry]`.

use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Value};

/// Tables that may hold `version` / `name`, in lookup order
const PACKAGE_TABLES: &[&[&str]] = &[&["project"], &["tool", "poetry"]];

/// A parsed manifest, kept in lossless form
#[derive(Debug, Clone)]
pub struct Manifest {
  path: PathBuf,
  doc: DocumentMut,
}

impl Manifest {
  /// Read and parse a manifest
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    if !path.is_file() {
      return Err(ReleaseError::Config(ConfigError::ManifestNotFound {
        path: path.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Self::parse(path, &content)
  }

  /// Parse manifest text that was read elsewhere
  pub fn parse(path: &Path, content: &str) -> ReleaseResult<Self> {
    let doc = content.parse::<DocumentMut>().map_err(|e| {
      ReleaseError::Config(ConfigError::ManifestParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
      })
    })?;

    Ok(Self {
      path: path.to_path_buf(),
      doc,
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Current version string
  pub fn version(&self) -> ReleaseResult<String> {
    self.string_field("version").ok_or_else(|| {
      ReleaseError::Config(ConfigError::VersionNotFound {
        path: self.path.clone(),
      })
    })
  }

  /// Distribution name, if the manifest declares one
  pub fn package_name(&self) -> Option<String> {
    self.string_field("name")
  }

  /// Replace the version value where it was found, keeping its decoration
  pub fn set_version(&mut self, version: &str) -> ReleaseResult<()> {
    for table in PACKAGE_TABLES {
      if let Some(Item::Value(value)) = self.lookup_mut(table, "version")
        && value.is_str()
      {
        let decor = value.decor().clone();
        *value = Value::from(version);
        *value.decor_mut() = decor;
        return Ok(());
      }
    }

    Err(ReleaseError::Config(ConfigError::VersionNotFound {
      path: self.path.clone(),
    }))
  }

  /// Write the document back to where it was loaded from
  pub fn save(&self) -> ReleaseResult<()> {
    fs::write(&self.path, self.doc.to_string()).with_context(|| format!("Failed to write {}", self.path.display()))
  }

  fn string_field(&self, key: &str) -> Option<String> {
    PACKAGE_TABLES
      .iter()
      .find_map(|table| self.lookup(table, key).and_then(Item::as_str).map(str::to_string))
  }

  fn lookup(&self, table: &[&str], key: &str) -> Option<&Item> {
    let mut item = self.doc.as_item();
    for segment in table {
      item = item.get(segment)?;
    }
    item.get(key)
  }

  fn lookup_mut(&mut self, table: &[&str], key: &str) -> Option<&mut Item> {
    let mut item = self.doc.as_item_mut();
    for segment in table {
      item = item.get_mut(segment)?;
    }
    item.get_mut(key)
  }
}

/// Read the version from a manifest on disk
pub fn read_version(path: &Path) -> ReleaseResult<String> {
  Manifest::load(path)?.version()
}

/// Rewrite the version of a manifest on disk
pub fn update_version(path: &Path, version: &str) -> ReleaseResult<()> {
  let mut manifest = Manifest::load(path)?;
  manifest.set_version(version)?;
  manifest.save()
}
