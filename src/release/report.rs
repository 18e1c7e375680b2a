//! End-of-run summary

use crate::release::artifacts::Artifact;
use serde::Serialize;
use std::fmt;

/// Package index a build was uploaded to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Registry {
  /// TestPyPI
  Staging,
  /// PyPI
  Production,
}

impl fmt::Display for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Registry::Staging => write!(f, "TestPyPI"),
      Registry::Production => write!(f, "PyPI"),
    }
  }
}

/// Where a version was published
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publication {
  pub registry: Registry,
  pub url: String,
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseReport {
  pub package: String,
  pub version: String,
  /// In publish order
  pub published: Vec<Publication>,
  /// Tag name, if one was created and pushed
  pub tag: Option<String>,
  pub artifacts: Vec<Artifact>,
  pub dry_run: bool,
}

impl ReleaseReport {
  /// Production URL, falling back to staging for --testpypi-only runs
  pub fn primary_url(&self) -> Option<&str> {
    self
      .published
      .iter()
      .find(|p| p.registry == Registry::Production)
      .or_else(|| self.published.first())
      .map(|p| p.url.as_str())
  }

  /// Print the summary to stdout
  pub fn print(&self) {
    println!();
    if self.dry_run {
      println!("🔍 Dry-run complete. Version {} (nothing was changed)", self.version);
    } else {
      println!("🎉 Publish complete! Version {}", self.version);
    }

    for publication in &self.published {
      println!("📦 {}: {}", publication.registry, publication.url);
    }

    if let Some(tag) = &self.tag {
      println!("🏷️  Tag: {}", tag);
    }

    if !self.artifacts.is_empty() {
      println!();
      println!("Artifacts:");
      for artifact in &self.artifacts {
        println!("  {}  {} ({} bytes)", artifact.sha256, artifact.name, artifact.size);
      }
    }
  }
}
