//! Optional `release.toml` configuration
//!
//! Every key has a default that reproduces the stock uv/black/mypy/build/twine
//! workflow, so most projects never need the file.

use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for pyrelease
/// Searched in order: release.toml, .release.toml, .config/release.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
  /// Manifest path, relative to the project root
  #[serde(default = "default_manifest")]
  pub manifest: PathBuf,

  /// Package name used when the manifest does not declare one
  #[serde(default)]
  pub package_name: Option<String>,

  #[serde(default)]
  pub tools: ToolsConfig,

  #[serde(default)]
  pub registry: RegistryConfig,

  #[serde(default)]
  pub git: GitConfig,
}

fn default_manifest() -> PathBuf {
  PathBuf::from("pyproject.toml")
}

/// External tool invocations, each an argv list (no shell)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
  pub test: Vec<String>,
  pub format_check: Vec<String>,
  pub type_check: Vec<String>,
  pub install_build_tools: Vec<String>,
  pub build: Vec<String>,
  pub check: Vec<String>,
  pub upload_staging: Vec<String>,
  pub upload_production: Vec<String>,
}

fn argv(parts: &[&str]) -> Vec<String> {
  parts.iter().map(|s| s.to_string()).collect()
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      test: argv(&["uv", "run", "pytest"]),
      format_check: argv(&["uv", "run", "black", "--check", "."]),
      type_check: argv(&["uv", "run", "mypy", "src"]),
      install_build_tools: argv(&["pip", "install", "build", "twine"]),
      build: argv(&["python", "-m", "build"]),
      check: argv(&["twine", "check", "dist/*"]),
      upload_staging: argv(&["twine", "upload", "--repository", "testpypi", "dist/*"]),
      upload_production: argv(&["twine", "upload", "dist/*"]),
    }
  }
}

impl ToolsConfig {
  fn named(&self) -> [(&'static str, &Vec<String>); 8] {
    [
      ("tools.test", &self.test),
      ("tools.format_check", &self.format_check),
      ("tools.type_check", &self.type_check),
      ("tools.install_build_tools", &self.install_build_tools),
      ("tools.build", &self.build),
      ("tools.check", &self.check),
      ("tools.upload_staging", &self.upload_staging),
      ("tools.upload_production", &self.upload_production),
    ]
  }

  /// Every tool must name a program
  pub fn validate(&self) -> ReleaseResult<()> {
    for (field, cmd) in self.named() {
      if cmd.first().is_none_or(|program| program.trim().is_empty()) {
        return Err(ReleaseError::Config(ConfigError::InvalidField {
          field: field.to_string(),
          reason: "command must not be empty".to_string(),
        }));
      }
    }
    Ok(())
  }
}

/// Registry URL templates; `{name}` and `{version}` are substituted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
  pub production_url: String,
  pub staging_url: String,
}

impl Default for RegistryConfig {
  fn default() -> Self {
    Self {
      production_url: "https://pypi.org/project/{name}/{version}/".to_string(),
      staging_url: "https://test.pypi.org/project/{name}/{version}/".to_string(),
    }
  }
}

impl RegistryConfig {
  pub fn validate(&self) -> ReleaseResult<()> {
    for (field, template) in [
      ("registry.production_url", &self.production_url),
      ("registry.staging_url", &self.staging_url),
    ] {
      if !template.contains("{version}") {
        return Err(ReleaseError::Config(ConfigError::InvalidField {
          field: field.to_string(),
          reason: "template must contain {version}".to_string(),
        }));
      }
    }
    Ok(())
  }

  /// Production URL for a published version
  pub fn production_url_for(&self, name: &str, version: &str) -> String {
    render_url(&self.production_url, name, version)
  }

  /// Staging URL for a published version
  pub fn staging_url_for(&self, name: &str, version: &str) -> String {
    render_url(&self.staging_url, name, version)
  }
}

fn render_url(template: &str, name: &str, version: &str) -> String {
  template.replace("{name}", name).replace("{version}", version)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
  /// Remote the release tag is pushed to
  pub remote: String,
  /// Tag name is `<tag_prefix><version>`
  pub tag_prefix: String,
}

impl Default for GitConfig {
  fn default() -> Self {
    Self {
      remote: "origin".to_string(),
      tag_prefix: "v".to_string(),
    }
  }
}

impl GitConfig {
  pub fn validate(&self) -> ReleaseResult<()> {
    if self.remote.trim().is_empty() {
      return Err(ReleaseError::Config(ConfigError::InvalidField {
        field: "git.remote".to_string(),
        reason: "remote must not be empty".to_string(),
      }));
    }
    if self.tag_prefix.chars().any(char::is_whitespace) {
      return Err(ReleaseError::Config(ConfigError::InvalidField {
        field: "git.tag_prefix".to_string(),
        reason: "tag prefix must not contain whitespace".to_string(),
      }));
    }
    Ok(())
  }

  pub fn tag_name(&self, version: &str) -> String {
    format!("{}{}", self.tag_prefix, version)
  }
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      manifest: default_manifest(),
      package_name: None,
      tools: ToolsConfig::default(),
      registry: RegistryConfig::default(),
      git: GitConfig::default(),
    }
  }
}

impl ReleaseConfig {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("release.toml"),
      path.join(".release.toml"),
      path.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config if one exists, defaults otherwise
  pub fn load_or_default(path: &Path) -> ReleaseResult<Self> {
    match Self::find_config_path(path) {
      Some(config_path) => Self::load_from(&config_path),
      None => Ok(Self::default()),
    }
  }

  /// Load and validate a specific config file
  pub fn load_from(config_path: &Path) -> ReleaseResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ReleaseConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  pub fn validate(&self) -> ReleaseResult<()> {
    if self.manifest.as_os_str().is_empty() {
      return Err(ReleaseError::Config(ConfigError::InvalidField {
        field: "manifest".to_string(),
        reason: "path must not be empty".to_string(),
      }));
    }
    self.tools.validate()?;
    self.registry.validate()?;
    self.git.validate()
  }
}
