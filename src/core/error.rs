//! Error types for pyrelease with contextual messages and exit codes
//!
//! Every failure the pipeline can hit lands in one of four categories:
//! configuration (manifest or `release.toml`), validation (bad user input),
//! execution (an external tool exited non-zero) and I/O. Each category knows
//! how to suggest a fix, and `print_error` renders it for the operator.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for pyrelease
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Full success, or a declined production gate
  Success = 0,
  /// Any failure: validation, missing manifest, failed tool
  Failure = 1,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for pyrelease
#[derive(Debug)]
pub enum ReleaseError {
  /// Manifest / configuration errors
  Config(ConfigError),

  /// Rejected user input
  Validation(ValidationError),

  /// An external tool exited non-zero
  Execution(ExecutionError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// Categorised errors are promoted to a message so the context line is
  /// never dropped; their help text survives the promotion.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      // Execution errors carry captured output that print_error needs verbatim
      ReleaseError::Execution(_) => self,
      other => {
        let help = other.help_message();
        ReleaseError::Message {
          message: ctx_str,
          context: Some(other.to_string()),
          help,
        }
      }
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_)
      | ReleaseError::Validation(_)
      | ReleaseError::Execution(_)
      | ReleaseError::Io(_)
      | ReleaseError::Message { .. } => ExitCode::Failure,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Validation(e) => e.help_message(),
      ReleaseError::Execution(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      ReleaseError::Io(_) => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Validation(e) => write!(f, "{}", e),
      ReleaseError::Execution(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<ConfigError> for ReleaseError {
  fn from(err: ConfigError) -> Self {
    ReleaseError::Config(err)
  }
}

impl From<ValidationError> for ReleaseError {
  fn from(err: ValidationError) -> Self {
    ReleaseError::Validation(err)
  }
}

impl From<ExecutionError> for ReleaseError {
  fn from(err: ExecutionError) -> Self {
    ReleaseError::Execution(err)
  }
}

impl From<toml_edit::TomlError> for ReleaseError {
  fn from(err: toml_edit::TomlError) -> Self {
    ReleaseError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<glob::PatternError> for ReleaseError {
  fn from(err: glob::PatternError) -> Self {
    ReleaseError::message(format!("Invalid glob pattern: {}", err))
  }
}

/// Configuration-related errors (manifest and release.toml)
#[derive(Debug)]
pub enum ConfigError {
  /// The manifest is not where we were told to look
  ManifestNotFound { path: PathBuf },

  /// The manifest parsed but carries no version assignment
  VersionNotFound { path: PathBuf },

  /// The manifest is not valid TOML
  ManifestParse { path: PathBuf, reason: String },

  /// release.toml holds a value we cannot use
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::ManifestNotFound { .. } => Some("Run pyrelease from the project root directory.".to_string()),
      ConfigError::VersionNotFound { .. } => {
        Some("Add `version = \"X.Y.Z\"` under [project] (or [tool.poetry]).".to_string())
      }
      ConfigError::ManifestParse { .. } => None,
      ConfigError::InvalidField { .. } => Some("Check release.toml against the documented keys.".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::ManifestNotFound { path } => {
        write!(f, "{} not found", path.display())
      }
      ConfigError::VersionNotFound { path } => {
        write!(f, "Version not found in {}", path.display())
      }
      ConfigError::ManifestParse { path, reason } => {
        write!(f, "Failed to parse {}: {}", path.display(), reason)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid release.toml field `{}`: {}", field, reason)
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Target version is not MAJOR.MINOR.PATCH
  Version { input: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::Version { .. } => Some("Use a semantic version such as 1.0.1.".to_string()),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::Version { input } => {
        write!(f, "Version must follow MAJOR.MINOR.PATCH (got '{}')", input)
      }
    }
  }
}

/// A checked external command exited non-zero (or could not be spawned)
#[derive(Debug)]
pub struct ExecutionError {
  /// Rendered command line
  pub command: String,
  /// Exit code, `None` when killed by a signal or never spawned
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ExecutionError {
  fn help_message(&self) -> Option<String> {
    if self.stderr.contains("403") || self.stderr.contains("Invalid or non-existent authentication") {
      Some("Check your registry credentials (~/.pypirc or TWINE_* environment variables).".to_string())
    } else if self.stderr.contains("File already exists") {
      Some("This version is already on the registry. Bump it with --version.".to_string())
    } else if self.stderr.contains("non-fast-forward") {
      Some("The remote has commits you don't have. Pull first, then re-run.".to_string())
    } else {
      None
    }
  }
}

impl fmt::Display for ExecutionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.code {
      Some(code) => write!(f, "Command failed (exit code {}): {}", code, self.command),
      None => write!(f, "Command failed: {}", self.command),
    }
  }
}

/// Result type alias for pyrelease
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with captured tool output and help text
pub fn print_error(error: &ReleaseError) {
  if let ReleaseError::Execution(exec) = error {
    eprintln!("\n❌ Error running: {}", exec.command);
    eprintln!("Stdout: {}", exec.stdout.trim_end());
    eprintln!("Stderr: {}", exec.stderr.trim_end());
  }

  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to ReleaseError
impl From<anyhow::Error> for ReleaseError {
  fn from(err: anyhow::Error) -> Self {
    ReleaseError::message(err.to_string())
  }
}
