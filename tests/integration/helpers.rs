//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub const PYPROJECT: &str = r#"[build-system]
requires = ["hatchling"]
build-backend = "hatchling.build"

[project]
name = "demo-pkg"
version = "1.0.0"  # bumped by pyrelease
description = "Demo package"
dependencies = [
    "httpx>=0.27",
]
"#;

/// A throwaway Python project with fake tooling
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
  /// Bare repository acting as `origin`, once `init_git` ran
  _remote: Option<TempDir>,
}

impl TestProject {
  /// Project whose every tool succeeds and leaves a marker file
  pub fn new() -> Result<Self> {
    Self::with_tools(&[])
  }

  /// Project with selected tools replaced (`("test", r#"["false"]"#)`)
  pub fn with_tools(overrides: &[(&str, &str)]) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(path.join("pyproject.toml"), PYPROJECT)?;

    let mut tools = vec![
      ("test", r#"["touch", ".tested"]"#),
      ("format_check", r#"["touch", ".formatted"]"#),
      ("type_check", r#"["touch", ".typed"]"#),
      ("install_build_tools", r#"["true"]"#),
      (
        "build",
        r#"["sh", "-c", "mkdir -p dist && printf sdist > dist/demo_pkg-1.0.0.tar.gz"]"#,
      ),
      ("check", r#"["ls", "dist/*"]"#),
      ("upload_staging", r#"["touch", ".staging"]"#),
      ("upload_production", r#"["touch", ".production"]"#),
    ];
    for (name, argv) in overrides {
      if let Some(entry) = tools.iter_mut().find(|(tool, _)| tool == name) {
        entry.1 = argv;
      }
    }

    let mut config = String::from("[tools]\n");
    for (name, argv) in tools {
      config.push_str(&format!("{} = {}\n", name, argv));
    }
    std::fs::write(path.join("release.toml"), config)?;

    Ok(Self {
      _root: root,
      path,
      _remote: None,
    })
  }

  /// Make the project a git repo on `main` with a local bare `origin`
  pub fn init_git(&mut self) -> Result<PathBuf> {
    let remote = TempDir::new()?;
    git(remote.path(), &["init", "--bare", "--initial-branch=main"])?;

    git(&self.path, &["init", "--initial-branch=main"])?;
    git(&self.path, &["config", "user.name", "Test User"])?;
    git(&self.path, &["config", "user.email", "test@example.com"])?;
    git(&self.path, &["config", "commit.gpgsign", "false"])?;
    git(&self.path, &["config", "tag.gpgsign", "false"])?;
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", "Initial project"])?;

    let remote_path = remote.path().to_path_buf();
    git(&self.path, &["remote", "add", "origin", &remote_path.to_string_lossy()])?;
    git(&self.path, &["push", "-u", "origin", "main"])?;

    self._remote = Some(remote);
    Ok(remote_path)
  }

  pub fn has_marker(&self, name: &str) -> bool {
    self.path.join(name).exists()
  }

  pub fn read(&self, rel: &str) -> Result<String> {
    std::fs::read_to_string(self.path.join(rel)).with_context(|| format!("Failed to read {}", rel))
  }
}

/// Run a git command, failing on non-zero exit
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the pyrelease binary in `cwd`, feeding `stdin` to its prompts
pub fn run_pyrelease(cwd: &Path, args: &[&str], stdin: &str) -> Result<Output> {
  let mut child = Command::new(env!("CARGO_BIN_EXE_pyrelease"))
    .current_dir(cwd)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to start pyrelease")?;

  if let Some(mut input) = child.stdin.take() {
    input.write_all(stdin.as_bytes())?;
  }

  child.wait_with_output().context("Failed to wait for pyrelease")
}

pub fn stdout_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
