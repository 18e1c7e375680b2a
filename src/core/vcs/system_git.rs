//! System git backend
//!
//! Builds git plumbing/porcelain invocations and hands them to a
//! [`CommandRunner`], so release tagging shares the same fail-fast execution
//! path (and the same test doubles) as every other pipeline step.

use crate::core::error::ReleaseResult;
use crate::core::exec::{CommandRunner, ToolCommand};
use std::path::{Path, PathBuf};

/// Git operations against one working tree using system git
#[derive(Debug, Clone)]
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  pub fn new(repo_path: &Path) -> Self {
    Self {
      repo_path: repo_path.to_path_buf(),
    }
  }

  /// Stage every pending change (`git add .`)
  pub fn stage_all(&self, runner: &mut dyn CommandRunner) -> ReleaseResult<()> {
    runner.run_checked(&self.git_cmd(["add", "."]))?;
    Ok(())
  }

  /// Commit the staged changes
  pub fn commit(&self, runner: &mut dyn CommandRunner, message: &str) -> ReleaseResult<()> {
    runner.run_checked(&self.git_cmd(["commit", "-m", message]))?;
    Ok(())
  }

  /// Create an annotated tag at HEAD
  pub fn tag_annotated(&self, runner: &mut dyn CommandRunner, tag: &str, message: &str) -> ReleaseResult<()> {
    runner.run_checked(&self.git_cmd(["tag", "-a", tag, "-m", message]))?;
    Ok(())
  }

  /// Push a single tag to a remote
  pub fn push_tag(&self, runner: &mut dyn CommandRunner, remote: &str, tag: &str) -> ReleaseResult<()> {
    runner.run_checked(&self.git_cmd(["push", remote, tag]))?;
    Ok(())
  }

  /// Push the current branch to its upstream
  pub fn push_branch(&self, runner: &mut dyn CommandRunner) -> ReleaseResult<()> {
    runner.run_checked(&self.git_cmd(["push"]))?;
    Ok(())
  }

  /// Create a git command scoped to this repository
  ///
  /// - Runs with `-C <repo>` so the caller's cwd does not matter
  /// - Adds config overrides that keep output stable
  pub(crate) fn git_cmd<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> ToolCommand {
    ToolCommand::new("git")
      .arg("-C")
      .arg(self.repo_path.to_string_lossy())
      .args(["-c", "advice.detachedHead=false"])
      .args(["-c", "core.quotePath=false"])
      .args(args)
  }
}
