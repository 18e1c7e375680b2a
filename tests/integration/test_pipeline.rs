//! Integration tests for the `pyrelease` pipeline
#![cfg(unix)]

use crate::helpers::{PYPROJECT, TestProject, git, run_pyrelease, stderr_of, stdout_of};
use anyhow::Result;

#[test]
fn test_missing_manifest_fails_before_any_tool() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::remove_file(project.path.join("pyproject.toml"))?;

  let output = run_pyrelease(&project.path, &["--testpypi-only"], "")?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("pyproject.toml not found"));
  assert!(!project.has_marker(".tested"));
  assert!(!project.has_marker(".staging"));
  Ok(())
}

#[test]
fn test_staging_only_release() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_pyrelease(&project.path, &["--testpypi-only"], "")?;
  let stdout = stdout_of(&output);

  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  for marker in [".tested", ".formatted", ".typed", ".staging"] {
    assert!(project.has_marker(marker), "missing {}", marker);
  }
  assert!(!project.has_marker(".production"));
  assert!(stdout.contains("📍 Current version: 1.0.0"));
  assert!(stdout.contains("🎉 Publish complete! Version 1.0.0"));
  assert!(stdout.contains("https://test.pypi.org/project/demo-pkg/1.0.0/"));
  assert!(stdout.contains("demo_pkg-1.0.0.tar.gz"));
  assert_eq!(project.read("pyproject.toml")?, PYPROJECT);
  Ok(())
}

#[test]
fn test_failing_tests_stop_the_pipeline() -> Result<()> {
  let project = TestProject::with_tools(&[("test", r#"["sh", "-c", "echo 2 failed >&2; exit 1"]"#)])?;

  let output = run_pyrelease(&project.path, &["--testpypi-only"], "")?;
  let stderr = stderr_of(&output);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("2 failed"), "stderr: {}", stderr);
  assert!(!project.has_marker(".formatted"));
  assert!(!project.path.join("dist").exists());
  assert!(!project.has_marker(".staging"));
  Ok(())
}

#[test]
fn test_skip_flags_bypass_steps() -> Result<()> {
  let project = TestProject::with_tools(&[("test", r#"["false"]"#), ("type_check", r#"["false"]"#)])?;

  let output = run_pyrelease(&project.path, &["--skip-tests", "--skip-lint", "--testpypi-only"], "")?;

  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(!project.has_marker(".formatted"));
  assert!(project.has_marker(".staging"));
  Ok(())
}

#[test]
fn test_invalid_version_leaves_manifest_untouched() -> Result<()> {
  let project = TestProject::new()?;

  for bad in ["1.2", "v1.2.3", "1.2.3-beta"] {
    let output = run_pyrelease(&project.path, &["--version", bad, "--testpypi-only"], "")?;
    assert_eq!(output.status.code(), Some(1), "{} should be rejected", bad);
    assert!(stderr_of(&output).contains("MAJOR.MINOR.PATCH"));
  }

  assert_eq!(project.read("pyproject.toml")?, PYPROJECT);
  assert!(!project.has_marker(".tested"));
  Ok(())
}

#[test]
fn test_version_bump_preserves_formatting() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_pyrelease(&project.path, &["--version", "1.1.0", "--testpypi-only", "--no-tag"], "")?;

  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  let expected = PYPROJECT.replace(r#"version = "1.0.0""#, r#"version = "1.1.0""#);
  assert_eq!(project.read("pyproject.toml")?, expected);
  assert!(stdout_of(&output).contains("🎉 Publish complete! Version 1.1.0"));
  Ok(())
}

#[test]
fn test_declined_production_exits_cleanly() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_pyrelease(&project.path, &[], "n\n")?;
  let stdout = stdout_of(&output);

  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(stdout.contains("TestPyPI OK. Publish to PyPI? (y/N)"));
  assert!(project.has_marker(".staging"));
  assert!(!project.has_marker(".production"));
  assert!(!stdout.contains("🎉 Publish complete!"));
  Ok(())
}

#[test]
fn test_confirmed_production_publishes_both() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_pyrelease(&project.path, &[], "yes\n")?;
  let stdout = stdout_of(&output);

  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(project.has_marker(".staging"));
  assert!(project.has_marker(".production"));
  assert!(stdout.contains("https://pypi.org/project/demo-pkg/1.0.0/"));
  Ok(())
}

#[test]
fn test_declined_tag_still_completes() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_pyrelease(&project.path, &["--version", "2.0.0", "--pypi-only"], "n\n")?;
  let stdout = stdout_of(&output);

  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(stdout.contains("Create git tag v2.0.0?"));
  assert!(stdout.contains("Skipped git tag"));
  assert!(stdout.contains("🎉 Publish complete! Version 2.0.0"));
  assert!(!project.has_marker(".staging"));
  assert!(project.has_marker(".production"));
  Ok(())
}

#[test]
fn test_release_tags_and_pushes_to_remote() -> Result<()> {
  let mut project = TestProject::new()?;
  let remote = project.init_git()?;

  let output = run_pyrelease(&project.path, &["--version", "1.0.1", "--pypi-only", "-y"], "")?;
  let stdout = stdout_of(&output);

  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(stdout.contains("🏷️  Tag: v1.0.1"));

  let tags = git(&remote, &["tag", "-l"])?;
  assert_eq!(String::from_utf8_lossy(&tags.stdout).trim(), "v1.0.1");

  let kind = git(&remote, &["cat-file", "-t", "v1.0.1"])?;
  assert_eq!(String::from_utf8_lossy(&kind.stdout).trim(), "tag", "tag should be annotated");

  let message = git(&remote, &["tag", "-l", "--format=%(contents:subject)", "v1.0.1"])?;
  assert_eq!(String::from_utf8_lossy(&message.stdout).trim(), "Release v1.0.1");

  let head = git(&remote, &["log", "-1", "--format=%s", "main"])?;
  assert_eq!(String::from_utf8_lossy(&head.stdout).trim(), "Bump version to 1.0.1");

  let pushed = git(&remote, &["show", "main:pyproject.toml"])?;
  assert!(String::from_utf8_lossy(&pushed.stdout).contains(r#"version = "1.0.1"  # bumped by pyrelease"#));
  Ok(())
}

#[test]
fn test_dry_run_changes_nothing() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_pyrelease(&project.path, &["--version", "3.0.0", "--dry-run"], "")?;
  let stdout = stdout_of(&output);

  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(stdout.contains("🔍 Would run: touch .tested"));
  assert!(stdout.contains("Would update version to 3.0.0"));
  assert_eq!(project.read("pyproject.toml")?, PYPROJECT);
  for marker in [".tested", ".staging", ".production"] {
    assert!(!project.has_marker(marker), "{} should not exist", marker);
  }
  Ok(())
}

#[test]
fn test_conflicting_registry_flags_are_a_usage_error() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_pyrelease(&project.path, &["--testpypi-only", "--pypi-only"], "")?;

  assert_eq!(output.status.code(), Some(2));
  assert!(!project.has_marker(".tested"));
  Ok(())
}

#[test]
fn test_unknown_config_key_is_rejected() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::write(project.path.join("release.toml"), "[tools]\nlint = [\"ruff\"]\n")?;

  let output = run_pyrelease(&project.path, &["--testpypi-only"], "")?;

  assert_eq!(output.status.code(), Some(1));
  assert!(!project.has_marker(".tested"));
  Ok(())
}
