//! The release pipeline
//!
//! A strictly sequential, fail-fast run:
//!
//! ```text
//! manifest check -> resolve version -> [bump] -> [tests] -> [lint] -> build
//!   -> publish (staging | production | staging + gate + production)
//!   -> [gate + tag] -> summary
//! ```
//!
//! Every external tool goes through the injected [`CommandRunner`] and every
//! operator question through the injected [`Confirm`], so each branch can be
//! driven from tests without spawning processes or reading stdin.

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::core::exec::{CommandRunner, ToolCommand};
use crate::core::prompt::Confirm;
use crate::core::vcs::SystemGit;
use crate::manifest::Manifest;
use crate::release::artifacts::{clean_build_outputs, collect_artifacts};
use crate::release::report::{Publication, Registry, ReleaseReport};
use crate::release::version::{compare_versions, validate_version};
use crate::ui::progress::StepProgress;
use crate::utils::expand_globs;
use std::cmp::Ordering;

/// Which registries to upload to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishMode {
  /// Staging, then production behind a confirmation gate
  #[default]
  Both,
  /// Staging only; no gate
  StagingOnly,
  /// Production only; staging skipped
  ProductionOnly,
}

/// Caller-controlled knobs for one run
#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
  /// Target version; `None` releases the manifest's current version
  pub new_version: Option<String>,
  pub skip_tests: bool,
  pub skip_lint: bool,
  pub publish_mode: PublishMode,
  pub no_tag: bool,
  /// Leave the manifest and build outputs untouched
  pub dry_run: bool,
}

impl ReleaseOptions {
  /// Number of steps the progress bar counts for this run
  fn step_count(&self) -> usize {
    let mut steps = 1; // build
    if self.new_version.is_some() {
      steps += 1;
      if !self.no_tag {
        steps += 1;
      }
    }
    if !self.skip_tests {
      steps += 1;
    }
    if !self.skip_lint {
      steps += 1;
    }
    steps
      + match self.publish_mode {
        PublishMode::Both => 2,
        PublishMode::StagingOnly | PublishMode::ProductionOnly => 1,
      }
  }
}

/// How a run that did not fail ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
  /// Every requested step ran
  Completed(ReleaseReport),
  /// Staging upload succeeded, the operator declined production
  ProductionDeclined { version: String },
}

pub struct ReleasePipeline<'a> {
  ctx: &'a ReleaseContext,
  options: &'a ReleaseOptions,
  runner: &'a mut dyn CommandRunner,
  prompt: &'a mut dyn Confirm,
  progress: Option<StepProgress>,
}

impl<'a> ReleasePipeline<'a> {
  pub fn new(
    ctx: &'a ReleaseContext,
    options: &'a ReleaseOptions,
    runner: &'a mut dyn CommandRunner,
    prompt: &'a mut dyn Confirm,
  ) -> Self {
    Self {
      ctx,
      options,
      runner,
      prompt,
      progress: None,
    }
  }

  /// Draw a step progress bar while running (terminal only)
  pub fn with_progress(mut self) -> Self {
    self.progress = StepProgress::for_terminal(self.options.step_count(), "Release");
    self
  }

  /// Run the whole pipeline
  pub fn run(&mut self) -> ReleaseResult<ReleaseOutcome> {
    let manifest = Manifest::load(&self.ctx.manifest_path())?;
    let current = manifest.version()?;
    println!("📍 Current version: {}", current);

    let package = self.package_name(&manifest);
    let version = self.resolve_version(manifest, &current)?;

    if !self.options.skip_tests {
      self.run_tests()?;
    }

    if !self.options.skip_lint {
      self.run_lint()?;
    }

    self.build_package()?;

    let mut published = Vec::new();
    match self.options.publish_mode {
      PublishMode::StagingOnly => {
        self.publish_staging()?;
        published.push(self.publication(Registry::Staging, &package, &version));
      }
      PublishMode::ProductionOnly => {
        self.publish_production()?;
        published.push(self.publication(Registry::Production, &package, &version));
      }
      PublishMode::Both => {
        self.publish_staging()?;
        published.push(self.publication(Registry::Staging, &package, &version));

        if !self.prompt.confirm("TestPyPI OK. Publish to PyPI?")? {
          println!("⏸️  PyPI publish cancelled");
          return Ok(ReleaseOutcome::ProductionDeclined { version });
        }

        self.publish_production()?;
        published.push(self.publication(Registry::Production, &package, &version));
      }
    }

    let mut tag = None;
    if self.options.new_version.is_some() && !self.options.no_tag {
      let tag_name = self.ctx.config.git.tag_name(&version);
      if self.prompt.confirm(&format!("Create git tag {}?", tag_name))? {
        self.create_tag(&version)?;
        tag = Some(tag_name);
      } else {
        println!("⏭️  Skipped git tag");
        self.step_done();
      }
    }

    let artifacts = if self.options.dry_run {
      Vec::new()
    } else {
      collect_artifacts(&self.ctx.dist_dir())?
    };

    Ok(ReleaseOutcome::Completed(ReleaseReport {
      package,
      version,
      published,
      tag,
      artifacts,
      dry_run: self.options.dry_run,
    }))
  }

  /// Pick the target version and write it to the manifest if it changed
  fn resolve_version(&mut self, mut manifest: Manifest, current: &str) -> ReleaseResult<String> {
    let Some(target) = &self.options.new_version else {
      return Ok(current.to_string());
    };

    validate_version(target)?;

    match compare_versions(target, current) {
      Some(Ordering::Less) => println!("⚠️  {} is older than the current version {}", target, current),
      Some(Ordering::Equal) => println!("⚠️  {} is already the current version", target),
      _ => {}
    }

    if self.options.dry_run {
      println!("🔍 Would update version to {} in {}", target, manifest.path().display());
    } else {
      manifest.set_version(target)?;
      manifest.save()?;
      println!("✅ Version updated to {}", target);
    }
    self.step_done();

    Ok(target.clone())
  }

  /// Run the test suite
  pub fn run_tests(&mut self) -> ReleaseResult<()> {
    println!("🧪 Running tests...");
    let cmd = self.tool(&self.ctx.config.tools.test, "tools.test")?;
    self.runner.run_checked(&cmd)?;
    println!("✅ Tests passed");
    self.step_done();
    Ok(())
  }

  /// Run the formatter check, then the type checker
  pub fn run_lint(&mut self) -> ReleaseResult<()> {
    println!("🔍 Running lint...");
    let format_check = self.tool(&self.ctx.config.tools.format_check, "tools.format_check")?;
    self.runner.run_checked(&format_check)?;
    let type_check = self.tool(&self.ctx.config.tools.type_check, "tools.type_check")?;
    self.runner.run_checked(&type_check)?;
    println!("✅ Lint passed");
    self.step_done();
    Ok(())
  }

  /// Clean old outputs, make sure build tooling is installed, build, verify
  pub fn build_package(&mut self) -> ReleaseResult<()> {
    println!("📦 Building package...");

    if self.options.dry_run {
      println!("🔍 Would remove dist/, build/ and *.egg-info");
    } else {
      for removed in clean_build_outputs(self.ctx.project_root()) {
        println!("🧹 Removed {}", removed.display());
      }
    }

    let tools = &self.ctx.config.tools;
    let install = self.tool(&tools.install_build_tools, "tools.install_build_tools")?;
    self.runner.run_checked(&install)?;

    let build = self.tool(&tools.build, "tools.build")?;
    self.runner.run_checked(&build)?;

    // Globs like dist/* must be expanded after the build produced the files
    let check = self.tool(&tools.check, "tools.check")?;
    self.runner.run_checked(&check)?;

    println!("✅ Package built and verified");
    self.step_done();
    Ok(())
  }

  /// Upload to the staging registry
  pub fn publish_staging(&mut self) -> ReleaseResult<()> {
    println!("🚀 Publishing to {}...", Registry::Staging);
    let cmd = self.tool(&self.ctx.config.tools.upload_staging, "tools.upload_staging")?;
    self.runner.run_checked(&cmd)?;
    println!("✅ Published to {}", Registry::Staging);
    self.step_done();
    Ok(())
  }

  /// Upload to the production registry
  pub fn publish_production(&mut self) -> ReleaseResult<()> {
    println!("🚀 Publishing to {}...", Registry::Production);
    let cmd = self.tool(&self.ctx.config.tools.upload_production, "tools.upload_production")?;
    self.runner.run_checked(&cmd)?;
    println!("✅ Published to {}", Registry::Production);
    self.step_done();
    Ok(())
  }

  /// Commit the bump, tag it and push both
  pub fn create_tag(&mut self, version: &str) -> ReleaseResult<()> {
    let git_config = &self.ctx.config.git;
    let tag = git_config.tag_name(version);
    println!("🏷️  Creating tag {}...", tag);

    let git = SystemGit::new(self.ctx.project_root());
    git.stage_all(&mut *self.runner)?;
    git.commit(&mut *self.runner, &format!("Bump version to {}", version))?;
    git.tag_annotated(&mut *self.runner, &tag, &format!("Release {}", tag))?;
    git.push_tag(&mut *self.runner, &git_config.remote, &tag)?;
    git.push_branch(&mut *self.runner)?;

    println!("✅ Tag {} created and pushed", tag);
    self.step_done();
    Ok(())
  }

  /// Turn a configured argv into a runnable command rooted at the project
  fn tool(&self, argv: &[String], field: &str) -> ReleaseResult<ToolCommand> {
    let root = self.ctx.project_root();
    let cmd = ToolCommand::from_argv(argv)
      .ok_or_else(|| {
        ReleaseError::with_help(
          format!("No command configured for {}", field),
          format!("Set `{}` to an argv list in release.toml.", field),
        )
      })?;
    let args = expand_globs(&cmd.args, root).with_context(|| format!("Failed to expand arguments of {}", field))?;

    Ok(ToolCommand { args, ..cmd }.current_dir(root))
  }

  fn package_name(&self, manifest: &Manifest) -> String {
    manifest
      .package_name()
      .or_else(|| self.ctx.config.package_name.clone())
      .or_else(|| {
        self
          .ctx
          .project_root()
          .file_name()
          .map(|name| name.to_string_lossy().into_owned())
      })
      .unwrap_or_else(|| "package".to_string())
  }

  fn publication(&self, registry: Registry, package: &str, version: &str) -> Publication {
    let urls = &self.ctx.config.registry;
    let url = match registry {
      Registry::Staging => urls.staging_url_for(package, version),
      Registry::Production => urls.production_url_for(package, version),
    };
    Publication { registry, url }
  }

  fn step_done(&mut self) {
    if let Some(progress) = self.progress.as_mut() {
      progress.inc();
    }
  }
}
