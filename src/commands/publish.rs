//! `pyrelease` - bump, verify, build and publish a Python package
//!
//! Chooses the real or dry-run command runner and the interactive or
//! assume-yes prompt, then drives the release pipeline and prints the summary.

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::core::exec::{CommandRunner, DryRunRunner, SystemRunner};
use crate::core::prompt::{AssumeYes, Confirm, StdinPrompt};
use crate::release::{ReleaseOptions, ReleaseOutcome, ReleasePipeline};

/// Run the release pipeline for the project in `ctx`
pub fn run_publish(ctx: &ReleaseContext, options: &ReleaseOptions, yes: bool, verbose: bool) -> ReleaseResult<()> {
  if options.dry_run {
    println!("🔍 Dry-run mode (no files changed, no commands executed)");
  }

  let mut runner: Box<dyn CommandRunner> = if options.dry_run {
    Box::new(DryRunRunner::default())
  } else {
    Box::new(SystemRunner::new(verbose))
  };

  // A dry run answers its own gates so the whole plan is shown
  let mut prompt: Box<dyn Confirm> = if yes || options.dry_run {
    Box::new(AssumeYes)
  } else {
    Box::new(StdinPrompt::stdin())
  };

  let outcome = ReleasePipeline::new(ctx, options, runner.as_mut(), prompt.as_mut())
    .with_progress()
    .run()?;

  match outcome {
    ReleaseOutcome::Completed(report) => report.print(),
    ReleaseOutcome::ProductionDeclined { version } => {
      println!("Version {} is on TestPyPI only; re-run with --pypi-only to finish.", version);
    }
  }

  Ok(())
}
