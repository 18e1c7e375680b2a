use clap::Parser;
use pyrelease::commands;
use pyrelease::core::context::ReleaseContext;
use pyrelease::core::error::{ExitCode, ReleaseError, print_error};
use pyrelease::release::{PublishMode, ReleaseOptions};

/// Bump, test, lint, build and publish a Python package
#[derive(Parser)]
#[command(name = "pyrelease")]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(styles = get_styles())]
struct Cli {
  /// New version to release (X.Y.Z); defaults to the version in pyproject.toml
  #[arg(long = "version", value_name = "X.Y.Z")]
  new_version: Option<String>,
  /// Skip the test step
  #[arg(long)]
  skip_tests: bool,
  /// Skip formatting and type checks
  #[arg(long)]
  skip_lint: bool,
  /// Publish to TestPyPI only
  #[arg(long, conflicts_with = "pypi_only")]
  testpypi_only: bool,
  /// Publish to PyPI only (skips TestPyPI)
  #[arg(long)]
  pypi_only: bool,
  /// Do not create a git tag
  #[arg(long)]
  no_tag: bool,
  /// Print the commands that would run without running them
  #[arg(long)]
  dry_run: bool,
  /// Answer yes to every confirmation
  #[arg(short, long)]
  yes: bool,
  /// Echo tool output as it runs
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn publish_mode(&self) -> PublishMode {
    if self.testpypi_only {
      PublishMode::StagingOnly
    } else if self.pypi_only {
      PublishMode::ProductionOnly
    } else {
      PublishMode::Both
    }
  }

  fn release_options(&self) -> ReleaseOptions {
    ReleaseOptions {
      new_version: self.new_version.clone(),
      skip_tests: self.skip_tests,
      skip_lint: self.skip_lint,
      publish_mode: self.publish_mode(),
      no_tag: self.no_tag,
      dry_run: self.dry_run,
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  let yellow = Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow));
  let green = Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green));
  let red = Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red));

  clap::builder::Styles::styled()
    .usage(anstyle::Style::new().bold().underline().fg_color(yellow))
    .header(anstyle::Style::new().bold().underline().fg_color(yellow))
    .literal(anstyle::Style::new().fg_color(green))
    .invalid(anstyle::Style::new().bold().fg_color(red))
    .error(anstyle::Style::new().bold().fg_color(red))
    .valid(anstyle::Style::new().bold().underline().fg_color(green))
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let project_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(ExitCode::Failure.as_i32());
    }
  };

  let ctx = match ReleaseContext::build(&project_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let options = cli.release_options();
  if let Err(err) = commands::run_publish(&ctx, &options, cli.yes, cli.verbose) {
    handle_error(err);
  }

  // A declined production gate also lands here
  std::process::exit(ExitCode::Success.as_i32());
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
