//! External command execution
//!
//! The pipeline never touches `std::process` directly. It hands a
//! [`ToolCommand`] to a [`CommandRunner`] and gets back exit code plus captured
//! output, which keeps every branch of the release flow testable without
//! spawning real tools.

use crate::core::error::{ExecutionError, ReleaseResult};
use crate::utils::display_command;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A program plus its arguments, run without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
  pub program: String,
  pub args: Vec<String>,
  /// Working directory; inherits the current directory when `None`
  pub cwd: Option<PathBuf>,
}

impl ToolCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  /// Build from an argv list; the first element is the program
  ///
  /// Returns `None` for an empty list.
  pub fn from_argv(argv: &[String]) -> Option<Self> {
    let (program, args) = argv.split_first()?;
    Some(Self {
      program: program.clone(),
      args: args.to_vec(),
      cwd: None,
    })
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: &Path) -> Self {
    self.cwd = Some(dir.to_path_buf());
    self
  }

  /// Command line as it would be typed in a shell
  pub fn display(&self) -> String {
    display_command(&self.program, &self.args)
  }
}

/// Captured result of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// `None` when the process was killed by a signal or never started
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  /// A zero exit with no output
  pub fn ok() -> Self {
    Self {
      code: Some(0),
      ..Default::default()
    }
  }

  /// A non-zero exit with the given stderr
  pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
    Self {
      code: Some(code),
      stdout: String::new(),
      stderr: stderr.into(),
    }
  }

  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Capability: run a named tool with arguments, capture stdout/stderr/exit code
pub trait CommandRunner {
  /// Run a command and report how it exited; never fails on a non-zero exit
  fn run(&mut self, cmd: &ToolCommand) -> ReleaseResult<CommandOutput>;

  /// Run a command and turn a non-zero exit into an [`ExecutionError`]
  fn run_checked(&mut self, cmd: &ToolCommand) -> ReleaseResult<CommandOutput> {
    let output = self.run(cmd)?;
    if output.success() {
      return Ok(output);
    }
    Err(
      ExecutionError {
        command: cmd.display(),
        code: output.code,
        stdout: output.stdout,
        stderr: output.stderr,
      }
      .into(),
    )
  }
}

/// Runs commands as real subprocesses, blocking until each exits
#[derive(Debug, Default)]
pub struct SystemRunner {
  /// Echo stdout of successful commands
  pub verbose: bool,
}

impl SystemRunner {
  pub fn new(verbose: bool) -> Self {
    Self { verbose }
  }
}

impl CommandRunner for SystemRunner {
  fn run(&mut self, cmd: &ToolCommand) -> ReleaseResult<CommandOutput> {
    println!("🔄 Running: {}", cmd.display());

    let mut process = Command::new(&cmd.program);
    process.args(&cmd.args);
    if let Some(dir) = &cmd.cwd {
      process.current_dir(dir);
    }

    let output = match process.output() {
      Ok(output) => output,
      // Not installed / not executable: same treatment as a shell's exit 127
      Err(e) => {
        return Ok(CommandOutput {
          code: None,
          stdout: String::new(),
          stderr: format!("failed to start `{}`: {}", cmd.program, e),
        });
      }
    };

    let result = CommandOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if let Some(echo) = self.echo(&result) {
      println!("{}", echo);
    }

    Ok(result)
  }
}

impl SystemRunner {
  /// Output to echo after a command: stdout of successful runs, verbose only
  fn echo<'o>(&self, output: &'o CommandOutput) -> Option<&'o str> {
    let stdout = output.stdout.trim_end();
    (self.verbose && output.success() && !stdout.trim_start().is_empty()).then_some(stdout)
  }
}

/// Prints commands instead of running them; every command "succeeds"
#[derive(Debug, Default)]
pub struct DryRunRunner {
  /// Every command seen, in order
  pub planned: Vec<String>,
}

impl CommandRunner for DryRunRunner {
  fn run(&mut self, cmd: &ToolCommand) -> ReleaseResult<CommandOutput> {
    let line = cmd.display();
    println!("🔍 Would run: {}", line);
    self.planned.push(line);
    Ok(CommandOutput::ok())
  }
}
