//! Operator confirmation gates

use crate::core::error::{ReleaseResult, ResultExt};
use std::io::{self, BufRead, Write};

/// Capability: ask the operator a yes/no question
pub trait Confirm {
  fn confirm(&mut self, question: &str) -> ReleaseResult<bool>;
}

/// `y` / `yes`, case-insensitive; everything else is a no
pub fn is_affirmative(answer: &str) -> bool {
  matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Reads answers from a line-oriented reader, writing the question to a writer
///
/// Blocks until a full line (or EOF) arrives. EOF counts as "no".
pub struct LinePrompt<R, W> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
  fn confirm(&mut self, question: &str) -> ReleaseResult<bool> {
    write!(self.output, "🤔 {} (y/N): ", question).context("Failed to write prompt")?;
    self.output.flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    self
      .input
      .read_line(&mut answer)
      .context("Failed to read confirmation")?;

    Ok(is_affirmative(&answer))
  }
}

/// Prompt on the controlling terminal
pub type StdinPrompt = LinePrompt<io::StdinLock<'static>, io::Stdout>;

impl StdinPrompt {
  pub fn stdin() -> Self {
    LinePrompt::new(io::stdin().lock(), io::stdout())
  }
}

/// Answers yes to everything (`--yes`, dry runs)
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
  fn confirm(&mut self, question: &str) -> ReleaseResult<bool> {
    println!("🤔 {} (y/N): y (assumed)", question);
    Ok(true)
  }
}
