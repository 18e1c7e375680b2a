//! Progress indicator for the release pipeline
//!
//! Uses `linya`; only drawn when stderr is a terminal so piped and CI output
//! stays clean.

use linya::{Bar, Progress};
use std::io::IsTerminal;

/// One bar counting finished pipeline steps
pub struct StepProgress {
  progress: Progress,
  bar: Bar,
}

impl StepProgress {
  /// Create a bar for `total` steps
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Create a bar only if stderr is interactive
  pub fn for_terminal(total: usize, label: impl Into<String>) -> Option<Self> {
    if std::io::stderr().is_terminal() {
      Some(Self::new(total, label))
    } else {
      None
    }
  }

  /// Mark one step finished
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
