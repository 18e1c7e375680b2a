//! Helpers for building command lines without a shell

use crate::core::error::ReleaseResult;
use std::path::Path;

/// Characters that make an argument a glob pattern
const GLOB_META: &[char] = &['*', '?', '['];

/// Render a command line the way an operator would type it
///
/// Arguments containing whitespace or shell metacharacters are single-quoted
/// so the printed line can be pasted back into a shell.
pub fn display_command(program: &str, args: &[String]) -> String {
  std::iter::once(program)
    .chain(args.iter().map(String::as_str))
    .map(quote_arg)
    .collect::<Vec<_>>()
    .join(" ")
}

fn quote_arg(arg: &str) -> String {
  if arg.is_empty() {
    return "''".to_string();
  }
  let needs_quotes = arg
    .chars()
    .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '$' | '`' | '\\' | ';' | '&' | '|' | '<' | '>'));
  if needs_quotes {
    format!("'{}'", arg.replace('\'', r"'\''"))
  } else {
    arg.to_string()
  }
}

/// Expand glob arguments relative to `root`, the way a POSIX shell would
///
/// - Arguments without `*`, `?` or `[` pass through untouched
/// - Matches are sorted and rendered relative to `root`
/// - A pattern that matches nothing is passed through literally
pub fn expand_globs(args: &[String], root: &Path) -> ReleaseResult<Vec<String>> {
  let mut expanded = Vec::with_capacity(args.len());

  for arg in args {
    if !arg.contains(GLOB_META) || arg.starts_with('-') {
      expanded.push(arg.clone());
      continue;
    }

    let pattern = if Path::new(arg).is_absolute() {
      arg.clone()
    } else {
      format!("{}/{}", glob::Pattern::escape(&path_to_posix(root)), arg)
    };

    let mut matches: Vec<String> = glob::glob(&pattern)?
      .filter_map(Result::ok)
      .map(|path| match path.strip_prefix(root) {
        Ok(relative) => path_to_posix(relative),
        Err(_) => path_to_posix(&path),
      })
      .collect();

    if matches.is_empty() {
      expanded.push(arg.clone());
    } else {
      matches.sort();
      expanded.extend(matches);
    }
  }

  Ok(expanded)
}

/// Convert a path to forward-slash form
pub fn path_to_posix(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}
