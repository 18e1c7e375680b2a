//! Integration tests for pyrelease
//!
//! Each test builds a throwaway Python project whose `release.toml` swaps the
//! real tools for small shell commands that leave marker files behind.

mod helpers;
mod test_pipeline;
