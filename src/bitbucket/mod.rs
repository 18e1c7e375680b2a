//! Bitbucket Cloud API resource schemas
//!
//! Data-only records; no client lives here.

pub mod models;

pub use models::{Branch, Comment, Project, PullRequest, PullRequestState, Repository, User};
