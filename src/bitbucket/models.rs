//! Bitbucket Cloud API response models
//!
//! Deserialization targets for JSON returned by the Bitbucket Cloud REST API.
//! Only domain identifiers are required; everything else defaults to absent or
//! empty, and unknown fields are ignored so API additions never break parsing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Free-form JSON object as returned by the API
pub type JsonObject = Map<String, Value>;

/// A Bitbucket account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
  #[serde(default)]
  pub uuid: Option<String>,
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub display_name: Option<String>,
  #[serde(default)]
  pub account_id: Option<String>,
  #[serde(default)]
  pub nickname: Option<String>,
}

/// A workspace project grouping repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  #[serde(default)]
  pub uuid: Option<String>,
  pub key: String,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub is_private: bool,
  #[serde(default)]
  pub created_on: Option<DateTime<Utc>>,
  #[serde(default)]
  pub updated_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
  #[serde(default)]
  pub uuid: Option<String>,
  pub name: String,
  /// `workspace/repo-slug`
  pub full_name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub is_private: bool,
  #[serde(default)]
  pub clone_links: Vec<JsonObject>,
  /// Bytes
  #[serde(default)]
  pub size: Option<i64>,
  #[serde(default)]
  pub language: Option<String>,
  #[serde(default)]
  pub created_on: Option<DateTime<Utc>>,
  #[serde(default)]
  pub updated_on: Option<DateTime<Utc>>,
}

/// A branch reference, as embedded in pull request source/destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
  pub name: String,
  #[serde(default)]
  pub repository: Option<JsonObject>,
  #[serde(default)]
  pub commit: Option<JsonObject>,
}

/// Pull request lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestState {
  Open,
  Merged,
  Declined,
  Superseded,
  /// A state this crate does not know about yet, kept verbatim
  Other(String),
}

impl PullRequestState {
  pub fn as_str(&self) -> &str {
    match self {
      PullRequestState::Open => "OPEN",
      PullRequestState::Merged => "MERGED",
      PullRequestState::Declined => "DECLINED",
      PullRequestState::Superseded => "SUPERSEDED",
      PullRequestState::Other(s) => s,
    }
  }

  /// Open pull requests are the only ones that can still change
  pub fn is_open(&self) -> bool {
    matches!(self, PullRequestState::Open)
  }
}

impl From<&str> for PullRequestState {
  fn from(s: &str) -> Self {
    match s {
      "OPEN" => PullRequestState::Open,
      "MERGED" => PullRequestState::Merged,
      "DECLINED" => PullRequestState::Declined,
      "SUPERSEDED" => PullRequestState::Superseded,
      other => PullRequestState::Other(other.to_string()),
    }
  }
}

impl fmt::Display for PullRequestState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for PullRequestState {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for PullRequestState {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(PullRequestState::from(s.as_str()))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
  pub id: i64,
  pub title: String,
  #[serde(default)]
  pub description: Option<String>,
  pub state: PullRequestState,
  #[serde(default)]
  pub author: Option<User>,
  #[serde(default)]
  pub source: Option<Branch>,
  #[serde(default)]
  pub destination: Option<Branch>,
  #[serde(default)]
  pub created_on: Option<DateTime<Utc>>,
  #[serde(default)]
  pub updated_on: Option<DateTime<Utc>>,
  #[serde(default)]
  pub close_source_branch: bool,
  #[serde(default)]
  pub reviewers: Vec<JsonObject>,
  #[serde(default)]
  pub participants: Vec<JsonObject>,
}

/// A pull request comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub id: i64,
  /// `{"raw": ..., "markup": ..., "html": ...}`
  pub content: JsonObject,
  #[serde(default)]
  pub user: Option<User>,
  #[serde(default)]
  pub created_on: Option<DateTime<Utc>>,
  #[serde(default)]
  pub updated_on: Option<DateTime<Utc>>,
  /// Id of the comment this one replies to
  #[serde(default)]
  pub parent: Option<i64>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use serde_json::json;

  #[test]
  fn test_user_all_optional() {
    let user: User = serde_json::from_value(json!({})).unwrap();
    assert_eq!(user, User::default());

    let user: User = serde_json::from_value(json!({
      "uuid": "{d301aafa-d676-4ee0-88be-962be7417567}",
      "display_name": "Ana Souza",
      "account_id": "557058:1234",
      "type": "user",
      "links": {"avatar": {"href": "https://example.invalid/a.png"}}
    }))
    .unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Ana Souza"));
    assert_eq!(user.username, None);
  }

  #[test]
  fn test_project_requires_key_and_name() {
    let project: Project = serde_json::from_value(json!({
      "key": "MCP",
      "name": "MCP Servers",
      "created_on": "2024-03-01T12:30:00.000000+00:00"
    }))
    .unwrap();
    assert!(!project.is_private);
    assert_eq!(
      project.created_on,
      Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
    );

    assert!(serde_json::from_value::<Project>(json!({"name": "No key"})).is_err());
  }

  #[test]
  fn test_repository_defaults() {
    let repo: Repository = serde_json::from_value(json!({
      "name": "bitbucket-mcp-cloud",
      "full_name": "acme/bitbucket-mcp-cloud",
      "size": 1048576,
      "language": "python"
    }))
    .unwrap();
    assert!(repo.clone_links.is_empty());
    assert_eq!(repo.size, Some(1_048_576));
    assert_eq!(repo.description, None);

    assert!(serde_json::from_value::<Repository>(json!({"name": "x"})).is_err());
  }

  #[test]
  fn test_pull_request_full() {
    let pr: PullRequest = serde_json::from_value(json!({
      "id": 42,
      "title": "Add release pipeline",
      "state": "OPEN",
      "author": {"display_name": "Ana Souza"},
      "source": {"name": "feature/release", "commit": {"hash": "abc123"}},
      "destination": {"name": "main"},
      "close_source_branch": true,
      "reviewers": [{"display_name": "Rui"}],
      "created_on": "2024-05-10T08:00:00+00:00"
    }))
    .unwrap();

    assert_eq!(pr.state, PullRequestState::Open);
    assert!(pr.state.is_open());
    assert_eq!(pr.source.as_ref().unwrap().name, "feature/release");
    assert_eq!(pr.source.unwrap().commit.unwrap()["hash"], "abc123");
    assert!(pr.close_source_branch);
    assert_eq!(pr.reviewers.len(), 1);
    assert!(pr.participants.is_empty());
  }

  #[test]
  fn test_pull_request_required_fields() {
    assert!(serde_json::from_value::<PullRequest>(json!({"id": 1, "title": "t"})).is_err());
    assert!(serde_json::from_value::<PullRequest>(json!({"id": 1, "state": "OPEN"})).is_err());
  }

  #[test]
  fn test_pull_request_state_round_trip() {
    for (raw, state) in [
      ("MERGED", PullRequestState::Merged),
      ("DECLINED", PullRequestState::Declined),
      ("SUPERSEDED", PullRequestState::Superseded),
      ("DRAFT", PullRequestState::Other("DRAFT".into())),
    ] {
      let parsed: PullRequestState = serde_json::from_value(json!(raw)).unwrap();
      assert_eq!(parsed, state);
      assert_eq!(serde_json::to_value(&parsed).unwrap(), json!(raw));
    }
  }

  #[test]
  fn test_comment_reply() {
    let comment: Comment = serde_json::from_value(json!({
      "id": 7,
      "content": {"raw": "LGTM", "markup": "markdown"},
      "parent": 3
    }))
    .unwrap();
    assert_eq!(comment.content["raw"], "LGTM");
    assert_eq!(comment.parent, Some(3));
    assert!(comment.user.is_none());

    assert!(serde_json::from_value::<Comment>(json!({"id": 7})).is_err());
  }

  #[test]
  fn test_null_optionals_accepted() {
    let branch: Branch = serde_json::from_value(json!({
      "name": "main",
      "repository": null,
      "commit": null
    }))
    .unwrap();
    assert!(branch.repository.is_none());
  }
}
