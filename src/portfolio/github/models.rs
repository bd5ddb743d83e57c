//! Wire models for the GitHub REST API
//!
//! Only the fields the aggregation pipeline actually reads are declared;
//! serde ignores the rest of each payload. Counters default to zero because
//! GitHub omits them for some repository states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository as returned by the list and detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubRepository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub fork: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A contributor as returned by the contributors endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubContributor {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub contributions: u64,
    pub avatar_url: Option<String>,
}

/// A commit as returned by the repository commits endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubCommit {
    pub sha: String,
    pub html_url: Option<String>,
    pub commit: GithubCommitDetail,
}

/// Commit metadata nested under [`GithubCommit`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubCommitDetail {
    pub message: String,
    pub author: Option<GithubCommitAuthor>,
}

/// Author signature nested in commit metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubCommitAuthor {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// A public event as returned by the events endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub repo: GithubEventRepo,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Repository reference embedded in an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubEventRepo {
    pub name: String,
}
