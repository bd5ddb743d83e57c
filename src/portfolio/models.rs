//! Canonical domain models for the portfolio aggregation pipeline
//!
//! These models provide the stable output shape of the service, independent
//! of how the underlying GitHub responses are shaped. Field names follow the
//! GitHub REST conventions (`html_url`, `stargazers_count`, ...) so that
//! consumers written against the raw API keep working against the enriched
//! records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Canonical unit of output of the aggregation pipeline
///
/// Base fields (`id` through `updated_at`) are stable for a given upstream
/// repository. Enrichment fields are only present in enhanced mode and are
/// regenerated per request; they are synthetic and carry no authoritative
/// meaning across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Repository ID assigned by the upstream source
    pub id: u64,

    /// Repository name (unique per owner)
    pub name: String,

    /// Repository description, if any
    pub description: Option<String>,

    /// URL for viewing the repository in a browser
    pub html_url: String,

    /// Optional external homepage / deployed demo URL
    pub homepage: Option<String>,

    /// Primary programming language
    pub language: Option<String>,

    /// Number of stargazers
    pub stargazers_count: u64,

    /// Number of forks
    pub forks_count: u64,

    /// When the repository was created
    pub created_at: Option<DateTime<Utc>>,

    /// When the repository was last updated
    pub updated_at: Option<DateTime<Utc>>,

    /// Language names in descending byte-share order (enhanced mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,

    /// Feature tags derived from name/description keywords (enhanced mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,

    /// Synthetic usage counters (enhanced mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<ProjectAnalytics>,

    /// Synthetic deployment health, possibly overwritten by a live probe
    /// (enhanced mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_metrics: Option<LiveMetrics>,

    /// Whether a live demo is reachable; defaults to homepage presence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_available: Option<bool>,
}

impl ProjectRecord {
    /// Returns true if any enrichment field has been populated
    pub fn is_enriched(&self) -> bool {
        self.tech_stack.is_some()
            || self.features.is_some()
            || self.analytics.is_some()
            || self.live_metrics.is_some()
    }
}

/// Per-repository language share
///
/// The set of percentages for one repository sums to roughly 100; each value
/// is independently rounded so a tolerance of one unit per language applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageStat {
    /// Language name as reported by the upstream source
    pub name: String,

    /// Rounded percentage of the repository's bytes in this language
    pub percentage: u32,

    /// Raw byte count for this language
    pub bytes: u64,
}

/// Synthetic usage/issue/PR/deployment counters for one project
///
/// Every field is generated from bounded pseudo-random ranges for cosmetic
/// display; none of these values are real measurements. When genuine counts
/// are available upstream (stars, contributors, open issues) they replace
/// the corresponding draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAnalytics {
    /// Synthetic page view count
    pub views: u64,

    /// Synthetic click count
    pub clicks: u64,

    /// Star delta; may be negative
    pub stars_trend: i64,

    /// Synthetic recent commit count
    pub recent_commits: u64,

    /// Contributor count (real when the contributor list was fetched)
    pub contributors: u64,

    /// Open/closed issue counters
    pub issues: IssueCounters,

    /// Open/merged pull request counters
    pub pull_requests: PullRequestCounters,

    /// Deployment totals and outcome split
    pub deployments: DeploymentCounters,
}

/// Issue counters inside [`ProjectAnalytics`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCounters {
    pub open: u64,
    pub closed: u64,
}

/// Pull request counters inside [`ProjectAnalytics`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestCounters {
    pub open: u64,
    pub merged: u64,
}

/// Deployment counters inside [`ProjectAnalytics`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentCounters {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,

    /// Timestamp within the past seven days
    pub last_deployed: DateTime<Utc>,
}

/// Deployment status of a project's public endpoint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeploymentStatus {
    /// Endpoint answered the probe with a success status
    Active,
    /// Manually flagged as under maintenance (curated overrides only)
    Maintenance,
    /// Probe failed, timed out, or no endpoint is declared
    Error,
}

/// Synthetic live-status bundle for one project
///
/// `status` and `response_time` are overwritten with real probe results when
/// the project declares a homepage; everything else is generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveMetrics {
    /// Uptime percentage, clamped to at most 100.0
    pub uptime: f64,

    /// Response time in milliseconds
    pub response_time: u64,

    /// Last deployment timestamp
    pub last_deployment: DateTime<Utc>,

    /// Probe classification of the declared endpoint
    pub status: DeploymentStatus,

    /// Synthetic visitor count
    pub visitors_today: u64,

    /// Synthetic performance score in [80, 100)
    pub performance_score: u64,
}

/// Classification of a public activity event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ActivityKind {
    Push,
    Create,
    Watch,
    Fork,
    Other,
}

impl ActivityKind {
    /// Maps a GitHub event type string (e.g. `PushEvent`) to a kind
    pub fn from_event_type(event_type: &str) -> Self {
        match event_type {
            "PushEvent" => ActivityKind::Push,
            "CreateEvent" => ActivityKind::Create,
            "WatchEvent" => ActivityKind::Watch,
            "ForkEvent" => ActivityKind::Fork,
            _ => ActivityKind::Other,
        }
    }
}

/// A single entry of the owner's public event feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Upstream event ID
    pub id: String,

    /// Event classification
    pub kind: ActivityKind,

    /// Full name of the repository the event happened in
    pub repo_name: String,

    /// When the event occurred
    pub created_at: Option<DateTime<Utc>>,

    /// Short human-readable summary of the event payload
    pub payload_summary: String,
}

/// A single entry of the owner's recent-commit feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoCommit {
    /// Commit SHA
    pub sha: String,

    /// Full commit message
    pub message: String,

    /// Name of the repository the commit belongs to
    pub repo_name: String,

    /// URL for viewing the commit in a browser
    pub html_url: Option<String>,

    /// Author timestamp of the commit
    pub authored_at: Option<DateTime<Utc>>,
}

/// Aggregate statistics over the owner's non-fork repositories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerStats {
    /// The owner's GitHub profile
    pub user: github_user::GithubUser,

    /// Number of non-fork repositories
    pub total_repos: u64,

    /// Stars summed over non-fork repositories
    pub total_stars: u64,

    /// Forks summed over non-fork repositories
    pub total_forks: u64,

    /// Up to five primary languages by repository count, descending
    pub top_languages: Vec<LanguageCount>,

    /// The six most recently updated repositories
    pub recent_repos: Vec<ProjectRecord>,

    /// When these statistics were computed
    pub last_updated: DateTime<Utc>,
}

/// A primary language with the number of repositories using it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: u64,
}

pub mod github_user {
    //! Owner profile as returned by the user endpoint

    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    /// Public profile of the configured owner
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GithubUser {
        pub id: u64,
        pub login: String,
        pub avatar_url: Option<String>,
        pub name: Option<String>,
        pub bio: Option<String>,
        pub location: Option<String>,
        pub public_repos: Option<u64>,
        pub followers: Option<u64>,
        pub following: Option<u64>,
        pub created_at: Option<DateTime<Utc>>,
    }
}

/// Extended per-project view served by the detail endpoint
///
/// Everything beyond the flattened [`ProjectRecord`] and the analytics block
/// is cosmetic narrative content assembled from templates; it exists for the
/// portfolio detail page, not for machine consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    /// The underlying project record
    #[serde(flatten)]
    pub project: ProjectRecord,

    /// Synthetic analytics for the detail page
    pub analytics: ProjectAnalytics,

    /// Description expanded with boilerplate narrative
    pub detailed_description: String,

    /// Screenshot asset paths derived from the requested name
    pub screenshots: Vec<String>,

    /// Headline feature list
    pub features: Vec<String>,

    /// Narrative: challenges encountered
    pub challenges: Vec<String>,

    /// Narrative: solutions applied
    pub solutions: Vec<String>,

    /// Technology breakdown by layer
    pub tech_details: TechDetails,

    /// Rough per-phase timeline estimate
    pub timeline: Timeline,

    /// Narrative: lessons learned
    pub lessons_learned: Vec<String>,

    /// When this view was assembled
    pub fetched_at: DateTime<Utc>,
}

/// Technology breakdown by layer for the detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechDetails {
    pub frontend: Vec<String>,
    pub backend: Vec<String>,
    pub deployment: Vec<String>,
    pub tools: Vec<String>,
}

/// Per-phase duration estimates for the detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub planning: String,
    pub development: String,
    pub testing: String,
    pub deployment: String,
}

/// Normalizes a project name for lookups and override keys
///
/// Lowercases the name and collapses whitespace runs into single dashes, so
/// `"Table Craft"` and `"tablecraft"` can both address the same record.
pub fn normalize_project_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
