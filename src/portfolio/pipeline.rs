//! Aggregation pipeline: composes the fetcher, enricher, synthetic metrics
//! and liveness probing into the final project collection
//!
//! The pipeline owns no global state. Its collaborators (GitHub client,
//! metrics generator, prober) are injected at construction time, so every
//! dependency can be substituted in tests. All orchestration is request
//! scoped: the assembled collection is discarded when the caller is done
//! with it.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;

use crate::portfolio::error::PortfolioError;
use crate::portfolio::github::models::GithubEvent;
use crate::portfolio::github::{
    DEFAULT_API_BASE_URL, GithubClient, REPOSITORY_PAGE_SIZE, project_from_repository,
};
use crate::portfolio::metrics::{AnalyticsInputs, MetricsGenerator};
use crate::portfolio::models::{
    ActivityEvent, ActivityKind, LanguageCount, OwnerStats, ProjectDetail, ProjectRecord,
    RepoCommit, TechDetails, Timeline, normalize_project_name,
};
use crate::portfolio::overrides;
use crate::portfolio::probe::LivenessProber;

/// How many of the most recently updated projects get enriched
pub const ENRICHMENT_LIMIT: usize = 10;

/// How many events the activity feed keeps
pub const RECENT_EVENT_LIMIT: usize = 10;

/// How many events are requested from the upstream feed
const EVENT_PAGE_SIZE: u8 = 30;

/// How many repositories feed the recent-commit view
const COMMIT_REPO_LIMIT: usize = 3;

/// How many commits are requested per repository
const COMMITS_PER_REPO: u8 = 5;

/// How many commits the recent-commit view keeps after flattening
pub const RECENT_COMMIT_LIMIT: usize = 10;

/// How many repositories the owner stats consider "recent"
const RECENT_REPO_LIMIT: usize = 6;

/// How many languages the owner stats report
const TOP_LANGUAGE_LIMIT: usize = 5;

/// Orchestrates fetching, enrichment, synthetic metrics and probing
#[derive(Clone)]
pub struct AggregationPipeline {
    github: GithubClient,
    metrics: Arc<dyn MetricsGenerator>,
    prober: LivenessProber,
    direct_api_base: String,
}

impl AggregationPipeline {
    /// Creates a pipeline from its injected collaborators
    pub fn new(
        github: GithubClient,
        metrics: Arc<dyn MetricsGenerator>,
        prober: LivenessProber,
    ) -> Self {
        Self {
            github,
            metrics,
            prober,
            direct_api_base: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Overrides the base URL used by the direct-API fallback tier
    ///
    /// The last fallback tier deliberately bypasses the structured client;
    /// tests point this at a mock server.
    pub fn with_direct_api_base(mut self, base_url: impl Into<String>) -> Self {
        self.direct_api_base = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The GitHub client this pipeline aggregates from
    pub fn github(&self) -> &GithubClient {
        &self.github
    }

    /// Basic mode: the repository fetcher output, unmodified
    ///
    /// Fast path for latency-sensitive callers; no enrichment, no probing.
    pub async fn basic_projects(&self) -> Result<Vec<ProjectRecord>, PortfolioError> {
        self.github.list_projects().await
    }

    /// Enhanced mode: the first [`ENRICHMENT_LIMIT`] projects, enriched
    ///
    /// Enrichment of individual projects runs concurrently and is awaited
    /// as one barrier; completion order does not matter because the input
    /// recency order is preserved in the output. A single project's
    /// enrichment failure never fails the batch — that project degrades to
    /// its bare base record.
    pub async fn enhanced_projects(&self) -> Result<Vec<ProjectRecord>, PortfolioError> {
        let base = self.github.list_projects().await?;
        let head: Vec<ProjectRecord> = base.into_iter().take(ENRICHMENT_LIMIT).collect();

        let enriched = join_all(
            head.into_iter()
                .map(|project| self.enrich_project(project)),
        )
        .await;

        Ok(enriched)
    }

    /// Enriches one project, degrading to the base record on failure
    async fn enrich_project(&self, base: ProjectRecord) -> ProjectRecord {
        let details = match self.github.repository_details(&base.name).await {
            Ok(details) => details,
            Err(err) => {
                tracing::warn!(
                    "Enrichment failed for project {}: {}; returning base record",
                    base.name,
                    err
                );
                return base;
            }
        };

        let mut project = base;

        let tech_stack: Vec<String> = if details.language_stats.is_empty() {
            project.language.iter().cloned().collect()
        } else {
            details
                .language_stats
                .iter()
                .map(|stat| stat.name.clone())
                .collect()
        };

        let inputs = AnalyticsInputs {
            star_count: Some(project.stargazers_count),
            contributor_count: Some(details.contributors.len() as u64),
            open_issue_count: Some(details.repository.open_issues_count),
        };

        project.tech_stack = Some(tech_stack);
        project.features = Some(overrides::derive_features(
            &project.name,
            project.description.as_deref(),
        ));
        project.analytics = Some(self.metrics.project_analytics(&inputs));
        project.demo_available = Some(project.homepage.is_some());

        let mut live_metrics = self.metrics.live_metrics(project.updated_at);

        // Curated overrides win over everything generated
        if let Some(curated) = overrides::curated_override(&normalize_project_name(&project.name)) {
            project.tech_stack = Some(curated.tech_stack);
            project.features = Some(curated.features);
            project.demo_available = Some(curated.demo_available);
            live_metrics.performance_score = curated.performance_score;
        }

        // A declared homepage gets a real probe; its result replaces the
        // synthetic status and response time, degrading to error rather
        // than aborting anything
        if let Some(homepage) = project.homepage.clone() {
            let probe = self.prober.probe(&homepage).await;
            live_metrics.status = probe.status;
            live_metrics.response_time = probe.response_time_ms;
        }

        project.live_metrics = Some(live_metrics);
        project
    }

    /// Last-resort fetch: direct unauthenticated call to the REST API
    ///
    /// Bypasses the structured client entirely and maps only the minimal
    /// field set. No showcase injection, no enrichment.
    pub async fn direct_fallback_projects(&self) -> Result<Vec<ProjectRecord>, PortfolioError> {
        let url = format!(
            "{}/users/{}/repos?per_page={}&sort=updated",
            self.direct_api_base,
            self.github.owner(),
            REPOSITORY_PAGE_SIZE
        );

        let response = reqwest::Client::new()
            .get(&url)
            .header(reqwest::header::USER_AGENT, "folio-api/0.1.0")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| PortfolioError::SourceFetch(format!("direct GitHub fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortfolioError::SourceFetch(format!(
                "direct GitHub fetch failed with status {}",
                status
            )));
        }

        let repositories: Vec<crate::portfolio::github::models::GithubRepository> = response
            .json()
            .await
            .map_err(|e| {
                PortfolioError::SourceFetch(format!("failed to parse direct GitHub response: {}", e))
            })?;

        Ok(repositories
            .into_iter()
            .filter(|repo| !repo.fork)
            .map(project_from_repository)
            .collect())
    }

    /// Looks up a single project by normalized name
    ///
    /// Both the normalized form (lowercase, whitespace collapsed to dashes)
    /// and the plain lowercase name match. Absence yields
    /// [`PortfolioError::NotFound`] carrying every available name.
    pub async fn project_by_name(&self, requested: &str) -> Result<ProjectRecord, PortfolioError> {
        let projects = self.github.list_projects().await?;
        let normalized = normalize_project_name(requested);
        let requested_lower = requested.to_lowercase();

        let found = projects.iter().find(|project| {
            normalize_project_name(&project.name) == normalized
                || project.name.to_lowercase() == requested_lower
        });

        match found {
            Some(project) => Ok(project.clone()),
            None => Err(PortfolioError::NotFound {
                name: requested.to_string(),
                available: projects.into_iter().map(|project| project.name).collect(),
            }),
        }
    }

    /// Assembles the extended detail view for one project
    ///
    /// Analytics are fully synthetic here (no real seeds), and the
    /// narrative fields are template content for the portfolio detail page.
    pub async fn project_detail(&self, requested: &str) -> Result<ProjectDetail, PortfolioError> {
        let project = self.project_by_name(requested).await?;
        let analytics = self.metrics.project_analytics(&AnalyticsInputs::default());

        let slug = normalize_project_name(requested);
        let detailed_description = format!(
            "{} Built with attention to performance, user experience, and maintainability.",
            project.description.clone().unwrap_or_else(|| {
                "This project showcases modern development practices and innovative solutions."
                    .to_string()
            })
        );

        let frontend = if project.language.as_deref() == Some("TypeScript") {
            vec!["TypeScript", "React", "Next.js"]
        } else {
            vec!["JavaScript", "HTML", "CSS"]
        };

        Ok(ProjectDetail {
            analytics,
            detailed_description,
            screenshots: (1..=3)
                .map(|index| format!("/images/projects/{}-{}.jpg", slug, index))
                .collect(),
            features: to_strings(&[
                "Modern Architecture",
                "Responsive Design",
                "Performance Optimized",
                "SEO Friendly",
                "Accessible UI",
            ]),
            challenges: to_strings(&[
                "Complex state management",
                "Performance optimization",
                "Cross-browser compatibility",
                "Mobile responsiveness",
            ]),
            solutions: to_strings(&[
                "Implemented efficient caching strategies",
                "Optimized bundle size and loading times",
                "Used progressive enhancement techniques",
                "Applied mobile-first design principles",
            ]),
            tech_details: TechDetails {
                frontend: to_strings(&frontend),
                backend: to_strings(&["Node.js", "Express", "Database"]),
                deployment: to_strings(&["Vercel", "GitHub Actions", "CI/CD"]),
                tools: to_strings(&["VS Code", "Git", "npm/yarn", "ESLint"]),
            },
            timeline: Timeline {
                planning: "1 week".to_string(),
                development: "2-4 weeks".to_string(),
                testing: "1 week".to_string(),
                deployment: "2 days".to_string(),
            },
            lessons_learned: to_strings(&[
                "Importance of planning and architecture",
                "Value of automated testing",
                "Benefits of continuous deployment",
                "User feedback integration",
            ]),
            fetched_at: Utc::now(),
            project,
        })
    }

    /// Aggregate statistics over the owner's non-fork repositories
    pub async fn owner_stats(&self) -> Result<OwnerStats, PortfolioError> {
        let (user, repositories) = tokio::join!(
            self.github.get_user(),
            self.github.list_raw_repositories()
        );
        let user = user?;
        let repositories = repositories?;

        let total_stars = repositories.iter().map(|repo| repo.stargazers_count).sum();
        let total_forks = repositories.iter().map(|repo| repo.forks_count).sum();

        let mut language_counts: std::collections::BTreeMap<String, u64> =
            std::collections::BTreeMap::new();
        for repo in &repositories {
            if let Some(language) = &repo.language {
                *language_counts.entry(language.clone()).or_insert(0) += 1;
            }
        }
        let mut top_languages: Vec<LanguageCount> = language_counts
            .into_iter()
            .map(|(language, count)| LanguageCount { language, count })
            .collect();
        top_languages.sort_by(|a, b| b.count.cmp(&a.count));
        top_languages.truncate(TOP_LANGUAGE_LIMIT);

        Ok(OwnerStats {
            user,
            total_repos: repositories.len() as u64,
            total_stars,
            total_forks,
            top_languages,
            recent_repos: repositories
                .into_iter()
                .take(RECENT_REPO_LIMIT)
                .map(project_from_repository)
                .collect(),
            last_updated: Utc::now(),
        })
    }

    /// The owner's recent public activity
    ///
    /// Feed errors degrade to an empty list; the activity view is purely
    /// cosmetic and must never fail a page.
    pub async fn recent_activity(&self) -> Vec<ActivityEvent> {
        match self.github.list_public_events(EVENT_PAGE_SIZE).await {
            Ok(events) => events
                .into_iter()
                .take(RECENT_EVENT_LIMIT)
                .map(activity_from_event)
                .collect(),
            Err(err) => {
                tracing::warn!("Failed to fetch public events: {}; returning empty feed", err);
                Vec::new()
            }
        }
    }

    /// Recent commits over the most recently updated repositories
    ///
    /// The first [`COMMIT_REPO_LIMIT`] non-fork repositories each contribute
    /// up to [`COMMITS_PER_REPO`] commits; the lists are flattened in
    /// repository order and capped at [`RECENT_COMMIT_LIMIT`]. A failing
    /// repository contributes nothing, and a failing repository listing
    /// yields an empty feed; like the event feed, this view is cosmetic and
    /// must never fail a page.
    pub async fn recent_commits(&self) -> Vec<RepoCommit> {
        let repositories = match self.github.list_raw_repositories().await {
            Ok(repositories) => repositories,
            Err(err) => {
                tracing::warn!(
                    "Failed to list repositories for the commit feed: {}; returning empty feed",
                    err
                );
                return Vec::new();
            }
        };

        let per_repo = join_all(
            repositories
                .into_iter()
                .take(COMMIT_REPO_LIMIT)
                .map(|repo| self.commits_of(repo.name)),
        )
        .await;

        let mut commits: Vec<RepoCommit> = per_repo.into_iter().flatten().collect();
        commits.truncate(RECENT_COMMIT_LIMIT);
        commits
    }

    /// One repository's contribution to the commit feed; failures degrade
    /// to an empty list
    async fn commits_of(&self, repo_name: String) -> Vec<RepoCommit> {
        match self.github.list_commits(&repo_name, COMMITS_PER_REPO).await {
            Ok(commits) => commits
                .into_iter()
                .map(|commit| RepoCommit {
                    sha: commit.sha,
                    message: commit.commit.message,
                    repo_name: repo_name.clone(),
                    html_url: commit.html_url,
                    authored_at: commit.commit.author.and_then(|author| author.date),
                })
                .collect(),
            Err(err) => {
                tracing::warn!(
                    "Commit listing failed for {}: {}; skipping repository",
                    repo_name,
                    err
                );
                Vec::new()
            }
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn activity_from_event(event: GithubEvent) -> ActivityEvent {
    let kind = ActivityKind::from_event_type(&event.event_type);
    let payload_summary = summarize_payload(kind, &event);

    ActivityEvent {
        id: event.id,
        kind,
        repo_name: event.repo.name,
        created_at: event.created_at,
        payload_summary,
    }
}

fn summarize_payload(kind: ActivityKind, event: &GithubEvent) -> String {
    match kind {
        ActivityKind::Push => {
            let commit_count = event
                .payload
                .get("commits")
                .and_then(|commits| commits.as_array())
                .map(|commits| commits.len());
            match commit_count {
                Some(count) => format!("pushed {} commit(s)", count),
                None => "pushed commits".to_string(),
            }
        }
        ActivityKind::Create => {
            let ref_type = event
                .payload
                .get("ref_type")
                .and_then(|ref_type| ref_type.as_str())
                .unwrap_or("reference");
            format!("created a {}", ref_type)
        }
        ActivityKind::Watch => "starred the repository".to_string(),
        ActivityKind::Fork => "forked the repository".to_string(),
        ActivityKind::Other => event.event_type.trim_end_matches("Event").to_lowercase(),
    }
}
