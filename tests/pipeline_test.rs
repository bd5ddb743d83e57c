//! Tests for the aggregation pipeline
//!
//! The GitHub client is pointed at a mockito server and the metrics
//! generator replaced with a fixed stub, leaving only the orchestration
//! behavior under test: enrichment fan-out, per-project degradation,
//! curated overrides, probing, lookup and the direct-API fallback.

use std::sync::Arc;
use std::time::Duration;

use folio_api::portfolio::error::PortfolioError;
use folio_api::portfolio::fallback::{FallbackTier, enhanced_chain, first_success};
use folio_api::portfolio::github::GithubClient;
use folio_api::portfolio::metrics::{AnalyticsInputs, MetricsGenerator};
use folio_api::portfolio::models::{
    DeploymentCounters, DeploymentStatus, IssueCounters, LiveMetrics, ProjectAnalytics,
    PullRequestCounters,
};
use folio_api::portfolio::pipeline::AggregationPipeline;
use folio_api::portfolio::probe::LivenessProber;
use mockito::Matcher;
use serde_json::json;

const OWNER: &str = "octocat";

/// Deterministic generator so assertions do not depend on random draws.
struct FixedMetrics;

impl MetricsGenerator for FixedMetrics {
    fn project_analytics(&self, inputs: &AnalyticsInputs) -> ProjectAnalytics {
        ProjectAnalytics {
            views: 500,
            clicks: 100,
            stars_trend: inputs.star_count.map(|s| s as i64).unwrap_or(0),
            recent_commits: 4,
            contributors: inputs.contributor_count.unwrap_or(0),
            issues: IssueCounters {
                open: inputs.open_issue_count.unwrap_or(0),
                closed: 20,
            },
            pull_requests: PullRequestCounters { open: 1, merged: 10 },
            deployments: DeploymentCounters {
                total: 12,
                successful: 11,
                failed: 1,
                last_deployed: chrono::Utc::now(),
            },
        }
    }

    fn live_metrics(&self, last_deployment: Option<chrono::DateTime<chrono::Utc>>) -> LiveMetrics {
        LiveMetrics {
            uptime: 99.9,
            response_time: 120,
            last_deployment: last_deployment.unwrap_or_else(chrono::Utc::now),
            status: DeploymentStatus::Active,
            visitors_today: 75,
            performance_score: 90,
        }
    }
}

fn pipeline_for(server: &mockito::Server) -> AggregationPipeline {
    let github = GithubClient::with_api_base_url(OWNER, None, server.url());
    AggregationPipeline::new(
        github,
        Arc::new(FixedMetrics),
        LivenessProber::with_timeout(Duration::from_millis(500)),
    )
}

fn repo_json(id: u64, name: &str, homepage: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("Description of {}", name),
        "html_url": format!("https://github.com/{}/{}", OWNER, name),
        "homepage": homepage,
        "language": "Rust",
        "stargazers_count": 7,
        "forks_count": 1,
        "open_issues_count": 2,
        "fork": false,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-06-01T00:00:00Z"
    })
}

async fn mock_repo_details(
    server: &mut mockito::Server,
    name: &str,
    homepage: Option<&str>,
) -> Vec<mockito::Mock> {
    vec![
        server
            .mock("GET", format!("/repos/octocat/{}", name).as_str())
            .with_status(200)
            .with_body(repo_json(1, name, homepage).to_string())
            .create_async()
            .await,
        server
            .mock("GET", format!("/repos/octocat/{}/languages", name).as_str())
            .with_status(200)
            .with_body(json!({ "Rust": 8000, "Shell": 2000 }).to_string())
            .create_async()
            .await,
        server
            .mock(
                "GET",
                format!("/repos/octocat/{}/contributors", name).as_str(),
            )
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!([{ "id": 10, "login": OWNER, "contributions": 50 }]).to_string())
            .create_async()
            .await,
    ]
}

/// One project's enrichment failure degrades that record alone; the batch
/// keeps its size and input order.
#[tokio::test]
async fn test_enhanced_degrades_single_project_on_failure() {
    let mut server = mockito::Server::new_async().await;

    let _repos = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([repo_json(1, "alpha", None), repo_json(2, "beta", None)]).to_string())
        .create_async()
        .await;
    let _alpha = mock_repo_details(&mut server, "alpha", None).await;
    // beta's detail endpoints stay unmocked and fail; so do the injected
    // showcase project's

    let pipeline = pipeline_for(&server);
    let projects = pipeline
        .enhanced_projects()
        .await
        .expect("batch must survive individual failures");

    assert_eq!(projects.len(), 3, "alpha, beta, and the injected showcase");
    assert_eq!(projects[0].name, "alpha");
    assert_eq!(projects[1].name, "beta");

    assert!(projects[0].is_enriched());
    assert!(
        !projects[1].is_enriched(),
        "A failed enrichment must leave the bare base record"
    );

    let alpha = &projects[0];
    assert_eq!(
        alpha.tech_stack.as_deref(),
        Some(["Rust".to_string(), "Shell".to_string()].as_slice()),
        "Tech stack follows the language share ordering"
    );
    let analytics = alpha.analytics.as_ref().expect("alpha has analytics");
    assert_eq!(analytics.stars_trend, 7, "Real star count seeds the trend");
    assert_eq!(analytics.contributors, 1);
    assert_eq!(analytics.issues.open, 2);
    assert_eq!(alpha.demo_available, Some(false));
}

/// Curated overrides replace derived stack, features, demo flag and
/// performance score.
#[tokio::test]
async fn test_curated_override_takes_precedence() {
    let mut server = mockito::Server::new_async().await;

    let _repos = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([repo_json(1, "portfolio-website", None)]).to_string())
        .create_async()
        .await;
    let _details = mock_repo_details(&mut server, "portfolio-website", None).await;

    let pipeline = pipeline_for(&server);
    let projects = pipeline.enhanced_projects().await.expect("batch succeeds");

    let project = projects
        .iter()
        .find(|p| p.name == "portfolio-website")
        .expect("project present");

    let stack = project.tech_stack.as_ref().expect("curated stack");
    assert_eq!(stack[0], "Next.js");
    assert_eq!(
        project.demo_available,
        Some(true),
        "Curated flag wins over homepage absence"
    );
    let live = project.live_metrics.as_ref().expect("live metrics");
    assert_eq!(live.performance_score, 98, "Curated score wins over the generator");
}

/// A declared homepage is probed and the probe result replaces the
/// generated status and response time.
#[tokio::test]
async fn test_homepage_probe_overwrites_live_status() {
    let mut server = mockito::Server::new_async().await;
    let homepage = server.url();

    let _repos = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([repo_json(1, "alpha", Some(homepage.as_str()))]).to_string())
        .create_async()
        .await;
    let _details = mock_repo_details(&mut server, "alpha", Some(homepage.as_str())).await;
    let _head = server
        .mock("HEAD", "/")
        .with_status(503)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    let projects = pipeline.enhanced_projects().await.expect("batch succeeds");

    let alpha = projects.iter().find(|p| p.name == "alpha").expect("alpha");
    let live = alpha.live_metrics.as_ref().expect("live metrics");
    assert_eq!(
        live.status,
        DeploymentStatus::Error,
        "Probe failure must replace the generated active status"
    );
    assert_eq!(alpha.demo_available, Some(true));
}

/// Name lookup matches case-insensitively and reports available names on
/// a miss.
#[tokio::test]
async fn test_project_by_name_lookup() {
    let mut server = mockito::Server::new_async().await;

    let _repos = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([repo_json(1, "alpha", None)]).to_string())
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);

    let found = pipeline.project_by_name("ALPHA").await.expect("case-insensitive hit");
    assert_eq!(found.id, 1);

    match pipeline.project_by_name("missing").await {
        Err(PortfolioError::NotFound { name, available }) => {
            assert_eq!(name, "missing");
            assert!(available.contains(&"alpha".to_string()));
            assert!(
                available.contains(&"tableCraft".to_string()),
                "Available names include the injected showcase"
            );
        }
        other => panic!("Expected NotFound, got {:?}", other.map(|p| p.name)),
    }
}

/// The detail view carries the base record plus template narrative content
/// keyed off the project slug and language.
#[tokio::test]
async fn test_project_detail_assembly() {
    let mut server = mockito::Server::new_async().await;

    let mut repo = repo_json(1, "alpha", None);
    repo["language"] = json!("TypeScript");
    let _repos = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([repo]).to_string())
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    let detail = pipeline.project_detail("alpha").await.expect("detail");

    assert_eq!(detail.project.name, "alpha");
    assert_eq!(detail.screenshots.len(), 3);
    assert_eq!(detail.screenshots[0], "/images/projects/alpha-1.jpg");
    assert_eq!(
        detail.tech_details.frontend[0], "TypeScript",
        "TypeScript projects get the TypeScript frontend block"
    );
    assert!(detail.detailed_description.contains("Description of alpha"));
    assert_eq!(detail.analytics.views, 500);
}

/// Owner statistics aggregate stars, forks and language counts over
/// non-fork repositories.
#[tokio::test]
async fn test_owner_stats_aggregation() {
    let mut server = mockito::Server::new_async().await;

    let _user = server
        .mock("GET", "/users/octocat")
        .with_status(200)
        .with_body(
            json!({
                "id": 100,
                "login": OWNER,
                "name": "The Octocat",
                "public_repos": 8,
                "followers": 20,
                "following": 5
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut rusty = repo_json(1, "alpha", None);
    rusty["stargazers_count"] = json!(10);
    rusty["forks_count"] = json!(4);
    let mut scripted = repo_json(2, "beta", None);
    scripted["language"] = json!("Python");
    scripted["stargazers_count"] = json!(5);
    scripted["forks_count"] = json!(1);
    let mut forked = repo_json(3, "forked", None);
    forked["fork"] = json!(true);
    forked["stargazers_count"] = json!(100);

    let _repos = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([rusty, scripted, forked]).to_string())
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    let stats = pipeline.owner_stats().await.expect("stats");

    assert_eq!(stats.user.login, OWNER);
    assert_eq!(stats.total_repos, 2, "Forks are excluded");
    assert_eq!(stats.total_stars, 15, "Forked stars must not count");
    assert_eq!(stats.total_forks, 5);
    assert_eq!(stats.top_languages.len(), 2);
    assert_eq!(stats.recent_repos.len(), 2);
}

/// The activity feed classifies events and summarizes their payloads;
/// feed failures degrade to an empty list.
#[tokio::test]
async fn test_recent_activity_feed() {
    let mut server = mockito::Server::new_async().await;

    let _events = server
        .mock("GET", "/users/octocat/events/public")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([
                {
                    "id": "1",
                    "type": "PushEvent",
                    "repo": { "name": "octocat/alpha" },
                    "created_at": "2024-06-01T00:00:00Z",
                    "payload": { "commits": [{}, {}, {}] }
                },
                {
                    "id": "2",
                    "type": "CreateEvent",
                    "repo": { "name": "octocat/beta" },
                    "created_at": "2024-06-02T00:00:00Z",
                    "payload": { "ref_type": "branch" }
                },
                {
                    "id": "3",
                    "type": "ReleaseEvent",
                    "repo": { "name": "octocat/alpha" },
                    "created_at": "2024-06-03T00:00:00Z",
                    "payload": {}
                }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    let activity = pipeline.recent_activity().await;

    assert_eq!(activity.len(), 3);
    assert_eq!(activity[0].payload_summary, "pushed 3 commit(s)");
    assert_eq!(activity[1].payload_summary, "created a branch");
    assert_eq!(activity[2].payload_summary, "release");
}

fn commit_json(sha: &str, message: &str) -> serde_json::Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/{}/alpha/commit/{}", OWNER, sha),
        "commit": {
            "message": message,
            "author": { "name": "The Octocat", "date": "2024-06-01T00:00:00Z" }
        }
    })
}

/// The commit feed gathers commits from the most recently updated
/// repositories; a failing repository contributes nothing.
#[tokio::test]
async fn test_recent_commits_degrades_per_repository() {
    let mut server = mockito::Server::new_async().await;

    let _repos = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([repo_json(1, "alpha", None), repo_json(2, "beta", None)]).to_string())
        .create_async()
        .await;
    let _alpha = server
        .mock("GET", "/repos/octocat/alpha/commits")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([commit_json("aaa111", "Fix pagination"), commit_json("bbb222", "Add tests")])
                .to_string(),
        )
        .create_async()
        .await;
    let _beta = server
        .mock("GET", "/repos/octocat/beta/commits")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    let commits = pipeline.recent_commits().await;

    assert_eq!(commits.len(), 2, "Only the healthy repository contributes");
    assert_eq!(commits[0].sha, "aaa111");
    assert_eq!(commits[0].message, "Fix pagination");
    assert_eq!(commits[0].repo_name, "alpha");
    assert!(commits[0].authored_at.is_some());
}

/// At most three repositories are consulted and the flattened feed is
/// capped at ten commits.
#[tokio::test]
async fn test_recent_commits_caps_repositories_and_total() {
    let mut server = mockito::Server::new_async().await;

    let _repos = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([
                repo_json(1, "one", None),
                repo_json(2, "two", None),
                repo_json(3, "three", None),
                repo_json(4, "four", None),
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let five_commits: Vec<serde_json::Value> = (0..5)
        .map(|index| commit_json(&format!("sha{}", index), "Update"))
        .collect();
    for name in ["one", "two", "three"] {
        server
            .mock("GET", format!("/repos/octocat/{}/commits", name).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!(five_commits).to_string())
            .create_async()
            .await;
    }
    let fourth = server
        .mock("GET", "/repos/octocat/four/commits")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .expect(0)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    let commits = pipeline.recent_commits().await;

    assert_eq!(commits.len(), 10, "Flattened feed is capped");
    assert_eq!(commits[0].repo_name, "one", "Repository order is kept");
    assert_eq!(commits[9].repo_name, "two");
    fourth.assert_async().await;
}

/// A failing repository listing degrades the commit feed to empty.
#[tokio::test]
async fn test_recent_commits_swallows_listing_errors() {
    let mut server = mockito::Server::new_async().await;
    let _repos = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    assert!(pipeline.recent_commits().await.is_empty());
}

/// Feed errors never surface; the activity view degrades to empty.
#[tokio::test]
async fn test_recent_activity_swallows_feed_errors() {
    let mut server = mockito::Server::new_async().await;
    let _events = server
        .mock("GET", "/users/octocat/events/public")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    assert!(pipeline.recent_activity().await.is_empty());
}

/// When the structured client is unreachable, the chain walks down to the
/// direct REST tier, which filters forks but injects nothing.
#[tokio::test]
async fn test_chain_falls_back_to_direct_api() {
    let mut direct = mockito::Server::new_async().await;
    let _repos = direct
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([
                repo_json(1, "alpha", None),
                { "id": 2, "name": "forked", "html_url": "https://github.com/octocat/forked", "fork": true },
            ])
            .to_string(),
        )
        .create_async()
        .await;

    // A port that refuses connections stands in for an unreachable API.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let dead_base = format!("http://{}", listener.local_addr().expect("local addr"));
    drop(listener);

    let github = GithubClient::with_api_base_url(OWNER, None, dead_base);
    let pipeline = AggregationPipeline::new(
        github,
        Arc::new(FixedMetrics),
        LivenessProber::with_timeout(Duration::from_millis(500)),
    )
    .with_direct_api_base(direct.url());

    let outcome = first_success(enhanced_chain(&pipeline))
        .await
        .expect("direct tier answers");

    assert_eq!(outcome.tier, FallbackTier::DirectApi);
    assert!(outcome.is_degraded(FallbackTier::Enhanced));
    assert_eq!(outcome.projects.len(), 1, "Forks filtered, nothing injected");
    assert_eq!(outcome.projects[0].name, "alpha");
    assert!(!outcome.projects[0].is_enriched());
}
