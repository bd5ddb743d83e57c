//! Synthetic display metrics
//!
//! GitHub exposes no view counts, deployment history or uptime for ordinary
//! repositories, so the enhanced listing fabricates plausible numbers for
//! cosmetic display. Every value here is drawn from a bounded pseudo-random
//! range and carries no authoritative meaning; the field names on the output
//! types ("synthetic", "analytics") keep them distinguishable from real
//! telemetry should this service ever be connected to any.
//!
//! Determinism is explicitly not a property of the production generator —
//! repeated calls yield different values. Correctness-sensitive code must
//! not read these numbers, which is why generation sits behind the
//! [`MetricsGenerator`] trait: tests substitute a fixed implementation.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::portfolio::models::{
    DeploymentCounters, DeploymentStatus, IssueCounters, LiveMetrics, ProjectAnalytics,
    PullRequestCounters,
};

/// Real upstream counts that seed analytics generation
///
/// When a field is present it replaces the corresponding random draw, so
/// genuine data always wins over fabricated data.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsInputs {
    /// Current stargazer count
    pub star_count: Option<u64>,

    /// Number of fetched contributors
    pub contributor_count: Option<u64>,

    /// Open issue count reported by the repository endpoint
    pub open_issue_count: Option<u64>,
}

/// Capability interface for producing synthetic metrics
///
/// Production uses [`RandomMetricsGenerator`]; tests substitute a
/// deterministic stub so pipeline assertions stay stable.
pub trait MetricsGenerator: Send + Sync {
    /// Produces a synthetic analytics bundle, honoring real inputs
    fn project_analytics(&self, inputs: &AnalyticsInputs) -> ProjectAnalytics;

    /// Produces a synthetic live-status bundle
    ///
    /// `last_deployment` is the repository's update timestamp when known;
    /// otherwise a recent timestamp is fabricated.
    fn live_metrics(&self, last_deployment: Option<DateTime<Utc>>) -> LiveMetrics;
}

/// Pseudo-random metrics generator used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMetricsGenerator;

impl MetricsGenerator for RandomMetricsGenerator {
    fn project_analytics(&self, inputs: &AnalyticsInputs) -> ProjectAnalytics {
        let mut rng = rand::thread_rng();

        ProjectAnalytics {
            views: rng.gen_range(100..1100),
            clicks: rng.gen_range(50..550),
            stars_trend: match inputs.star_count {
                Some(stars) => stars as i64,
                None => rng.gen_range(-5..15),
            },
            recent_commits: rng.gen_range(1..16),
            contributors: match inputs.contributor_count {
                Some(count) if count > 0 => count,
                _ => rng.gen_range(1..9),
            },
            issues: IssueCounters {
                open: inputs
                    .open_issue_count
                    .unwrap_or_else(|| rng.gen_range(0..10)),
                closed: rng.gen_range(10..60),
            },
            pull_requests: PullRequestCounters {
                open: rng.gen_range(0..5),
                merged: rng.gen_range(5..35),
            },
            deployments: DeploymentCounters {
                total: rng.gen_range(10..60),
                successful: rng.gen_range(8..53),
                failed: rng.gen_range(0..5),
                last_deployed: Utc::now() - Duration::seconds(rng.gen_range(0..7 * 24 * 60 * 60)),
            },
        }
    }

    fn live_metrics(&self, last_deployment: Option<DateTime<Utc>>) -> LiveMetrics {
        let mut rng = rand::thread_rng();

        LiveMetrics {
            uptime: rng.gen_range(95.0..105.0_f64).min(100.0),
            response_time: rng.gen_range(50..250),
            last_deployment: last_deployment.unwrap_or_else(Utc::now),
            status: DeploymentStatus::Active,
            visitors_today: rng.gen_range(50..550),
            performance_score: rng.gen_range(80..100),
        }
    }
}
