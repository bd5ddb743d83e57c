//! Core aggregation domain: data model, GitHub client, enrichment and
//! fallback policy.

pub mod error;
pub mod fallback;
pub mod github;
pub mod metrics;
pub mod models;
pub mod overrides;
pub mod pipeline;
pub mod probe;

pub use error::PortfolioError;
pub use fallback::{FallbackOutcome, FallbackTier};
pub use github::GithubClient;
pub use metrics::{MetricsGenerator, RandomMetricsGenerator};
pub use models::{ActivityEvent, LanguageStat, LiveMetrics, ProjectRecord, RepoCommit};
pub use pipeline::AggregationPipeline;
pub use probe::{LivenessProber, ProbeResult};
