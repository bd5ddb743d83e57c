//! Error taxonomy for the aggregation pipeline
//!
//! Propagation policy: per-project enrichment errors are caught inside the
//! pipeline and degrade a single record; pipeline-level errors trigger the
//! next fallback tier; only exhaustion of all tiers surfaces to a caller.
//! Probe failures never appear here at all — the prober converts them into
//! an error-status result at its own boundary.

use thiserror::Error;

/// Errors surfaced by the fetcher, enricher, and lookup paths
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// The upstream repository list call failed
    #[error("failed to fetch repository list: {0}")]
    SourceFetch(String),

    /// An upstream per-repository detail call failed
    #[error("failed to fetch details for repository '{name}': {reason}")]
    DetailFetch { name: String, reason: String },

    /// A named project is absent from the aggregated set
    #[error("project '{name}' not found")]
    NotFound {
        name: String,
        /// Names of all currently aggregated projects
        available: Vec<String>,
    },

    /// The webhook shared secret did not match the configured value
    #[error("webhook secret mismatch")]
    Unauthorized,
}
