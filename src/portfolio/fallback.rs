//! Ordered fallback strategies for the project listing
//!
//! Rather than nesting catch blocks, the listing is produced by walking an
//! explicit ordered list of strategies, each exposing the same
//! `fetch -> Result<collection>` contract. The combinator returns the first
//! success together with the tier that produced it, or the last failure
//! once every tier is exhausted. The ordering is a reliability policy:
//! prefer richer data, degrade to correctness over richness, degrade to
//! provider redundancy over structure, and only then fail.

use futures::future::BoxFuture;
use strum::{AsRefStr, Display, EnumString};

use crate::portfolio::error::PortfolioError;
use crate::portfolio::models::ProjectRecord;
use crate::portfolio::pipeline::AggregationPipeline;

/// Fidelity tier a project collection was produced at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FallbackTier {
    /// Full pipeline: fetch, enrichment, synthetic metrics, probing
    Enhanced,
    /// Plain fetcher output, no enrichment
    Basic,
    /// Direct unauthenticated REST call with minimal field mapping
    DirectApi,
}

/// A successful fetch together with the tier that produced it
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    /// Tier the collection came from
    pub tier: FallbackTier,

    /// The project collection
    pub projects: Vec<ProjectRecord>,
}

impl FallbackOutcome {
    /// True when a lower tier than the requested one answered
    pub fn is_degraded(&self, requested: FallbackTier) -> bool {
        self.tier != requested
    }
}

/// One entry of the fallback chain: a tier plus a lazily-built fetch future
pub struct Strategy<'a> {
    tier: FallbackTier,
    run: Box<dyn Fn() -> BoxFuture<'a, Result<Vec<ProjectRecord>, PortfolioError>> + Send + Sync + 'a>,
}

impl<'a> Strategy<'a> {
    /// Wraps a fetch closure as a chain entry
    pub fn new(
        tier: FallbackTier,
        run: impl Fn() -> BoxFuture<'a, Result<Vec<ProjectRecord>, PortfolioError>>
            + Send
            + Sync
            + 'a,
    ) -> Self {
        Self {
            tier,
            run: Box::new(run),
        }
    }

    /// The tier this strategy serves
    pub fn tier(&self) -> FallbackTier {
        self.tier
    }
}

/// Runs strategies in order and returns the first success
///
/// Every failure is logged and the next tier attempted; the error of the
/// final tier propagates when nothing succeeds. The input order is the
/// policy — no strategy is ever skipped or retried.
pub async fn first_success(
    strategies: Vec<Strategy<'_>>,
) -> Result<FallbackOutcome, PortfolioError> {
    let mut last_error: Option<PortfolioError> = None;

    for strategy in &strategies {
        match (strategy.run)().await {
            Ok(projects) => {
                return Ok(FallbackOutcome {
                    tier: strategy.tier,
                    projects,
                });
            }
            Err(err) => {
                tracing::warn!(
                    "Fetch strategy '{}' failed: {}; trying next tier",
                    strategy.tier,
                    err
                );
                last_error = Some(err);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| PortfolioError::SourceFetch("no fetch strategies configured".to_string())))
}

/// The chain used for enhanced-mode requests
pub fn enhanced_chain(pipeline: &AggregationPipeline) -> Vec<Strategy<'_>> {
    vec![
        Strategy::new(FallbackTier::Enhanced, move || {
            Box::pin(pipeline.enhanced_projects())
        }),
        Strategy::new(FallbackTier::Basic, move || {
            Box::pin(pipeline.basic_projects())
        }),
        Strategy::new(FallbackTier::DirectApi, move || {
            Box::pin(pipeline.direct_fallback_projects())
        }),
    ]
}

/// The chain used for basic-mode requests
pub fn basic_chain(pipeline: &AggregationPipeline) -> Vec<Strategy<'_>> {
    vec![
        Strategy::new(FallbackTier::Basic, move || {
            Box::pin(pipeline.basic_projects())
        }),
        Strategy::new(FallbackTier::DirectApi, move || {
            Box::pin(pipeline.direct_fallback_projects())
        }),
    ]
}
