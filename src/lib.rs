//! Portfolio project aggregation library over the GitHub REST API
//!
//! This library builds the "live projects" view of a personal portfolio site:
//! it lists a configured owner's non-fork repositories, optionally enriches
//! each of them with language breakdowns, contributor counts, synthetic
//! display metrics and a homepage liveness probe, and degrades gracefully
//! through a chain of decreasing-fidelity fallback strategies when upstream
//! calls fail.
//!
//! ## Authentication
//!
//! GitHub operations support both authenticated and unauthenticated access.
//! Authentication is handled through the `FOLIO_GITHUB_TOKEN` environment
//! variable or an explicit token passed at client construction time.
//!
//! - Without token: 60 requests/hour (unauthenticated)
//! - With token: 5,000 requests/hour (authenticated)
//!
//! A token is optional for public repositories, which is all this service
//! reads.
//!
//! ## Usage
//!
//! This library can be used in several ways:
//! - As an HTTP server exposing the `/projects` endpoints (`folio-server`)
//! - As a terminal client printing the same aggregated data (`folio-cli`)
//! - Directly as a Rust library via [`portfolio::AggregationPipeline`]
//!
//! All external state is injected: the GitHub client carries its own base
//! URL, owner and token, so there is no process-global configuration and no
//! state survives a request.

pub mod portfolio;
pub mod server;
