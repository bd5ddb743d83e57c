//! Homepage liveness probing
//!
//! A probe is a single header-only request against a project's declared
//! homepage, bounded by a timeout. Probes never fail past their own
//! boundary: every transport error, timeout or non-success status is
//! converted into an error-status result so a dead demo site can never
//! abort an aggregation request.

use std::time::{Duration, Instant};

use url::Url;

use crate::portfolio::models::DeploymentStatus;

/// Default per-probe timeout in milliseconds
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

/// Outcome of one liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// `Active` when the endpoint answered with a success status,
    /// `Error` otherwise
    pub status: DeploymentStatus,

    /// Elapsed time in milliseconds; zero when no request was made, the
    /// configured timeout when the request failed or timed out
    pub response_time_ms: u64,
}

impl ProbeResult {
    fn error(response_time_ms: u64) -> Self {
        Self {
            status: DeploymentStatus::Error,
            response_time_ms,
        }
    }
}

/// Bounded-time reachability checker for candidate URLs
///
/// Probes are independent of each other and may run concurrently across
/// projects; each one enforces its own timeout.
#[derive(Debug, Clone)]
pub struct LivenessProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl LivenessProber {
    /// Creates a prober with the default 5000 ms timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS))
    }

    /// Creates a prober with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// The configured per-probe timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probes a candidate URL with a header-only request
    ///
    /// An empty or unparsable URL yields `{error, 0}` without any network
    /// call. A reachable endpoint yields `{active, elapsed}` on a success
    /// status and `{error, elapsed}` otherwise. A transport failure or
    /// timeout yields `{error, timeout}`.
    pub async fn probe(&self, url: &str) -> ProbeResult {
        let url = url.trim();
        if url.is_empty() {
            return ProbeResult::error(0);
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!("Skipping probe of unparsable URL {}: {}", url, err);
                return ProbeResult::error(0);
            }
        };

        let timeout_ms = self.timeout.as_millis() as u64;
        let start = Instant::now();

        let response = self
            .client
            .head(parsed)
            .timeout(self.timeout)
            .send()
            .await;

        match response {
            Ok(response) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                let status = if response.status().is_success() {
                    DeploymentStatus::Active
                } else {
                    DeploymentStatus::Error
                };
                ProbeResult {
                    status,
                    response_time_ms: elapsed_ms,
                }
            }
            Err(err) => {
                tracing::warn!("Liveness probe failed for {}: {}", url, err);
                ProbeResult::error(timeout_ms)
            }
        }
    }
}

impl Default for LivenessProber {
    fn default() -> Self {
        Self::new()
    }
}
