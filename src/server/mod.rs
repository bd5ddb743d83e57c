//! HTTP boundary for the aggregation pipeline
//!
//! Exposes the listing, detail, webhook and preflight endpoints. Handlers
//! own the outermost catch of the fallback chain: a degraded tier maps to
//! 206 Partial Content, total exhaustion maps to a generic 500 with no
//! upstream error detail leaked to the caller. Cache directives follow the
//! freshness tier of the payload (short TTL plus stale-while-revalidate for
//! live data, longer TTL for basic data).

use actix_web::http::{Method, header};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::portfolio::error::PortfolioError;
use crate::portfolio::fallback::{self, FallbackTier};
use crate::portfolio::pipeline::AggregationPipeline;

const CORS_ORIGIN: (&str, &str) = ("Access-Control-Allow-Origin", "*");

/// Cache directive for enhanced listings: fresh for a minute, then served
/// stale while revalidating
const CACHE_ENHANCED: &str = "public, s-maxage=60, stale-while-revalidate=300";

/// Cache directive for basic listings
const CACHE_BASIC: &str = "public, s-maxage=600";

/// Cache directive for the detail view
const CACHE_DETAIL: &str = "public, s-maxage=300, stale-while-revalidate=600";

/// Shared per-process state handed to every handler
pub struct AppState {
    /// The aggregation pipeline serving all read endpoints
    pub pipeline: AggregationPipeline,

    /// Shared secret expected on webhook deliveries
    pub webhook_secret: String,
}

/// Query parameters of the listing endpoint
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `basic` skips enrichment and probing; anything else (or absence)
    /// selects enhanced mode
    pub mode: Option<String>,
}

/// Query parameters of the webhook endpoint
#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    pub secret: Option<String>,
}

/// Registers all routes on an actix service config
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects")
            .route(web::get().to(list_projects))
            .route(web::post().to(webhook))
            .route(web::route().method(Method::OPTIONS).to(preflight)),
    )
    .service(web::resource("/projects/{name}").route(web::get().to(project_detail)));
}

/// `GET /projects?mode={basic|enhanced}`
async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> HttpResponse {
    let basic_mode = query.mode.as_deref() == Some("basic");
    tracing::info!(
        "Fetching projects from GitHub (mode: {})",
        if basic_mode { "basic" } else { "enhanced" }
    );

    let (requested_tier, chain) = if basic_mode {
        (FallbackTier::Basic, fallback::basic_chain(&state.pipeline))
    } else {
        (
            FallbackTier::Enhanced,
            fallback::enhanced_chain(&state.pipeline),
        )
    };

    match fallback::first_success(chain).await {
        Ok(outcome) if outcome.is_degraded(requested_tier) => {
            tracing::warn!(
                "Serving degraded project listing from tier '{}'",
                outcome.tier
            );
            HttpResponse::PartialContent()
                .insert_header((header::CACHE_CONTROL, "no-cache"))
                .insert_header(CORS_ORIGIN)
                .json(outcome.projects)
        }
        Ok(outcome) => {
            tracing::info!(
                "Retrieved {} projects at tier '{}'",
                outcome.projects.len(),
                outcome.tier
            );
            let cache_control = if basic_mode { CACHE_BASIC } else { CACHE_ENHANCED };
            HttpResponse::Ok()
                .insert_header((header::CACHE_CONTROL, cache_control))
                .insert_header(CORS_ORIGIN)
                .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"))
                .json(outcome.projects)
        }
        Err(err) => {
            tracing::error!("All fetch strategies failed: {}", err);
            internal_error(
                "Failed to fetch project data",
                "Unable to retrieve project information from GitHub. Try again later.",
            )
        }
    }
}

/// `GET /projects/{name}`
async fn project_detail(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let requested = path.into_inner();
    tracing::info!("Fetching details for project: {}", requested);

    match state.pipeline.project_detail(&requested).await {
        Ok(detail) => HttpResponse::Ok()
            .insert_header((header::CACHE_CONTROL, CACHE_DETAIL))
            .insert_header(CORS_ORIGIN)
            .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"))
            .json(detail),
        Err(PortfolioError::NotFound { name, available }) => {
            HttpResponse::NotFound().insert_header(CORS_ORIGIN).json(json!({
                "error": "Project not found",
                "message": format!("Project '{}' does not exist.", name),
                "available_projects": available,
            }))
        }
        Err(err) => {
            tracing::error!("Error fetching project details: {}", err);
            internal_error(
                "Failed to fetch project details",
                "Unable to retrieve project information. Please try again later.",
            )
        }
    }
}

/// `POST /projects?secret={token}` — webhook acknowledgment
///
/// The payload is logged and discarded; no core logic depends on its
/// contents.
async fn webhook(
    state: web::Data<AppState>,
    query: web::Query<WebhookQuery>,
    body: web::Bytes,
) -> HttpResponse {
    if let Err(err) = authorize_webhook(query.secret.as_deref(), &state.webhook_secret) {
        tracing::warn!("Rejected webhook delivery: {}", err);
        return HttpResponse::Unauthorized()
            .insert_header(CORS_ORIGIN)
            .json(json!({ "error": "Unauthorized" }));
    }

    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(payload) => {
            tracing::info!("Received webhook data: {}", payload);
            HttpResponse::Ok().insert_header(CORS_ORIGIN).json(json!({
                "message": "Webhook processed successfully",
                "timestamp": Utc::now().to_rfc3339(),
            }))
        }
        Err(err) => {
            tracing::error!("Error processing webhook: {}", err);
            HttpResponse::InternalServerError()
                .insert_header(CORS_ORIGIN)
                .json(json!({ "error": "Failed to process webhook" }))
        }
    }
}

/// `OPTIONS /projects` — cross-origin preflight
async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header(CORS_ORIGIN)
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .insert_header((
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            "Content-Type, Authorization",
        ))
        .insert_header((header::ACCESS_CONTROL_MAX_AGE, "86400"))
        .finish()
}

/// Validates the webhook shared secret
fn authorize_webhook(provided: Option<&str>, expected: &str) -> Result<(), PortfolioError> {
    if provided == Some(expected) {
        Ok(())
    } else {
        Err(PortfolioError::Unauthorized)
    }
}

/// Generic 500 body: message and timestamp only, never upstream detail
fn internal_error(error: &str, message: &str) -> HttpResponse {
    HttpResponse::InternalServerError()
        .insert_header(CORS_ORIGIN)
        .json(json!({
            "error": error,
            "message": message,
            "timestamp": Utc::now().to_rfc3339(),
        }))
}
