use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::portfolio::github::{DEFAULT_OWNER, GithubClient};
use folio_api::portfolio::metrics::RandomMetricsGenerator;
use folio_api::portfolio::pipeline::AggregationPipeline;
use folio_api::portfolio::probe::LivenessProber;
use folio_api::server::{self, AppState};

#[derive(Parser)]
#[command(author, version = "0.1.0", about = "Portfolio project aggregation HTTP server", long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    address: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// GitHub API token for authentication (overrides FOLIO_GITHUB_TOKEN environment variable)
    #[arg(short = 't', long, env = "FOLIO_GITHUB_TOKEN")]
    github_token: Option<String>,

    /// GitHub owner whose repositories are aggregated
    #[arg(short, long, env = "FOLIO_GITHUB_OWNER", default_value = DEFAULT_OWNER)]
    owner: String,

    /// Shared secret expected on webhook deliveries
    #[arg(long, env = "FOLIO_WEBHOOK_SECRET", default_value = "")]
    webhook_secret: String,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let level = if cli.debug { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},{}", level, env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(false)) // Disable ANSI color codes
        .init();

    // Parse socket address
    let addr: SocketAddr = cli.address.parse()?;

    tracing::info!(
        "Portfolio aggregation server listening on http://{}/projects",
        addr
    );
    tracing::info!("Aggregating repositories of owner '{}'", cli.owner);

    if cli.github_token.is_some() {
        tracing::info!("Using GitHub token for API authentication");
    }

    if cli.webhook_secret.is_empty() {
        tracing::warn!("No webhook secret configured; deliveries presenting an empty secret will be accepted");
    }

    let github = GithubClient::new(cli.owner, cli.github_token);
    let pipeline = AggregationPipeline::new(
        github,
        Arc::new(RandomMetricsGenerator),
        LivenessProber::new(),
    );
    let state = web::Data::new(AppState {
        pipeline,
        webhook_secret: cli.webhook_secret,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(server::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
