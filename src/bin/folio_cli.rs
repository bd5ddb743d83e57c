use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{self, EnvFilter};

use folio_api::portfolio::github::{DEFAULT_OWNER, GithubClient};
use folio_api::portfolio::metrics::RandomMetricsGenerator;
use folio_api::portfolio::pipeline::AggregationPipeline;
use folio_api::portfolio::probe::LivenessProber;

#[derive(Parser)]
#[command(author, version = "0.1.0", about = "Portfolio aggregation CLI for terminal use", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// GitHub API token for authentication (overrides FOLIO_GITHUB_TOKEN environment variable)
    #[arg(short = 't', long, global = true, env = "FOLIO_GITHUB_TOKEN")]
    github_token: Option<String>,

    /// GitHub owner whose repositories are aggregated
    #[arg(short, long, global = true, env = "FOLIO_GITHUB_OWNER", default_value = DEFAULT_OWNER)]
    owner: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the owner's projects
    Projects {
        /// Skip enrichment and probing, return the plain repository list
        #[arg(long)]
        basic: bool,
    },
    /// Show the extended detail view for one project
    Detail {
        /// Project name (matched case-insensitively, whitespace as dashes)
        name: String,
    },
    /// Show aggregate statistics over the owner's repositories
    Stats,
    /// Show the owner's recent public events and commits
    Activity,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the tracing subscriber with stderr logging
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr) // Keep stdout clean for JSON output
        .with_target(false)
        .with_ansi(false)
        .init();

    let github = GithubClient::new(cli.owner, cli.github_token);
    let pipeline = AggregationPipeline::new(
        github,
        Arc::new(RandomMetricsGenerator),
        LivenessProber::new(),
    );

    match cli.command {
        Commands::Projects { basic } => {
            let projects = if basic {
                pipeline.basic_projects().await?
            } else {
                pipeline.enhanced_projects().await?
            };
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        Commands::Detail { name } => {
            let detail = pipeline.project_detail(&name).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        Commands::Stats => {
            let stats = pipeline.owner_stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Activity => {
            let (events, commits) =
                tokio::join!(pipeline.recent_activity(), pipeline.recent_commits());
            let feed = serde_json::json!({
                "events": events,
                "commits": commits,
            });
            println!("{}", serde_json::to_string_pretty(&feed)?);
        }
    }

    Ok(())
}
