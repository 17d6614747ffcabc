use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jtools::api::state::AppState;
use jtools::calculate::{summarize_rankings, EligibilityCalculator};
use jtools::config::AppConfig;
use jtools::models::TOOLS;
use jtools::storage::{AuthorFilter, JsonlRankingStore, StorageConfig};

#[derive(Parser)]
#[command(name = "jtools")]
#[command(about = "Jianshu micro-tools: LP recommendation checks, leaderboard and lottery data")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the next LP recommendation date of an author
    NextRecommendDate {
        /// Author slug
        author: String,
    },

    /// Print an author's leaderboard summary
    RankSummary {
        /// Author slug
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        slug: Option<String>,

        /// Author name as shown on the leaderboard
        #[arg(long)]
        name: Option<String>,
    },

    /// List the tools and their configured status
    Tools,

    /// Print the effective configuration
    PrintConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting jtools v{}", env!("CARGO_PKG_VERSION"));

    let storage = Arc::new(StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState::new(Arc::new(config), storage);
            let app = jtools::api::build_router(state);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Commands::NextRecommendDate { author } => {
            let store = JsonlRankingStore::new(storage);
            let cooldown = EligibilityCalculator::new(&store).cooldown(&author).await?;
            match cooldown {
                Some(cooldown) => println!("{}", serde_json::to_string_pretty(&cooldown)?),
                None => println!("{} has no qualifying leaderboard records", author),
            }
        }
        Commands::RankSummary { slug, name } => {
            let filter = match (slug, name) {
                (Some(slug), _) => AuthorFilter::Slug(slug),
                (None, Some(name)) => AuthorFilter::Name(name),
                (None, None) => anyhow::bail!("either --slug or --name is required"),
            };
            let store = JsonlRankingStore::new(storage);
            let summary = summarize_rankings(&store.records_for(&filter)?);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Tools => {
            for tool in TOOLS {
                let status = config.tool(tool.slug).status;
                println!("{:<30} {:<12} {}", tool.slug, format!("{:?}", status), tool.name);
            }
        }
        Commands::PrintConfig => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
