mod audit;
mod discover;
mod score;
mod source;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "brandaudit-cli")]
#[command(about = "Brand health audits for social media accounts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full audit for a brand handle and print the report
    Audit {
        handle: String,

        /// Report language; defaults to `BRANDAUDIT_LANGUAGE`
        #[arg(long)]
        language: Option<String>,

        /// Print the report as JSON instead of a summary table
        #[arg(long)]
        json: bool,
    },
    /// Run influencer discovery only
    Discover {
        handle: String,

        /// Brand bio used for hashtag extraction; fetched from the profile
        /// source when omitted
        #[arg(long)]
        bio: Option<String>,
    },
    /// Score a single provider profile payload
    Score {
        /// Path to a profile-scraper JSON item
        payload: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = brandaudit_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Audit {
            handle,
            language,
            json,
        } => audit::run_audit_command(&config, &handle, language.as_deref(), json).await,
        Commands::Discover { handle, bio } => {
            discover::run_discover_command(&config, &handle, bio.as_deref()).await
        }
        Commands::Score { payload } => score::run_score_command(&config, &payload).await,
    }
}
