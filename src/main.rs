mod cli;
mod config;
mod core;
mod error;

use crate::cli::Cli;
use crate::config::Config;
use crate::core::{OpenAiCompleter, Pipeline, Reporter, TranscriptService, YouTubeSearchService};
use crate::error::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = Config::from_cli(&cli);
    if config.youtube_api_key.is_empty() {
        tracing::warn!("no YouTube API key configured; search requests will be rejected");
    }

    let pipeline = Pipeline::new(
        YouTubeSearchService::new(&config),
        TranscriptService::new(config.languages.clone())?,
        OpenAiCompleter::new(&config),
        config.max_results,
    );

    let mut reporter = Reporter::stdout();
    pipeline.run(&config.assets_path, &mut reporter).await
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
