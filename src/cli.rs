use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tickerwatch")]
#[command(about = "Predict asset prices from the transcripts of top YouTube videos")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Number of search results to inspect per asset
    #[arg(short = 'n', long, default_value_t = 3)]
    pub max_results: u32,

    /// Model used for the price prediction
    #[arg(short, long, default_value = "gpt-4")]
    pub model: String,

    /// Preferred transcript languages (comma-separated)
    #[arg(short, long, default_value = "en")]
    pub languages: String,

    /// YouTube Data API key (falls back to YOUTUBE_API_KEY)
    #[arg(long)]
    pub youtube_api_key: Option<String>,

    /// Diagnostic log level written to stderr
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
