use crate::cli::Cli;
use std::env;
use std::path::PathBuf;

pub const ASSETS_FILE: &str = "assets.txt";
pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const PREDICTION_TEMPERATURE: f32 = 0.7;

const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";
const YOUTUBE_API_BASE_ENV: &str = "YOUTUBE_API_BASE";
const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Everything the pipeline needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub youtube_api_key: String,
    pub youtube_api_base: String,
    pub openai_api_key: String,
    pub openai_api_base: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_results: u32,
    pub languages: Vec<String>,
    pub assets_path: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self::resolve(cli, |key| env::var(key).ok())
    }

    fn resolve(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let languages: Vec<String> = cli
            .languages
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            // An empty key is a placeholder; the search call then fails loudly.
            youtube_api_key: cli
                .youtube_api_key
                .clone()
                .or_else(|| lookup(YOUTUBE_API_KEY_ENV))
                .unwrap_or_default(),
            youtube_api_base: lookup(YOUTUBE_API_BASE_ENV)
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE.to_string()),
            openai_api_key: lookup(OPENAI_API_KEY_ENV).unwrap_or_default(),
            openai_api_base: lookup(OPENAI_BASE_URL_ENV),
            model: cli.model.clone(),
            temperature: PREDICTION_TEMPERATURE,
            max_results: cli.max_results,
            languages: if languages.is_empty() {
                vec!["en".to_string()]
            } else {
                languages
            },
            assets_path: PathBuf::from(ASSETS_FILE),
        }
    }
}
