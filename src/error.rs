use derive_more::{Display, From};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    #[display("{_0}")]
    Custom(String),

    #[display("YouTube API request to {endpoint} failed with status {status}: {body}")]
    YouTubeApi {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[display("YouTube API returned no metadata for video {video_id}")]
    MissingVideo { video_id: String },

    #[display("Assets file not found: {}", _0.display())]
    AssetsFileNotFound(PathBuf),

    #[from]
    Io(std::io::Error),

    #[from]
    Http(reqwest::Error),

    #[from]
    Json(serde_json::Error),

    #[from]
    OpenAi(async_openai::error::OpenAIError),
}

impl Error {
    pub fn custom(val: impl std::fmt::Display) -> Self {
        Self::Custom(val.to_string())
    }
}

impl std::error::Error for Error {}
