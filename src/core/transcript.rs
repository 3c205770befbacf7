use crate::error::{Error, Result};
use tracing::warn;
use yt_transcript_rs::api::YouTubeTranscriptApi;

/// Result of one transcript fetch. A failure is tagged, never an empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptOutcome {
    Fetched(String),
    Unavailable { reason: String },
}

pub trait TranscriptSource {
    /// Caption entry texts for a video, in playback order.
    async fn fetch_entries(&self, video_id: &str) -> Result<Vec<String>>;
}

/// Fetches one transcript and flattens it to space-joined text. Errors are
/// logged and folded into [`TranscriptOutcome::Unavailable`].
pub async fn fetch_transcript_text<T: TranscriptSource>(
    source: &T,
    video_id: &str,
) -> TranscriptOutcome {
    match source.fetch_entries(video_id).await {
        Ok(entries) => TranscriptOutcome::Fetched(entries.join(" ")),
        Err(e) => {
            warn!(video_id, error = %e, "transcript unavailable");
            TranscriptOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

#[derive(Clone)]
pub struct TranscriptService {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl TranscriptService {
    pub fn new(languages: Vec<String>) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::custom(format!("Failed to initialise transcript client: {e}")))?;
        Ok(Self { api, languages })
    }
}

impl TranscriptSource for TranscriptService {
    async fn fetch_entries(&self, video_id: &str) -> Result<Vec<String>> {
        let video_id = sanitize_video_id(video_id)?;
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        let transcript = self
            .api
            .fetch_transcript(&video_id, &languages, false)
            .await
            .map_err(|e| Error::custom(format!("Failed to fetch transcript: {e}")))?;

        Ok(transcript
            .snippets
            .into_iter()
            .map(|snippet| snippet.text)
            .collect())
    }
}

const MAX_VIDEO_ID_LEN: usize = 128;

/// Ensure a video identifier is safe to hand to the caption endpoint.
/// Only ASCII alphanumeric characters plus `_` and `-` are allowed.
pub fn sanitize_video_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(Error::custom("Video ID cannot be empty"));
    }

    if trimmed.len() > MAX_VIDEO_ID_LEN {
        return Err(Error::custom("Video ID is unexpectedly long"));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(Error::custom(
            "Video ID contains unsupported characters; expected only letters, numbers, '-' or '_'",
        ));
    }

    Ok(trimmed.to_string())
}
