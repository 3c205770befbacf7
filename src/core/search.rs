use crate::config::Config;
use crate::error::{Error, Result};
use serde::Deserialize;
use tracing::debug;

/// Lookup side of the video platform: relevance search plus per-video metadata.
pub trait VideoSearch {
    async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<String>>;

    async fn has_captions(&self, video_id: &str) -> Result<bool>;
}

/// Runs the search and keeps only ids whose metadata reports captions, in rank order.
pub async fn find_captioned_videos<S: VideoSearch>(
    search: &S,
    query: &str,
    max_results: u32,
) -> Result<Vec<String>> {
    let candidates = search.search_videos(query, max_results).await?;
    debug!(query, candidates = candidates.len(), "search returned");

    let mut captioned = Vec::with_capacity(candidates.len());
    for video_id in candidates {
        if search.has_captions(&video_id).await? {
            captioned.push(video_id);
        } else {
            debug!(%video_id, "skipping video without captions");
        }
    }

    Ok(captioned)
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    caption: Option<String>,
}

fn parse_search_response(body: &str) -> Result<Vec<String>> {
    let response: SearchListResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .map(|item| item.id.video_id)
        .collect())
}

fn parse_caption_flag(video_id: &str, body: &str) -> Result<bool> {
    let response: VideoListResponse = serde_json::from_str(body)?;
    let video = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| Error::MissingVideo {
            video_id: video_id.to_string(),
        })?;

    // The API encodes the flag as the string "true" / "false".
    Ok(video
        .content_details
        .caption
        .is_some_and(|caption| caption == "true"))
}

fn check_status(
    endpoint: &'static str,
    status: reqwest::StatusCode,
    body: String,
) -> Result<String> {
    if !status.is_success() {
        return Err(Error::YouTubeApi {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

/// YouTube Data API v3 client.
#[derive(Clone)]
pub struct YouTubeSearchService {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl YouTubeSearchService {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.youtube_api_key.clone(),
            api_base: config.youtube_api_base.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<reqwest::Request> {
        Ok(self
            .http
            .get(format!("{}/{endpoint}", self.api_base))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .build()?)
    }

    fn search_request(&self, query: &str, max_results: u32) -> Result<reqwest::Request> {
        let max_results = max_results.to_string();
        self.request(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("order", "relevance"),
            ],
        )
    }

    fn videos_request(&self, video_id: &str) -> Result<reqwest::Request> {
        self.request("videos", &[("part", "contentDetails"), ("id", video_id)])
    }

    async fn execute(&self, endpoint: &'static str, request: reqwest::Request) -> Result<String> {
        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        check_status(endpoint, status, body)
    }
}

impl VideoSearch for YouTubeSearchService {
    async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        let request = self.search_request(query, max_results)?;
        let body = self.execute("search", request).await?;
        parse_search_response(&body)
    }

    async fn has_captions(&self, video_id: &str) -> Result<bool> {
        let request = self.videos_request(video_id)?;
        let body = self.execute("videos", request).await?;
        parse_caption_flag(video_id, &body)
    }
}
