// src/core/net.rs

// YouTube Data API v3 over HTTPS (blocking reqwest)

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::consts::{MAX_RESULTS_PER_PAGE, USER_AGENT};
use crate::config::options::ApiOptions;
use crate::specs::comment_threads::CommentThreadListResponse;
use crate::specs::videos::VideoListResponse;

/// Reasons YouTube uses for quota / rate limiting.
const RATE_LIMIT_REASONS: &[&str] = &[
    "quotaexceeded",
    "ratelimitexceeded",
    "userratelimitexceeded",
    "dailylimitexceeded",
    "usagelimitsexceeded",
];
const RATE_LIMIT_STATUSES: &[&str] = &["resource_exhausted", "permission_denied"];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("rate limit/quota reached (HTTP {status}): {reason}")]
    RateLimited { status: u16, reason: String },
    #[error("API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }
}

/// The two endpoints the scraper needs. Implemented over HTTP by
/// [`HttpYouTube`]; tests swap in an in-memory fake.
pub trait YouTubeApi: Send + Sync {
    /// One page of newest-first top-level comment threads for a video.
    fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<CommentThreadListResponse, ApiError>;

    /// Metadata for up to 50 videos.
    fn videos(&self, ids: &[String]) -> Result<VideoListResponse, ApiError>;
}

pub struct HttpYouTube {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpYouTube {
    pub fn new(opts: &ApiOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let api_key = s!(opts.require_key()?);
        let client = Client::builder()
            .timeout(Duration::from_secs(opts.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: s!(opts.base_url.trim_end_matches('/')),
            api_key,
        })
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .map_err(|e| ApiError::Transport(e.without_url().to_string()))?;
        decode(resp)
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp
        .text()
        .map_err(|e| ApiError::Transport(e.without_url().to_string()))?;
    if !status.is_success() {
        return Err(classify_error(status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

impl YouTubeApi for HttpYouTube {
    fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<CommentThreadListResponse, ApiError> {
        let max = max_results.clamp(1, MAX_RESULTS_PER_PAGE).to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("textFormat", "plainText"),
            ("maxResults", max.as_str()),
            ("order", "time"),
        ];
        if let Some(tok) = page_token {
            query.push(("pageToken", tok));
        }
        self.get("commentThreads", &query)
    }

    fn videos(&self, ids: &[String]) -> Result<VideoListResponse, ApiError> {
        let joined = ids.join(",");
        let max = ids.len().to_string();
        self.get(
            "videos",
            &[
                ("part", "snippet,contentDetails,statistics,status"),
                ("id", joined.as_str()),
                ("maxResults", max.as_str()),
            ],
        )
    }
}

/// Map a non-2xx response onto [`ApiError`], picking out quota/rate limits.
///
/// Checks `error.errors[].reason` first, then falls back to
/// `error.code` 403/429 paired with a RESOURCE_EXHAUSTED/PERMISSION_DENIED status.
pub fn classify_error(status: u16, body: &str) -> ApiError {
    let Ok(payload) = serde_json::from_str::<serde_json::Value>(body) else {
        return ApiError::Http { status, message: snippet(body) };
    };
    let err = &payload["error"];

    if let Some(errors) = err["errors"].as_array() {
        for d in errors {
            let reason = d["reason"].as_str().unwrap_or("");
            if RATE_LIMIT_REASONS.contains(&reason.to_ascii_lowercase().as_str()) {
                return ApiError::RateLimited { status, reason: s!(reason) };
            }
        }
    }

    let code = err["code"].as_u64();
    let err_status = err["status"].as_str().unwrap_or("");
    if matches!(code, Some(403) | Some(429))
        && RATE_LIMIT_STATUSES.contains(&err_status.to_ascii_lowercase().as_str())
    {
        return ApiError::RateLimited { status, reason: s!(err_status) };
    }

    let message = err["message"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| snippet(body));
    ApiError::Http { status, message }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(200) {
        Some((i, _)) => join!(&trimmed[..i], "…"),
        None if trimmed.is_empty() => s!("(empty body)"),
        None => s!(trimmed),
    }
}
