// tests/common/mod.rs
//
// In-memory YouTube API for integration tests.
//
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use yt_scrape::config::AppOptions;
use yt_scrape::core::net::{ApiError, YouTubeApi};
use yt_scrape::specs::comment_threads::{
    CommentSnippet, CommentThread, CommentThreadListResponse, ThreadSnippet, TopLevelComment,
};
use yt_scrape::specs::videos::{VideoItem, VideoListResponse, VideoSnippet};

#[derive(Clone, Copy, Debug)]
pub enum Script {
    /// Video has this many comments, served `page_size` at a time.
    Comments(usize),
    /// Every call fails with quotaExceeded.
    RateLimit,
    /// Every call fails with a non-quota 403 (comments disabled).
    Fail,
}

pub struct FakeApi {
    scripts: HashMap<String, Script>,
    page_size: usize,
    pub comment_calls: Mutex<Vec<String>>,
    pub video_batches: Mutex<Vec<Vec<String>>>,
}

impl FakeApi {
    pub fn new(page_size: usize) -> Self {
        Self {
            scripts: HashMap::new(),
            page_size,
            comment_calls: Mutex::new(Vec::new()),
            video_batches: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, video_id: &str, script: Script) -> Self {
        self.scripts.insert(video_id.to_string(), script);
        self
    }

    /// Distinct videos asked for comments, in first-call order.
    pub fn videos_called(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for v in self.comment_calls.lock().unwrap().iter() {
            if !out.contains(v) { out.push(v.clone()); }
        }
        out
    }

    pub fn page_calls(&self, video_id: &str) -> usize {
        self.comment_calls.lock().unwrap().iter().filter(|v| *v == video_id).count()
    }
}

fn quota() -> ApiError {
    ApiError::RateLimited { status: 403, reason: "quotaExceeded".into() }
}

fn thread(video_id: &str, i: usize) -> CommentThread {
    CommentThread {
        id: Some(format!("{video_id}-c{i}")),
        snippet: ThreadSnippet {
            video_id: Some(video_id.to_string()),
            top_level_comment: TopLevelComment {
                id: Some(format!("{video_id}-c{i}")),
                snippet: CommentSnippet {
                    author_display_name: Some(format!("user{i}")),
                    text_original: Some(format!("comment {i} on {video_id}")),
                    like_count: Some(i as u64),
                    ..CommentSnippet::default()
                },
            },
        },
    }
}

impl YouTubeApi for FakeApi {
    fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<CommentThreadListResponse, ApiError> {
        self.comment_calls.lock().unwrap().push(video_id.to_string());

        match self.scripts.get(video_id).copied().unwrap_or(Script::Comments(0)) {
            Script::RateLimit => Err(quota()),
            Script::Fail => Err(ApiError::Http { status: 403, message: "The video has disabled comments.".into() }),
            Script::Comments(total) => {
                let offset: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
                let take = self.page_size.min(max_results as usize);
                let end = (offset + take).min(total);
                Ok(CommentThreadListResponse {
                    items: (offset..end).map(|i| thread(video_id, i)).collect(),
                    next_page_token: (end < total).then(|| end.to_string()),
                })
            }
        }
    }

    fn videos(&self, ids: &[String]) -> Result<VideoListResponse, ApiError> {
        self.video_batches.lock().unwrap().push(ids.to_vec());

        if ids.iter().any(|id| id.starts_with("quota")) {
            return Err(quota());
        }
        if ids.iter().any(|id| id.starts_with("bad")) {
            return Err(ApiError::Http { status: 400, message: "invalid id".into() });
        }
        let items = ids
            .iter()
            .filter(|id| !id.starts_with("gone"))
            .map(|id| VideoItem {
                id: Some(id.clone()),
                snippet: VideoSnippet { title: Some(format!("Title {id}")), ..VideoSnippet::default() },
                ..VideoItem::default()
            })
            .collect();
        Ok(VideoListResponse { items })
    }
}

/// Options rooted in `dir`, with every pause set to zero.
pub fn options(dir: &Path) -> AppOptions {
    let mut o = AppOptions::default();
    o.paths.assignments = dir.join("assignments.csv");
    o.paths.state = dir.join("comments/state.json");
    o.paths.per_video_dir = dir.join("comments/per_video");
    o.paths.aggregate_csv = dir.join("comments/final_comments.csv");
    o.paths.metadata_csv = dir.join("video_metadata.csv");
    o.scrape.page_pause_ms = 0;
    o.scrape.video_pause_ms = 0;
    o.metadata.batch_pause_ms = 0;
    o
}

/// Write `genre,videoId,score` rows.
pub fn write_assignments(path: &Path, rows: &[(&str, &str)]) {
    let mut text = String::from("genre,videoId,score\n");
    for (i, (g, v)) in rows.iter().enumerate() {
        text.push_str(&format!("{g},{v},{}\n", 1.0 - i as f64 / 100.0));
    }
    fs::write(path, text).unwrap();
}
