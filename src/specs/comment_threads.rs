// src/specs/comment_threads.rs

use serde::{Deserialize, Serialize};

/// `commentThreads.list` response (only what we read).
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentThreadListResponse {
    pub items: Vec<CommentThread>,
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentThread {
    pub id: Option<String>,
    pub snippet: ThreadSnippet,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreadSnippet {
    pub video_id: Option<String>,
    pub top_level_comment: TopLevelComment,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopLevelComment {
    pub id: Option<String>,
    pub snippet: CommentSnippet,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentSnippet {
    pub author_channel_id: Option<AuthorChannelId>,
    pub author_display_name: Option<String>,
    pub author_channel_url: Option<String>,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub like_count: Option<u64>,
    pub text_display: Option<String>,
    pub text_original: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthorChannelId {
    pub value: Option<String>,
}

/// One scraped comment. Field order is the CSV column order:
/// `commentId, authorChannelId, authorDisplayName, authorChannelUrl, publishedAt,
/// updatedAt, likeCount, parentId, textDisplay, textOriginal, videoId, genre`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRow {
    pub comment_id: Option<String>,
    pub author_channel_id: Option<String>,
    pub author_display_name: Option<String>,
    pub author_channel_url: Option<String>,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub like_count: Option<u64>,
    /// Always empty: only top-level comments are scraped.
    pub parent_id: Option<String>,
    pub text_display: Option<String>,
    pub text_original: Option<String>,
    pub video_id: String,
    pub genre: Option<String>,
}

pub const COMMENT_COLUMNS: [&str; 12] = [
    "commentId", "authorChannelId", "authorDisplayName", "authorChannelUrl",
    "publishedAt", "updatedAt", "likeCount", "parentId",
    "textDisplay", "textOriginal", "videoId", "genre",
];

impl CommentRow {
    pub fn from_thread(thread: CommentThread, video_id: &str, genre: Option<&str>) -> Self {
        let ThreadSnippet { video_id: thread_video, top_level_comment } = thread.snippet;
        let TopLevelComment { id, snippet } = top_level_comment;

        Self {
            comment_id: id,
            author_channel_id: snippet.author_channel_id.and_then(|a| a.value),
            author_display_name: snippet.author_display_name,
            author_channel_url: snippet.author_channel_url,
            published_at: snippet.published_at,
            updated_at: snippet.updated_at,
            like_count: snippet.like_count,
            parent_id: None,
            text_display: snippet.text_display,
            text_original: snippet.text_original,
            video_id: thread_video
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| s!(video_id)),
            genre: genre.map(String::from),
        }
    }
}

/// Shape at most `limit` rows out of one response page.
pub fn rows_from_page(
    page: CommentThreadListResponse,
    video_id: &str,
    genre: Option<&str>,
    limit: usize,
) -> Vec<CommentRow> {
    page.items
        .into_iter()
        .take(limit)
        .map(|t| CommentRow::from_thread(t, video_id, genre))
        .collect()
}
