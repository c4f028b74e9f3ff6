// src/specs/videos.rs

use serde::{Deserialize, Serialize};

/// `videos.list` response. Unknown / private ids are simply absent from `items`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoListResponse {
    pub items: Vec<VideoItem>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoItem {
    pub id: Option<String>,
    pub snippet: VideoSnippet,
    pub content_details: ContentDetails,
    pub statistics: Statistics,
    pub status: VideoStatus,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSnippet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub category_id: Option<String>,
    pub tags: Vec<String>,
    pub live_broadcast_content: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDetails {
    /// ISO-8601, e.g. `PT4M20S`
    pub duration: Option<String>,
    pub dimension: Option<String>,
    pub definition: Option<String>,
    pub caption: Option<String>,
    pub licensed_content: Option<bool>,
}

/// Counts arrive as decimal strings and may be hidden, so they stay raw.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
    pub favorite_count: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoStatus {
    pub privacy_status: Option<String>,
    pub made_for_kids: Option<bool>,
    pub self_declared_made_for_kids: Option<bool>,
    pub upload_status: Option<String>,
    pub embeddable: Option<bool>,
    pub license: Option<String>,
}

/// One row of `video_metadata.csv`, columns in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadataRow {
    // identity
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    // release / uploader
    pub published_at: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    // content info
    pub category_id: Option<String>,
    pub tags: Option<String>,
    pub live_broadcast_content: Option<String>,
    // content details
    pub duration: Option<String>,
    pub dimension: Option<String>,
    pub definition: Option<String>,
    pub caption: Option<String>,
    pub licensed_content: Option<bool>,
    // statistics
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
    pub favorite_count: Option<String>,
    // status
    pub privacy_status: Option<String>,
    pub made_for_kids: Option<bool>,
    pub self_declared_made_for_kids: Option<bool>,
    pub upload_status: Option<String>,
    pub embeddable: Option<bool>,
    pub license: Option<String>,
}

impl From<VideoItem> for VideoMetadataRow {
    fn from(item: VideoItem) -> Self {
        let VideoItem { id, snippet: sn, content_details: det, statistics: st, status } = item;
        let tags = (!sn.tags.is_empty()).then(|| sn.tags.join("|"));

        Self {
            video_id: id,
            title: sn.title,
            description: sn.description,
            published_at: sn.published_at,
            channel_id: sn.channel_id,
            channel_title: sn.channel_title,
            category_id: sn.category_id,
            tags,
            live_broadcast_content: sn.live_broadcast_content,
            duration: det.duration,
            dimension: det.dimension,
            definition: det.definition,
            caption: det.caption,
            licensed_content: det.licensed_content,
            view_count: st.view_count,
            like_count: st.like_count,
            comment_count: st.comment_count,
            favorite_count: st.favorite_count,
            privacy_status: status.privacy_status,
            made_for_kids: status.made_for_kids,
            self_declared_made_for_kids: status.self_declared_made_for_kids,
            upload_status: status.upload_status,
            embeddable: status.embeddable,
            license: status.license,
        }
    }
}

pub fn rows_from_response(resp: VideoListResponse) -> Vec<VideoMetadataRow> {
    resp.items.into_iter().map(VideoMetadataRow::from).collect()
}
