// src/scrape/comments.rs
use std::{thread, time::Duration};

use crate::{
    config::consts::MAX_RESULTS_PER_PAGE,
    core::net::YouTubeApi,
    specs::comment_threads::{rows_from_page, CommentRow},
};

/// What one video yielded. Rows collected before an error are kept.
#[derive(Debug, Default)]
pub struct VideoScrape {
    pub rows: Vec<CommentRow>,
    /// The API reported quota/rate limiting; the caller should halt the run.
    pub rate_limited: bool,
}

/// Newest top-level comments for one video, up to `max_total`.
///
/// Pages are requested newest-first until the cap is reached or the API runs
/// out of pages, sleeping `page_pause` between pages. A rate-limit error ends
/// the video with `rate_limited = true`; any other error just ends the video.
pub fn scrape_video_comments(
    api: &dyn YouTubeApi,
    video_id: &str,
    genre: Option<&str>,
    max_total: usize,
    page_pause: Duration,
) -> VideoScrape {
    let mut out = VideoScrape::default();
    let mut page_token: Option<String> = None;

    while out.rows.len() < max_total {
        let want = (max_total - out.rows.len()).min(MAX_RESULTS_PER_PAGE as usize) as u32;
        let page = match api.comment_threads(video_id, page_token.as_deref(), want) {
            Ok(page) => page,
            Err(e) if e.is_rate_limited() => {
                logw!("[{video_id}] {e}. Halting run.");
                out.rate_limited = true;
                return out;
            }
            Err(e) => {
                loge!("[{video_id}] {e}");
                break;
            }
        };

        let next = page.next_page_token.clone().filter(|t| !t.is_empty());
        let room = max_total - out.rows.len();
        out.rows.extend(rows_from_page(page, video_id, genre, room));
        logd!("[{video_id}] collected {}/{max_total}", out.rows.len());

        match next {
            Some(tok) if out.rows.len() < max_total => {
                page_token = Some(tok);
                if !page_pause.is_zero() { thread::sleep(page_pause); }
            }
            _ => break,
        }
    }

    out
}
