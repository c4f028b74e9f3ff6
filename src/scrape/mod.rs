// src/scrape/mod.rs
mod comments;
mod metadata;

pub use comments::{scrape_video_comments, VideoScrape};
pub use metadata::{collect_video_ids, fetch_video_metadata, MetadataFetch};
