// src/config/consts.rs

// Net config
pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const USER_AGENT: &str = "yt_scrape/0.1";
pub const TIMEOUT_SECS: u64 = 15;
pub const API_KEY_ENV: &str = "API_KEY";

// Config layering
pub const CONFIG_FILE: &str = "yt_scrape.toml";
pub const ENV_PREFIX: &str = "YT_SCRAPE_";

// Paths
pub const ASSIGNMENTS_PATH: &str = "data/assignments.csv";
pub const STATE_PATH: &str = "comments/state.json";
pub const PER_VIDEO_DIR: &str = "comments/per_video";
pub const AGGREGATE_CSV: &str = "comments/final_comments.csv";
pub const METADATA_CSV: &str = "video_metadata.csv";

// Scrape
pub const MAX_COMMENTS_PER_VIDEO: usize = 100;
pub const MAX_RESULTS_PER_PAGE: u32 = 100; // API ceiling for commentThreads
pub const GENRES_PER_RUN: usize = 500; // breakpoint
pub const PAGE_PAUSE_MS: u64 = 1000;
pub const VIDEO_PAUSE_MS: u64 = 500; // be polite

// Metadata
pub const BATCH_SIZE: usize = 50; // API ceiling for videos.list
pub const BATCH_PAUSE_MS: u64 = 500;

// Concurrency
pub const WORKERS: usize = 4;
