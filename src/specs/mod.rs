// src/specs/mod.rs
//! # API endpoint shapes
//!
//! One file per YouTube Data API endpoint. Each file encodes *what the JSON
//! looks like* and *how one response becomes flat CSV rows*.
//!
//! ## What lives here
//! - **serde wire types** for `commentThreads.list` and `videos.list`. Every
//!   field is optional or defaulted; the API omits fields freely (deleted
//!   channels, hidden stats, private videos).
//! - **Row shaping** into `CommentRow` / `VideoMetadataRow` with a stable column
//!   order so every CSV the crate writes lines up.
//!
//! ## What does **not** live here
//! - HTTP, quota handling, pagination (`core::net`, `scrape`).
//! - Writing files or resume state (`file`, `store`, `runner`).
//!
//! ## Typical call chain
//! ```text
//! runner → scrape::scrape_video_comments → YouTubeApi::comment_threads
//!                                       ↘  specs::comment_threads::rows_from_page
//!          file::append_rows (outside of specs)
//! ```
pub mod comment_threads;
pub mod videos;
