// src/runner.rs
use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use crate::{
    config::AppOptions,
    core::net::YouTubeApi,
    core::sanitize::sanitize_video_filename,
    file::{append_rows, ensure_directory, write_rows},
    progress::{format_eta, Progress},
    scrape::{collect_video_ids, fetch_video_metadata, scrape_video_comments},
    store::{Assignments, GenreAssignment, ScrapeState},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every pending genre was processed.
    Completed,
    /// `genres_per_run` genres done; more remain for the next run.
    Breakpoint,
    /// Quota/rate limit hit. State points at the last attempted video.
    RateLimited,
    /// No pending genres.
    NothingToDo,
}

/// Summary of what a scrape run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub videos_scraped: usize,
    pub comments_written: usize,
    pub files_written: Vec<PathBuf>,
}

impl RunSummary {
    fn new(outcome: Outcome) -> Self {
        Self { outcome, videos_scraped: 0, comments_written: 0, files_written: Vec::new() }
    }
}

/// Scrape comments for every pending genre, resuming from the state file.
///
/// State is saved after every video (whether or not it yielded comments), so
/// an interrupted or rate-limited run never retries a video it already tried.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
/// `progress.finish()` runs exactly once, on error too.
pub fn run_scrape(
    api: &dyn YouTubeApi,
    opts: &AppOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error>> {
    let result = scrape_pending(api, opts, &mut progress);
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    result
}

fn scrape_pending(
    api: &dyn YouTubeApi,
    opts: &AppOptions,
    progress: &mut Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error>> {
    let paths = &opts.paths;
    let assignments = Assignments::load(&paths.assignments)?;
    let mut state = ScrapeState::load(&paths.state)?;

    let skip: HashSet<&str> = opts.scrape.skip_genres.iter()
        .chain(state.completed_genres.iter())
        .map(String::as_str)
        .collect();
    let candidates: Vec<&GenreAssignment> = assignments.genres.iter()
        .filter(|g| !skip.contains(g.genre.as_str()))
        .collect();

    if candidates.is_empty() {
        logf!("No remaining genres to process.");
        if let Some(p) = progress.as_deref_mut() {
            p.log("No remaining genres to process.");
        }
        return Ok(RunSummary::new(Outcome::NothingToDo));
    }

    let genres_per_run = opts.scrape.genres_per_run.max(1);
    let selected = &candidates[..candidates.len().min(genres_per_run)];
    let more_after_run = candidates.len() > selected.len();

    let total: usize = selected.iter()
        .map(|g| g.videos.len().saturating_sub(state.next_index(&g.genre)))
        .sum();
    if total == 0 {
        logf!("Selected genres have no videos left; marking them complete.");
    }

    if let Some(p) = progress.as_deref_mut() {
        p.begin(total);
    }

    let mut summary = RunSummary::new(Outcome::Completed);
    let max_comments = opts.scrape.max_comments_per_video;
    let started = Instant::now();

    for g in selected {
        let genre = g.genre.as_str();
        let start_index = state.next_index(genre);
        logf!("== Genre: {genre} | videos: {} | resuming from index {start_index} ==", g.videos.len());

        for (idx, (video_id, _score)) in g.videos.iter().enumerate().skip(start_index) {
            let scraped = scrape_video_comments(
                api, video_id, Some(genre), max_comments, opts.scrape.page_pause(),
            );

            if scraped.rows.is_empty() {
                logf!("No comments fetched for {video_id} (genre={genre})");
            } else {
                ensure_directory(&paths.per_video_dir)?;
                let per_video = paths.per_video_dir
                    .join(join!(&sanitize_video_filename(video_id), ".csv"));
                write_rows(&per_video, &scraped.rows)?;
                append_rows(&paths.aggregate_csv, &scraped.rows)?;

                logf!("Saved {} comments for {video_id} (genre={genre})", scraped.rows.len());
                summary.comments_written += scraped.rows.len();
                summary.files_written.push(per_video);
            }

            // Always record the attempt so this video is never retried
            state.mark_video(genre, idx, video_id);
            state.save(&paths.state)?;

            if scraped.rate_limited {
                logw!("Rate limit/quota reached. Stopping run now.");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(video_id, "rate limit/quota reached");
                }
                summary.outcome = Outcome::RateLimited;
                return Ok(finish(summary, opts));
            }

            summary.videos_scraped += 1;
            let done = summary.videos_scraped;
            let avg = started.elapsed().as_secs_f64() / done as f64;
            let eta = format_eta(avg * total.saturating_sub(done) as f64);
            let line = format!(
                "[Progress] Genre: {genre} | Video {}/{} scraped | Total {done}/{total} | ETA: {eta}",
                idx + 1, g.videos.len(),
            );
            logd!("{line}");
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(video_id);
                p.log(&line);
            }

            let pause = opts.scrape.video_pause();
            if !pause.is_zero() { thread::sleep(pause); }
        }

        state.mark_genre_complete(genre);
        state.save(&paths.state)?;
        logf!("-- Completed genre: {genre} --");
    }

    if more_after_run {
        logf!("Reached breakpoint after {genres_per_run} genres. Exiting.");
        summary.outcome = Outcome::Breakpoint;
    } else {
        logf!("All pending genres processed.");
    }
    Ok(finish(summary, opts))
}

fn finish(mut summary: RunSummary, opts: &AppOptions) -> RunSummary {
    if summary.comments_written > 0 {
        summary.files_written.push(opts.paths.aggregate_csv.clone());
    }
    summary
}

/* ---------------- Video metadata ---------------- */

#[derive(Debug)]
pub struct MetadataSummary {
    pub ids_found: usize,
    pub rows_written: usize,
    pub rate_limited: bool,
    pub failed_batches: usize,
    pub written: Option<PathBuf>,
}

/// Collect ids from the per-video CSVs, fetch their metadata and write the
/// metadata CSV (overwritten). Nothing is written when no rows come back.
pub fn run_metadata(
    api: &dyn YouTubeApi,
    opts: &AppOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<MetadataSummary, Box<dyn Error>> {
    let ids: Vec<String> = collect_video_ids(&opts.paths.per_video_dir)?.into_iter().collect();
    let mut summary = MetadataSummary {
        ids_found: ids.len(),
        rows_written: 0,
        rate_limited: false,
        failed_batches: 0,
        written: None,
    };
    if ids.is_empty() {
        return Ok(summary);
    }

    let fetched = fetch_video_metadata(api, &ids, &opts.metadata, progress);
    summary.rate_limited = fetched.rate_limited;
    summary.failed_batches = fetched.failed_batches;
    logf!("Metadata rows fetched: {}", fetched.rows.len());

    if fetched.rows.is_empty() {
        logw!("No metadata fetched (videos may be private/removed or rate-limited).");
        return Ok(summary);
    }
    summary.written = Some(write_rows(&opts.paths.metadata_csv, &fetched.rows)?);
    summary.rows_written = fetched.rows.len();
    logf!("Saved: {}", opts.paths.metadata_csv.display());
    Ok(summary)
}

/* ---------------- Resume status ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenreStatus {
    pub genre: String,
    /// None when the assignments file could not be read.
    pub videos: Option<usize>,
    pub next_index: usize,
    pub completed: bool,
}

/// Per-genre progress as recorded in the state file. Genres come from the
/// assignments file when readable, otherwise from the state alone.
pub fn status(opts: &AppOptions) -> Result<(ScrapeState, Vec<GenreStatus>), Box<dyn Error>> {
    let state = ScrapeState::load(&opts.paths.state)?;

    let rows = match Assignments::load(&opts.paths.assignments) {
        Ok(a) => a.genres.iter()
            .map(|g| GenreStatus {
                genre: g.genre.clone(),
                videos: Some(g.videos.len()),
                next_index: state.next_index(&g.genre),
                completed: state.is_complete(&g.genre),
            })
            .collect(),
        Err(e) => {
            logd!("Assignments unavailable for status: {e}");
            let mut genres: Vec<&String> = state.per_genre_last_index.keys()
                .chain(state.completed_genres.iter())
                .collect();
            genres.sort();
            genres.dedup();
            genres.into_iter()
                .map(|g| GenreStatus {
                    genre: g.clone(),
                    videos: None,
                    next_index: state.next_index(g),
                    completed: state.is_complete(g),
                })
                .collect()
        }
    };
    Ok((state, rows))
}
