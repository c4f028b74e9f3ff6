// src/cli.rs
use std::{error::Error, path::PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::{
    config::AppOptions,
    core::net::HttpYouTube,
    dataset::Dataset,
    progress::Progress,
    runner::{self, Outcome},
};

#[derive(Debug, Parser)]
#[command(name = "yt_scrape", version, about = "Resumable YouTube comment scraper for genre datasets")]
pub struct Cli {
    /// TOML config file (default: ./yt_scrape.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// -v debug, -vv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape comments for every pending genre, resuming from the state file
    Scrape(ScrapeArgs),
    /// Fetch video metadata for every video with a per-video CSV
    Metadata(MetadataArgs),
    /// Show resume progress per genre
    Status {
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long)]
        assignments: Option<PathBuf>,
    },
    /// Check a final dataset CSV has the columns the analysis needs
    CheckDataset {
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// genre,videoId,score CSV (or .json)
    #[arg(long)]
    pub assignments: Option<PathBuf>,
    #[arg(long)]
    pub state: Option<PathBuf>,
    /// Directory for one CSV per video
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Aggregated comments CSV (appended)
    #[arg(long)]
    pub aggregate: Option<PathBuf>,
    #[arg(long)]
    pub max_comments: Option<usize>,
    /// Stop after this many genres
    #[arg(long)]
    pub genres_per_run: Option<usize>,
    /// Treat a genre as already scraped (repeatable)
    #[arg(long = "skip-genre")]
    pub skip_genres: Vec<String>,
    /// Overrides the API_KEY env var
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Directory of per-video CSVs to take ids from
    #[arg(long)]
    pub input_dir: Option<PathBuf>,
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(long)]
    pub workers: Option<usize>,
    /// Overrides the API_KEY env var
    #[arg(long)]
    pub api_key: Option<String>,
}

impl ScrapeArgs {
    pub fn apply(&self, opts: &mut AppOptions) {
        if let Some(p) = &self.assignments { opts.paths.assignments = p.clone(); }
        if let Some(p) = &self.state { opts.paths.state = p.clone(); }
        if let Some(p) = &self.out_dir { opts.paths.per_video_dir = p.clone(); }
        if let Some(p) = &self.aggregate { opts.paths.aggregate_csv = p.clone(); }
        if let Some(n) = self.max_comments { opts.scrape.max_comments_per_video = n; }
        if let Some(n) = self.genres_per_run { opts.scrape.genres_per_run = n; }
        opts.scrape.skip_genres.extend(self.skip_genres.iter().cloned());
        if let Some(k) = &self.api_key { opts.api.api_key = Some(k.clone()); }
    }
}

impl MetadataArgs {
    pub fn apply(&self, opts: &mut AppOptions) {
        if let Some(p) = &self.input_dir { opts.paths.per_video_dir = p.clone(); }
        if let Some(p) = &self.out { opts.paths.metadata_csv = p.clone(); }
        if let Some(n) = self.workers { opts.metadata.workers = n; }
        if let Some(k) = &self.api_key { opts.api.api_key = Some(k.clone()); }
    }
}

/// Prints progress lines to stdout.
#[derive(Default)]
pub struct CliProgress {
    done: usize,
    failed: usize,
    total: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn item_done(&mut self, _id: &str) {
        self.done += 1;
    }
    fn item_failed(&mut self, id: &str, msg: &str) {
        self.failed += 1;
        eprintln!("{id}: {msg}");
    }
    fn finish(&mut self) {
        if self.total > 0 {
            println!("Done ({}/{}, {} failed)", self.done, self.total, self.failed);
        }
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    run_with(Cli::parse())
}

pub fn run_with(cli: Cli) -> Result<(), Box<dyn Error>> {
    crate::log::init(cli.verbose, cli.log_file.as_deref())?;
    let mut opts = AppOptions::load(cli.config.as_deref())?;
    logd!("options: {opts:?}");

    match &cli.command {
        Command::Scrape(args) => {
            args.apply(&mut opts);
            let api = HttpYouTube::new(&opts.api)?;
            let mut progress = CliProgress::default();
            let summary = runner::run_scrape(&api, &opts, Some(&mut progress))?;
            println!(
                "{} | videos: {} | comments: {}",
                match summary.outcome {
                    Outcome::Completed => "All pending genres processed",
                    Outcome::Breakpoint => "Stopped at genre breakpoint; run again to continue",
                    Outcome::RateLimited => "Rate limit/quota reached; run again later to resume",
                    Outcome::NothingToDo => "No remaining genres to process",
                },
                summary.videos_scraped,
                summary.comments_written,
            );
        }
        Command::Metadata(args) => {
            args.apply(&mut opts);
            let api = HttpYouTube::new(&opts.api)?;
            let mut progress = CliProgress::default();
            let summary = runner::run_metadata(&api, &opts, Some(&mut progress))?;
            match &summary.written {
                Some(p) => println!("Saved {} rows for {} ids: {}", summary.rows_written, summary.ids_found, p.display()),
                None => println!("No metadata written ({} ids found)", summary.ids_found),
            }
            if summary.rate_limited {
                println!("Rate limit/quota reached; output is partial.");
            }
        }
        Command::Status { state, assignments } => {
            if let Some(p) = state { opts.paths.state = p.clone(); }
            if let Some(p) = assignments { opts.paths.assignments = p.clone(); }
            let (st, genres) = runner::status(&opts)?;
            for g in &genres {
                let total = g.videos.map_or(s!("?"), |n| n.to_string());
                let mark = if g.completed { "done" } else { "pending" };
                println!("{:<24} {:>5}/{:<5} {mark}", g.genre, g.next_index, total);
            }
            if let Some(v) = &st.last_video {
                println!("last video: {v}");
            }
        }
        Command::CheckDataset { path } => {
            let ds = Dataset::load(path)?;
            let vader: Vec<&str> = ds.schema.vader.iter().map(|(_, h)| h.as_str()).collect();
            let liwc: Vec<&str> = ds.schema.liwc.iter().map(|(_, h)| h.as_str()).collect();
            println!("rows: {}", ds.comments.len());
            println!("vader columns: {}", vader.join(", "));
            println!("liwc columns: {}", liwc.join(", "));
            println!("genres: {}", ds.genres().join(", "));
        }
    }
    Ok(())
}
