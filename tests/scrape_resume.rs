// tests/scrape_resume.rs
//
// End-to-end runs of runner::run_scrape against the in-memory API.
//
mod common;

use std::fs;
use std::path::Path;

use common::{options, write_assignments, FakeApi, Script};
use yt_scrape::progress::Progress;
use yt_scrape::runner::{run_scrape, status, Outcome};
use yt_scrape::specs::comment_threads::{CommentRow, COMMENT_COLUMNS};
use yt_scrape::store::ScrapeState;

fn read_rows(path: &Path) -> Vec<CommentRow> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.deserialize().map(|r| r.unwrap()).collect()
}

fn header_count(path: &Path) -> usize {
    let header = COMMENT_COLUMNS.join(",");
    fs::read_to_string(path).unwrap().lines().filter(|l| *l == header).count()
}

#[test]
fn full_run_writes_per_video_files_aggregate_and_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path());
    opts.scrape.max_comments_per_video = 3;
    write_assignments(&opts.paths.assignments, &[("rock", "r1"), ("rock", "r2"), ("jazz", "j1")]);

    let api = FakeApi::new(2)
        .with("r1", Script::Comments(5))
        .with("r2", Script::Comments(0))
        .with("j1", Script::Comments(2));

    let summary = run_scrape(&api, &opts, None).unwrap();
    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(summary.videos_scraped, 3);
    assert_eq!(summary.comments_written, 5);

    // Capped at 3 over two pages
    assert_eq!(api.page_calls("r1"), 2);
    let r1 = read_rows(&opts.paths.per_video_dir.join("r1.csv"));
    assert_eq!(r1.len(), 3);
    assert!(r1.iter().all(|r| r.genre.as_deref() == Some("rock") && r.parent_id.is_none()));

    // No comments → no per-video file
    assert!(!opts.paths.per_video_dir.join("r2.csv").exists());
    assert_eq!(read_rows(&opts.paths.per_video_dir.join("j1.csv")).len(), 2);

    let all = read_rows(&opts.paths.aggregate_csv);
    assert_eq!(all.len(), 5);
    assert_eq!(header_count(&opts.paths.aggregate_csv), 1);
    assert_eq!(all[3].video_id, "j1");
    assert_eq!(all[3].genre.as_deref(), Some("jazz"));

    let st = ScrapeState::load(&opts.paths.state).unwrap();
    assert_eq!(st.completed_genres, vec!["jazz", "rock"]);
    assert_eq!(st.per_genre_last_index.get("rock"), Some(&1));
    assert_eq!(st.per_genre_last_index.get("jazz"), Some(&0));
    assert_eq!(st.last_video.as_deref(), Some("j1"));

    assert!(summary.files_written.contains(&opts.paths.aggregate_csv));
}

#[test]
fn rate_limit_halts_then_next_run_resumes_after_that_video() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path());
    write_assignments(&opts.paths.assignments, &[("rock", "r1"), ("rock", "r2"), ("rock", "r3")]);

    let first = FakeApi::new(10)
        .with("r1", Script::Comments(2))
        .with("r2", Script::RateLimit)
        .with("r3", Script::Comments(1));
    let summary = run_scrape(&first, &opts, None).unwrap();
    assert_eq!(summary.outcome, Outcome::RateLimited);
    assert_eq!(first.videos_called(), vec!["r1", "r2"]);

    // The limited video is recorded so it is not retried
    let st = ScrapeState::load(&opts.paths.state).unwrap();
    assert_eq!(st.per_genre_last_index.get("rock"), Some(&1));
    assert_eq!(st.last_video.as_deref(), Some("r2"));
    assert!(st.completed_genres.is_empty());

    let second = FakeApi::new(10)
        .with("r2", Script::Comments(4))
        .with("r3", Script::Comments(1));
    let summary = run_scrape(&second, &opts, None).unwrap();
    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(second.videos_called(), vec!["r3"]);

    assert_eq!(read_rows(&opts.paths.aggregate_csv).len(), 3);
    assert_eq!(header_count(&opts.paths.aggregate_csv), 1);
    let st = ScrapeState::load(&opts.paths.state).unwrap();
    assert_eq!(st.completed_genres, vec!["rock"]);
}

#[test]
fn breakpoint_after_genres_per_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path());
    opts.scrape.genres_per_run = 2;
    write_assignments(&opts.paths.assignments, &[("a", "a1"), ("b", "b1"), ("c", "c1")]);

    let api = FakeApi::new(5).with("a1", Script::Comments(1)).with("b1", Script::Comments(1)).with("c1", Script::Comments(1));

    let s1 = run_scrape(&api, &opts, None).unwrap();
    assert_eq!(s1.outcome, Outcome::Breakpoint);
    assert_eq!(ScrapeState::load(&opts.paths.state).unwrap().completed_genres, vec!["a", "b"]);

    let s2 = run_scrape(&api, &opts, None).unwrap();
    assert_eq!(s2.outcome, Outcome::Completed);
    assert_eq!(s2.videos_scraped, 1);

    let s3 = run_scrape(&api, &opts, None).unwrap();
    assert_eq!(s3.outcome, Outcome::NothingToDo);
    assert_eq!(api.videos_called(), vec!["a1", "b1", "c1"]);
}

#[test]
fn skipped_genres_are_never_requested() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path());
    opts.scrape.skip_genres = vec!["rock".into()];
    write_assignments(&opts.paths.assignments, &[("rock", "r1"), ("pop", "p1")]);

    let api = FakeApi::new(5).with("r1", Script::Comments(3)).with("p1", Script::Comments(1));
    let summary = run_scrape(&api, &opts, None).unwrap();

    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(api.videos_called(), vec!["p1"]);
    // Skipping is per-run; it does not mark the genre complete
    let st = ScrapeState::load(&opts.paths.state).unwrap();
    assert_eq!(st.completed_genres, vec!["pop"]);
}

#[test]
fn api_error_skips_video_and_carries_on() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path());
    write_assignments(&opts.paths.assignments, &[("metal", "m1"), ("metal", "m2")]);

    let api = FakeApi::new(5).with("m1", Script::Fail).with("m2", Script::Comments(2));
    let summary = run_scrape(&api, &opts, None).unwrap();

    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(summary.videos_scraped, 2);
    assert!(!opts.paths.per_video_dir.join("m1.csv").exists());
    assert_eq!(read_rows(&opts.paths.per_video_dir.join("m2.csv")).len(), 2);
}

#[test]
fn status_reports_progress_with_and_without_assignments() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path());
    write_assignments(&opts.paths.assignments, &[("rock", "r1"), ("rock", "r2"), ("jazz", "j1")]);

    let api = FakeApi::new(5).with("r1", Script::Comments(1)).with("r2", Script::RateLimit);
    assert_eq!(run_scrape(&api, &opts, None).unwrap().outcome, Outcome::RateLimited);

    let (st, rows) = status(&opts).unwrap();
    assert_eq!(st.last_video.as_deref(), Some("r2"));
    let got: Vec<(&str, Option<usize>, usize, bool)> = rows.iter()
        .map(|g| (g.genre.as_str(), g.videos, g.next_index, g.completed))
        .collect();
    assert_eq!(got, vec![("rock", Some(2), 2, false), ("jazz", Some(1), 0, false)]);

    // Without assignments only genres the state knows about are listed
    fs::remove_file(&opts.paths.assignments).unwrap();
    let (_, rows) = status(&opts).unwrap();
    let got: Vec<(&str, Option<usize>, usize, bool)> = rows.iter()
        .map(|g| (g.genre.as_str(), g.videos, g.next_index, g.completed))
        .collect();
    assert_eq!(got, vec![("rock", None, 2, false)]);
}

#[test]
fn video_ids_are_sanitized_into_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path());
    write_assignments(&opts.paths.assignments, &[("rock", "a/b"), ("rock", "../up")]);

    let api = FakeApi::new(5).with("a/b", Script::Comments(2)).with("../up", Script::Comments(1));
    run_scrape(&api, &opts, None).unwrap();

    let ab = read_rows(&opts.paths.per_video_dir.join("ab.csv"));
    assert_eq!(ab.len(), 2);
    assert_eq!(ab[0].video_id, "a/b");
    assert!(opts.paths.per_video_dir.join("up.csv").exists());
    assert!(!dir.path().join("comments/up.csv").exists());
}

#[derive(Default)]
struct Recorder {
    begun: Option<usize>,
    done: usize,
    finished: usize,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.begun = Some(total); }
    fn item_done(&mut self, _id: &str) { self.done += 1; }
    fn finish(&mut self) { self.finished += 1; }
}

#[test]
fn progress_finishes_once_even_when_a_write_fails() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path());
    write_assignments(&opts.paths.assignments, &[("rock", "r1")]);
    // a plain file where the per-video directory should be
    fs::create_dir_all(opts.paths.per_video_dir.parent().unwrap()).unwrap();
    fs::write(&opts.paths.per_video_dir, "not a dir").unwrap();

    let api = FakeApi::new(5).with("r1", Script::Comments(2));
    let mut rec = Recorder::default();
    let err = run_scrape(&api, &opts, Some(&mut rec)).unwrap_err();
    assert!(err.to_string().contains("not a directory"), "{err}");
    assert_eq!(rec.begun, Some(1));
    assert_eq!(rec.done, 0);
    assert_eq!(rec.finished, 1);
}

#[test]
fn progress_finishes_once_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path());
    write_assignments(&opts.paths.assignments, &[("rock", "r1"), ("rock", "r2")]);

    let api = FakeApi::new(5).with("r1", Script::Comments(1));
    let mut rec = Recorder::default();
    run_scrape(&api, &opts, Some(&mut rec)).unwrap();
    assert_eq!((rec.begun, rec.done, rec.finished), (Some(2), 2, 1));

    // nothing left: still one finish
    let mut rec = Recorder::default();
    assert_eq!(run_scrape(&api, &opts, Some(&mut rec)).unwrap().outcome, Outcome::NothingToDo);
    assert_eq!(rec.finished, 1);
}
