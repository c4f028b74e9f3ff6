// src/store.rs
use std::{collections::BTreeMap, error::Error, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::file::write_atomic;

/* ---------------- Genre → video assignments ---------------- */

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GenreAssignment {
    pub genre: String,
    /// `(video_id, score)`, in scrape order.
    pub videos: Vec<(String, f64)>,
}

/// Genre order is the file order; the runner walks genres in this order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignments {
    pub genres: Vec<GenreAssignment>,
}

#[derive(Deserialize)]
struct AssignmentRecord {
    genre: String,
    #[serde(alias = "videoId", alias = "video_id")]
    video: String,
    #[serde(default)]
    score: Option<f64>,
}

impl Assignments {
    /// `.json` → `[{"genre": "...", "videos": [["id", 0.9], ...]}, ...]`;
    /// anything else is read as CSV with `genre,videoId,score` columns.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read assignments {}: {e}", path.display()))?;
            let genres: Vec<GenreAssignment> = serde_json::from_str(&text)?;
            return Ok(Self { genres });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| format!("Cannot read assignments {}: {e}", path.display()))?;
        let mut out = Self::default();
        for (i, rec) in rdr.deserialize::<AssignmentRecord>().enumerate() {
            let rec = rec.map_err(|e| format!("Assignments row {}: {e}", i + 1))?;
            if rec.genre.is_empty() || rec.video.is_empty() { continue; }
            out.push(rec.genre, rec.video, rec.score.unwrap_or(0.0));
        }
        Ok(out)
    }

    /// Add one video, grouping under the genre's first appearance.
    pub fn push(&mut self, genre: String, video_id: String, score: f64) {
        match self.genres.iter_mut().find(|g| g.genre == genre) {
            Some(g) => g.videos.push((video_id, score)),
            None => self.genres.push(GenreAssignment { genre, videos: vec![(video_id, score)] }),
        }
    }

    pub fn video_ids(&self, genre: &str) -> Vec<&str> {
        self.genres
            .iter()
            .find(|g| g.genre == genre)
            .map(|g| g.videos.iter().map(|(v, _)| v.as_str()).collect())
            .unwrap_or_default()
    }
}

/* ---------------- Resume state ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrapeState {
    pub completed_genres: Vec<String>,
    /// Index of the last processed video per genre.
    pub per_genre_last_index: BTreeMap<String, i64>,
    /// Last video attempted, across all genres.
    pub last_video: Option<String>,
}

impl ScrapeState {
    /// Missing file → fresh state.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let state = serde_json::from_str(&text)
            .map_err(|e| format!("Corrupt state file {}: {e}", path.display()))?;
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        write_atomic(path, json.as_bytes())
    }

    /// First video index still to do for `genre`.
    pub fn next_index(&self, genre: &str) -> usize {
        match self.per_genre_last_index.get(genre) {
            Some(&i) if i >= 0 => i as usize + 1,
            _ => 0,
        }
    }

    pub fn mark_video(&mut self, genre: &str, index: usize, video_id: &str) {
        self.last_video = Some(s!(video_id));
        self.per_genre_last_index.insert(s!(genre), index as i64);
    }

    pub fn mark_genre_complete(&mut self, genre: &str) {
        self.completed_genres.push(s!(genre));
        self.completed_genres.sort();
        self.completed_genres.dedup();
    }

    pub fn is_complete(&self, genre: &str) -> bool {
        self.completed_genres.iter().any(|g| g == genre)
    }
}
