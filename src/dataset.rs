// src/dataset.rs
//! The final analysis dataset: one row per comment, tagged with its genre and
//! the video's like/view counts, plus VADER sentiment and LIWC lexicon scores.
//!
//! Column names vary between exports (`video_id` vs `videoId`, `likes` vs
//! `likeCount`), so headers are matched loosely through
//! [`header_key`]. Any header starting with `vader` / `liwc` is a score column.

use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

use csv::StringRecord;

use crate::core::sanitize::{header_key, normalize_ws};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Where each field lives in the header row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetSchema {
    pub genre: usize,
    pub video_id: usize,
    pub likes: usize,
    pub views: usize,
    /// `(column index, header)` for every VADER score column.
    pub vader: Vec<(usize, String)>,
    /// `(column index, header)` for every LIWC score column.
    pub liwc: Vec<(usize, String)>,
    pub text: Option<usize>,
}

fn find(keys: &[String], names: &[&str]) -> Option<usize> {
    keys.iter().position(|k| names.contains(&k.as_str()))
}

impl DatasetSchema {
    /// Map headers to fields. Every required group that is absent is
    /// reported at once.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self, SchemaError> {
        let keys: Vec<String> = headers.iter().map(|h| header_key(h.as_ref())).collect();
        let prefixed = |prefix: &str| -> Vec<(usize, String)> {
            keys.iter()
                .enumerate()
                .filter(|(_, k)| k.starts_with(prefix))
                .map(|(i, _)| (i, s!(headers[i].as_ref().trim())))
                .collect()
        };

        let genre = find(&keys, &["genre"]);
        let video_id = find(&keys, &["videoid", "video"]);
        let likes = find(&keys, &["likes", "likecount"]);
        let views = find(&keys, &["views", "viewcount"]);
        let vader = prefixed("vader");
        let liwc = prefixed("liwc");

        let mut missing = Vec::new();
        if genre.is_none() { missing.push("genre"); }
        if video_id.is_none() { missing.push("video_id"); }
        if likes.is_none() { missing.push("likes"); }
        if views.is_none() { missing.push("views"); }
        if vader.is_empty() { missing.push("vader_*"); }
        if liwc.is_empty() { missing.push("liwc_*"); }

        match (genre, video_id, likes, views) {
            (Some(genre), Some(video_id), Some(likes), Some(views)) if missing.is_empty() => Ok(Self {
                genre,
                video_id,
                likes,
                views,
                vader,
                liwc,
                text: find(&keys, &["textoriginal", "text", "comment", "textdisplay"]),
            }),
            _ => Err(SchemaError::Missing(missing)),
        }
    }
}

/// One dataset row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Comment {
    pub genre: String,
    pub video_id: String,
    pub likes: Option<u64>,
    pub views: Option<u64>,
    /// Header → score; blank cells are left out.
    pub vader: BTreeMap<String, f64>,
    pub liwc: BTreeMap<String, f64>,
    pub text: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub schema: DatasetSchema,
    pub comments: Vec<Comment>,
}

impl Dataset {
    /// Read and validate a dataset CSV.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| format!("Cannot open dataset {}: {e}", path.display()))?;
        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        let schema = DatasetSchema::from_headers(headers.as_slice())?;

        let mut comments = Vec::new();
        for (i, rec) in rdr.records().enumerate() {
            let rec = rec?;
            // header is line 1
            comments.push(parse_row(&schema, &rec, i + 2)?);
        }
        Ok(Self { schema, comments })
    }

    /// Distinct genres, first-seen order.
    pub fn genres(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for c in &self.comments {
            if !out.contains(&c.genre.as_str()) { out.push(&c.genre); }
        }
        out
    }
}

fn parse_row(schema: &DatasetSchema, rec: &StringRecord, line: usize) -> Result<Comment, Box<dyn Error>> {
    let cell = |i: usize| rec.get(i).map(str::trim).unwrap_or("");

    let count = |i: usize, name: &str| -> Result<Option<u64>, Box<dyn Error>> {
        parse_count(cell(i)).map_err(|v| format!("line {line}: bad {name} value {v:?}").into())
    };
    let scores = |cols: &[(usize, String)]| -> Result<BTreeMap<String, f64>, Box<dyn Error>> {
        let mut out = BTreeMap::new();
        for (i, name) in cols {
            let v = cell(*i);
            if v.is_empty() || v.eq_ignore_ascii_case("nan") { continue; }
            let x: f64 = v.parse()
                .map_err(|_| format!("line {line}: bad {name} value {v:?}"))?;
            out.insert(name.clone(), x);
        }
        Ok(out)
    };

    Ok(Comment {
        genre: normalize_ws(cell(schema.genre)),
        video_id: s!(cell(schema.video_id)),
        likes: count(schema.likes, "likes")?,
        views: count(schema.views, "views")?,
        vader: scores(&schema.vader)?,
        liwc: scores(&schema.liwc)?,
        text: schema.text.map(|i| s!(cell(i))).filter(|t| !t.is_empty()),
    })
}

/// Blank / NaN → None. Accepts float-formatted integers like `"12.0"`.
fn parse_count(v: &str) -> Result<Option<u64>, &str> {
    if v.is_empty() || v.eq_ignore_ascii_case("nan") { return Ok(None); }
    if let Ok(n) = v.parse::<u64>() { return Ok(Some(n)); }
    match v.parse::<f64>() {
        Ok(x) if x >= 0.0 && x.fract() == 0.0 && x <= u64::MAX as f64 => Ok(Some(x as u64)),
        _ => Err(v),
    }
}
