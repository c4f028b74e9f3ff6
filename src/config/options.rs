// src/config/options.rs
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub paths: PathOptions,
    pub scrape: ScrapeOptions,
    pub metadata: MetadataOptions,
    pub api: ApiOptions,
}

impl AppOptions {
    /// Defaults ← TOML file ← `YT_SCRAPE_*` env vars.
    ///
    /// An explicit `config_file` must exist; otherwise `yt_scrape.toml` in the
    /// working directory is picked up when present. Nested keys use `__` in env
    /// names, e.g. `YT_SCRAPE_SCRAPE__MAX_COMMENTS_PER_VIDEO=20`.
    pub fn load(config_file: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let _ = dotenvy::dotenv();

        let toml_path = match config_file {
            Some(p) => {
                if !p.is_file() {
                    return Err(format!("Config file not found: {}", p.display()).into());
                }
                p.to_path_buf()
            }
            None => PathBuf::from(CONFIG_FILE),
        };

        let mut opts: AppOptions = Figment::from(Serialized::defaults(AppOptions::default()))
            .merge(Toml::file(&toml_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        if opts.api.api_key.as_deref().is_none_or(str::is_empty) {
            opts.api.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        }
        Ok(opts)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    pub assignments: PathBuf,
    pub state: PathBuf,
    pub per_video_dir: PathBuf,
    pub aggregate_csv: PathBuf,
    pub metadata_csv: PathBuf,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            assignments: PathBuf::from(ASSIGNMENTS_PATH),
            state: PathBuf::from(STATE_PATH),
            per_video_dir: PathBuf::from(PER_VIDEO_DIR),
            aggregate_csv: PathBuf::from(AGGREGATE_CSV),
            metadata_csv: PathBuf::from(METADATA_CSV),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    pub max_comments_per_video: usize,
    pub genres_per_run: usize,
    pub page_pause_ms: u64,
    pub video_pause_ms: u64,
    /// Genres treated as already done, on top of the resume state.
    pub skip_genres: Vec<String>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            max_comments_per_video: MAX_COMMENTS_PER_VIDEO,
            genres_per_run: GENRES_PER_RUN,
            page_pause_ms: PAGE_PAUSE_MS,
            video_pause_ms: VIDEO_PAUSE_MS,
            skip_genres: Vec::new(),
        }
    }
}

impl ScrapeOptions {
    pub fn page_pause(&self) -> Duration {
        Duration::from_millis(self.page_pause_ms)
    }
    pub fn video_pause(&self) -> Duration {
        Duration::from_millis(self.video_pause_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataOptions {
    pub batch_size: usize,
    pub batch_pause_ms: u64,
    pub workers: usize,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            batch_pause_ms: BATCH_PAUSE_MS,
            workers: WORKERS,
        }
    }
}

impl MetadataOptions {
    /// `videos.list` takes at most 50 ids per call.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, BATCH_SIZE)
    }
    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }
    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiOptions {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            base_url: s!(API_BASE),
            api_key: None,
            timeout_secs: TIMEOUT_SECS,
        }
    }
}

// Keep the key out of `{:?}` output (and therefore out of logs).
impl std::fmt::Debug for ApiOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiOptions")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ApiOptions {
    pub fn require_key(&self) -> Result<&str, Box<dyn Error>> {
        match self.api_key.as_deref() {
            Some(k) if !k.trim().is_empty() => Ok(k),
            _ => Err(join!("Missing API key: set ", API_KEY_ENV, " or pass --api-key").into()),
        }
    }
}
