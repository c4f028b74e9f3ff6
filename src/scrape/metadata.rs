// src/scrape/metadata.rs
use std::{
    collections::BTreeSet,
    error::Error,
    path::Path,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc,
    },
    thread,
};

use crate::{
    config::options::MetadataOptions,
    core::net::{ApiError, YouTubeApi},
    core::sanitize::header_key,
    file::list_csv_files,
    progress::Progress,
    specs::videos::{rows_from_response, VideoMetadataRow},
};

/// Every video id found under `dir`.
///
/// Each `*.csv` contributes its `videoId` column (trimmed, blanks dropped);
/// a file without that column contributes its file stem instead. Files that
/// fail to parse are logged and skipped.
pub fn collect_video_ids(dir: &Path) -> Result<BTreeSet<String>, Box<dyn Error>> {
    let mut ids = BTreeSet::new();
    let paths = list_csv_files(dir)?;
    if paths.is_empty() {
        logw!("No CSV files found in: {}", dir.display());
        return Ok(ids);
    }

    for path in paths {
        match ids_from_file(&path) {
            Ok(Some(found)) => ids.extend(found),
            Ok(None) => {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if !stem.is_empty() { ids.insert(s!(stem)); }
                }
            }
            Err(e) => loge!("Failed to read {}: {e}", path.display()),
        }
    }

    logf!("Collected {} unique video IDs.", ids.len());
    Ok(ids)
}

/// `Ok(None)` when the file has no `videoId` column.
fn ids_from_file(path: &Path) -> Result<Option<Vec<String>>, Box<dyn Error>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let col = rdr.headers()?.iter().position(|h| header_key(h) == "videoid");
    let Some(col) = col else { return Ok(None) };

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        if let Some(v) = rec.get(col).map(str::trim).filter(|v| !v.is_empty()) {
            out.push(s!(v));
        }
    }
    Ok(Some(out))
}

#[derive(Debug, Default)]
pub struct MetadataFetch {
    /// In batch order.
    pub rows: Vec<VideoMetadataRow>,
    pub rate_limited: bool,
    pub failed_batches: usize,
}

/// `videos.list` for every id, `batch_size` ids per call, spread over
/// `workers` threads.
///
/// Workers pull batch indices from a shared cursor and pause after each call.
/// The first rate-limit error stops workers from taking new batches; batches
/// already in flight still land. Other failed batches are logged and skipped.
pub fn fetch_video_metadata(
    api: &dyn YouTubeApi,
    ids: &[String],
    opts: &MetadataOptions,
    mut progress: Option<&mut dyn Progress>,
) -> MetadataFetch {
    let batches: Vec<&[String]> = ids.chunks(opts.effective_batch_size()).collect();
    let mut out = MetadataFetch::default();
    if batches.is_empty() {
        return out;
    }

    if let Some(p) = progress.as_deref_mut() {
        p.begin(batches.len());
    }

    type BatchResult = (usize, Result<Vec<VideoMetadataRow>, ApiError>);

    let cursor = AtomicUsize::new(0);
    let halt = AtomicBool::new(false);
    let pause = opts.batch_pause();
    let workers = opts.effective_workers().min(batches.len());
    let (tx, rx) = mpsc::channel::<BatchResult>();

    let mut per_batch: Vec<(usize, Vec<VideoMetadataRow>)> = Vec::with_capacity(batches.len());

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let (batches, cursor, halt) = (&batches, &cursor, &halt);
            scope.spawn(move || loop {
                if halt.load(Ordering::Relaxed) { break; }
                let i = cursor.fetch_add(1, Ordering::Relaxed);
                if i >= batches.len() { break; }

                let result = api.videos(batches[i]).map(rows_from_response);
                if matches!(&result, Err(e) if e.is_rate_limited()) {
                    halt.store(true, Ordering::Relaxed);
                }
                if tx.send((i, result)).is_err() { break; }
                if !pause.is_zero() { thread::sleep(pause); }
            });
        }
        drop(tx); // main thread is sole receiver now

        for (i, result) in rx {
            let label = format!("batch {}", i + 1);
            match result {
                Ok(rows) => {
                    per_batch.push((i, rows));
                    if let Some(p) = progress.as_deref_mut() { p.item_done(&label); }
                }
                Err(e) if e.is_rate_limited() => {
                    logw!("Rate limit/quota reached on {label}. Stopping.");
                    out.rate_limited = true;
                    if let Some(p) = progress.as_deref_mut() { p.item_failed(&label, &e.to_string()); }
                }
                Err(e) => {
                    loge!("API error on {label}: {e}");
                    out.failed_batches += 1;
                    if let Some(p) = progress.as_deref_mut() { p.item_failed(&label, &e.to_string()); }
                }
            }
        }
    });

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    per_batch.sort_by_key(|(i, _)| *i);
    out.rows = per_batch.into_iter().flat_map(|(_, rows)| rows).collect();
    out
}
