// src/file.rs

use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;

/// Create/truncate `path` and write a header line plus `rows`.
pub fn write_rows<T: Serialize>(
    path: &Path,
    rows: &[T],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    ensure_parent(path)?;
    let file = File::create(path)?; // truncate/overwrite
    let mut w = csv::Writer::from_writer(BufWriter::new(file));
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(path.to_path_buf())
}

/// Append `rows` to `path`. The header is written only when the file is new
/// or empty, so repeated appends across runs keep a single header line.
pub fn append_rows<T: Serialize>(
    path: &Path,
    rows: &[T],
) -> Result<(), Box<dyn std::error::Error>> {
    if rows.is_empty() { return Ok(()); }
    ensure_parent(path)?;

    let is_fresh = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut w = csv::WriterBuilder::new()
        .has_headers(is_fresh)
        .from_writer(BufWriter::new(file));
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Write `contents` next to `path` then rename over it, so a crash never
/// leaves a half-written file behind.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    ensure_parent(path)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut f = File::create(&tmp)?;
        f.write_all(contents)?;
        f.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// `*.csv` files directly under `dir`, sorted by name. Missing dir → empty.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if !dir.is_dir() { return Ok(Vec::new()); }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() { continue; }
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv { out.push(path); }
    }
    out.sort();
    Ok(out)
}
