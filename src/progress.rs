// src/progress.rs
/// Lightweight progress reporting used by long-running operations (scrape/metadata).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (a video, or a metadata batch).
    fn item_done(&mut self, _id: &str) {}

    /// Called when one unit fails but the run carries on.
    fn item_failed(&mut self, _id: &str, _msg: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Seconds → `HH:MM:SS`. Hours keep counting past 24.
pub fn format_eta(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 { secs.round() as u64 } else { 0 };
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
