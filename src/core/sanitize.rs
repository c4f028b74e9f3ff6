// src/core/sanitize.rs

/// Collapse runs of whitespace to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Video ids are `[A-Za-z0-9_-]`; anything else is dropped so an id can
/// never escape the per-video directory.
pub fn sanitize_video_filename(video_id: &str) -> String {
    let out: String = video_id
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_')
        .collect();
    if out.is_empty() { s!("video") } else { out }
}

/// Lower-case, alphanumerics only: `"Video ID"`, `"video_id"` and `"videoId"`
/// all become `"videoid"`.
pub fn header_key(h: &str) -> String {
    h.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
