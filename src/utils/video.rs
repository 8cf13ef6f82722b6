// src/utils/video.rs

use regex::Regex;
use std::sync::LazyLock;

/// YouTube URL shapes we accept. Each captures the 11-char video id.
static YOUTUBE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})",
        r"youtube\.com/watch\?.*[?&]v=([A-Za-z0-9_-]{11})",
        r"youtube\.com/v/([A-Za-z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

fn is_bare_id(s: &str) -> bool {
    s.len() == 11 && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extracts the YouTube video id from a URL, or returns the input itself
/// when it is already a bare 11-character id. Returns `None` for anything
/// that does not resolve to a valid id.
pub fn youtube_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    if is_bare_id(input) {
        return Some(input.to_string());
    }

    for pattern in YOUTUBE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(input) {
            return Some(caps[1].to_string());
        }
    }

    None
}
