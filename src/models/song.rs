use serde::{Deserialize, Serialize};

// Row returned by `GET /api/songs`, newest first.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    pub listened_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
}

impl NewSong {
    pub fn new(title: &str, artist: Option<&str>) -> Self {
        Self {
            title: title.trim().to_string(),
            artist: artist.map(str::trim).unwrap_or_default().to_string(),
        }
    }
}

// Title/artist pair echoed back by the recognition endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RecognizedSong {
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
}

/// An audio file to be identified by the recognition endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub fn audio_mime(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "ogg" | "oga" => "audio/ogg",
        "m4a" | "mp4" => "audio/mp4",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

pub fn describe(title: &str, artist: Option<&str>) -> String {
    match artist.map(str::trim).filter(|a| !a.is_empty()) {
        Some(artist) => format!("{} by {}", title, artist),
        None => title.to_string(),
    }
}
