use serde::{Deserialize, Serialize};

/// A record the calendar can place on a day.
pub trait Timestamped {
    fn timestamp(&self) -> &str;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CalendarSong {
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CalendarPhoto {
    pub data_url: String,
    #[serde(default)]
    pub label: Option<String>,
    pub timestamp: String,
}

/// Payload of `GET /api/calendar-data`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct CalendarData {
    #[serde(default)]
    pub songs: Vec<CalendarSong>,
    #[serde(default)]
    pub photos: Vec<CalendarPhoto>,
}

impl Timestamped for CalendarSong {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl Timestamped for CalendarPhoto {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
