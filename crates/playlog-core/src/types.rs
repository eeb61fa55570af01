use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row for the `songs` dimension, keyed by the stable song identifier.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

/// Row for the `artists` dimension. Coordinates stay `None` when the source
/// record carries no location fix, never zero.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Row for the `time` dimension. Every calendar field is derived from
/// `start_time`; the timestamp is the only source of truth.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TimeRow {
    pub start_time: DateTime<Utc>,
    pub hour: i32,
    pub day: i32,
    pub week: i32,
    pub weekday: i32,
    pub month: i32,
    pub year: i32,
}

impl TimeRow {
    /// Decompose a play timestamp into its calendar fields. Week is the ISO
    /// week of year, weekday the ISO weekday number (Monday = 1).
    pub fn from_timestamp(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            hour: start_time.hour() as i32,
            day: start_time.day() as i32,
            week: start_time.iso_week().week() as i32,
            weekday: start_time.weekday().number_from_monday() as i32,
            month: start_time.month() as i32,
            year: start_time.year(),
        }
    }
}

/// Row for the `users` dimension. `level` is the subscription tier and may
/// change between events; the store upserts it, last write wins.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub level: String,
}

/// Row for the `songplays` fact table. The surrogate key is assigned by the
/// store on insert; song/artist foreign keys are null when the play could not
/// be resolved against the dimensions.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PlayRow {
    pub start_time: DateTime<Utc>,
    pub user_id: String,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Exact-match key for resolving a play event against the song and artist
/// dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayLookup {
    pub title: String,
    pub artist: String,
    pub duration: f64,
}
