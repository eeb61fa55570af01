use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One song-metadata record. Files in the song tree hold exactly one of
/// these per file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongFile {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: String,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

/// One entry in an application event log. Every field is optional at parse
/// time; which ones a given warehouse row actually needs is decided by the
/// transform, not the reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    #[serde(default)]
    pub page: Option<String>,
    /// Event time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default, deserialize_with = "user_id_field")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl LogEvent {
    /// Whether this event records an actual song play.
    pub fn is_next_song(&self) -> bool {
        self.page.as_deref() == Some("NextSong")
    }

    /// Event time as a UTC datetime, when the millisecond timestamp is
    /// present and within the representable range.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.ts.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

// Log producers are inconsistent about userId: most emit a JSON string, some
// emit a bare number. Normalize both to a string.
fn user_id_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}
