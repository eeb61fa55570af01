use std::collections::HashSet;

use chrono::{DateTime, Utc};
use playlog_parser::LogEvent;

use crate::error::{PipelineError, Result};
use crate::types::{PlayLookup, PlayRow, TimeRow, UserRow};

/// A fact row waiting on dimension resolution. `lookup` is `None` when the
/// event carried no (song, artist, length) triple; such plays insert with
/// null foreign keys without ever querying the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayIntent {
    pub row: PlayRow,
    pub lookup: Option<PlayLookup>,
}

/// Everything one log file contributes to the warehouse, in load order:
/// all time rows, then all user rows, then all play rows.
#[derive(Debug, Default)]
pub struct LogBatch {
    pub time: Vec<TimeRow>,
    pub users: Vec<UserRow>,
    pub plays: Vec<PlayIntent>,
}

/// Transform one log file's events into warehouse rows.
///
/// Only `NextSong` events represent plays; everything else is discarded
/// whole, never turned into partial rows. Time rows are deduplicated by
/// exact timestamp in first-seen order, since the time dimension is keyed by
/// the timestamp alone. User and play rows are one per retained event.
pub fn transform_log_events(events: &[LogEvent]) -> Result<LogBatch> {
    let retained: Vec<&LogEvent> = events.iter().filter(|event| event.is_next_song()).collect();

    let mut seen = HashSet::new();
    let mut time = Vec::new();
    for event in &retained {
        let start_time = event_timestamp(event)?;
        if seen.insert(start_time) {
            time.push(TimeRow::from_timestamp(start_time));
        }
    }

    let mut users = Vec::with_capacity(retained.len());
    for event in &retained {
        users.push(user_row(event)?);
    }

    let mut plays = Vec::with_capacity(retained.len());
    for event in &retained {
        plays.push(play_intent(event)?);
    }

    Ok(LogBatch { time, users, plays })
}

fn event_timestamp(event: &LogEvent) -> Result<DateTime<Utc>> {
    if event.ts.is_none() {
        return Err(missing_field("ts"));
    }
    event
        .timestamp_utc()
        .ok_or_else(|| PipelineError::Validation("play event timestamp is out of range".into()))
}

fn user_row(event: &LogEvent) -> Result<UserRow> {
    Ok(UserRow {
        user_id: required(&event.user_id, "userId")?,
        first_name: required(&event.first_name, "firstName")?,
        last_name: required(&event.last_name, "lastName")?,
        gender: required(&event.gender, "gender")?,
        level: required(&event.level, "level")?,
    })
}

fn play_intent(event: &LogEvent) -> Result<PlayIntent> {
    let row = PlayRow {
        start_time: event_timestamp(event)?,
        user_id: required(&event.user_id, "userId")?,
        level: required(&event.level, "level")?,
        song_id: None,
        artist_id: None,
        session_id: event.session_id,
        location: event.location.clone(),
        user_agent: event.user_agent.clone(),
    };

    let lookup = match (&event.song, &event.artist, event.length) {
        (Some(title), Some(artist), Some(duration)) => Some(PlayLookup {
            title: title.clone(),
            artist: artist.clone(),
            duration,
        }),
        _ => None,
    };

    Ok(PlayIntent { row, lookup })
}

fn required(field: &Option<String>, name: &str) -> Result<String> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(missing_field(name)),
    }
}

fn missing_field(name: &str) -> PipelineError {
    PipelineError::Validation(format!("play event is missing required field '{name}'"))
}
