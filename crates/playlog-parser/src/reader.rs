use serde::de::DeserializeOwned;

use crate::errors::ParserError;
use crate::model::{LogEvent, SongFile};

/// Parse a song-metadata file: a single JSON object on the first non-empty
/// line. Trailing lines are ignored; song files carry one record each.
pub fn parse_song_file(content: &str) -> Result<SongFile, ParserError> {
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        return serde_json::from_str(trimmed).map_err(|source| ParserError::Line {
            line: index + 1,
            source,
        });
    }
    Err(ParserError::EmptyFile)
}

/// Parse a log file: one JSON object per line. Any malformed line fails the
/// whole file; a partially-read log would corrupt downstream foreign-key
/// resolution, so there is no skip-and-continue here.
pub fn parse_log_file(content: &str) -> Result<Vec<LogEvent>, ParserError> {
    parse_lines(content)
}

fn parse_lines<T: DeserializeOwned>(content: &str) -> Result<Vec<T>, ParserError> {
    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record = serde_json::from_str(trimmed).map_err(|source| ParserError::Line {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
