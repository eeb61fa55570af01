use sqlx::PgConnection;

use crate::error::Result;
use crate::types::{ArtistRow, PlayLookup, PlayRow, SongRow, TimeRow, UserRow};

// The gateway's whole SQL surface lives in these templates. Callers supply
// positional parameters only; nothing is built dynamically.

pub const INSERT_SONG: &str = r#"
    INSERT INTO songs (song_id, title, artist_id, year, duration)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (song_id) DO NOTHING
"#;

pub const INSERT_ARTIST: &str = r#"
    INSERT INTO artists (artist_id, name, location, latitude, longitude)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (artist_id) DO NOTHING
"#;

pub const INSERT_TIME: &str = r#"
    INSERT INTO time (start_time, hour, day, week, weekday, month, year)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (start_time) DO NOTHING
"#;

pub const UPSERT_USER: &str = r#"
    INSERT INTO users (user_id, first_name, last_name, gender, level)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (user_id)
    DO UPDATE SET level = EXCLUDED.level
"#;

pub const INSERT_PLAY: &str = r#"
    INSERT INTO songplays
        (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

pub const SELECT_SONG_BY_PLAY: &str = r#"
    SELECT s.song_id, a.artist_id
    FROM songs s
    JOIN artists a ON s.artist_id = a.artist_id
    WHERE s.title = $1 AND a.name = $2 AND s.duration = $3
"#;

pub async fn insert_song(conn: &mut PgConnection, song: &SongRow) -> Result<()> {
    sqlx::query(INSERT_SONG)
        .bind(&song.song_id)
        .bind(&song.title)
        .bind(&song.artist_id)
        .bind(song.year)
        .bind(song.duration)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn insert_artist(conn: &mut PgConnection, artist: &ArtistRow) -> Result<()> {
    sqlx::query(INSERT_ARTIST)
        .bind(&artist.artist_id)
        .bind(&artist.name)
        .bind(&artist.location)
        .bind(artist.latitude)
        .bind(artist.longitude)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn insert_time(conn: &mut PgConnection, row: &TimeRow) -> Result<()> {
    sqlx::query(INSERT_TIME)
        .bind(row.start_time)
        .bind(row.hour)
        .bind(row.day)
        .bind(row.week)
        .bind(row.weekday)
        .bind(row.month)
        .bind(row.year)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn upsert_user(conn: &mut PgConnection, user: &UserRow) -> Result<()> {
    sqlx::query(UPSERT_USER)
        .bind(&user.user_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.gender)
        .bind(&user.level)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Insert one fact row. The surrogate `songplay_id` is assigned by the
/// store's identity column.
pub async fn insert_play(conn: &mut PgConnection, play: &PlayRow) -> Result<()> {
    sqlx::query(INSERT_PLAY)
        .bind(play.start_time)
        .bind(&play.user_id)
        .bind(&play.level)
        .bind(&play.song_id)
        .bind(&play.artist_id)
        .bind(play.session_id)
        .bind(&play.location)
        .bind(&play.user_agent)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Resolve a play's (title, artist name, duration) triple to the pair of
/// dimension identifiers. `None` means no match; the caller inserts the fact
/// row with null foreign keys.
pub async fn find_song_by_play(
    conn: &mut PgConnection,
    lookup: &PlayLookup,
) -> Result<Option<(String, String)>> {
    let found = sqlx::query_as::<_, (String, String)>(SELECT_SONG_BY_PLAY)
        .bind(&lookup.title)
        .bind(&lookup.artist)
        .bind(lookup.duration)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found)
}
