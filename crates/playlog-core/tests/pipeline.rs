use std::env;
use std::fs;
use std::path::Path;

use playlog_core::{db, pipeline};

const SONG_FILE: &str = r#"{"song_id":"S1","title":"X","artist_id":"A1","year":2000,"duration":1.0,"artist_name":"Y","artist_location":"","artist_latitude":null,"artist_longitude":null}"#;

const LOG_FILE: &str = concat!(
    r#"{"page":"NextSong","ts":1541903636796,"userId":"69","firstName":"Anabelle","lastName":"Simpson","gender":"F","level":"free","song":"X","artist":"Y","length":1.0,"sessionId":256,"location":"Philadelphia-Camden-Wilmington, PA-NJ-DE-MD","userAgent":"Mozilla/5.0"}"#,
    "\n",
    r#"{"page":"Home","ts":1541903770796,"userId":"69","firstName":"Anabelle","lastName":"Simpson","gender":"F","level":"free"}"#,
    "\n",
);

fn write_trees(root: &Path) {
    let song_dir = root.join("song_data/A/A");
    fs::create_dir_all(&song_dir).expect("create song tree");
    fs::write(song_dir.join("TRAXS1.json"), SONG_FILE).expect("write song file");

    let log_dir = root.join("log_data/2018/11");
    fs::create_dir_all(&log_dir).expect("create log tree");
    fs::write(log_dir.join("2018-11-11-events.json"), LOG_FILE).expect("write log file");
}

// Exercises the full two-phase load against a real Postgres instance. Set
// PLAYLOG_TEST_DATABASE_URL to run; skipped otherwise.
#[tokio::test]
async fn end_to_end_load_when_database_available() -> anyhow::Result<()> {
    let database_url = match env::var("PLAYLOG_TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping end-to-end test because PLAYLOG_TEST_DATABASE_URL is not set");
            return Ok(());
        }
    };

    let pool = db::connect(&database_url).await?;
    db::run_migrations(&pool).await?;
    sqlx::query("TRUNCATE songplays, time, users, songs, artists RESTART IDENTITY")
        .execute(&pool)
        .await?;

    let dir = tempfile::tempdir()?;
    write_trees(dir.path());

    let summary = pipeline::run(
        &pool,
        &dir.path().join("song_data"),
        &dir.path().join("log_data"),
    )
    .await?;

    assert_eq!(summary.songs.files_found, 1);
    assert_eq!(summary.songs.files_loaded, 1);
    assert_eq!(summary.songs.rows.songs, 1);
    assert_eq!(summary.songs.rows.artists, 1);
    assert_eq!(summary.events.files_loaded, 1);
    assert_eq!(summary.events.rows.time, 1);
    assert_eq!(summary.events.rows.users, 1);
    assert_eq!(summary.events.rows.plays, 1);
    assert_eq!(summary.events.rows.resolved_plays, 1);

    // The Home line contributed nothing; the play resolved to the loaded
    // song and artist.
    let (song_id, artist_id): (Option<String>, Option<String>) =
        sqlx::query_as("SELECT song_id, artist_id FROM songplays")
            .fetch_one(&pool)
            .await?;
    assert_eq!(song_id.as_deref(), Some("S1"));
    assert_eq!(artist_id.as_deref(), Some("A1"));

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await?;
    assert_eq!(user_count, 1);

    // Rerun: dimension upserts keep the tables stable, while fact rows
    // (keyed by a fresh surrogate) duplicate. Known limitation, asserted on
    // purpose.
    pipeline::run(
        &pool,
        &dir.path().join("song_data"),
        &dir.path().join("log_data"),
    )
    .await?;

    let song_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(&pool)
        .await?;
    let artist_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artists")
        .fetch_one(&pool)
        .await?;
    let time_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM time")
        .fetch_one(&pool)
        .await?;
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await?;
    let play_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songplays")
        .fetch_one(&pool)
        .await?;

    assert_eq!(song_count, 1);
    assert_eq!(artist_count, 1);
    assert_eq!(time_count, 1);
    assert_eq!(user_count, 1);
    assert_eq!(play_count, 2);

    Ok(())
}
