use std::path::Path;

use serde::Serialize;
use sqlx::PgConnection;
use tracing::{debug, info};

use crate::db::DbPool;
use crate::discovery::find_json_files;
use crate::error::{PipelineError, Result};
use crate::extract::split_song_file;
use crate::store;
use crate::transform::transform_log_events;

/// Which family of files a phase loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeKind {
    Songs,
    Events,
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct RowCounts {
    pub songs: usize,
    pub artists: usize,
    pub time: usize,
    pub users: usize,
    pub plays: usize,
    pub resolved_plays: usize,
}

impl RowCounts {
    fn add(&mut self, other: RowCounts) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.time += other.time;
        self.users += other.users;
        self.plays += other.plays;
        self.resolved_plays += other.resolved_plays;
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct PhaseSummary {
    pub files_found: usize,
    pub files_loaded: usize,
    pub rows: RowCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub songs: PhaseSummary,
    pub events: PhaseSummary,
}

/// Run the full load: the entire song-metadata tree first, then the event-log
/// tree. The phase order is part of the driver's contract — fact rows resolve
/// song/artist foreign keys against whatever the first phase committed, so
/// dimension sources must finish before any fact source starts.
pub async fn run(pool: &DbPool, song_root: &Path, log_root: &Path) -> Result<RunSummary> {
    let songs = load_song_tree(pool, song_root).await?;
    let events = load_log_tree(pool, log_root).await?;
    Ok(RunSummary { songs, events })
}

/// Load every song-metadata file under `root`.
pub async fn load_song_tree(pool: &DbPool, root: &Path) -> Result<PhaseSummary> {
    load_tree(pool, root, TreeKind::Songs).await
}

/// Load every event-log file under `root`.
pub async fn load_log_tree(pool: &DbPool, root: &Path) -> Result<PhaseSummary> {
    load_tree(pool, root, TreeKind::Events).await
}

// One transaction per file: a failure mid-file rolls back that file's rows
// and halts the run, leaving every earlier file's commit intact. There is no
// continue-on-error.
async fn load_tree(pool: &DbPool, root: &Path, kind: TreeKind) -> Result<PhaseSummary> {
    let files = find_json_files(root)?;
    info!("{} files found in {}", files.len(), root.display());

    let mut summary = PhaseSummary {
        files_found: files.len(),
        ..Default::default()
    };

    for (index, path) in files.iter().enumerate() {
        let content = std::fs::read_to_string(path)?;

        let mut tx = pool.begin().await?;
        let counts = match kind {
            TreeKind::Songs => load_song_file(&mut *tx, path, &content).await?,
            TreeKind::Events => load_log_file(&mut *tx, path, &content).await?,
        };
        tx.commit().await?;

        summary.rows.add(counts);
        summary.files_loaded += 1;
        info!("{}/{} files processed.", index + 1, files.len());
        debug!(path = %path.display(), ?counts, "file committed");
    }

    Ok(summary)
}

async fn load_song_file(
    conn: &mut PgConnection,
    path: &Path,
    content: &str,
) -> Result<RowCounts> {
    let record = playlog_parser::parse_song_file(content).map_err(|source| {
        PipelineError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let (song, artist) = split_song_file(record);

    store::insert_song(&mut *conn, &song).await?;
    store::insert_artist(&mut *conn, &artist).await?;

    Ok(RowCounts {
        songs: 1,
        artists: 1,
        ..Default::default()
    })
}

// Strict three-pass order over the file: time rows, then user rows, then
// fact rows. Play resolution reads the songs/artists committed by the song
// phase, never rows from the file being loaded.
async fn load_log_file(conn: &mut PgConnection, path: &Path, content: &str) -> Result<RowCounts> {
    let events = playlog_parser::parse_log_file(content).map_err(|source| {
        PipelineError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let batch = transform_log_events(&events)?;

    let mut counts = RowCounts::default();

    for row in &batch.time {
        store::insert_time(&mut *conn, row).await?;
        counts.time += 1;
    }

    for user in &batch.users {
        store::upsert_user(&mut *conn, user).await?;
        counts.users += 1;
    }

    for intent in batch.plays {
        let mut play = intent.row;
        if let Some(lookup) = &intent.lookup {
            if let Some((song_id, artist_id)) = store::find_song_by_play(&mut *conn, lookup).await?
            {
                play.song_id = Some(song_id);
                play.artist_id = Some(artist_id);
                counts.resolved_plays += 1;
            }
        }
        store::insert_play(&mut *conn, &play).await?;
        counts.plays += 1;
    }

    Ok(counts)
}
