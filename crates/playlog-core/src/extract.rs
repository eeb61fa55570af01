use playlog_parser::SongFile;

use crate::types::{ArtistRow, SongRow};

/// Split one song-metadata record into its song and artist dimension rows.
/// Pure projection; both rows carry the same artist identifier.
pub fn split_song_file(file: SongFile) -> (SongRow, ArtistRow) {
    let SongFile {
        song_id,
        title,
        artist_id,
        year,
        duration,
        artist_name,
        artist_location,
        artist_latitude,
        artist_longitude,
    } = file;

    let song = SongRow {
        song_id,
        title,
        artist_id: artist_id.clone(),
        year,
        duration,
    };
    let artist = ArtistRow {
        artist_id,
        name: artist_name,
        location: artist_location,
        latitude: artist_latitude,
        longitude: artist_longitude,
    };
    (song, artist)
}
