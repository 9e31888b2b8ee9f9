//! Seed loader
//!
//! Loads a JSON array of songs and inserts them with freshly generated ids.
//! Used by `songs-api --seed` and by the test suites.

use std::path::Path;

use sqlx::SqlitePool;
use tracing::info;

use crate::db::models::NewSong;
use crate::song_id::SongId;
use crate::{Error, Result};

/// Read a JSON array of songs from `path`
pub fn load_songs_file(path: &Path) -> Result<Vec<NewSong>> {
    let content = std::fs::read_to_string(path)?;
    parse_songs(&content)
}

/// Parse a JSON array of songs
pub fn parse_songs(content: &str) -> Result<Vec<NewSong>> {
    serde_json::from_str(content).map_err(Error::from)
}

/// Insert `songs` in order, returning their ids (ascending)
///
/// Runs in a single transaction: either every song is stored or none is.
pub async fn seed_songs(pool: &SqlitePool, songs: &[NewSong]) -> Result<Vec<SongId>> {
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(songs.len());

    for song in songs {
        let id = SongId::generate();

        sqlx::query(
            r#"
            INSERT INTO songs (id, title, artist, level, difficulty, released, rates)
            VALUES (?, ?, ?, ?, ?, ?, '[]')
            "#,
        )
        .bind(id.as_str())
        .bind(&song.title)
        .bind(&song.artist)
        .bind(song.level)
        .bind(song.difficulty)
        .bind(song.released.as_deref())
        .execute(&mut *tx)
        .await?;

        ids.push(id);
    }

    tx.commit().await?;

    info!("Seeded {} songs", ids.len());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_songs() {
        let songs = parse_songs(
            r#"[
                {"artist": "The Yousicians", "title": "A New Kennel", "difficulty": 9.1, "level": 9, "released": "2010-02-03"},
                {"artist": "Mr Fastfinger", "title": "Awaki-Waki", "difficulty": 15, "level": 13}
            ]"#,
        )
        .unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].released.as_deref(), Some("2010-02-03"));
        assert_eq!(songs[1].difficulty, 15.0);
        assert!(songs[1].released.is_none());
    }

    #[test]
    fn test_parse_songs_rejects_unknown_fields() {
        let result = parse_songs(r#"[{"artist": "A", "title": "T", "difficulty": 1, "level": 1, "bpm": 120}]"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
