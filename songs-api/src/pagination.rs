//! Cursor pagination for `GET /songs`
//!
//! Pages are ordered by ascending song id. The cursor is the id of the last
//! song of the previous page; the next page holds ids strictly greater.

use serde::Serialize;
use songs_common::db::Song;
use songs_common::{InvalidSongId, SongId};

/// Songs per page
pub const PAGE_SIZE: i64 = 10;

/// One page of songs plus the cursor for the next one
#[derive(Debug, Clone, Serialize)]
pub struct SongPage {
    pub songs: Vec<Song>,
    /// Id of the last song in `songs`, or "" for an empty page
    pub last_id: String,
}

impl SongPage {
    pub fn new(songs: Vec<Song>) -> Self {
        let last_id = songs
            .last()
            .map(|song| song.id.to_string())
            .unwrap_or_default();

        Self { songs, last_id }
    }
}

/// Parse the optional `from` query parameter
///
/// An unparsable cursor is a client error rather than a store failure.
pub fn parse_cursor(raw: Option<&str>) -> Result<Option<SongId>, InvalidSongId> {
    raw.map(SongId::parse).transpose()
}
