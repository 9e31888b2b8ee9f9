//! Song document models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::song_id::SongId;
use crate::{Error, Result};

/// A song document as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    #[serde(rename = "_id")]
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub level: i64,
    pub difficulty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
    #[serde(default)]
    pub rates: Vec<i64>,
}

/// A song not yet stored; the id is assigned on insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub level: i64,
    pub difficulty: f64,
    #[serde(default)]
    pub released: Option<String>,
}

/// Raw `songs` row; `rates` is still the stored JSON text
#[derive(Debug, FromRow)]
pub struct SongRow {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub level: i64,
    pub difficulty: f64,
    pub released: Option<String>,
    pub rates: String,
}

impl TryFrom<SongRow> for Song {
    type Error = Error;

    fn try_from(row: SongRow) -> Result<Self> {
        Ok(Song {
            id: SongId::parse(&row.id)?,
            title: row.title,
            artist: row.artist,
            level: row.level,
            difficulty: row.difficulty,
            released: row.released,
            rates: decode_rates(&row.rates)?,
        })
    }
}

/// Decode the stored JSON array of ratings
pub fn decode_rates(raw: &str) -> Result<Vec<i64>> {
    Ok(serde_json::from_str(raw)?)
}
