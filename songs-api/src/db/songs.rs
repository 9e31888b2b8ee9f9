//! Song repository
//!
//! The only place that builds store queries. Each operation is a single
//! round trip except `insert_songs`, which runs one transaction.

use sqlx::{FromRow, SqlitePool};
use songs_common::db::{decode_rates, seed_songs, NewSong, Song, SongRow};
use songs_common::SongId;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::models::{RatedSong, RatingSummary};
use crate::pagination::{SongPage, PAGE_SIZE};
use crate::validation::SongRating;

const FIRST_PAGE: &str = r#"
    SELECT id, title, artist, level, difficulty, released, rates
    FROM songs
    ORDER BY id ASC
    LIMIT ?
"#;

const PAGE_AFTER: &str = r#"
    SELECT id, title, artist, level, difficulty, released, rates
    FROM songs
    WHERE id > ?
    ORDER BY id ASC
    LIMIT ?
"#;

// No ORDER BY: results come back in the store's natural (insertion) order
const SEARCH: &str = r#"
    SELECT id, title, artist, level, difficulty, released, rates
    FROM songs
    WHERE artist REGEXP ? OR title REGEXP ?
"#;

// Single statement, so concurrent appends to one song cannot lose updates
const APPEND_RATING: &str = r#"
    UPDATE songs
    SET rates = json_insert(rates, '$[#]', ?)
    WHERE id = ?
    RETURNING id, rates
"#;

#[derive(Debug, FromRow)]
struct RatesRow {
    id: String,
    rates: String,
}

impl TryFrom<RatesRow> for RatedSong {
    type Error = songs_common::Error;

    fn try_from(row: RatesRow) -> songs_common::Result<Self> {
        Ok(RatedSong {
            id: SongId::parse(&row.id)?,
            rates: decode_rates(&row.rates)?,
        })
    }
}

/// Data access for the song collection
#[derive(Clone)]
pub struct SongRepository {
    pool: SqlitePool,
}

impl SongRepository {
    /// Create new repository over an open store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Page of at most `PAGE_SIZE` songs with ids greater than `after`
    pub async fn list_page(&self, after: Option<&SongId>) -> ApiResult<SongPage> {
        let rows: Vec<SongRow> = match after {
            Some(cursor) => {
                sqlx::query_as(PAGE_AFTER)
                    .bind(cursor.as_str())
                    .bind(PAGE_SIZE)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as(FIRST_PAGE)
                    .bind(PAGE_SIZE)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(SongPage::new(into_songs(rows)?))
    }

    /// Mean difficulty, over one level or the whole collection
    pub async fn average_difficulty(&self, level: Option<i64>) -> ApiResult<f64> {
        let average: Option<f64> = match level {
            Some(level) => {
                sqlx::query_scalar("SELECT AVG(difficulty) FROM songs WHERE level = ?")
                    .bind(level)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT AVG(difficulty) FROM songs")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        average.ok_or_else(|| match level {
            Some(level) => ApiError::not_found(format!("No song found with level {}", level)),
            None => ApiError::not_found("No song found"),
        })
    }

    /// Songs whose artist or title contains `query`, ignoring case
    ///
    /// Case folding is Unicode-aware ("été" finds "Été Indien").
    pub async fn search(&self, query: &str) -> ApiResult<Vec<Song>> {
        let pattern = search_pattern(query);

        let rows: Vec<SongRow> = sqlx::query_as(SEARCH)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        debug!("Search {:?} matched {} songs", query, rows.len());
        into_songs(rows)
    }

    /// Append a rating and return the song's updated ratings
    pub async fn rate(&self, rating: &SongRating) -> ApiResult<RatedSong> {
        let row: Option<RatesRow> = sqlx::query_as(APPEND_RATING)
            .bind(rating.rating())
            .bind(rating.id().as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(RatedSong::try_from(row)?),
            None => Err(song_not_found(rating.id())),
        }
    }

    /// Lowest, highest, mean and count of a song's ratings
    pub async fn rating_summary(&self, id: &SongId) -> ApiResult<RatingSummary> {
        let rates: Option<String> = sqlx::query_scalar("SELECT rates FROM songs WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        let rates = rates.ok_or_else(|| song_not_found(id))?;
        let rates = decode_rates(&rates)?;

        Ok(RatingSummary::from_rates(&rates))
    }

    /// Number of songs in the catalog
    pub async fn count(&self) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Store new songs, returning their generated ids in insertion order
    pub async fn insert_songs(&self, songs: &[NewSong]) -> ApiResult<Vec<SongId>> {
        Ok(seed_songs(&self.pool, songs).await?)
    }
}

fn song_not_found(id: &SongId) -> ApiError {
    ApiError::not_found(format!("Song not found with id {}", id))
}

fn into_songs(rows: Vec<SongRow>) -> ApiResult<Vec<Song>> {
    rows.into_iter()
        .map(|row| Song::try_from(row).map_err(ApiError::from))
        .collect()
}

/// Case-insensitive regex matching `query` literally anywhere in a field
fn search_pattern(query: &str) -> String {
    format!("(?i){}", regex::escape(query))
}
