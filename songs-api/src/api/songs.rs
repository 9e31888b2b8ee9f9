//! Song listing, difficulty aggregate and search
//!
//! GET /songs, GET /songs/avg/difficulty, GET /songs/search

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use songs_common::db::Song;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::pagination::{parse_cursor, SongPage};
use crate::AppState;

/// Query parameters for GET /songs
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Cursor: id of the last song already seen
    pub from: Option<String>,
}

/// Query parameters for GET /songs/avg/difficulty
#[derive(Debug, Deserialize)]
pub struct DifficultyQuery {
    pub level: Option<String>,
}

/// Query parameters for GET /songs/search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DifficultyResponse {
    pub avg_difficulty: f64,
}

/// GET /songs?from=<id>
pub async fn list_songs(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<SongPage>> {
    let Query(query) = query?;
    let cursor = parse_cursor(query.from.as_deref())?;

    let page = state.songs.list_page(cursor.as_ref()).await?;
    debug!("Listed {} songs after {:?}", page.songs.len(), cursor);

    Ok(Json(page))
}

/// GET /songs/avg/difficulty?level=<int>
pub async fn average_difficulty(
    State(state): State<AppState>,
    query: Result<Query<DifficultyQuery>, QueryRejection>,
) -> ApiResult<Json<DifficultyResponse>> {
    let Query(query) = query?;
    let level = query.level.as_deref().map(parse_level).transpose()?;

    let avg_difficulty = state.songs.average_difficulty(level).await?;

    Ok(Json(DifficultyResponse { avg_difficulty }))
}

/// GET /songs/search?q=<text>
pub async fn search_songs(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Song>>> {
    let Query(query) = query?;
    let songs = state.songs.search(query.q.as_deref().unwrap_or("")).await?;

    Ok(Json(songs))
}

fn parse_level(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::invalid(format!("{} is not a valid level", raw)))
}

/// Build song read routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(list_songs))
        .route("/songs/avg/difficulty", get(average_difficulty))
        .route("/songs/search", get(search_songs))
}
