//! Song ratings
//!
//! POST /songs/rating appends a rating; GET /songs/avg/rating/:id summarizes them.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use songs_common::SongId;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::models::{RatedSong, RatingSummary};
use crate::validation::validate_rating_payload;
use crate::AppState;

/// POST /songs/rating
///
/// Body: `{"_id": "<song id>", "rating": 1..=5}`. Validation happens before
/// any store access.
pub async fn rate_song(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<RatedSong>> {
    let Json(payload) = payload?;
    let rating = validate_rating_payload(&payload)?;

    let rated = state.songs.rate(&rating).await?;
    info!(
        "Rated song {} with {} ({} ratings)",
        rated.id,
        rating.rating(),
        rated.rates.len()
    );

    Ok(Json(rated))
}

/// GET /songs/avg/rating/:id
pub async fn rating_summary(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> ApiResult<Json<RatingSummary>> {
    let id = SongId::parse(&song_id)?;

    let summary = state.songs.rating_summary(&id).await?;
    debug!("Rating summary for {}: {:?}", id, summary);

    Ok(Json(summary))
}

/// Build rating routes
pub fn rating_routes() -> Router<AppState> {
    Router::new()
        .route("/songs/rating", post(rate_song))
        .route("/songs/avg/rating/:id", get(rating_summary))
}
