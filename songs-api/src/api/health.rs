//! GET /health
//!
//! Liveness plus a store round trip: the catalog size is counted on every
//! call, so a broken pool shows up as 503 rather than as failing song routes.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when the store cannot be queried
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub revision: &'static str,
    /// Songs in the catalog; absent when degraded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub songs: Option<i64>,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let songs = match state.songs.count().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Health check could not reach the song store: {}", e);
            None
        }
    };

    let status = if songs.is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if songs.is_some() { "ok" } else { "degraded" },
        module: "songs-api",
        version: env!("CARGO_PKG_VERSION"),
        revision: env!("SONGS_GIT_REVISION"),
        songs,
    };

    (status, Json(body))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
