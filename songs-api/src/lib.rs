//! songs-api library - HTTP API over the song catalog
//!
//! Read, aggregate and rate songs stored in a single collection.

use axum::{middleware, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod validation;

pub use crate::db::SongRepository;
pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
///
/// Holds no mutable state of its own; the store is the only synchronization
/// point between concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub songs: SongRepository,
}

impl AppState {
    /// Create new application state over an open store
    pub fn new(db: SqlitePool) -> Self {
        Self {
            songs: SongRepository::new(db),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::song_routes())
        .merge(api::rating_routes())
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(middleware::map_response(api::json_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
