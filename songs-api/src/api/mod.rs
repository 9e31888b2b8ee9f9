//! HTTP API handlers for songs-api

pub mod health;
pub mod ratings;
pub mod songs;

use axum::{
    http::{header, StatusCode},
    response::Response,
};

use crate::error::{error_response, ApiError, ErrorMessage};

pub use health::health_routes;
pub use ratings::{rate_song, rating_routes, rating_summary};
pub use songs::{average_difficulty, list_songs, search_songs, song_routes};

/// Fallback for unmatched paths
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

/// Give the router's bare 405 responses the JSON error shape, keeping `Allow`
pub async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut json = error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorMessage::Text("Method Not Allowed".to_string()),
    );
    if let Some(allow) = allow {
        json.headers_mut().insert(header::ALLOW, allow);
    }

    json
}
