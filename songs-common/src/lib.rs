//! # Song Catalog Common Library
//!
//! Shared code for the song catalog service:
//! - Error types
//! - Configuration loading
//! - Song identifiers
//! - Song models, store initialization and seeding

pub mod config;
pub mod db;
pub mod error;
pub mod song_id;

pub use error::{Error, Result};
pub use song_id::{InvalidSongId, SongId};
