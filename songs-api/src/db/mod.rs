//! Data access layer for songs-api

mod songs;

pub use songs::SongRepository;
