//! Song identifiers
//!
//! A `SongId` is a 12-byte value rendered as 24 lowercase hex characters:
//! 4 bytes of big-endian UNIX seconds, 5 bytes unique to the generating
//! process, and a 3-byte big-endian counter. Lexical order of the hex form
//! matches creation order, which is what cursor pagination relies on.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of the textual form
pub const SONG_ID_LEN: usize = 24;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(rand::random);

// Starts in the lower half of the 24-bit space so a single process does not
// wrap around and break ordering.
static COUNTER: Lazy<AtomicU32> =
    Lazy::new(|| AtomicU32::new(rand::thread_rng().gen_range(0..0x0080_0000)));

/// Raised when a string is not a syntactically valid song identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is not valid identifier")]
pub struct InvalidSongId(pub String);

/// Opaque, orderable identifier of a song document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SongId(String);

impl SongId {
    /// Parse an identifier, normalizing hex digits to lowercase
    pub fn parse(value: &str) -> Result<Self, InvalidSongId> {
        if Self::is_valid(value) {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(InvalidSongId(value.to_string()))
        }
    }

    /// True if `value` is exactly 24 hexadecimal characters
    pub fn is_valid(value: &str) -> bool {
        value.len() == SONG_ID_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Create a fresh identifier greater than any previously generated by
    /// this process within the same second
    pub fn generate() -> Self {
        let secs = chrono::Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::SeqCst) & 0x00FF_FFFF;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SongId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SongId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SongId::parse(&raw).map_err(de::Error::custom)
    }
}
