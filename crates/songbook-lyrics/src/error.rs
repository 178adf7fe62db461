//! Lyrics lookup error types.

use thiserror::Error;

/// Errors that can occur while looking up a song at the lyrics provider.
#[derive(Debug, Error)]
pub enum LyricsError {
    /// The provider answered with a non-success status.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The provider has no match for the request.
    #[error("not found: {entity} at {source_name}")]
    NotFound { entity: String, source_name: String },

    /// A response could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// The song page was fetched but carried no lyrics.
    #[error("no lyrics found on {url}")]
    NoLyrics { url: String },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl LyricsError {
    /// Returns `true` when the error indicates the song was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` when the page was reachable but had no lyrics.
    pub fn is_no_lyrics(&self) -> bool {
        matches!(self, Self::NoLyrics { .. })
    }
}

/// Convenience alias for lyrics lookup results.
pub type LyricsResult<T> = std::result::Result<T, LyricsError>;
