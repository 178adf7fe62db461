//! Lyrics provider client for songbook.
//!
//! Resolves a `{group, title}` pair to a [`SongDetail`] through the Genius
//! API (search, then fetch by id) and scrapes the lyrics from the song's
//! canonical page.
//!
//! [`SongDetail`]: songbook_core::model::SongDetail

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod genius;
pub mod scrape;
pub mod source;

pub use error::{LyricsError, LyricsResult};
pub use genius::{GeniusClient, LyricsSettings};
pub use source::LyricsSource;
