use async_trait::async_trait;
use songbook_core::model::SongDetail;

use crate::error::LyricsResult;

/// Anything that can resolve a group and title to a song detail record.
#[async_trait]
pub trait LyricsSource: Send + Sync + std::fmt::Debug {
    /// Look up metadata and lyrics for a song.
    async fn song_details(&self, group: &str, title: &str) -> LyricsResult<SongDetail>;
}
