//! Song service: validation, verse pagination and the caller-facing error
//! taxonomy.
//!
//! Store failures are logged here with their cause and collapsed into a
//! [`ServiceError`] that carries no storage detail.

use songbook_core::model::{NewSong, PageRequest, Song, SongFilter, SongId, SongPage};
use songbook_core::text::{format_lyrics, paginate_lines};
use thiserror::Error;

use crate::store::{SongStore, StoreError};

/// Lines per verse when the caller does not ask for a limit.
pub const DEFAULT_VERSE_LIMIT: u32 = 4;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("song not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error")]
    Internal,

    #[error("failed to fetch data from external API")]
    ExternalApi,
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone)]
pub struct SongService {
    store: SongStore,
}

impl SongService {
    pub const fn new(store: SongStore) -> Self {
        Self { store }
    }

    pub async fn list_songs(&self, filter: SongFilter, page: PageRequest) -> ServiceResult<SongPage> {
        log::debug!("Listing songs: {:?}, {:?}", filter, page);
        self.store
            .list_songs(filter, page)
            .await
            .map_err(|e| collapse("list songs", e))
    }

    /// One verse of a song's formatted lyrics.
    ///
    /// `verse` is 1-based; a verse past the end is empty, not an error.
    pub async fn song_verses(&self, id: SongId, verse: u32, limit: u32) -> ServiceResult<Vec<String>> {
        log::debug!("Fetching verse {} (limit {}) of song {}", verse, limit, id);
        if verse == 0 {
            return Err(ServiceError::BadRequest("Invalid verse parameter".to_string()));
        }
        if limit == 0 {
            return Err(ServiceError::BadRequest("Invalid limit parameter".to_string()));
        }

        let text = self
            .store
            .song_text(id)
            .await
            .map_err(|e| collapse("fetch song text", e))?;

        Ok(paginate_lines(&format_lyrics(&text), verse, limit))
    }

    pub async fn add_song(&self, song: NewSong) -> ServiceResult<SongId> {
        log::debug!("Adding song {} - {}", song.group, song.title);
        song.validate()
            .map_err(|e| ServiceError::BadRequest(invalid_input(&e)))?;

        let id = self
            .store
            .add_song(song)
            .await
            .map_err(|e| collapse("add song", e))?;
        log::info!("Song {} added", id);
        Ok(id)
    }

    pub async fn update_song(&self, song: Song) -> ServiceResult<()> {
        log::debug!("Updating song {}", song.id);
        song.validate()
            .map_err(|e| ServiceError::BadRequest(invalid_input(&e)))?;

        let id = song.id;
        self.store
            .update_song(song)
            .await
            .map_err(|e| collapse("update song", e))?;
        log::info!("Song {} updated", id);
        Ok(())
    }

    pub async fn delete_song(&self, id: SongId) -> ServiceResult<()> {
        log::debug!("Deleting song {}", id);
        self.store
            .delete_song(id)
            .await
            .map_err(|e| collapse("delete song", e))?;
        log::info!("Song {} deleted", id);
        Ok(())
    }
}

fn collapse(action: &str, err: StoreError) -> ServiceError {
    if err.is_not_found() {
        log::debug!("Failed to {}: {}", action, err);
        ServiceError::NotFound
    } else if err.is_lookup_failure() {
        log::error!("Failed to {}: {}", action, err);
        ServiceError::ExternalApi
    } else {
        log::error!("Failed to {}: {}", action, err);
        ServiceError::Internal
    }
}

fn invalid_input(err: &songbook_core::Error) -> String {
    match err {
        songbook_core::Error::InvalidData(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use songbook_core::model::SongDetail;
    use songbook_core::schema::Database;
    use songbook_lyrics::{LyricsError, LyricsResult, LyricsSource};
    use std::sync::Arc;

    #[derive(Debug)]
    struct StubLyrics {
        fail: bool,
    }

    #[async_trait]
    impl LyricsSource for StubLyrics {
        async fn song_details(&self, group: &str, title: &str) -> LyricsResult<SongDetail> {
            if self.fail {
                return Err(LyricsError::NotFound {
                    entity: format!("song {group} {title}"),
                    source_name: "Genius".to_string(),
                });
            }
            Ok(SongDetail {
                link: "https://genius.com/stub".to_string(),
                text: "[Verse 1]Hello world. How are you? I am fine! Thanks.[Chorus]La la la"
                    .to_string(),
                ..SongDetail::default()
            })
        }
    }

    fn service(fail: bool) -> SongService {
        let db = Database::open_in_memory().unwrap();
        SongService::new(SongStore::new(db, Arc::new(StubLyrics { fail })))
    }

    #[tokio::test]
    async fn test_verses_paginate_formatted_lines() {
        let service = service(false);
        let id = service.add_song(NewSong::new("Stub", "Song")).await.unwrap();

        let first = service.song_verses(id, 1, 3).await.unwrap();
        assert_eq!(first, vec!["[Verse 1]", "Hello world.", "How are you?"]);

        let second = service.song_verses(id, 2, 3).await.unwrap();
        assert_eq!(second, vec!["I am fine!", "Thanks.", "[Chorus]"]);

        let past_end = service.song_verses(id, 10, 3).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_zero_verse_or_limit_is_bad_request() {
        let service = service(false);
        assert!(matches!(
            service.song_verses(1, 0, 4).await,
            Err(ServiceError::BadRequest(_))
        ));
        assert!(matches!(
            service.song_verses(1, 1, 0).await,
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_song_is_not_found() {
        let service = service(false);
        assert!(matches!(
            service.song_verses(99, 1, 4).await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_external_api() {
        let service = service(true);
        assert!(matches!(
            service.add_song(NewSong::new("Nobody", "Nothing")).await,
            Err(ServiceError::ExternalApi)
        ));
    }

    #[tokio::test]
    async fn test_empty_group_is_bad_request() {
        let service = service(false);
        let err = service.add_song(NewSong::new("  ", "Song")).await.unwrap_err();
        assert_eq!(err.to_string(), "group must not be empty");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_ids_succeed() {
        let service = service(false);
        let song = Song::new("Ghost", "Town").with_id(123);
        service.update_song(song).await.unwrap();
        service.delete_song(123).await.unwrap();
    }
}
