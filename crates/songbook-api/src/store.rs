//! Song store: the SQLite database plus the lyrics lookup performed on add.
//!
//! The database sits behind a mutex and every call runs on the blocking
//! pool. The lookup is awaited before the lock is taken.

use std::sync::{Arc, Mutex};

use songbook_core::model::{NewSong, PageRequest, Song, SongFilter, SongId, SongPage};
use songbook_core::schema::Database;
use songbook_core::text::normalize_scraped_lyrics;
use songbook_lyrics::{LyricsError, LyricsSource};
use thiserror::Error;

/// Errors raised by the song store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] songbook_core::Error),

    #[error("lyrics lookup failed: {0}")]
    Lookup(#[from] LyricsError),

    #[error("lyrics provider returned no link for {group} - {song}")]
    MissingLink { group: String, song: String },

    #[error("database lock poisoned")]
    Poisoned,

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// `true` when the failure came from the lyrics provider.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::Lookup(_) | Self::MissingLink { .. })
    }

    /// `true` when the requested row does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Database(e) if e.is_not_found())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Shared handle to the catalog. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SongStore {
    db: Arc<Mutex<Database>>,
    lyrics: Arc<dyn LyricsSource>,
}

impl SongStore {
    pub fn new(db: Database, lyrics: Arc<dyn LyricsSource>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            lyrics,
        }
    }

    /// Run `f` against the database on the blocking pool.
    async fn with_db<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Database) -> songbook_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut db = db.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut db).map_err(StoreError::from)
        })
        .await?
    }

    /// Add a song, enriching it from the lyrics provider.
    ///
    /// Header and detail rows are written in one transaction, so a failed
    /// lookup or insert leaves nothing behind.
    pub async fn add_song(&self, song: NewSong) -> StoreResult<SongId> {
        let (group, title) = (song.group.clone(), song.title.clone());
        if let Some(existing) = self
            .with_db(move |db| db.find_song_id(&group, &title))
            .await?
        {
            log::warn!(
                "Song {} - {} already exists with id {}; adding another",
                song.group,
                song.title,
                existing
            );
        }

        let mut details = self.lyrics.song_details(&song.group, &song.title).await?;
        if details.link.is_empty() {
            return Err(StoreError::MissingLink {
                group: song.group,
                song: song.title,
            });
        }
        details.text = normalize_scraped_lyrics(&details.text);

        let id = self
            .with_db(move |db| db.insert_song(&song, &details))
            .await?;
        log::info!("Added song {}", id);
        Ok(id)
    }

    pub async fn list_songs(&self, filter: SongFilter, page: PageRequest) -> StoreResult<SongPage> {
        self.with_db(move |db| db.list_songs(&filter, page)).await
    }

    pub async fn get_song(&self, id: SongId) -> StoreResult<Song> {
        self.with_db(move |db| db.get_song(id)).await
    }

    /// Stored lyrics of a song; `NotFound` when it has no detail row.
    pub async fn song_text(&self, id: SongId) -> StoreResult<String> {
        self.with_db(move |db| db.song_text(id)).await
    }

    pub async fn update_song(&self, song: Song) -> StoreResult<()> {
        self.with_db(move |db| db.update_song(&song)).await
    }

    /// Delete a song. Missing ids are not an error.
    pub async fn delete_song(&self, id: SongId) -> StoreResult<()> {
        let removed = self.with_db(move |db| db.delete_song(id)).await?;
        if !removed {
            log::debug!("Delete of song {} matched no rows", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use songbook_core::model::SongDetail;
    use songbook_lyrics::LyricsResult;

    #[derive(Debug)]
    struct FixedLyrics(SongDetail);

    #[async_trait]
    impl LyricsSource for FixedLyrics {
        async fn song_details(&self, _group: &str, _title: &str) -> LyricsResult<SongDetail> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct FailingLyrics;

    #[async_trait]
    impl LyricsSource for FailingLyrics {
        async fn song_details(&self, _group: &str, _title: &str) -> LyricsResult<SongDetail> {
            Err(LyricsError::Http {
                source_name: "Genius".to_string(),
                message: "HTTP status server error (500 Internal Server Error)".to_string(),
            })
        }
    }

    fn detail() -> SongDetail {
        SongDetail {
            link: "https://genius.com/muse-hysteria".to_string(),
            artist: "Muse".to_string(),
            album: "Absolution".to_string(),
            text: "[Verse 1]It's bugging me".to_string(),
            ..SongDetail::default()
        }
    }

    fn store(lyrics: impl LyricsSource + 'static) -> SongStore {
        SongStore::new(Database::open_in_memory().unwrap(), Arc::new(lyrics))
    }

    #[tokio::test]
    async fn test_add_song_normalizes_text() {
        let store = store(FixedLyrics(detail()));
        let id = store.add_song(NewSong::new("Muse", "Hysteria")).await.unwrap();

        let text = store.song_text(id).await.unwrap();
        assert_eq!(text, "[Verse 1]\nIt's bugging me");

        let song = store.get_song(id).await.unwrap();
        assert_eq!(song.details.artist, "Muse");
    }

    #[tokio::test]
    async fn test_duplicate_add_creates_second_row() {
        let store = store(FixedLyrics(detail()));
        let first = store.add_song(NewSong::new("Muse", "Hysteria")).await.unwrap();
        let second = store.add_song(NewSong::new("Muse", "Hysteria")).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_failed_lookup_persists_nothing() {
        let store = store(FailingLyrics);
        let err = store
            .add_song(NewSong::new("Muse", "Hysteria"))
            .await
            .unwrap_err();
        assert!(err.is_lookup_failure());

        let page = store
            .list_songs(SongFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total_count, 0);
    }

    #[tokio::test]
    async fn test_empty_link_is_a_lookup_failure() {
        let store = store(FixedLyrics(SongDetail::default()));
        let err = store
            .add_song(NewSong::new("Muse", "Hysteria"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingLink { .. }));
        assert!(err.is_lookup_failure());
    }

    #[tokio::test]
    async fn test_update_then_get() {
        let store = store(FixedLyrics(detail()));
        let id = store.add_song(NewSong::new("Muse", "Hysteria")).await.unwrap();

        let mut song = store.get_song(id).await.unwrap();
        song.title = "Hysteria (Live)".to_string();
        song.details.album = "HAARP".to_string();
        store.update_song(song).await.unwrap();

        let updated = store.get_song(id).await.unwrap();
        assert_eq!(updated.title, "Hysteria (Live)");
        assert_eq!(updated.details.album, "HAARP");
        assert_eq!(updated.details.artist, "Muse");
    }

    #[tokio::test]
    async fn test_missing_text_is_not_found() {
        let store = store(FixedLyrics(detail()));
        let err = store.song_text(404).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_lookup_failure());
    }

    #[tokio::test]
    async fn test_delete_twice_succeeds() {
        let store = store(FixedLyrics(detail()));
        let id = store.add_song(NewSong::new("Muse", "Hysteria")).await.unwrap();
        store.delete_song(id).await.unwrap();
        store.delete_song(id).await.unwrap();
        assert!(store.get_song(id).await.unwrap_err().is_not_found());
    }
}
