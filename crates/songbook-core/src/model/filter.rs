use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Optional predicates for listing songs.
///
/// Text fields match as case-insensitive substrings; the release date
/// matches exactly. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongFilter {
    pub group: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl SongFilter {
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// `true` when no predicate would be generated.
    pub fn is_empty(&self) -> bool {
        [&self.group, &self.artist, &self.album, &self.title]
            .into_iter()
            .all(|field| field.as_deref().is_none_or(str::is_empty))
            && self.release_date.is_none()
    }
}
