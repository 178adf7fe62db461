use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Store-assigned song identifier.
pub type SongId = i64;

/// Enrichment record attached 1:1 to a song header.
///
/// Populated from the lyrics provider when the song is added. Only `album`
/// and `text` may change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongDetail {
    /// Canonical page URL at the lyrics provider.
    pub link: String,
    pub artist: String,
    pub album: String,
    pub release_date: Option<NaiveDate>,
    /// Raw lyrics text as stored.
    pub text: String,
    pub genre: String,
    pub duration: String,
    pub key: String,
    pub tempo: String,
}

/// A catalog entry: the group/title header plus its detail record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub id: SongId,
    pub group: String,
    #[serde(rename = "song")]
    pub title: String,
    #[serde(default)]
    pub details: SongDetail,
}

impl Song {
    #[must_use]
    pub fn new(group: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: 0,
            group: group.into(),
            title: title.into(),
            details: SongDetail::default(),
        }
    }

    #[must_use]
    pub const fn with_id(mut self, id: SongId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: SongDetail) -> Self {
        self.details = details;
        self
    }

    /// Check that the group and title are present.
    pub fn validate(&self) -> Result<()> {
        require_identity(&self.group, &self.title)
    }
}

/// The minimal create request: everything else comes from the lyrics
/// provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
    pub group: String,
    #[serde(rename = "song")]
    pub title: String,
}

impl NewSong {
    #[must_use]
    pub fn new(group: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            title: title.into(),
        }
    }

    /// Check that the group and title are present.
    pub fn validate(&self) -> Result<()> {
        require_identity(&self.group, &self.title)
    }
}

fn require_identity(group: &str, title: &str) -> Result<()> {
    if group.trim().is_empty() {
        return Err(Error::InvalidData("group must not be empty".to_string()));
    }
    if title.trim().is_empty() {
        return Err(Error::InvalidData("song must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_json_field_names() {
        let song = Song::new("Muse", "Uprising").with_id(7);
        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["group"], "Muse");
        assert_eq!(json["song"], "Uprising");
        assert!(json["details"]["release_date"].is_null());
    }

    #[test]
    fn test_release_date_serializes_as_iso_date() {
        let details = SongDetail {
            release_date: NaiveDate::from_ymd_opt(2009, 9, 7),
            ..SongDetail::default()
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["release_date"], "2009-09-07");
    }

    #[test]
    fn test_update_body_without_id_or_details() {
        let song: Song = serde_json::from_str(r#"{"group": "Muse", "song": "Uprising"}"#).unwrap();
        assert_eq!(song.id, 0);
        assert_eq!(song.details, SongDetail::default());
    }

    #[test]
    fn test_partial_details_default_missing_fields() {
        let song: Song = serde_json::from_str(
            r#"{"group": "Muse", "song": "Uprising", "details": {"album": "The Resistance"}}"#,
        )
        .unwrap();
        assert_eq!(song.details.album, "The Resistance");
        assert!(song.details.text.is_empty());
    }

    #[test]
    fn test_new_song_validation() {
        assert!(NewSong::new("Muse", "Uprising").validate().is_ok());
        assert!(NewSong::new("  ", "Uprising").validate().is_err());
        assert!(NewSong::new("Muse", "").validate().is_err());
    }
}
