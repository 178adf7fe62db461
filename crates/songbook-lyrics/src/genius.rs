//! Genius API client.
//!
//! A lookup is three requests: a search for `"{group} {title}"`, a fetch of
//! the first hit by id, and a plain GET of the song's canonical page whose
//! HTML is scraped for the lyrics. Any non-success status fails the whole
//! lookup; there is no retry.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use songbook_core::model::SongDetail;

use crate::error::{LyricsError, LyricsResult};
use crate::scrape::extract_lyrics;
use crate::source::LyricsSource;

const SOURCE_NAME: &str = "Genius";

/// Default Genius API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.genius.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// API response types (private -- Genius wraps everything in `response`)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct SongResponse {
    response: SongEnvelope,
}

#[derive(Debug, Deserialize)]
struct SongEnvelope {
    song: GeniusSong,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Song metadata as returned by `GET /songs/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeniusSong {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Canonical lyrics page.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub primary_artist: Option<GeniusName>,
    #[serde(default)]
    pub album: Option<GeniusName>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub tempo: Option<String>,
}

/// A named Genius entity (artist, album).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeniusName {
    #[serde(default)]
    pub name: String,
}

impl GeniusSong {
    /// Combine the metadata with scraped lyrics into a detail record.
    ///
    /// A release date that is not `YYYY-MM-DD` is dropped with a warning.
    pub fn into_detail(self, lyrics: String) -> SongDetail {
        let release_date = self.release_date.as_deref().and_then(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| {
                    log::warn!(
                        "Ignoring release date {:?} for Genius song {}: {}",
                        raw,
                        self.id,
                        e
                    );
                })
                .ok()
        });

        SongDetail {
            link: self.url,
            artist: self.primary_artist.map(|a| a.name).unwrap_or_default(),
            album: self.album.map(|a| a.name).unwrap_or_default(),
            release_date,
            text: lyrics,
            genre: self.genre.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            key: self.key.unwrap_or_default(),
            tempo: self.tempo.unwrap_or_default(),
        }
    }
}

/// Connection settings for the lyrics provider.
#[derive(Debug, Clone)]
pub struct LyricsSettings {
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl LyricsSettings {
    #[must_use]
    pub fn new(base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Genius API client.
///
/// The base URL and access token are supplied by the caller; the token is
/// sent as a bearer token on API calls but not on page fetches.
#[derive(Debug, Clone)]
pub struct GeniusClient {
    http: Client,
    base_url: String,
    access_token: Option<String>,
}

impl GeniusClient {
    /// Create a new Genius client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: LyricsSettings) -> LyricsResult<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("songbook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            access_token: settings.access_token,
        })
    }

    /// Search for a song and return the id of the first hit.
    pub async fn search(&self, group: &str, title: &str) -> LyricsResult<u64> {
        let query = format!("{group} {title}");
        let request = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query.as_str())]);

        let result: SearchResponse = self.fetch_json(request).await?;

        result
            .response
            .hits
            .into_iter()
            .next()
            .map(|hit| hit.result.id)
            .ok_or_else(|| LyricsError::NotFound {
                entity: format!("song {query:?}"),
                source_name: SOURCE_NAME.to_string(),
            })
    }

    /// Fetch song metadata by Genius id.
    pub async fn song(&self, id: u64) -> LyricsResult<GeniusSong> {
        let request = self.http.get(format!("{}/songs/{}", self.base_url, id));
        let result: SongResponse = self.fetch_json(request).await?;
        Ok(result.response.song)
    }

    /// Fetch a song page and scrape its lyrics.
    pub async fn page_lyrics(&self, url: &str) -> LyricsResult<String> {
        let html = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| http_error(&e))?
            .text()
            .await?;

        extract_lyrics(&html).ok_or_else(|| LyricsError::NoLyrics {
            url: url.to_string(),
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> LyricsResult<T> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await?
            .error_for_status()
            .map_err(|e| http_error(&e))?;

        response.json().await.map_err(|e| LyricsError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl LyricsSource for GeniusClient {
    async fn song_details(&self, group: &str, title: &str) -> LyricsResult<SongDetail> {
        let id = self.search(group, title).await?;
        log::debug!("Genius search for {} - {} matched song {}", group, title, id);

        let song = self.song(id).await?;
        let lyrics = if song.url.is_empty() {
            // Nothing to scrape; the caller rejects records without a link.
            String::new()
        } else {
            self.page_lyrics(&song.url).await?
        };

        Ok(song.into_detail(lyrics))
    }
}

fn http_error(e: &reqwest::Error) -> LyricsError {
    LyricsError::Http {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    }
}
