use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use songbook_core::model::{NewSong, PageRequest, Song, SongFilter, SongId, SongPage, DEFAULT_PAGE_SIZE};

use super::error::ApiError;
use crate::service::{SongService, DEFAULT_VERSE_LIMIT};

type ApiResult<T> = std::result::Result<T, ApiError>;

/// `{message}` success body.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Body of a successful `POST /songs/`.
#[derive(Debug, Serialize)]
pub struct Created {
    pub message: &'static str,
    pub id: SongId,
}

/// Query string of `GET /songs/`. Numbers are kept as text and validated
/// by hand so each bad value gets its own message.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    group: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    song: Option<String>,
    release: Option<String>,
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

/// Query string of `GET /songs/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct VerseParams {
    verse: Option<String>,
    limit: Option<String>,
}

pub async fn list_songs(
    State(service): State<SongService>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<SongPage>> {
    let Query(params) = params?;

    let page = parse_positive(params.page.as_deref(), 1, "Invalid page number")?;
    let page_size = parse_positive(
        params.page_size.as_deref(),
        DEFAULT_PAGE_SIZE,
        "Invalid page size",
    )?;
    let page = PageRequest::new(page, page_size).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let release_date = match non_empty(params.release) {
        Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
            log::warn!("Invalid release date: {}", raw);
            ApiError::bad_request("Invalid release date")
        })?),
        None => None,
    };

    let filter = SongFilter {
        group: non_empty(params.group),
        artist: non_empty(params.artist),
        album: non_empty(params.album),
        title: non_empty(params.song),
        release_date,
    };

    Ok(Json(service.list_songs(filter, page).await?))
}

pub async fn song_verses(
    State(service): State<SongService>,
    Path(id): Path<String>,
    params: Result<Query<VerseParams>, QueryRejection>,
) -> ApiResult<Json<Vec<String>>> {
    let id = parse_id(&id)?;
    let Query(params) = params?;

    let verse = parse_positive(params.verse.as_deref(), 1, "Invalid verse parameter")?;
    let limit = parse_positive(
        params.limit.as_deref(),
        DEFAULT_VERSE_LIMIT,
        "Invalid limit parameter",
    )?;

    Ok(Json(service.song_verses(id, verse, limit).await?))
}

pub async fn add_song(
    State(service): State<SongService>,
    body: Result<Json<NewSong>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(song) = body?;

    let id = service
        .add_song(song)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to add song"))?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "Song added successfully",
            id,
        }),
    ))
}

pub async fn update_song(
    State(service): State<SongService>,
    Path(id): Path<String>,
    body: Result<Json<Song>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let id = parse_id(&id)?;
    let Json(song) = body?;

    service
        .update_song(song.with_id(id))
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update song"))?;

    Ok(Json(Message {
        message: "Song updated successfully",
    }))
}

pub async fn delete_song(
    State(service): State<SongService>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let id = parse_id(&id)?;

    service
        .delete_song(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete song"))?;

    Ok(Json(Message {
        message: "Song deleted successfully",
    }))
}

fn parse_id(raw: &str) -> ApiResult<SongId> {
    raw.parse().map_err(|_| {
        log::warn!("Invalid song ID: {}", raw);
        ApiError::bad_request("Invalid ID")
    })
}

/// Parse an optional query value as an integer `>= 1`.
fn parse_positive(raw: Option<&str>, default: u32, message: &'static str) -> ApiResult<u32> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => {
            log::warn!("{}: {}", message, raw);
            Err(ApiError::bad_request(message))
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
