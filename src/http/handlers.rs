//! Song API handlers.
//!
//! Each handler runs in a span named after the operation, logs one line per
//! request and counts the call in `songs_api_requests_total`. The list
//! handler's span is opened by [`get_songs_span`] at the route level.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::catalog::{CatalogError, NewSong, Song, SongUpdate};
use crate::http::error::{ApiError, ErrorBody};
use crate::http::server::AppState;
use crate::observability::metrics;

const SONGS: &str = "/songs";
const SONG_BY_ID: &str = "/songs/{id}";

/// Decode an optional JSON body. An empty body or `null` gives `T::default()`.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, CatalogError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| CatalogError::InvalidBody(e.to_string()))
}

/// Mark the current span as failed.
fn record_error(err: CatalogError) -> ApiError {
    let span = Span::current();
    span.record("otel.status_code", "ERROR");
    span.record("otel.status_description", err.to_string().as_str());
    ApiError::from(err)
}

/// An id that does not parse can never be in the catalog.
fn parse_id(id: &str) -> Result<Uuid, CatalogError> {
    Uuid::parse_str(id).map_err(|_| CatalogError::NotFound(id.to_string()))
}

/// Open the `get_songs` span around the whole list route.
///
/// Layered outside fault injection, so an injected delay or failure lands
/// on the same span as the handler's own work.
pub async fn get_songs_span(request: Request<Body>, next: Next) -> Response {
    let span = tracing::info_span!(
        "get_songs",
        delay_ms = tracing::field::Empty,
        otel.status_code = tracing::field::Empty,
        otel.status_description = tracing::field::Empty,
    );
    next.run(request).instrument(span).await
}

/// List all songs.
#[utoipa::path(
    get,
    path = "/songs",
    tag = "songs",
    responses(
        (status = 200, description = "All songs", body = Vec<Song>),
        (status = 500, description = "Injected failure", body = ErrorBody)
    )
)]
pub async fn list_songs(State(state): State<AppState>) -> Json<Vec<Song>> {
    tracing::info!("GET /songs request received");
    metrics::record_song_request("GET", SONGS);
    Json(state.songs.list())
}

/// Create a song. Every field is optional.
#[utoipa::path(
    post,
    path = "/songs",
    tag = "songs",
    request_body = NewSong,
    responses(
        (status = 201, description = "Song created", body = Song),
        (status = 400, description = "Body is not valid JSON", body = ErrorBody)
    )
)]
#[tracing::instrument(
    name = "add_song",
    skip_all,
    fields(song_id = tracing::field::Empty, otel.status_code = tracing::field::Empty, otel.status_description = tracing::field::Empty)
)]
pub async fn create_song(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Song>), ApiError> {
    tracing::info!("POST /songs request received");
    metrics::record_song_request("POST", SONGS);

    let new_song: NewSong = parse_body(&body).map_err(record_error)?;
    let song = state.songs.insert(new_song);
    Span::current().record("song_id", song.id.to_string().as_str());
    metrics::record_catalog_size(state.songs.len());

    Ok((StatusCode::CREATED, Json(song)))
}

/// Fetch one song.
#[utoipa::path(
    get,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = String, Path, description = "Song identifier")),
    responses(
        (status = 200, description = "The song", body = Song),
        (status = 404, description = "Song not found", body = ErrorBody)
    )
)]
#[tracing::instrument(
    name = "get_song_by_id",
    skip_all,
    fields(song_id = %id, otel.status_code = tracing::field::Empty, otel.status_description = tracing::field::Empty)
)]
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Song>, ApiError> {
    tracing::info!("GET /songs/{} request received", id);
    metrics::record_song_request("GET", SONG_BY_ID);

    let song_id = parse_id(&id).map_err(record_error)?;
    state
        .songs
        .get(&song_id)
        .map(Json)
        .ok_or_else(|| record_error(CatalogError::NotFound(id)))
}

/// Replace every field of a song.
#[utoipa::path(
    put,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = String, Path, description = "Song identifier")),
    request_body = SongUpdate,
    responses(
        (status = 200, description = "Song updated", body = Song),
        (status = 400, description = "Missing fields or invalid JSON", body = ErrorBody),
        (status = 404, description = "Song not found", body = ErrorBody)
    )
)]
#[tracing::instrument(
    name = "update_song",
    skip_all,
    fields(song_id = %id, otel.status_code = tracing::field::Empty, otel.status_description = tracing::field::Empty)
)]
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Song>, ApiError> {
    tracing::info!("PUT /songs/{} request received", id);
    metrics::record_song_request("PUT", SONG_BY_ID);

    let song_id = parse_id(&id).map_err(record_error)?;
    if state.songs.get(&song_id).is_none() {
        return Err(record_error(CatalogError::NotFound(id)));
    }

    let update: SongUpdate = parse_body(&body).map_err(record_error)?;
    let fields = update.validate().map_err(record_error)?;

    state
        .songs
        .replace(&song_id, fields)
        .map(Json)
        .ok_or_else(|| record_error(CatalogError::NotFound(id)))
}

/// Remove a song.
#[utoipa::path(
    delete,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = String, Path, description = "Song identifier")),
    responses(
        (status = 204, description = "Song deleted"),
        (status = 404, description = "Song not found", body = ErrorBody)
    )
)]
#[tracing::instrument(
    name = "delete_song",
    skip_all,
    fields(song_id = %id, otel.status_code = tracing::field::Empty, otel.status_description = tracing::field::Empty)
)]
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    tracing::info!("DELETE /songs/{} request received", id);
    metrics::record_song_request("DELETE", SONG_BY_ID);

    let song_id = parse_id(&id).map_err(record_error)?;
    match state.songs.remove(&song_id) {
        Some(_) => {
            metrics::record_catalog_size(state.songs.len());
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(record_error(CatalogError::NotFound(id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_empty_and_null() {
        assert_eq!(parse_body::<NewSong>(b"").unwrap(), NewSong::default());
        assert_eq!(parse_body::<NewSong>(b"  \n").unwrap(), NewSong::default());
        assert_eq!(parse_body::<NewSong>(b"null").unwrap(), NewSong::default());
    }

    #[test]
    fn test_parse_body_malformed() {
        let err = parse_body::<NewSong>(b"{\"title\": ").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBody(_)));
    }

    #[test]
    fn test_parse_id_rejects_garbage_as_not_found() {
        assert_eq!(
            parse_id("not-a-uuid"),
            Err(CatalogError::NotFound("not-a-uuid".to_string()))
        );
    }
}
