//! REST surface: `/songs` collection and `/songs/{id}` item routes.

pub mod error;
pub mod handlers;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::service::SongService;

pub use error::ApiError;

/// Build the application router. Both `/songs` and `/songs/` serve the
/// collection.
pub fn router(service: SongService) -> Router {
    Router::new()
        .route(
            "/songs",
            get(handlers::list_songs).post(handlers::add_song),
        )
        .route(
            "/songs/",
            get(handlers::list_songs).post(handlers::add_song),
        )
        .route(
            "/songs/{id}",
            get(handlers::song_verses)
                .put(handlers::update_song)
                .delete(handlers::delete_song),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
