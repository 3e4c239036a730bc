//! OpenAPI documentation.
//!
//! The document is generated from the handler annotations with `utoipa` and
//! served next to an interactive Swagger UI.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::{NewSong, Song, SongUpdate, Year};
use crate::config::DocsConfig;
use crate::http::error::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MUSICAL CATALOG API",
        description = "CRUD API for song records."
    ),
    paths(
        crate::http::handlers::list_songs,
        crate::http::handlers::create_song,
        crate::http::handlers::get_song,
        crate::http::handlers::update_song,
        crate::http::handlers::delete_song,
    ),
    components(schemas(Song, NewSong, SongUpdate, Year, ErrorBody)),
    tags(
        (name = "songs", description = "Song catalog operations")
    )
)]
pub struct ApiDoc;

/// Swagger UI at `config.path`, serving the document at `config.spec_url()`.
pub fn swagger_ui(config: &DocsConfig) -> SwaggerUi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = config.title.clone();

    SwaggerUi::new(config.path.clone()).url(config.spec_url(), doc)
}
