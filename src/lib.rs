//! Song Catalog Service Library

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use catalog::{InMemorySongStore, Song, SongRepository};
pub use config::CatalogConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
