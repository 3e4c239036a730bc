//! Async client for the Song Catalog API.

pub mod client;

pub use client::{CatalogClient, ClientError, SongInput, SongRecord};
