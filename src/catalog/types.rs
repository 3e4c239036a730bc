//! Song catalog types.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;
use utoipa::openapi::schema::{ObjectBuilder, OneOfBuilder, Schema, Type};
use utoipa::openapi::RefOr;
use utoipa::{PartialSchema, ToSchema};
use uuid::Uuid;

/// Release year of a song.
///
/// Clients send either a number or a string; neither form is checked. Any
/// JSON number is kept as sent, floats and integers beyond `i64` included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(serde_json::Number),
    Text(String),
}

impl From<i64> for Year {
    fn from(year: i64) -> Self {
        Year::Number(year.into())
    }
}

impl From<&str> for Year {
    fn from(year: &str) -> Self {
        Year::Text(year.to_string())
    }
}

impl PartialSchema for Year {
    fn schema() -> RefOr<Schema> {
        OneOfBuilder::new()
            .item(ObjectBuilder::new().schema_type(Type::Number))
            .item(ObjectBuilder::new().schema_type(Type::String))
            .description(Some("Release year, as a number or free text"))
            .into()
    }
}

impl ToSchema for Year {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Year")
    }
}

/// A song record as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Song {
    /// Server-assigned identifier.
    pub id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<Year>,
}

impl Song {
    /// Build a record from a creation payload.
    pub fn new(id: Uuid, new_song: NewSong) -> Self {
        Self {
            id,
            title: new_song.title,
            author: new_song.author,
            genre: new_song.genre,
            year: new_song.year,
        }
    }

    /// Build a record from a validated replacement, keeping `id`.
    pub fn replaced(id: Uuid, fields: SongFields) -> Self {
        Self {
            id,
            title: Some(fields.title),
            author: Some(fields.author),
            genre: Some(fields.genre),
            year: Some(fields.year),
        }
    }
}

/// Creation payload. Every field may be absent or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct NewSong {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<Year>,
}

/// Replacement payload as received from a client.
///
/// Fields are optional here only so that missing ones can be reported
/// together; [`SongUpdate::validate`] rejects the update unless all four
/// are present and non-null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SongUpdate {
    #[schema(required = true)]
    pub title: Option<String>,
    #[schema(required = true)]
    pub author: Option<String>,
    #[schema(required = true)]
    pub genre: Option<String>,
    #[schema(required = true)]
    pub year: Option<Year>,
}

/// The four fields of a full replacement, all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongFields {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: Year,
}

impl SongUpdate {
    /// Check that every field is present.
    pub fn validate(self) -> Result<SongFields, CatalogError> {
        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push("title");
        }
        if self.author.is_none() {
            missing.push("author");
        }
        if self.genre.is_none() {
            missing.push("genre");
        }
        if self.year.is_none() {
            missing.push("year");
        }

        match (self.title, self.author, self.genre, self.year) {
            (Some(title), Some(author), Some(genre), Some(year)) => Ok(SongFields {
                title,
                author,
                genre,
                year,
            }),
            _ => Err(CatalogError::Validation { missing }),
        }
    }
}

/// Errors surfaced by catalog operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Song not found: {0}")]
    NotFound(String),

    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Randomly triggered error for tracing")]
    InjectedFailure,
}
