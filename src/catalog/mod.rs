//! Song catalog domain.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → types.rs (NewSong / SongUpdate payloads, validation)
//!     → store.rs (SongRepository: list, insert, get, replace, remove)
//!     → Song records returned to the handler
//! ```
//!
//! # Design Decisions
//! - Storage sits behind the `SongRepository` trait and is injected through
//!   the router state, never a module-level global
//! - Ids are generated by the repository, so a caller cannot choose one
//! - Replacement is all-or-nothing: a `SongUpdate` must validate into
//!   `SongFields` before it reaches the store

pub mod store;
pub mod types;

pub use store::{InMemorySongStore, SongRepository};
pub use types::{CatalogError, NewSong, Song, SongFields, SongUpdate, Year};
