//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, request span)
//!     → middleware/ (route metrics; fault injection on GET /songs)
//!     → handlers.rs (song operations against the repository)
//!     → error.rs (CatalogError → JSON error response)
//!     → Send to client
//!
//! docs.rs serves the OpenAPI document and Swagger UI alongside.
//! ```

pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
