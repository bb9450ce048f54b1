//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, span, query parsing)
//!     → images.rs / assets.rs / movies.rs / content.rs (handlers)
//!     → state.rs (current provider generation)
//!     → response.rs (JSON error bodies)
//!     → Send to client
//! ```

pub mod assets;
pub mod content;
pub mod images;
pub mod movies;
pub mod request;
pub mod response;
pub mod server;
pub mod state;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::ApiError;
pub use server::HttpServer;
pub use state::{AppState, Services};
