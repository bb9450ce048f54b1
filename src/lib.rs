//! Media Hub library: provider clients, handlers and the HTTP server.

pub mod admin;
pub mod catalog;
pub mod config;
pub mod content;
pub mod download;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod providers;
pub mod resilience;
pub mod security;

pub use config::schema::HubConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
