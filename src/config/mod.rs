//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, environment overlay, base URL defaults)
//!     → validation.rs (semantic checks)
//!     → HubConfig (validated, immutable)
//!     → turned into a Services generation shared by all handlers
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps in a new Services generation
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Secrets normally come from the environment, not the file

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    HubConfig, ListenerConfig, ProviderEndpoint, ProvidersConfig, RapidApiConfig, RapidApiService,
};
