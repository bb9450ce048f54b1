//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-IP token bucket, 429 when empty)
//!     → body limit (tower-http, configured max_body_size)
//!     → handlers (download guards live in crate::download)
//!     → headers.rs (nosniff, frame and referrer policy on the way out)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in client input
//! - Limiter state is in memory and per process

pub mod headers;
pub mod rate_limit;
