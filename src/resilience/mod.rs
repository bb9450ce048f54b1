//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream call:
//!     → reqwest per-attempt timeout (providers::client)
//!     → On failure: retries.rs (retryable? budget left?)
//!     → backoff.rs (jittered delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Retries only for idempotent requests
//! - Retry budget prevents retry storms when a provider is down

pub mod backoff;
pub mod retries;
