//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and provider clients produce:
//!     → logging.rs (structured log events, request spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID recorded on every request span
//! - Metrics are cheap when no recorder is installed

pub mod logging;
pub mod metrics;
