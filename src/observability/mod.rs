//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! identity/ and gateway/ produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every outgoing request carries an `x-request-id` that also appears in its log span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
