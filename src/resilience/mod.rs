//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Identity resolution attempt fails:
//!     → backoff.rs (delay for this attempt number)
//!     → sleep, then retry from the local session store
//! ```
//!
//! # Design Decisions
//! - Only identity resolution retries; the HTTP call itself is never retried
//! - Delays strictly increase across attempts
//! - Linear growth by default, exponential with jitter when configured

pub mod backoff;

pub use backoff::{backoff_delay, BackoffStrategy};
