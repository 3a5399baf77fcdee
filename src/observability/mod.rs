//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Secret client and breaker produce:
//!     → logging.rs (structured log events, per-fetch spans)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Whatever subscriber / recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a global subscriber or recorder itself
//! - Request ID flows through every log line of a fetch
//! - Tokens never appear in logs or metric labels
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
