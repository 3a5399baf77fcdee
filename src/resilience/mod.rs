//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Fetch from the secret service:
//!     → circuit_breaker.rs (admit or fail fast; record outcome)
//!     → timeouts.rs (explicit deadline for native-client reads)
//!     → pooled client request timeout (every other call)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: an open breaker is the only load shedding
//! - One breaker shared by every fetch variant

pub mod circuit_breaker;
pub mod timeouts;

pub use circuit_breaker::{BreakerSettings, CircuitBreaker, CircuitBreakerError, CircuitState};
pub use timeouts::{with_deadline, DeadlineExceeded};
