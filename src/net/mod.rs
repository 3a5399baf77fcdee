//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! HttpClientConfig
//!     → pool.rs (reconcile idle limits, build reqwest::Client)
//!     → SecretClient (one pooled client for its whole lifetime)
//! ```
//!
//! # Design Decisions
//! - Keep-alive connections are reused across fetches
//! - Idle connections are bounded in count and lifetime
//! - The request timeout applies to every call on the pool

pub mod pool;

pub use pool::{build_pooled_client, PoolLimits};
