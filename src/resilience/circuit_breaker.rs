//! Circuit breaker shared by every fetch of a secret client.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: secret service assumed down, calls fail fast
//! - Half-Open: testing if the service recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= error_threshold
//! Open → Half-Open: after the open timeout, on the next call
//! Half-Open → Closed: consecutive probe successes >= success_threshold
//! Half-Open → Open: any probe failure (timer restarts)
//! ```
//!
//! # Design Decisions
//! - One breaker per client, shared by all paths and fetch variants
//! - Fail fast in Open state (the operation is never started)
//! - Single probe in Half-Open (prevents hammering a recovering service)
//! - State lives behind one mutex that is never held across an await

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::config::ApiConfig;
use crate::observability::metrics;

/// Breaker state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds and timeout of a breaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakerSettings {
    /// Consecutive failures while closed that open the breaker.
    pub error_threshold: u32,
    /// Consecutive half-open successes that close the breaker.
    pub success_threshold: u32,
    /// Time spent open before a trial call is admitted.
    pub timeout: Duration,
}

impl From<&ApiConfig> for BreakerSettings {
    fn from(config: &ApiConfig) -> Self {
        Self {
            error_threshold: config.limit_breaker_error_threshold,
            success_threshold: config.limit_breaker_success_threshold,
            timeout: config.open_timeout(),
        }
    }
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

/// Error returned by [`CircuitBreaker::run`].
#[derive(Debug, Error)]
pub enum CircuitBreakerError<E> {
    /// The call was rejected without running the operation.
    #[error("circuit breaker is open")]
    Open,

    /// The operation ran and failed.
    #[error("{0}")]
    Inner(E),
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Option<Instant>,
    /// Set while the single half-open trial call is running.
    probe_in_flight: bool,
}

/// How a call got admitted. Outcomes only count against the state that admitted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Closed,
    Probe,
}

/// Circuit breaker guarding calls to the secret service.
#[derive(Debug)]
pub struct CircuitBreaker {
    settings: BreakerSettings,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// Create a closed breaker.
    ///
    /// The state gauge is written on transitions only, never here.
    pub fn new(settings: BreakerSettings) -> Self {
        Self {
            settings,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                consecutive_successes: 0,
                opened_at: None,
                probe_in_flight: false,
            }),
        }
    }

    pub fn settings(&self) -> &BreakerSettings {
        &self.settings
    }

    /// Current state as last recorded.
    ///
    /// An open breaker whose timeout elapsed still reports `Open` until the
    /// next call moves it to `HalfOpen`.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    pub fn consecutive_successes(&self) -> u32 {
        self.lock().consecutive_successes
    }

    /// Run an operation under the breaker.
    ///
    /// The operation is only started if the breaker admits the call; its
    /// outcome is reported back before the result is returned.
    pub async fn run<F, Fut, T, E>(&self, operation: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let permit = match self.acquire() {
            Some(permit) => permit,
            None => {
                metrics::record_breaker_rejection();
                return Err(CircuitBreakerError::Open);
            }
        };

        let result = operation().await;
        match &result {
            Ok(_) => permit.success(),
            Err(_) => permit.failure(),
        }
        result.map_err(CircuitBreakerError::Inner)
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        // counters stay consistent under poisoning: every update is a plain store
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self) -> Option<Permit<'_>> {
        let mut inner = self.lock();
        let admission = match inner.state {
            CircuitState::Closed => Admission::Closed,
            CircuitState::Open => {
                let expired = inner
                    .opened_at
                    .map_or(true, |opened| opened.elapsed() >= self.settings.timeout);
                if !expired {
                    return None;
                }
                self.transition(&mut inner, CircuitState::HalfOpen);
                inner.probe_in_flight = true;
                Admission::Probe
            }
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    return None;
                }
                inner.probe_in_flight = true;
                Admission::Probe
            }
        };

        Some(Permit {
            breaker: self,
            admission,
            settled: false,
        })
    }

    fn on_success(&self, admission: Admission) {
        let mut inner = self.lock();
        match (inner.state, admission) {
            (CircuitState::Closed, Admission::Closed) => {
                inner.consecutive_failures = 0;
            }
            (CircuitState::HalfOpen, Admission::Probe) => {
                inner.probe_in_flight = false;
                inner.consecutive_successes += 1;
                if inner.consecutive_successes >= self.settings.success_threshold {
                    self.transition(&mut inner, CircuitState::Closed);
                }
            }
            // stale outcome of a call admitted under a previous state
            _ => {}
        }
    }

    fn on_failure(&self, admission: Admission) {
        let mut inner = self.lock();
        match (inner.state, admission) {
            (CircuitState::Closed, Admission::Closed) => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.settings.error_threshold {
                    self.transition(&mut inner, CircuitState::Open);
                }
            }
            (CircuitState::HalfOpen, Admission::Probe) => {
                inner.probe_in_flight = false;
                self.transition(&mut inner, CircuitState::Open);
            }
            _ => {}
        }
    }

    fn release_probe(&self) {
        let mut inner = self.lock();
        if inner.state == CircuitState::HalfOpen {
            inner.probe_in_flight = false;
        }
    }

    fn transition(&self, inner: &mut BreakerInner, to: CircuitState) {
        let from = inner.state;
        inner.state = to;
        inner.consecutive_failures = 0;
        inner.consecutive_successes = 0;
        inner.opened_at = match to {
            CircuitState::Open => Some(Instant::now()),
            _ => None,
        };

        match to {
            CircuitState::Open => tracing::warn!(
                from = %from,
                timeout_ms = self.settings.timeout.as_millis() as u64,
                "Circuit breaker opened"
            ),
            CircuitState::HalfOpen => {
                tracing::info!(from = %from, "Circuit breaker half-open, admitting trial call")
            }
            CircuitState::Closed => tracing::info!(from = %from, "Circuit breaker closed"),
        }
        metrics::record_breaker_state(to);
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(BreakerSettings::default())
    }
}

/// Admission ticket for one call.
///
/// A probe dropped without an outcome (cancelled future) frees the half-open slot.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    admission: Admission,
    settled: bool,
}

impl Permit<'_> {
    fn success(mut self) {
        self.settled = true;
        self.breaker.on_success(self.admission);
    }

    fn failure(mut self) {
        self.settled = true;
        self.breaker.on_failure(self.admission);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled && self.admission == Admission::Probe {
            self.breaker.release_probe();
        }
    }
}
