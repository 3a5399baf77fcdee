//! Metrics collection.
//!
//! # Metrics
//! - `vault_fetch_total` (counter): fetches by variant and outcome
//! - `vault_fetch_duration_seconds` (histogram): fetch latency by variant
//! - `vault_breaker_state` (gauge): 0=closed, 1=open, 2=half-open; written on transitions
//! - `vault_breaker_rejections_total` (counter): calls refused while open
//!
//! # Design Decisions
//! - Uses the `metrics` facade; without an installed recorder every call is a no-op
//! - Labels are static strings only (no paths, no tokens)

use std::time::Duration;

use crate::resilience::circuit_breaker::CircuitState;

/// Record one finished fetch.
pub fn record_fetch(variant: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!("vault_fetch_total", "variant" => variant, "outcome" => outcome).increment(1);
    metrics::histogram!("vault_fetch_duration_seconds", "variant" => variant)
        .record(elapsed.as_secs_f64());
}

/// Record the breaker's current state.
pub fn record_breaker_state(state: CircuitState) {
    metrics::gauge!("vault_breaker_state").set(state as u8 as f64);
}

/// Record a call rejected by an open breaker.
pub fn record_breaker_rejection() {
    metrics::counter!("vault_breaker_rejections_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};

    use crate::resilience::CircuitBreaker;

    /// Counts how often the breaker state gauge is looked up.
    #[derive(Default)]
    struct StateGaugeWatcher {
        writes: AtomicU32,
    }

    impl Recorder for StateGaugeWatcher {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, _: &Key, _: &Metadata<'_>) -> Counter {
            Counter::noop()
        }

        fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
            if key.name() == "vault_breaker_state" {
                self.writes.fetch_add(1, Ordering::SeqCst);
            }
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_new_breaker_leaves_state_gauge_alone() {
        let watcher = StateGaugeWatcher::default();
        metrics::with_local_recorder(&watcher, || {
            let _first = CircuitBreaker::default();
            let _second = CircuitBreaker::default();
        });
        assert_eq!(watcher.writes.load(Ordering::SeqCst), 0);

        metrics::with_local_recorder(&watcher, || record_breaker_state(CircuitState::Open));
        assert_eq!(watcher.writes.load(Ordering::SeqCst), 1);
    }
}
