//! Telemetry for SCHOA
//!
//! Two halves: the `tracing` subscriber that carries diagnostics to stderr,
//! and an in-memory collector of gateway call events shown by `/status`.

use crate::gateway::{ModelOutcome, Operation};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Events kept for `/status`; counters cover the whole session
const MAX_EVENTS: usize = 100;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_directive` when set. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_logging(default_directive: &str, ansi: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .try_init();
}

/// How a call ended, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Empty,
    TransportFailure,
    AuthFailure,
    ServiceFailure,
}

impl From<&ModelOutcome> for OutcomeKind {
    fn from(outcome: &ModelOutcome) -> Self {
        match outcome {
            ModelOutcome::Success(_) => OutcomeKind::Success,
            ModelOutcome::EmptyResult => OutcomeKind::Empty,
            ModelOutcome::TransportError(_) => OutcomeKind::TransportFailure,
            ModelOutcome::AuthError(_) => OutcomeKind::AuthFailure,
            ModelOutcome::ServiceError { .. } => OutcomeKind::ServiceFailure,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeKind::Success => "ok",
            OutcomeKind::Empty => "empty",
            OutcomeKind::TransportFailure => "transport error",
            OutcomeKind::AuthFailure => "auth error",
            OutcomeKind::ServiceFailure => "service error",
        };
        write!(f, "{}", label)
    }
}

/// Telemetry event types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryEvent {
    CallCompleted {
        operation: Operation,
        outcome: OutcomeKind,
        duration_ms: u64,
    },
    CallCancelled,
}

/// Telemetry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryStats {
    pub calls: usize,
    pub succeeded: usize,
    pub empty: usize,
    pub failed: usize,
    pub auth_failures: usize,
    pub cancelled: usize,
    pub total_latency_ms: u64,
}

/// Telemetry collector, cheap to clone and shared by the gateway and shell
#[derive(Clone, Debug)]
pub struct TelemetryCollector {
    events: Arc<Mutex<VecDeque<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_EVENTS))),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        {
            let mut stats = guard(&self.stats);
            match &event {
                TelemetryEvent::CallCompleted {
                    outcome, duration_ms, ..
                } => {
                    stats.calls += 1;
                    stats.total_latency_ms += duration_ms;
                    match outcome {
                        OutcomeKind::Success => stats.succeeded += 1,
                        OutcomeKind::Empty => stats.empty += 1,
                        OutcomeKind::AuthFailure => {
                            stats.failed += 1;
                            stats.auth_failures += 1;
                        }
                        OutcomeKind::TransportFailure | OutcomeKind::ServiceFailure => stats.failed += 1,
                    }
                }
                TelemetryEvent::CallCancelled => stats.cancelled += 1,
            }
        }

        let mut events = guard(&self.events);
        if events.len() >= MAX_EVENTS {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Shorthand for a finished gateway call
    pub fn record_call(&self, operation: Operation, outcome: &ModelOutcome, elapsed: Duration) {
        self.record(TelemetryEvent::CallCompleted {
            operation,
            outcome: OutcomeKind::from(outcome),
            duration_ms: elapsed.as_millis() as u64,
        });
    }

    pub fn record_cancelled(&self) {
        self.record(TelemetryEvent::CallCancelled);
    }

    pub fn get_stats(&self) -> TelemetryStats {
        guard(&self.stats).clone()
    }

    /// Get recent events (last n), oldest first
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        let events = guard(&self.events);
        let start = events.len().saturating_sub(n);
        events.iter().skip(start).cloned().collect()
    }

    /// Share of completed calls that did not fail; empty results count as non-failures
    pub fn success_rate(&self) -> f64 {
        let stats = guard(&self.stats);
        if stats.calls == 0 {
            1.0
        } else {
            (stats.calls - stats.failed) as f64 / stats.calls as f64
        }
    }

    pub fn average_latency_ms(&self) -> Option<u64> {
        let stats = guard(&self.stats);
        if stats.calls == 0 {
            None
        } else {
            Some(stats.total_latency_ms / stats.calls as u64)
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_creation() {
        let collector = TelemetryCollector::new();
        assert!(collector.recent_events(10).is_empty());
        assert_eq!(collector.get_stats(), TelemetryStats::default());
        assert!(collector.average_latency_ms().is_none());
    }

    #[test]
    fn test_record_call_outcomes() {
        let collector = TelemetryCollector::new();
        collector.record_call(
            Operation::GenerateText,
            &ModelOutcome::Success("ok".to_string()),
            Duration::from_millis(100),
        );
        collector.record_call(Operation::SearchRecords, &ModelOutcome::EmptyResult, Duration::from_millis(50));
        collector.record_call(
            Operation::AnalyzeImage,
            &ModelOutcome::AuthError("bad key".to_string()),
            Duration::from_millis(30),
        );

        let stats = collector.get_stats();
        assert_eq!(stats.calls, 3);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.auth_failures, 1);
        assert_eq!(collector.average_latency_ms(), Some(60));
    }

    #[test]
    fn test_success_rate() {
        let collector = TelemetryCollector::new();
        collector.record_call(Operation::GenerateText, &ModelOutcome::EmptyResult, Duration::ZERO);
        collector.record_call(
            Operation::GenerateText,
            &ModelOutcome::TransportError("refused".to_string()),
            Duration::ZERO,
        );
        assert!((collector.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cancelled_not_counted_as_call() {
        let collector = TelemetryCollector::new();
        collector.record_cancelled();
        let stats = collector.get_stats();
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.calls, 0);
        assert_eq!(collector.recent_events(10), vec![TelemetryEvent::CallCancelled]);
    }

    #[test]
    fn test_recent_events() {
        let collector = TelemetryCollector::new();
        for _ in 0..10 {
            collector.record_cancelled();
        }
        collector.record_call(Operation::SearchRecords, &ModelOutcome::EmptyResult, Duration::from_millis(5));

        let recent = collector.recent_events(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(
            recent[2],
            TelemetryEvent::CallCompleted {
                operation: Operation::SearchRecords,
                outcome: OutcomeKind::Empty,
                duration_ms: 5,
            }
        );
    }

    #[test]
    fn test_event_log_is_bounded() {
        let collector = TelemetryCollector::new();
        for _ in 0..(MAX_EVENTS + 25) {
            collector.record_call(Operation::GenerateText, &ModelOutcome::EmptyResult, Duration::ZERO);
        }
        assert_eq!(collector.recent_events(usize::MAX).len(), MAX_EVENTS);
        assert_eq!(collector.get_stats().calls, MAX_EVENTS + 25);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging("warn", false);
        init_logging("debug", false);
    }
}
