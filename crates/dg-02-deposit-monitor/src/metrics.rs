//! # Deposit Monitor Metrics
//!
//! Prometheus metrics for detection cycles and escalation.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! dg-02-deposit-monitor = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `guardian_cycles_total` - Counter of finished cycles (by outcome)
//! - `guardian_ticks_dropped_total` - Counter of blocks dropped while a cycle ran
//! - `guardian_key_intersections` - Gauge of intersections found by the last check
//! - `guardian_messages_published_total` - Counter of published messages (by type)
//! - `guardian_pause_calls_failed_total` - Counter of failed pause transactions

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Finished cycles, labeled by outcome
    pub static ref CYCLES: IntCounterVec = register_int_counter_vec!(
        "guardian_cycles_total",
        "Total number of detection cycles by outcome",
        &["outcome"]
    )
    .expect("Failed to create CYCLES metric");

    /// Blocks dropped by the entry guard
    pub static ref TICKS_DROPPED: IntCounter = register_int_counter!(
        "guardian_ticks_dropped_total",
        "Total number of block ticks dropped while a cycle was running"
    )
    .expect("Failed to create TICKS_DROPPED metric");

    /// Intersections found by the last check
    pub static ref KEY_INTERSECTIONS: IntGauge = register_int_gauge!(
        "guardian_key_intersections",
        "Number of queued keys found already deposited by the last check"
    )
    .expect("Failed to create KEY_INTERSECTIONS metric");

    /// Published messages, labeled by type
    pub static ref MESSAGES_PUBLISHED: IntCounterVec = register_int_counter_vec!(
        "guardian_messages_published_total",
        "Total number of guardian messages published by type",
        &["type"]
    )
    .expect("Failed to create MESSAGES_PUBLISHED metric");

    /// Failed pause transactions
    pub static ref PAUSE_CALLS_FAILED: IntCounter = register_int_counter!(
        "guardian_pause_calls_failed_total",
        "Total number of pause transactions that failed"
    )
    .expect("Failed to create PAUSE_CALLS_FAILED metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a finished cycle
#[cfg(feature = "metrics")]
pub fn record_cycle(outcome: &str) {
    CYCLES.with_label_values(&[outcome]).inc();
}

/// Record a dropped block tick
#[cfg(feature = "metrics")]
pub fn record_tick_dropped() {
    TICKS_DROPPED.inc();
}

/// Update the intersections gauge
#[cfg(feature = "metrics")]
pub fn set_key_intersections(count: usize) {
    KEY_INTERSECTIONS.set(count as i64);
}

/// Record a published message
#[cfg(feature = "metrics")]
pub fn record_message_published(message_type: &str) {
    MESSAGES_PUBLISHED.with_label_values(&[message_type]).inc();
}

/// Record a failed pause transaction
#[cfg(feature = "metrics")]
pub fn record_pause_call_failed() {
    PAUSE_CALLS_FAILED.inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_cycle(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_tick_dropped() {}

#[cfg(not(feature = "metrics"))]
pub fn set_key_intersections(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_message_published(_message_type: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_pause_call_failed() {}
