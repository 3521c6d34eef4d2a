//! Tracing subscriber setup for AODV nodes.
//!
//! Level conventions:
//! - ERROR: the node cannot continue (bind failure, closed event channel)
//! - WARN: dropped frames, unrepresentable messages, transport hiccups
//! - INFO: discovery outcomes, node start and stop
//! - DEBUG: routing decisions
//! - TRACE: raw frames as hex

use tracing_subscriber::EnvFilter;

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install a human-readable subscriber. `RUST_LOG` overrides `default_level`.
pub fn init(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_or(default_level))
        .init();
}

/// Install a JSON subscriber, selected by `RUST_LOG_FORMAT=json`.
pub fn init_json(default_level: &str) {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter_or(default_level))
        .init();
}

/// Subscriber for tests; safe to call more than once.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or("debug"))
        .with_test_writer()
        .try_init();
}
