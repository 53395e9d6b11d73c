//! Logging, metrics and timing for agrimap
//!
//! - [`init_with_config`] installs a tracing subscriber, compact or JSON
//! - [`metrics`] is the process-wide registry of counters and latencies
//! - [`Timer`] measures an operation into that registry

mod logging;
mod metrics;
mod timer;

pub use logging::{init, init_with_config, session_id, TelemetryConfig};
pub use metrics::{metrics, LatencySummary, MetricsRegistry, MetricsSnapshot};
pub use timer::Timer;
