//! In-process metrics.
//!
//! Counters and latency samples keyed by dotted names such as
//! `farms.list.requests` or `farms.list`. Snapshots are sorted by name so
//! repeated exports diff cleanly.

use crate::logging::session_id;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

/// Process-wide registry.
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

pub struct MetricsRegistry {
    counters: RwLock<BTreeMap<String, u64>>,
    /// Milliseconds
    latencies: RwLock<BTreeMap<String, Vec<f64>>>,
    started: Instant,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(BTreeMap::new()),
            latencies: RwLock::new(BTreeMap::new()),
            started: Instant::now(),
        }
    }

    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    pub fn increment_by(&self, name: &str, value: u64) {
        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        let counter = counters.entry(name.to_string()).or_insert(0);
        *counter = counter.saturating_add(value);
    }

    /// Current value of a counter, 0 if never incremented.
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn record_duration(&self, name: &str, duration: Duration) {
        self.latencies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .push(duration.as_secs_f64() * 1000.0);
    }

    /// Number of durations recorded under `name`.
    pub fn samples(&self, name: &str) -> usize {
        self.latencies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, Vec::len)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let latencies_ms = self
            .latencies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, samples)| (name.clone(), LatencySummary::from_samples(samples)))
            .collect();

        MetricsSnapshot {
            session_id: session_id().to_string(),
            uptime_secs: self.started.elapsed().as_secs(),
            counters,
            latencies_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub session_id: String,
    pub uptime_secs: u64,
    pub counters: BTreeMap<String, u64>,
    pub latencies_ms: BTreeMap<String, LatencySummary>,
}

/// Summary of one latency series, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub max: f64,
}

impl LatencySummary {
    #[allow(clippy::cast_precision_loss)]
    fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();

        Self {
            count,
            mean: sorted.iter().sum::<f64>() / count as f64,
            p50: nearest_rank(&sorted, 0.50),
            p95: nearest_rank(&sorted, 0.95),
            max: sorted[count - 1],
        }
    }
}

/// Nearest-rank percentile of a sorted, non-empty slice.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn nearest_rank(sorted: &[f64], quantile: f64) -> f64 {
    let rank = (quantile * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
