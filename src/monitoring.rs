//! Validation metrics
//!
//! Counters and timings are kept in-process for programmatic access via
//! [`ValidationMetrics::summary`], and mirrored to the `metrics` facade so
//! an exporter installed by the host application picks them up too.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use metrics::{counter, histogram};
use serde::Serialize;
use tracing::info;

/// Per-field timing statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    pub count: usize,
    pub min: Duration,
    pub max: Duration,
    pub avg: Duration,
    pub median: Duration,
}

/// Point-in-time snapshot of all collected metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub total_validations: u64,
    pub success_count: u64,
    pub failure_count: u64,
    /// Percentage of successful validations, 0.0 when nothing was recorded
    pub success_rate: f64,
    pub total_time: Duration,
    pub average_time: Duration,
    /// Failure counts keyed by error kind
    pub error_distribution: HashMap<String, u64>,
    pub field_stats: HashMap<String, FieldStats>,
}

#[derive(Debug, Default)]
struct MetricsState {
    total_validations: u64,
    success_count: u64,
    failure_count: u64,
    total_time: Duration,
    field_times: HashMap<String, Vec<Duration>>,
    error_counts: HashMap<String, u64>,
}

/// Thread-safe collector for validation outcomes and timings
#[derive(Debug, Default)]
pub struct ValidationMetrics {
    state: Mutex<MetricsState>,
}

impl ValidationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one validation outcome. `error_kind` is `None` on success;
    /// timings for an empty path are counted in the totals only.
    pub fn record(&self, path: &str, elapsed: Duration, error_kind: Option<&str>) {
        counter!("validation.calls", 1);
        histogram!("validation.duration_seconds", elapsed.as_secs_f64());

        let mut state = self.state.lock().unwrap();
        state.total_validations += 1;
        state.total_time += elapsed;

        match error_kind {
            None => {
                state.success_count += 1;
                counter!("validation.success", 1);
            }
            Some(kind) => {
                state.failure_count += 1;
                *state.error_counts.entry(kind.to_string()).or_insert(0) += 1;
                counter!("validation.failure", 1, "kind" => kind.to_string());
            }
        }

        if !path.is_empty() {
            state
                .field_times
                .entry(path.to_string())
                .or_default()
                .push(elapsed);
        }
    }

    /// Timing statistics for one field path, if it was ever recorded
    pub fn field_stats(&self, path: &str) -> Option<FieldStats> {
        let state = self.state.lock().unwrap();
        let times = state.field_times.get(path)?;
        compute_stats(times)
    }

    pub fn summary(&self) -> MetricsSummary {
        let state = self.state.lock().unwrap();

        let success_rate = if state.total_validations == 0 {
            0.0
        } else {
            state.success_count as f64 / state.total_validations as f64 * 100.0
        };

        let average_time = state
            .total_time
            .checked_div(state.total_validations as u32)
            .unwrap_or_default();

        let field_stats = state
            .field_times
            .iter()
            .filter_map(|(path, times)| compute_stats(times).map(|stats| (path.clone(), stats)))
            .collect();

        MetricsSummary {
            total_validations: state.total_validations,
            success_count: state.success_count,
            failure_count: state.failure_count,
            success_rate,
            total_time: state.total_time,
            average_time,
            error_distribution: state.error_counts.clone(),
            field_stats,
        }
    }

    /// Emit the current summary at info level
    pub fn log_summary(&self) {
        let summary = self.summary();
        info!(
            total_validations = summary.total_validations,
            success_count = summary.success_count,
            failure_count = summary.failure_count,
            success_rate = summary.success_rate,
            average_time_us = summary.average_time.as_micros() as u64,
            "validation metrics summary"
        );
    }

    /// Discard everything recorded so far
    pub fn reset(&self) {
        *self.state.lock().unwrap() = MetricsState::default();
    }
}

fn compute_stats(times: &[Duration]) -> Option<FieldStats> {
    if times.is_empty() {
        return None;
    }

    let mut sorted = times.to_vec();
    sorted.sort();

    let count = sorted.len();
    let total: Duration = sorted.iter().sum();
    let median = if count % 2 == 1 {
        sorted[count / 2]
    } else {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2
    };

    Some(FieldStats {
        count,
        min: sorted[0],
        max: sorted[count - 1],
        avg: total / count as u32,
        median,
    })
}
