//! Validation context and path tracking
//!
//! A `ValidationContext` carries the dotted path to the value currently
//! being validated, so nested failures can be traced to "user.profile.age"
//! rather than just "age". Paths are pushed through RAII guards and unwind
//! on drop, including early returns.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{debug, warn};

use crate::errors::ValidationResult;
use crate::monitoring::ValidationMetrics;

/// Tracks the field path of the value under validation
#[derive(Debug, Default)]
pub struct ValidationContext {
    segments: Mutex<Vec<String>>,
    metrics: Option<Arc<ValidationMetrics>>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every observed outcome into `metrics` as well
    pub fn with_metrics(metrics: Arc<ValidationMetrics>) -> Self {
        Self {
            segments: Mutex::new(Vec::new()),
            metrics: Some(metrics),
        }
    }

    /// Push `field` onto the path; the returned guard pops it on drop
    pub fn enter<S: Into<String>>(&self, field: S) -> PathGuard<'_> {
        self.segments.lock().unwrap().push(field.into());
        PathGuard { context: self }
    }

    /// Dotted path to the current value, empty at the root
    pub fn full_path(&self) -> String {
        self.segments.lock().unwrap().join(".")
    }

    pub fn depth(&self) -> usize {
        self.segments.lock().unwrap().len()
    }

    /// Run a validation step, logging its outcome and timing under the
    /// current path
    pub fn observe<F>(&self, run: F) -> ValidationResult<()>
    where
        F: FnOnce() -> ValidationResult<()>,
    {
        let path = self.full_path();
        let started = Instant::now();
        let outcome = run();
        let elapsed = started.elapsed();

        match &outcome {
            Ok(()) => {
                debug!(path = %path, elapsed_us = elapsed.as_micros() as u64, "validation passed");
            }
            Err(error) => {
                warn!(path = %path, error = %error, "validation failed");
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record(&path, elapsed, outcome.as_ref().err().map(|e| e.kind()));
        }

        outcome
    }

    fn exit(&self) {
        self.segments.lock().unwrap().pop();
    }
}

/// Pops one path segment when dropped
#[derive(Debug)]
pub struct PathGuard<'a> {
    context: &'a ValidationContext,
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.context.exit();
    }
}
