//! Step-by-step observers attached to active plans.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use log::trace;

use super::ThreadPlan;

/// Shared handle to a tracer.
pub type TracerHandle = Arc<dyn PlanTracer>;

/// Observer that logs what a plan does while the thread steps.
pub trait PlanTracer: fmt::Debug + Send + Sync {
    fn enable_tracing(&self, enabled: bool);

    fn enable_single_step(&self, single_step: bool);

    fn is_tracing(&self) -> bool;

    fn is_single_stepping(&self) -> bool;

    /// Records one observation about `plan`. Disabled tracers drop it.
    fn trace(&self, plan: &dyn ThreadPlan, message: &str);
}

/// Tracer writing to the `log` facade at trace level.
#[derive(Debug, Default)]
pub struct LogTracer {
    tracing: AtomicBool,
    single_step: AtomicBool,
    emitted: AtomicUsize,
}

impl LogTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines emitted while tracing was enabled.
    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::Relaxed)
    }
}

impl PlanTracer for LogTracer {
    fn enable_tracing(&self, enabled: bool) {
        self.tracing.store(enabled, Ordering::Relaxed);
    }

    fn enable_single_step(&self, single_step: bool) {
        self.single_step.store(single_step, Ordering::Relaxed);
    }

    fn is_tracing(&self) -> bool {
        self.tracing.load(Ordering::Relaxed)
    }

    fn is_single_stepping(&self) -> bool {
        self.single_step.load(Ordering::Relaxed)
    }

    fn trace(&self, plan: &dyn ThreadPlan, message: &str) {
        if !self.is_tracing() {
            return;
        }
        self.emitted.fetch_add(1, Ordering::Relaxed);
        let mode = if self.is_single_stepping() { "step" } else { "run" };
        trace!(target: "stepctl::tracer", "[{mode}] {} ({}): {message}", plan.name(), plan.kind());
    }
}
