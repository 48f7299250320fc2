//! Builder for creating and configuring DebugProcess instances.

use std::{fmt, sync::Arc};

use super::DebugProcess;
use crate::{
    models::Tid,
    params::UpdatePolicy,
    plan::{PlanHandle, TracerHandle},
};

/// Produces the bottom-most plan for a newly discovered thread.
pub type BasePlanFactory = Arc<dyn Fn(Tid) -> PlanHandle + Send + Sync>;

/// Settings a [`DebugProcess`] applies at every stop.
#[derive(Clone, Default)]
pub struct ProcessConfig {
    pub update: UpdatePolicy,
    pub base_plan: Option<BasePlanFactory>,
    pub tracer: Option<TracerHandle>,
}

impl fmt::Debug for ProcessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessConfig")
            .field("update", &self.update)
            .field("base_plan", &self.base_plan.is_some())
            .field("tracer", &self.tracer)
            .finish()
    }
}

/// Builder for creating and configuring [`DebugProcess`] instances.
#[derive(Debug, Clone, Default)]
pub struct ProcessBuilder {
    config: ProcessConfig,
}

impl ProcessBuilder {
    /// Creates a new builder with default settings: exited threads are
    /// pruned, new threads get empty stacks, no tracer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stop removes stacks of threads that are no longer listed.
    pub fn with_delete_missing(mut self, delete_missing: bool) -> Self {
        self.config.update.delete_missing = delete_missing;
        self
    }

    /// Whether a stop creates stacks for threads it has not seen before.
    pub fn with_check_for_new(mut self, check_for_new: bool) -> Self {
        self.config.update.check_for_new = check_for_new;
        self
    }

    /// Seeds every newly discovered thread's stack with the plan `factory`
    /// returns.
    pub fn with_base_plan<F>(mut self, factory: F) -> Self
    where
        F: Fn(Tid) -> PlanHandle + Send + Sync + 'static,
    {
        self.config.base_plan = Some(Arc::new(factory));
        self
    }

    /// Attaches `tracer` to the stack of every newly discovered thread.
    pub fn with_tracer(mut self, tracer: TracerHandle) -> Self {
        self.config.tracer = Some(tracer);
        self
    }

    pub fn build(self) -> DebugProcess {
        DebugProcess::new(self.config)
    }
}
